//! Turning scraped threads into stored fragments.
//!
//! Each comment becomes one fragment: a canonical multi-line text block plus
//! metadata, keyed by the comment id. The line prefixes in the text block are a
//! wire contract with the context formatter; changing them breaks retrieval-time
//! parsing.

use crate::error::Result;
use crate::scraper::DailyThread;
use crate::store::{DiscussionStore, FragmentMetadata};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Prefix marking a parent id that refers to another comment (not the thread).
const COMMENT_PARENT_PREFIX: &str = "t1_";

/// One fragment ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub id: String,
    pub document: String,
    pub metadata: FragmentMetadata,
}

/// Build fragments for every comment in a thread.
///
/// A comment whose parent id carries the comment prefix and resolves within the
/// same thread gets the parent's text and score attached; dangling parents are
/// treated as no parent.
pub fn build_fragments(thread: &DailyThread) -> Vec<Fragment> {
    let by_id: HashMap<&str, &crate::scraper::RawComment> =
        thread.comments.iter().map(|c| (c.id.as_str(), c)).collect();

    thread
        .comments
        .iter()
        .map(|comment| {
            let parent = comment
                .parent_id
                .strip_prefix(COMMENT_PARENT_PREFIX)
                .and_then(|pid| by_id.get(pid));

            let document = render_fragment(
                &thread.date,
                comment.score,
                parent.map(|p| (p.body.as_str(), p.score)),
                &comment.body,
            );

            Fragment {
                id: comment.id.clone(),
                document,
                metadata: FragmentMetadata {
                    post_date: thread.date.clone(),
                    score: comment.score,
                    parent_id: comment.parent_id.clone(),
                    parent_score: parent.map(|p| p.score).unwrap_or(0),
                },
            }
        })
        .collect()
}

/// Render the canonical fragment text block.
///
/// No-parent fragments emit no parent lines at all (and no stray blank line).
fn render_fragment(date: &str, score: i64, parent: Option<(&str, i64)>, body: &str) -> String {
    match parent {
        Some((parent_body, parent_score)) => format!(
            "Date: {}\nComment score: {}\nParent comment: {}\nParent score: {}\nComment: {}",
            date, score, parent_body, parent_score, body
        ),
        None => format!("Date: {}\nComment score: {}\nComment: {}", date, score, body),
    }
}

/// Upsert every fragment of every thread into the store.
///
/// Returns the number of fragments written. Re-running over the same threads
/// overwrites rather than duplicates, since fragments are keyed by comment id.
#[instrument(skip(store, threads), fields(threads = threads.len()))]
pub async fn ingest_threads(
    store: &dyn DiscussionStore,
    threads: &[DailyThread],
) -> Result<usize> {
    let mut total = 0;
    for thread in threads {
        let fragments = build_fragments(thread);
        debug!("Ingesting {} fragments from thread {}", fragments.len(), thread.id);
        for fragment in &fragments {
            store
                .add(&fragment.id, &fragment.document, &fragment.metadata)
                .await?;
        }
        total += fragments.len();
    }
    info!("Ingested {} fragments", total);
    Ok(total)
}
