//! Discussion fragment store abstraction.
//!
//! The store owns embedding and nearest-neighbor search; this crate only speaks its
//! narrow contract: upsert text + metadata by id, query by text, list, delete.

mod chroma;
mod memory;

pub use chroma::ChromaStore;
pub use memory::MemoryStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Metadata stored alongside each fragment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FragmentMetadata {
    /// Calendar date of the thread the comment belongs to (YYYY-MM-DD).
    pub post_date: String,
    /// Comment vote score (may be negative).
    pub score: i64,
    /// Raw parent identifier, including the thread-root sentinel.
    pub parent_id: String,
    /// Score of the resolved parent comment, 0 when there is none.
    #[serde(default)]
    pub parent_score: i64,
}

/// Ids and metadata for every stored fragment, used for status reporting.
#[derive(Debug, Clone, Default)]
pub struct CorpusListing {
    pub ids: Vec<String>,
    pub metadatas: Vec<FragmentMetadata>,
}

/// Aggregate state of the stored corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorpusStatus {
    pub total_documents: usize,
    /// Inclusive span in days between the oldest and newest thread dates.
    pub date_range: Option<i64>,
    pub oldest_date: Option<String>,
    pub newest_date: Option<String>,
}

impl CorpusStatus {
    /// Status for an empty corpus. Not an error.
    pub fn empty() -> Self {
        Self {
            total_documents: 0,
            date_range: None,
            oldest_date: None,
            newest_date: None,
        }
    }

    /// Aggregate a listing into a status summary.
    ///
    /// Metadata entries with unparseable dates count toward the total but are
    /// ignored for the date range.
    pub fn from_listing(listing: &CorpusListing) -> Self {
        if listing.ids.is_empty() {
            return Self::empty();
        }

        let dates: Vec<NaiveDate> = listing
            .metadatas
            .iter()
            .filter_map(|m| NaiveDate::parse_from_str(&m.post_date, "%Y-%m-%d").ok())
            .collect();

        let (oldest, newest) = match (dates.iter().min(), dates.iter().max()) {
            (Some(min), Some(max)) => (*min, *max),
            _ => {
                return Self {
                    total_documents: listing.ids.len(),
                    date_range: None,
                    oldest_date: None,
                    newest_date: None,
                }
            }
        };

        Self {
            total_documents: listing.ids.len(),
            date_range: Some((newest - oldest).num_days() + 1),
            oldest_date: Some(oldest.format("%Y-%m-%d").to_string()),
            newest_date: Some(newest.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Trait for discussion fragment store implementations.
#[async_trait]
pub trait DiscussionStore: Send + Sync {
    /// Upsert a fragment by id. Re-adding the same id must not create duplicates.
    async fn add(&self, id: &str, document: &str, metadata: &FragmentMetadata) -> Result<()>;

    /// Return up to `top_k` fragment texts ranked by relevance to `text`.
    ///
    /// Returns fewer than `top_k` when the corpus is smaller, and an empty
    /// vector for an empty corpus.
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<String>>;

    /// List every stored fragment id with its metadata.
    async fn list_all(&self) -> Result<CorpusListing>;

    /// Delete the given fragments, returning how many were removed.
    async fn delete_all(&self, ids: &[String]) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(date: &str) -> FragmentMetadata {
        FragmentMetadata {
            post_date: date.to_string(),
            score: 1,
            parent_id: "t3_root".to_string(),
            parent_score: 0,
        }
    }

    #[test]
    fn test_status_empty_corpus() {
        let status = CorpusStatus::from_listing(&CorpusListing::default());
        assert_eq!(status, CorpusStatus::empty());
        assert_eq!(status.total_documents, 0);
        assert!(status.date_range.is_none());
        assert!(status.oldest_date.is_none());
        assert!(status.newest_date.is_none());
    }

    #[test]
    fn test_status_date_range_inclusive() {
        let listing = CorpusListing {
            ids: vec!["a".into(), "b".into(), "c".into()],
            metadatas: vec![meta("2024-01-05"), meta("2024-01-01"), meta("2024-01-03")],
        };

        let status = CorpusStatus::from_listing(&listing);
        assert_eq!(status.total_documents, 3);
        assert_eq!(status.date_range, Some(5));
        assert_eq!(status.oldest_date.as_deref(), Some("2024-01-01"));
        assert_eq!(status.newest_date.as_deref(), Some("2024-01-05"));
    }

    #[test]
    fn test_status_single_day() {
        let listing = CorpusListing {
            ids: vec!["a".into()],
            metadatas: vec![meta("2024-01-05")],
        };
        assert_eq!(CorpusStatus::from_listing(&listing).date_range, Some(1));
    }

    #[test]
    fn test_status_skips_bad_dates() {
        let listing = CorpusListing {
            ids: vec!["a".into(), "b".into()],
            metadatas: vec![meta("not-a-date"), meta("2024-01-05")],
        };

        let status = CorpusStatus::from_listing(&listing);
        assert_eq!(status.total_documents, 2);
        assert_eq!(status.date_range, Some(1));
        assert_eq!(status.oldest_date.as_deref(), Some("2024-01-05"));
    }
}
