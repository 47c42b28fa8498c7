//! In-memory discussion store.
//!
//! Useful for testing and running without a Chroma server. Relevance is a naive
//! token-overlap score, not a real embedding search.

use super::{CorpusListing, DiscussionStore, FragmentMetadata};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

/// In-memory discussion store.
pub struct MemoryStore {
    fragments: RwLock<BTreeMap<String, (String, FragmentMetadata)>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            fragments: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Fraction of query tokens that appear in the document.
fn overlap_score(query: &HashSet<String>, document: &str) -> f32 {
    if query.is_empty() {
        return 0.0;
    }
    let doc_tokens = tokenize(document);
    let hits = query.iter().filter(|t| doc_tokens.contains(*t)).count();
    hits as f32 / query.len() as f32
}

#[async_trait]
impl DiscussionStore for MemoryStore {
    async fn add(&self, id: &str, document: &str, metadata: &FragmentMetadata) -> Result<()> {
        let mut fragments = self.fragments.write().unwrap();
        fragments.insert(id.to_string(), (document.to_string(), metadata.clone()));
        Ok(())
    }

    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<String>> {
        let fragments = self.fragments.read().unwrap();
        let query_tokens = tokenize(text);

        let mut scored: Vec<(f32, &String)> = fragments
            .values()
            .map(|(doc, _)| (overlap_score(&query_tokens, doc), doc))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored.into_iter().map(|(_, doc)| doc.clone()).collect())
    }

    async fn list_all(&self) -> Result<CorpusListing> {
        let fragments = self.fragments.read().unwrap();

        let mut listing = CorpusListing::default();
        for (id, (_, metadata)) in fragments.iter() {
            listing.ids.push(id.clone());
            listing.metadatas.push(metadata.clone());
        }
        Ok(listing)
    }

    async fn delete_all(&self, ids: &[String]) -> Result<usize> {
        let mut fragments = self.fragments.write().unwrap();
        let initial_len = fragments.len();
        for id in ids {
            fragments.remove(id);
        }
        Ok(initial_len - fragments.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(date: &str, score: i64) -> FragmentMetadata {
        FragmentMetadata {
            post_date: date.to_string(),
            score,
            parent_id: "t3_thread".to_string(),
            parent_score: 0,
        }
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let store = MemoryStore::new();
        store.add("c1", "first version", &meta("2024-01-01", 1)).await.unwrap();
        store.add("c1", "second version", &meta("2024-01-01", 2)).await.unwrap();

        let listing = store.list_all().await.unwrap();
        assert_eq!(listing.ids, vec!["c1".to_string()]);
        assert_eq!(listing.metadatas[0].score, 2);
    }

    #[tokio::test]
    async fn test_query_ranks_by_overlap() {
        let store = MemoryStore::new();
        store
            .add("c1", "Amex Cobalt gives 5x on groceries", &meta("2024-01-01", 12))
            .await
            .unwrap();
        store
            .add("c2", "TD Aeroplan signup bonus is back", &meta("2024-01-02", 4))
            .await
            .unwrap();

        let results = store.query("cobalt groceries multiplier", 5).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].contains("Cobalt"));
    }

    #[tokio::test]
    async fn test_query_empty_corpus() {
        let store = MemoryStore::new();
        let results = store.query("anything", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_delete_all() {
        let store = MemoryStore::new();
        store.add("c1", "a", &meta("2024-01-01", 1)).await.unwrap();
        store.add("c2", "b", &meta("2024-01-02", 1)).await.unwrap();

        let listing = store.list_all().await.unwrap();
        let removed = store.delete_all(&listing.ids).await.unwrap();
        assert_eq!(removed, 2);
        assert!(store.list_all().await.unwrap().ids.is_empty());
    }
}
