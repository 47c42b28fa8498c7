//! Scraper for recurring discussion threads.
//!
//! Pulls "Daily Question Thread" posts and their full comment trees from a
//! subreddit using Reddit's public JSON listing API. No authentication is
//! required, but Reddit insists on a descriptive User-Agent.

use crate::config::ScraperSettings;
use crate::error::{Result, ThreadwiseError};
use chrono::DateTime;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A single comment as harvested from a thread.
#[derive(Debug, Clone, PartialEq)]
pub struct RawComment {
    /// Comment id, unique within Reddit.
    pub id: String,
    pub body: String,
    /// Vote score, may be negative.
    pub score: i64,
    /// `t1_<id>` for a reply, `t3_<id>` for a top-level comment.
    pub parent_id: String,
    pub created_utc: f64,
}

/// One recurring discussion thread with its flattened comments.
#[derive(Debug, Clone)]
pub struct DailyThread {
    pub id: String,
    pub title: String,
    /// Thread creation date, YYYY-MM-DD.
    pub date: String,
    pub comments: Vec<RawComment>,
}

/// Scraper for daily question threads.
pub struct ThreadScraper {
    client: reqwest::Client,
    subreddit: String,
    thread_query: String,
}

impl ThreadScraper {
    /// Create a scraper from settings.
    pub fn new(settings: &ScraperSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            subreddit: settings.subreddit.clone(),
            thread_query: settings.thread_query.clone(),
        })
    }

    /// Fetch the most recent `days_back` daily threads with their comments.
    #[instrument(skip(self))]
    pub async fn fetch_daily_threads(&self, days_back: u32) -> Result<Vec<DailyThread>> {
        info!("Fetching {} days of daily threads from r/{}", days_back, self.subreddit);

        let limit = days_back.to_string();
        let listing: Value = self
            .client
            .get(format!("https://www.reddit.com/r/{}/search.json", self.subreddit))
            .query(&[
                ("q", self.thread_query.as_str()),
                ("restrict_sr", "1"),
                ("sort", "new"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ThreadwiseError::Scraper(format!("thread search failed: {}", e)))?
            .json()
            .await?;

        let children = listing
            .pointer("/data/children")
            .and_then(Value::as_array)
            .ok_or_else(|| ThreadwiseError::Scraper("unexpected search listing shape".to_string()))?;

        let mut threads = Vec::new();
        for child in children {
            let data = &child["data"];
            let Some(id) = data["id"].as_str() else {
                warn!("Skipping search result without an id");
                continue;
            };

            let title = data["title"].as_str().unwrap_or_default().to_string();
            let created = data["created_utc"].as_f64().unwrap_or(0.0);
            let date = format_utc_date(created);

            debug!("Processing thread {} from {}", id, date);
            let comments = self.fetch_comments(id).await?;

            threads.push(DailyThread {
                id: id.to_string(),
                title,
                date,
                comments,
            });
        }

        info!("Fetched {} daily threads", threads.len());
        Ok(threads)
    }

    /// Fetch and flatten the full comment tree of one thread.
    async fn fetch_comments(&self, thread_id: &str) -> Result<Vec<RawComment>> {
        let body: Value = self
            .client
            .get(format!(
                "https://www.reddit.com/r/{}/comments/{}.json",
                self.subreddit, thread_id
            ))
            .query(&[("limit", "500")])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ThreadwiseError::Scraper(format!("comment fetch failed: {}", e)))?
            .json()
            .await?;

        // The endpoint returns [post listing, comment listing].
        let comment_listing = body
            .get(1)
            .ok_or_else(|| ThreadwiseError::Scraper("unexpected comments shape".to_string()))?;

        let mut comments = Vec::new();
        flatten_comments(comment_listing, &mut comments);
        debug!("Thread {} has {} comments", thread_id, comments.len());
        Ok(comments)
    }
}

/// Format a unix timestamp as YYYY-MM-DD (UTC).
pub fn format_utc_date(created_utc: f64) -> String {
    DateTime::from_timestamp(created_utc as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Walk a comment listing depth-first, collecting every `t1` node.
///
/// `more` stubs and malformed nodes are skipped.
fn flatten_comments(listing: &Value, out: &mut Vec<RawComment>) {
    let Some(children) = listing.pointer("/data/children").and_then(Value::as_array) else {
        return;
    };

    for child in children {
        if child["kind"].as_str() != Some("t1") {
            continue;
        }
        let data = &child["data"];
        let (Some(id), Some(body)) = (data["id"].as_str(), data["body"].as_str()) else {
            continue;
        };

        out.push(RawComment {
            id: id.to_string(),
            body: body.to_string(),
            score: data["score"].as_i64().unwrap_or(0),
            parent_id: data["parent_id"].as_str().unwrap_or_default().to_string(),
            created_utc: data["created_utc"].as_f64().unwrap_or(0.0),
        });

        // Replies are either a nested listing or an empty string.
        if data["replies"].is_object() {
            flatten_comments(&data["replies"], out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_utc_date() {
        // 2024-01-05 00:00:00 UTC
        assert_eq!(format_utc_date(1704412800.0), "2024-01-05");
    }

    #[test]
    fn test_flatten_nested_comments() {
        let listing: Value = serde_json::from_str(
            r#"{
                "kind": "Listing",
                "data": {
                    "children": [
                        {
                            "kind": "t1",
                            "data": {
                                "id": "aaa",
                                "body": "Does this work at Metro?",
                                "score": 8,
                                "parent_id": "t3_thread1",
                                "created_utc": 1704412800.0,
                                "replies": {
                                    "kind": "Listing",
                                    "data": {
                                        "children": [
                                            {
                                                "kind": "t1",
                                                "data": {
                                                    "id": "bbb",
                                                    "body": "Yes, confirmed.",
                                                    "score": 3,
                                                    "parent_id": "t1_aaa",
                                                    "created_utc": 1704416400.0,
                                                    "replies": ""
                                                }
                                            }
                                        ]
                                    }
                                }
                            }
                        },
                        { "kind": "more", "data": { "count": 12 } }
                    ]
                }
            }"#,
        )
        .unwrap();

        let mut comments = Vec::new();
        flatten_comments(&listing, &mut comments);

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].id, "aaa");
        assert_eq!(comments[0].parent_id, "t3_thread1");
        assert_eq!(comments[1].id, "bbb");
        assert_eq!(comments[1].parent_id, "t1_aaa");
        assert_eq!(comments[1].score, 3);
    }

    #[test]
    fn test_flatten_tolerates_malformed_nodes() {
        let listing: Value = serde_json::from_str(
            r#"{"data": {"children": [{"kind": "t1", "data": {"score": 1}}]}}"#,
        )
        .unwrap();

        let mut comments = Vec::new();
        flatten_comments(&listing, &mut comments);
        assert!(comments.is_empty());
    }
}
