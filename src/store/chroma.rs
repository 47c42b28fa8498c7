//! Chroma-backed discussion store.
//!
//! Talks to a Chroma server over its HTTP API. The server owns embedding and
//! nearest-neighbor search; this client only moves documents and metadata.

use super::{CorpusListing, DiscussionStore, FragmentMetadata};
use crate::error::{Result, ThreadwiseError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Timeout for Chroma requests. Queries embed server-side, so this is generous.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Discussion store backed by a remote Chroma collection.
pub struct ChromaStore {
    client: reqwest::Client,
    base_url: String,
    collection_id: String,
}

#[derive(Serialize)]
struct CreateCollectionRequest<'a> {
    name: &'a str,
    get_or_create: bool,
}

#[derive(Deserialize)]
struct CollectionInfo {
    id: String,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    ids: Vec<&'a str>,
    documents: Vec<&'a str>,
    metadatas: Vec<&'a FragmentMetadata>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query_texts: Vec<&'a str>,
    n_results: usize,
    include: Vec<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    documents: Vec<Vec<String>>,
}

#[derive(Serialize)]
struct GetRequest<'a> {
    include: Vec<&'a str>,
}

#[derive(Deserialize)]
struct GetResponse {
    #[serde(default)]
    ids: Vec<String>,
    #[serde(default)]
    metadatas: Vec<Value>,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    ids: &'a [String],
}

impl ChromaStore {
    /// Connect to a Chroma server and get-or-create the collection.
    pub async fn connect(base_url: &str, collection: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let base_url = base_url.trim_end_matches('/').to_string();
        info!("Connecting to Chroma at {}", base_url);

        let response = client
            .post(format!("{}/api/v1/collections", base_url))
            .json(&CreateCollectionRequest {
                name: collection,
                get_or_create: true,
            })
            .send()
            .await?;

        let response = Self::check(response).await?;
        let info: CollectionInfo = response.json().await?;
        debug!("Using collection {} ({})", collection, info.id);

        Ok(Self {
            client,
            base_url,
            collection_id: info.id,
        })
    }

    fn collection_url(&self, op: &str) -> String {
        format!(
            "{}/api/v1/collections/{}/{}",
            self.base_url, self.collection_id, op
        )
    }

    /// Turn a non-2xx response into a VectorStore error with the server's message.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ThreadwiseError::VectorStore(format!(
            "Chroma returned {}: {}",
            status, body
        )))
    }
}

#[async_trait]
impl DiscussionStore for ChromaStore {
    async fn add(&self, id: &str, document: &str, metadata: &FragmentMetadata) -> Result<()> {
        let response = self
            .client
            .post(self.collection_url("upsert"))
            .json(&UpsertRequest {
                ids: vec![id],
                documents: vec![document],
                metadatas: vec![metadata],
            })
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<String>> {
        let response = self
            .client
            .post(self.collection_url("query"))
            .json(&QueryRequest {
                query_texts: vec![text],
                n_results: top_k,
                include: vec!["documents"],
            })
            .send()
            .await?;

        let response = Self::check(response).await?;
        let body: QueryResponse = response.json().await?;

        // One query text in, one result list out.
        let documents = body.documents.into_iter().next().unwrap_or_default();
        debug!("Chroma returned {} fragments", documents.len());
        Ok(documents)
    }

    async fn list_all(&self) -> Result<CorpusListing> {
        let response = self
            .client
            .post(self.collection_url("get"))
            .json(&GetRequest {
                include: vec!["metadatas"],
            })
            .send()
            .await?;

        let response = Self::check(response).await?;
        let body: GetResponse = response.json().await?;

        // Foreign metadata shapes are skipped rather than failing the listing.
        let metadatas = body
            .metadatas
            .into_iter()
            .filter_map(|v| serde_json::from_value::<FragmentMetadata>(v).ok())
            .collect();

        Ok(CorpusListing {
            ids: body.ids,
            metadatas,
        })
    }

    async fn delete_all(&self, ids: &[String]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let response = self
            .client
            .post(self.collection_url("delete"))
            .json(&DeleteRequest { ids })
            .send()
            .await?;

        Self::check(response).await?;
        Ok(ids.len())
    }
}
