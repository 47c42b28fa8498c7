//! Component wiring for threadwise.
//!
//! Builds the scraper, store, backend, and RAG engine once from settings at
//! process start. Components are injected references rather than globals, so
//! tests can substitute fakes via `with_components`.

use crate::backend::{self, LlmBackend};
use crate::config::{Prompts, Settings};
use crate::error::{Result, ThreadwiseError};
use crate::ingest;
use crate::rag::RagEngine;
use crate::scraper::ThreadScraper;
use crate::store::{ChromaStore, CorpusStatus, DiscussionStore, MemoryStore};
use std::sync::Arc;
use tracing::{info, instrument};

/// The assembled threadwise pipeline.
pub struct Orchestrator {
    settings: Settings,
    scraper: ThreadScraper,
    store: Arc<dyn DiscussionStore>,
    engine: RagEngine,
}

impl Orchestrator {
    /// Create an orchestrator from settings.
    pub async fn new(settings: Settings) -> Result<Self> {
        let store: Arc<dyn DiscussionStore> = match settings.retrieval.provider.as_str() {
            "chroma" => Arc::new(
                ChromaStore::connect(&settings.chroma_url(), &settings.retrieval.collection)
                    .await?,
            ),
            "memory" => Arc::new(MemoryStore::new()),
            other => {
                return Err(ThreadwiseError::Config(format!(
                    "Unknown retrieval provider: {}",
                    other
                )))
            }
        };

        let backend = backend::from_settings(&settings);
        Self::with_components(settings, store, backend)
    }

    /// Create an orchestrator with explicit store and backend.
    pub fn with_components(
        settings: Settings,
        store: Arc<dyn DiscussionStore>,
        backend: Arc<dyn LlmBackend>,
    ) -> Result<Self> {
        let scraper = ThreadScraper::new(&settings.scraper)?;
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;
        let engine = RagEngine::new(
            store.clone(),
            backend,
            prompts,
            settings.retrieval.top_k,
        );

        Ok(Self {
            settings,
            scraper,
            store,
            engine,
        })
    }

    /// Answer a question from the stored discussions.
    pub async fn ask(&self, question: &str) -> Result<String> {
        self.engine.ask(question).await
    }

    /// Scrape the last `days` of daily threads and ingest their comments.
    /// Returns the number of fragments written.
    #[instrument(skip(self))]
    pub async fn fetch(&self, days: u32) -> Result<usize> {
        let threads = self.scraper.fetch_daily_threads(days).await?;
        ingest::ingest_threads(self.store.as_ref(), &threads).await
    }

    /// Aggregate status of the stored corpus.
    pub async fn status(&self) -> Result<CorpusStatus> {
        let listing = self.store.list_all().await?;
        Ok(CorpusStatus::from_listing(&listing))
    }

    /// Delete every stored fragment. Returns how many were removed.
    pub async fn reset(&self) -> Result<usize> {
        let listing = self.store.list_all().await?;
        let removed = self.store.delete_all(&listing.ids).await?;
        info!("Deleted {} fragments", removed);
        Ok(removed)
    }

    /// The settings this orchestrator was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
