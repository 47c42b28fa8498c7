//! LLM backend abstraction.
//!
//! Two interchangeable variants, chosen once at startup: the hosted OpenAI API
//! and a local Ollama HTTP service. Both expose the same single capability and
//! translate their failures into uniform error kinds, so callers never know
//! which one is active. No retries happen here.

mod ollama;
mod openai;

pub use ollama::OllamaBackend;
pub use openai::OpenAIBackend;

use crate::config::{BackendKind, Settings};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Trait for text-generation backends.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate a completion for the prompt, returned verbatim.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Build the configured backend. Called once at process startup;
/// there is no per-request switching.
pub fn from_settings(settings: &Settings) -> Arc<dyn LlmBackend> {
    match settings.backend.kind {
        BackendKind::Openai => {
            info!("Using OpenAI backend with model {}", settings.openai.model);
            Arc::new(OpenAIBackend::new(
                &settings.openai.model,
                settings.backend.temperature,
            ))
        }
        BackendKind::Ollama => {
            info!(
                "Using Ollama backend at {} with model {}",
                settings.ollama.host, settings.ollama.model
            );
            Arc::new(OllamaBackend::new(
                &settings.ollama.host,
                &settings.ollama.model,
                settings.backend.temperature,
            ))
        }
    }
}
