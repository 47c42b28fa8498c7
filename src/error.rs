//! Error types for threadwise.

use thiserror::Error;

/// Library-level error type for threadwise operations.
#[derive(Error, Debug)]
pub enum ThreadwiseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scraper error: {0}")]
    Scraper(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("RAG error: {0}")]
    Rag(String),

    #[error("Cannot connect to the {backend} service at {url}. Make sure it's running if using a local LLM.")]
    BackendUnavailable { backend: String, url: String },

    #[error("The {backend} service did not respond within {timeout_secs}s. Check if the service is responding.")]
    BackendTimeout { backend: String, timeout_secs: u64 },

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for threadwise operations.
pub type Result<T> = std::result::Result<T, ThreadwiseError>;
