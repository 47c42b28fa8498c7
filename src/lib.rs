//! threadwise - community discussion Q&A
//!
//! Answers natural-language questions about a recurring community discussion
//! topic by retrieving relevant prior discussion snippets and asking an LLM to
//! synthesize a cited answer.
//!
//! # Overview
//!
//! threadwise lets you:
//! - Scrape daily question threads (comments, scores, reply structure) from a subreddit
//! - Index each comment as a retrievable fragment in a vector store
//! - Ask questions and get answers citing the underlying discussions
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `scraper` - Daily-thread harvesting
//! - `ingest` - Comment-to-fragment conversion and indexing
//! - `store` - Vector store abstraction (Chroma, in-memory)
//! - `backend` - LLM backend abstraction (OpenAI, Ollama)
//! - `rag` - Context formatting and answer generation
//! - `orchestrator` - Component wiring
//!
//! # Example
//!
//! ```rust,no_run
//! use threadwise::config::Settings;
//! use threadwise::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings).await?;
//!
//!     orchestrator.fetch(5).await?;
//!     let answer = orchestrator.ask("Does the Cobalt earn 5x at Loblaws?").await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod orchestrator;
pub mod rag;
pub mod scraper;
pub mod store;

pub use error::{Result, ThreadwiseError};
