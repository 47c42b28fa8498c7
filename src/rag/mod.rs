//! RAG (Retrieval-Augmented Generation) pipeline.
//!
//! Retrieve relevant discussion fragments, reconstruct them into cited context,
//! and ask the configured backend for an answer.

pub mod context;
mod engine;

pub use context::format_context;
pub use engine::RagEngine;
