//! Configuration management for threadwise.

mod prompts;
mod settings;

pub use prompts::{Prompts, RagPrompts};
pub use settings::{
    BackendKind, BackendSettings, OllamaSettings, OpenAISettings, PromptSettings,
    RetrievalSettings, ScraperSettings, ServerSettings, Settings,
};
