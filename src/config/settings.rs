//! Configuration settings for threadwise.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub backend: BackendSettings,
    pub openai: OpenAISettings,
    pub ollama: OllamaSettings,
    pub retrieval: RetrievalSettings,
    pub scraper: ScraperSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
}

/// LLM backend variant, chosen once at startup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hosted OpenAI chat API (default).
    #[default]
    Openai,
    /// Local Ollama HTTP service.
    Ollama,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(BackendKind::Openai),
            "ollama" | "local" => Ok(BackendKind::Ollama),
            _ => Err(format!("Unknown LLM backend: {}", s)),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Openai => write!(f, "openai"),
            BackendKind::Ollama => write!(f, "ollama"),
        }
    }
}

/// LLM backend selection and generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Which backend to use (openai, ollama).
    pub kind: BackendKind,
    /// Sampling temperature for generation.
    pub temperature: f32,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            kind: BackendKind::Openai,
            temperature: 0.7,
        }
    }
}

/// OpenAI backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISettings {
    /// Chat model for answer generation.
    pub model: String,
}

impl Default for OpenAISettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Ollama backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    /// Base URL of the Ollama HTTP service.
    pub host: String,
    /// Model to request from Ollama.
    pub model: String,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".to_string(),
            model: "mistral".to_string(),
        }
    }
}

/// Settings for the external vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Store provider (chroma, memory).
    pub provider: String,
    /// Chroma server host.
    pub host: String,
    /// Chroma server HTTP port.
    pub port: u16,
    /// Collection holding discussion fragments.
    pub collection: String,
    /// Number of fragments to retrieve per question.
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            provider: "chroma".to_string(),
            host: "localhost".to_string(),
            port: 8000,
            collection: "churning_discussions".to_string(),
            top_k: 5,
        }
    }
}

/// Settings for the forum scraper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperSettings {
    /// Subreddit to harvest daily threads from.
    pub subreddit: String,
    /// Title search query identifying the recurring thread.
    pub thread_query: String,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            subreddit: "churningcanada".to_string(),
            thread_query: "title:\"Daily Question Thread\"".to_string(),
            user_agent: "threadwise/0.1".to_string(),
        }
    }
}

/// HTTP API server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or the default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ThreadwiseError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("threadwise")
            .join("config.toml")
    }

    /// The model name for the configured backend, as reported by `config`.
    pub fn active_model(&self) -> &str {
        match self.backend.kind {
            BackendKind::Openai => &self.openai.model,
            BackendKind::Ollama => &self.ollama.model,
        }
    }

    /// Base URL of the Chroma server.
    pub fn chroma_url(&self) -> String {
        format!("http://{}:{}", self.retrieval.host, self.retrieval.port)
    }
}
