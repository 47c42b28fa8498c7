//! Ollama local HTTP backend.

use super::LlmBackend;
use crate::error::{Result, ThreadwiseError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Fixed request timeout. Ollama either answers quickly or is wedged.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Backend talking to a local Ollama service over HTTP.
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaBackend {
    /// Create a new Ollama backend with the default 5-second timeout.
    pub fn new(base_url: &str, model: &str, temperature: f32) -> Self {
        Self::with_timeout(
            base_url,
            model,
            temperature,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a backend with a custom timeout.
    pub fn with_timeout(
        base_url: &str,
        model: &str,
        temperature: f32,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature,
            timeout,
        }
    }

    /// Translate transport failures into the uniform backend error kinds.
    fn translate(&self, error: reqwest::Error) -> ThreadwiseError {
        if error.is_timeout() {
            ThreadwiseError::BackendTimeout {
                backend: "Ollama".to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else if error.is_connect() {
            ThreadwiseError::BackendUnavailable {
                backend: "Ollama".to_string(),
                url: self.base_url.clone(),
            }
        } else {
            ThreadwiseError::Generation(error.to_string())
        }
    }
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                temperature: self.temperature,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| self.translate(e))?;

        if !response.status().is_success() {
            return Err(ThreadwiseError::Generation(format!(
                "Ollama returned {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| self.translate(e))?;

        debug!("Generated {} characters", body.response.len());
        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reserve a port with no listener on it.
    fn unused_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_unavailable() {
        let url = format!("http://127.0.0.1:{}", unused_port());
        let backend = OllamaBackend::new(&url, "mistral", 0.7);

        let err = backend.generate("hello").await.unwrap_err();
        match err {
            ThreadwiseError::BackendUnavailable { backend, .. } => {
                assert_eq!(backend, "Ollama");
            }
            other => panic!("expected BackendUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_hung_service_maps_to_timeout() {
        // Accept connections but never respond.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let _socket = socket;
                    tokio::time::sleep(Duration::from_secs(60)).await;
                });
            }
        });

        let backend = OllamaBackend::with_timeout(
            &format!("http://{}", addr),
            "mistral",
            0.7,
            Duration::from_millis(250),
        );

        let err = backend.generate("hello").await.unwrap_err();
        assert!(matches!(err, ThreadwiseError::BackendTimeout { .. }));
    }

    #[test]
    fn test_error_messages_are_distinct() {
        let unavailable = ThreadwiseError::BackendUnavailable {
            backend: "Ollama".to_string(),
            url: "http://localhost:11434".to_string(),
        };
        let timeout = ThreadwiseError::BackendTimeout {
            backend: "Ollama".to_string(),
            timeout_secs: 5,
        };

        assert!(unavailable.to_string().contains("Make sure it's running"));
        assert!(timeout.to_string().contains("did not respond within 5s"));
        assert_ne!(unavailable.to_string(), timeout.to_string());
    }
}
