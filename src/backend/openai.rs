//! OpenAI chat backend.

use super::LlmBackend;
use crate::error::{Result, ThreadwiseError};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Backend using the hosted OpenAI chat API.
///
/// Reads `OPENAI_API_KEY` from the environment via the client defaults.
pub struct OpenAIBackend {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAIBackend {
    /// Create a new OpenAI backend.
    pub fn new(model: &str, temperature: f32) -> Self {
        Self {
            client: async_openai::Client::new(),
            model: model.to_string(),
            temperature,
        }
    }
}

#[async_trait]
impl LlmBackend for OpenAIBackend {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| ThreadwiseError::Generation(e.to_string()))?
                .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| ThreadwiseError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| ThreadwiseError::Generation(e.to_string()))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| ThreadwiseError::Generation("Empty response from LLM".to_string()))?
            .clone();

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }
}
