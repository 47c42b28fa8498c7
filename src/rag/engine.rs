//! Answer generation over retrieved discussions.

use super::context::format_context;
use crate::backend::LlmBackend;
use crate::config::Prompts;
use crate::error::Result;
use crate::store::DiscussionStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// RAG engine for question answering.
///
/// Stateless between calls: every request runs the same sequential pipeline
/// (retrieve, format, assemble, generate) and a failure at any stage aborts
/// the whole request. The store and backend are shared and injected, so tests
/// can substitute fakes.
pub struct RagEngine {
    store: Arc<dyn DiscussionStore>,
    backend: Arc<dyn LlmBackend>,
    prompts: Prompts,
    top_k: usize,
}

impl RagEngine {
    /// Create a new engine.
    pub fn new(
        store: Arc<dyn DiscussionStore>,
        backend: Arc<dyn LlmBackend>,
        prompts: Prompts,
        top_k: usize,
    ) -> Self {
        Self {
            store,
            backend,
            prompts,
            top_k,
        }
    }

    /// Answer a question from the stored discussions.
    ///
    /// An empty corpus is not an error: the backend still receives a
    /// well-formed prompt with an empty context slot and produces a degraded
    /// answer. The answer text is returned verbatim, with no validation of the
    /// citation markers the template asks for.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<String> {
        info!("Answering question");

        let fragments = self.store.query(question, self.top_k).await?;
        debug!("Retrieved {} fragments", fragments.len());

        let context = format_context(&fragments);

        let mut vars = HashMap::new();
        vars.insert("context".to_string(), context);
        vars.insert("question".to_string(), question.to_string());
        let prompt = Prompts::render(&self.prompts.rag.template, &vars);

        let answer = self.backend.generate(&prompt).await?;
        debug!("Generated answer of {} characters", answer.len());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ThreadwiseError;
    use crate::store::{FragmentMetadata, MemoryStore};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend fake that records the prompt and echoes a canned answer.
    struct RecordingBackend {
        prompts: Mutex<Vec<String>>,
        answer: String,
    }

    impl RecordingBackend {
        fn new(answer: &str) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                answer: answer.to_string(),
            }
        }
    }

    #[async_trait]
    impl LlmBackend for RecordingBackend {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.answer.clone())
        }
    }

    /// Backend fake that always fails.
    struct FailingBackend;

    #[async_trait]
    impl LlmBackend for FailingBackend {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(ThreadwiseError::Generation("boom".to_string()))
        }
    }

    fn meta() -> FragmentMetadata {
        FragmentMetadata {
            post_date: "2024-01-05".to_string(),
            score: 12,
            parent_id: "t3_thread".to_string(),
            parent_score: 0,
        }
    }

    #[tokio::test]
    async fn test_ask_embeds_formatted_context_and_question() {
        let store = Arc::new(MemoryStore::new());
        store
            .add(
                "c1",
                "Date: 2024-01-05\nComment score: 12\nComment: Amex Cobalt gives 5x on groceries",
                &meta(),
            )
            .await
            .unwrap();

        let backend = Arc::new(RecordingBackend::new("canned answer [1]"));
        let engine = RagEngine::new(store, backend.clone(), Prompts::default(), 5);

        let answer = engine.ask("what earns 5x on groceries?").await.unwrap();
        assert_eq!(answer, "canned answer [1]");

        let prompts = backend.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Comment (Score: 12): Amex Cobalt gives 5x on groceries"));
        assert!(prompts[0].contains("Question: what earns 5x on groceries?"));
        assert!(!prompts[0].contains("{{context}}"));
    }

    #[tokio::test]
    async fn test_ask_with_empty_corpus_still_prompts() {
        let store = Arc::new(MemoryStore::new());
        let backend = Arc::new(RecordingBackend::new("no data to speak of"));
        let engine = RagEngine::new(store, backend.clone(), Prompts::default(), 5);

        let answer = engine.ask("anything?").await.unwrap();
        assert_eq!(answer, "no data to speak of");

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("Relevant discussions:"));
        assert!(prompts[0].contains("Question: anything?"));
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let store = Arc::new(MemoryStore::new());
        let engine = RagEngine::new(store, Arc::new(FailingBackend), Prompts::default(), 5);

        let err = engine.ask("q").await.unwrap_err();
        assert!(matches!(err, ThreadwiseError::Generation(_)));
    }
}
