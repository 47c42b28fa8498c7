//! Prompt templates for threadwise.
//!
//! The RAG template is the single source of truth for answer style and the citation
//! contract. It can be overridden by placing a `rag.toml` in a custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub rag: RagPrompts,
}

/// Prompt for RAG answer generation.
///
/// Two slots only: `{{context}}` and `{{question}}`. Plain substitution, no escaping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    pub template: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            template: r#"You are a helpful assistant for credit card churning in Canada.
Use the following relevant discussions from r/churningcanada to answer the question.
If you're unsure or the information might be outdated, say so.

When analyzing the discussions:
1. Pay attention to comment scores, but interpret them based on context:
   - For statements/answers: Higher scores generally indicate community agreement and reliability
   - For questions: Low scores often could mean it's a frequently asked question, not that it's invalid
   - For advice/recommendations: Score is a strong indicator of whether the community agrees
2. Consider parent-child relationships between comments - replies often correct or clarify parent comments
3. Be skeptical of heavily downvoted statements and advice (but not necessarily downvoted questions)
4. When multiple comments support or discuss the same point, cite them all to show consensus
5. When showing a discussion thread, cite both the parent comment and its relevant replies

For each statement you make, cite your sources using the format [1][2] when multiple sources support the point.
At the end of your response, list all citations in the format:

Sources:
[1] [Date: YYYY-MM-DD] Comment (Score: X): "exact quote from the discussion"
If it's a reply, include the parent:
Parent Comment (Score: Y): "parent comment text"

[2] [Date: YYYY-MM-DD] Comment (Score: X): "supporting comment"

Example response structure:
"While this is a commonly asked question[1], the current consensus is that the Amex Cobalt offers 5x points on groceries[2], and recent data points confirm this works at Loblaws chains[3][4]. While some users initially reported issues with Metro[5], a follow-up comment confirmed it was a temporary glitch that has been resolved[6]."

Relevant discussions:
{{context}}

Question: {{question}}

Answer: "#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default templates, with an optional custom directory.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_has_slots() {
        let prompts = Prompts::default();
        assert!(prompts.rag.template.contains("{{context}}"));
        assert!(prompts.rag.template.contains("{{question}}"));
        assert!(prompts.rag.template.contains("Sources:"));
    }

    #[test]
    fn test_render_template() {
        let template = "Context:\n{{context}}\n\nQuestion: {{question}}";
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), "some discussions".to_string());
        vars.insert("question".to_string(), "is it worth it?".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Context:\nsome discussions\n\nQuestion: is it worth it?");
    }

    #[test]
    fn test_render_with_empty_context_keeps_template_shape() {
        let prompts = Prompts::default();
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), String::new());
        vars.insert("question".to_string(), "anything new?".to_string());

        let rendered = Prompts::render(&prompts.rag.template, &vars);
        assert!(!rendered.contains("{{context}}"));
        assert!(rendered.contains("Question: anything new?"));
        assert!(rendered.contains("Relevant discussions:"));
    }
}
