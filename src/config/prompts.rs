//! Prompt templates for talkrag.
//!
//! The grounded-answer prompt can be replaced by placing a `rag.toml` in the
//! custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Answer the model must give when the context does not contain the answer.
pub const REFUSAL: &str = "I don't know based on the provided TED data.";

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub rag: RagPrompts,
}

/// Prompts for grounded answer generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    /// System message template. `{{context}}` receives the retrieved passages.
    pub system: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            system: format!(
                "You are a TED Talk assistant that answers questions strictly and only based on \
                 the TED dataset context provided to you (metadata and transcript passages). \
                 You must not use any external knowledge, the open internet, or information that \
                 is not explicitly contained in the retrieved context. If the answer cannot be \
                 determined from the provided context, respond: '{}' \
                 Always explain your answer using the given context.\n\n\
                 Context:\n{{{{context}}}}",
                REFUSAL
            ),
        }
    }
}

impl Prompts {
    /// Load prompts, overriding defaults from `custom_dir` when given.
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

    /// Render the grounded-answer system message around a context block.
    pub fn rag_system(&self, context: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), context.to_string());
        Self::render(&self.rag.system, &vars)
    }
}
