//! RAG response generation.

use super::context::{build_context_block, context_from_matches, ContextChunk};
use crate::completion::ChatModel;
use crate::config::Prompts;
use crate::embedding::Embedder;
use crate::error::{Result, TalkRagError};
use crate::vector_store::VectorStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Retrieval settings for the query service.
#[derive(Debug, Clone)]
pub struct RagConfig {
    /// Passages retrieved per question.
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { top_k: 10 }
    }
}

/// The exact messages sent to the chat model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentedPrompt {
    #[serde(rename = "System")]
    pub system: String,
    #[serde(rename = "User")]
    pub user: String,
}

/// A grounded answer with the passages and prompt behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagResponse {
    #[serde(rename = "response")]
    pub answer: String,
    /// Retrieved passages in index rank order.
    pub context: Vec<ContextChunk>,
    #[serde(rename = "Augmented_prompt")]
    pub prompt: AugmentedPrompt,
}

impl RagResponse {
    /// Format the response for terminal display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.answer.clone();

        if !self.context.is_empty() {
            output.push_str("\n\n--- Sources ---\n");
            for source in &self.context {
                output.push_str(&format!(
                    "\n{} (talk {}, score: {:.3})",
                    source.title, source.talk_id, source.score
                ));
            }
        }

        output
    }
}

/// Stateless question answering over the talk index.
///
/// Holds no per-request state, so one instance is shared by all requests.
pub struct QueryService {
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    chat: Arc<dyn ChatModel>,
    prompts: Prompts,
    config: RagConfig,
}

impl QueryService {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        chat: Arc<dyn ChatModel>,
        config: RagConfig,
    ) -> Self {
        Self {
            embedder,
            vector_store,
            chat,
            prompts: Prompts::default(),
            config,
        }
    }

    /// Set custom prompts.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn top_k(&self) -> usize {
        self.config.top_k
    }

    /// Answer one question from retrieved context.
    #[instrument(skip(self), fields(top_k = self.config.top_k, model = self.chat.model()))]
    pub async fn ask(&self, question: &str) -> Result<RagResponse> {
        if question.trim().is_empty() {
            return Err(TalkRagError::InvalidInput(
                "question must be a non-empty string".to_string(),
            ));
        }
        info!("Processing question: {}", question);

        let query_embedding = self.embedder.embed(question).await?;

        let matches = self
            .vector_store
            .query(&query_embedding, self.config.top_k, true)
            .await?;
        let context = context_from_matches(matches);
        debug!("Retrieved {} context chunks", context.len());

        let prompt = AugmentedPrompt {
            system: self.prompts.rag_system(&build_context_block(&context)),
            user: question.to_string(),
        };

        let answer = self.chat.complete(&prompt.system, &prompt.user).await?;

        Ok(RagResponse {
            answer,
            context,
            prompt,
        })
    }
}
