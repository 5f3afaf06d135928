//! Chat completion for grounded answer generation.

mod openai;

pub use openai::OpenAIChat;

use crate::error::Result;
use async_trait::async_trait;

/// A single-turn chat model: one system message, one user message, one reply.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a reply to `user` under the instructions in `system`.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
