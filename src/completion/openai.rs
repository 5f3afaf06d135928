//! OpenAI chat completions implementation.

use super::ChatModel;
use crate::error::{Result, TalkRagError};
use crate::openai::api_error;
use crate::retry::RetryPolicy;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// OpenAI-based chat model.
pub struct OpenAIChat {
    client: Client<OpenAIConfig>,
    model: String,
    retry: RetryPolicy,
}

impl OpenAIChat {
    pub fn new(client: Client<OpenAIConfig>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Set the retry policy for transient API failures.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn build_messages(system: &str, user: &str) -> Result<Vec<ChatCompletionRequestMessage>> {
        Ok(vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system.to_string())
                .build()
                .map_err(|e| TalkRagError::Completion(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user.to_string())
                .build()
                .map_err(|e| TalkRagError::Completion(e.to_string()))?
                .into(),
        ])
    }

    async fn complete_once(&self, system: &str, user: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(Self::build_messages(system, user)?)
            .build()
            .map_err(|e| TalkRagError::Completion(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| api_error("Failed to generate response", e))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| TalkRagError::Completion("Empty response from LLM".to_string()))
    }
}

#[async_trait]
impl ChatModel for OpenAIChat {
    #[instrument(skip(self, system, user), fields(model = %self.model))]
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let answer = self
            .retry
            .run("chat completion", || self.complete_once(system, user))
            .await?;
        debug!("Completion returned {} chars", answer.len());
        Ok(answer)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
