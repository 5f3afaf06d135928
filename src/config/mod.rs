//! Configuration module for talkrag.
//!
//! Handles application settings, provider credentials and prompt templates.

mod credentials;
mod prompts;
mod settings;

pub use credentials::{
    Credentials, OPENAI_API_KEY, OPENAI_BASE_URL, PINECONE_API_KEY, PINECONE_INDEX_HOST,
    PINECONE_INDEX_NAME,
};
pub use prompts::{Prompts, RagPrompts, REFUSAL};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, IngestSettings, OpenAISettings, PromptSettings,
    RagSettings, ServerSettings, Settings, VectorStoreSettings,
};
