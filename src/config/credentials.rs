//! Provider credentials read from the environment.
//!
//! Everything here is checked once at startup so that a missing key fails
//! the process immediately rather than the first request.

use crate::error::{Result, TalkRagError};

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const PINECONE_API_KEY: &str = "PINECONE_API_KEY";
pub const PINECONE_INDEX_NAME: &str = "PINECONE_INDEX_NAME";
pub const PINECONE_INDEX_HOST: &str = "PINECONE_INDEX_HOST";

/// API keys and index identifiers.
#[derive(Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    /// Alternate OpenAI-compatible endpoint (proxies, gateways).
    pub openai_base_url: Option<String>,
    pub pinecone_api_key: String,
    pub pinecone_index_name: String,
    pub pinecone_index_host: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("pinecone_api_key", &"<redacted>")
            .field("pinecone_index_name", &self.pinecone_index_name)
            .field("pinecone_index_host", &self.pinecone_index_host)
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment, loading `.env` first.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                Some(_) => Err(TalkRagError::Config(format!("{} is set but empty", name))),
                None => Err(TalkRagError::Config(format!(
                    "{} not set. Export it or add it to a .env file.",
                    name
                ))),
            }
        };
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            openai_api_key: required(OPENAI_API_KEY)?,
            openai_base_url: optional(OPENAI_BASE_URL),
            pinecone_api_key: required(PINECONE_API_KEY)?,
            pinecone_index_name: required(PINECONE_INDEX_NAME)?,
            pinecone_index_host: optional(PINECONE_INDEX_HOST),
        })
    }

    /// Read only the model provider credentials.
    ///
    /// Used when the vector index is in-memory and Pinecone is not needed.
    pub fn openai_from_env() -> Result<(String, Option<String>)> {
        dotenvy::dotenv().ok();
        let key = std::env::var(OPENAI_API_KEY)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| TalkRagError::Config(format!("{} not set", OPENAI_API_KEY)))?;
        let base = std::env::var(OPENAI_BASE_URL).ok().filter(|v| !v.trim().is_empty());
        Ok((key, base))
    }
}
