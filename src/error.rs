//! Error types for talkrag.

use thiserror::Error;

/// Library-level error type for talkrag operations.
#[derive(Error, Debug)]
pub enum TalkRagError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Completion failed: {0}")]
    Completion(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Ingestion failed: {0}")]
    Ingest(String),

    /// A provider answered with a non-success HTTP status.
    #[error("{service} returned {status}: {body}")]
    ProviderStatus {
        service: String,
        status: u16,
        body: String,
    },

    #[error("OpenAI API error: {message}")]
    OpenAI { message: String, transient: bool },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl TalkRagError {
    /// Whether the error came from the caller rather than a provider.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TalkRagError::InvalidInput(_))
    }

    /// Whether retrying the same call could succeed.
    ///
    /// Only rate limits, server-side failures, timeouts and dropped
    /// connections qualify. Anything the provider rejected on its merits
    /// (bad key, wrong dimension, unknown index) fails on the first attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            TalkRagError::ProviderStatus { status, .. } => *status == 429 || *status >= 500,
            TalkRagError::OpenAI { transient, .. } => *transient,
            TalkRagError::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status()
                        .is_some_and(|s| s.as_u16() == 429 || s.is_server_error())
            }
            _ => false,
        }
    }
}

/// Result type alias for talkrag operations.
pub type Result<T> = std::result::Result<T, TalkRagError>;
