//! Configuration settings for talkrag.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub chunking: ChunkingSettings,
    pub embedding: EmbeddingSettings,
    pub rag: RagSettings,
    pub ingest: IngestSettings,
    pub vector_store: VectorStoreSettings,
    pub server: ServerSettings,
    pub openai: OpenAISettings,
    pub prompts: PromptSettings,
}

/// Transcript chunking settings.
///
/// Character counts are the authoritative chunking contract; the token
/// figure is only reported through the stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum characters per chunk.
    pub chunk_chars: usize,
    /// Characters shared by neighbouring chunks.
    pub overlap_chars: usize,
    /// Nominal token size the character count approximates.
    pub chunk_size_tokens: u32,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_chars: 4000,
            overlap_chars: 800,
            chunk_size_tokens: 1024,
        }
    }
}

impl ChunkingSettings {
    /// Overlap as a fraction of the chunk length.
    pub fn overlap_ratio(&self) -> f64 {
        if self.chunk_chars == 0 {
            return 0.0;
        }
        self.overlap_chars as f64 / self.chunk_chars as f64
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions (must match the index).
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Question answering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Chat model used for answer generation.
    pub model: String,
    /// Number of nearest chunks retrieved per question.
    pub top_k: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            top_k: 10,
        }
    }
}

/// Batch ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Records per upsert call.
    pub batch_size: usize,
    /// Pause between embedding calls, in milliseconds.
    pub embed_delay_ms: u64,
    /// Attempts per upsert call before giving up.
    pub max_attempts: u32,
    /// First upsert retry delay in milliseconds; doubles on each retry.
    pub initial_backoff_ms: u64,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            batch_size: 100,
            embed_delay_ms: 200,
            max_attempts: 5,
            initial_backoff_ms: 1000,
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct VectorStoreSettings {
    /// Index namespace (empty for the default namespace).
    pub namespace: Option<String>,
    /// Data-plane host. Resolved from the index name when unset.
    pub index_host: Option<String>,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Model provider client settings, shared by ingestion and querying.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISettings {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Attempts per embedding or chat call before giving up.
    pub max_attempts: u32,
    /// First retry delay in milliseconds; doubles on each retry.
    pub initial_backoff_ms: u64,
}

impl Default for OpenAISettings {
    fn default() -> Self {
        Self {
            timeout_secs: 300,
            max_attempts: 5,
            initial_backoff_ms: 1000,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory holding a `rag.toml` that overrides the built-in prompt.
    pub custom_dir: Option<String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => Self::expand_path(&p.to_string_lossy()),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("talkrag")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.chunking.chunk_chars, 4000);
        assert_eq!(settings.chunking.overlap_chars, 800);
        assert_eq!(settings.chunking.overlap_ratio(), 0.2);
        assert_eq!(settings.ingest.batch_size, 100);
        assert_eq!(settings.rag.top_k, 10);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str("[rag]\ntop_k = 5\n").unwrap();
        assert_eq!(settings.rag.top_k, 5);
        assert_eq!(settings.rag.model, "gpt-4o-mini");
        assert_eq!(settings.chunking.chunk_chars, 4000);
    }

    #[test]
    fn test_openai_retry_is_separate_from_ingest() {
        let settings: Settings =
            toml::from_str("[ingest]\nmax_attempts = 9\n\n[openai]\nmax_attempts = 2\n").unwrap();
        assert_eq!(settings.ingest.max_attempts, 9);
        assert_eq!(settings.openai.max_attempts, 2);
        assert_eq!(settings.openai.initial_backoff_ms, 1000);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.server.port, 8000);
    }
}
