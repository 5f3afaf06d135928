//! Construction of provider-backed services from configuration.
//!
//! Everything that talks to the outside world is built here once, at
//! startup, and handed to the pipeline and the query service as trait
//! objects.

use crate::chunking::CharChunker;
use crate::completion::{ChatModel, OpenAIChat};
use crate::config::{Credentials, Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::Result;
use crate::ingest::{IngestConfig, IngestPipeline};
use crate::openai::create_client_with_timeout;
use crate::rag::{QueryService, RagConfig};
use crate::retry::RetryPolicy;
use crate::vector_store::{MemoryVectorStore, PineconeVectorStore, VectorStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// The external collaborators shared by ingestion and querying.
#[derive(Clone)]
pub struct Services {
    pub embedder: Arc<dyn Embedder>,
    pub chat: Arc<dyn ChatModel>,
    pub vector_store: Arc<dyn VectorStore>,
}

impl Services {
    /// Build services from explicit parts.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            embedder,
            chat,
            vector_store,
        }
    }

    /// Build OpenAI and Pinecone clients from settings and the environment.
    ///
    /// Fails if any required credential is missing or the index host cannot
    /// be resolved.
    pub async fn connect(settings: &Settings) -> Result<Self> {
        let credentials = Credentials::from_env()?;
        let timeout = Duration::from_secs(settings.openai.timeout_secs);

        let host = settings
            .vector_store
            .index_host
            .as_deref()
            .or(credentials.pinecone_index_host.as_deref());
        let vector_store = PineconeVectorStore::connect(
            &credentials.pinecone_index_name,
            &credentials.pinecone_api_key,
            host,
            settings.vector_store.namespace.clone(),
            timeout,
        )
        .await?;

        Self::with_store(
            settings,
            &credentials.openai_api_key,
            credentials.openai_base_url.as_deref(),
            Arc::new(vector_store),
        )
    }

    /// Build OpenAI clients with an in-memory vector store.
    pub fn in_memory(settings: &Settings) -> Result<Self> {
        let (api_key, base_url) = Credentials::openai_from_env()?;
        info!("Using in-memory vector store");
        Self::with_store(
            settings,
            &api_key,
            base_url.as_deref(),
            Arc::new(MemoryVectorStore::new()),
        )
    }

    fn with_store(
        settings: &Settings,
        api_key: &str,
        base_url: Option<&str>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Result<Self> {
        let timeout = Duration::from_secs(settings.openai.timeout_secs);
        let client = create_client_with_timeout(api_key, base_url, timeout)?;
        let retry = provider_retry(settings);

        let embedder = OpenAIEmbedder::new(
            client.clone(),
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        )
        .with_retry(retry.clone());
        let chat = OpenAIChat::new(client, &settings.rag.model).with_retry(retry);
        info!(
            "Using embedding model {} and chat model {}",
            embedder.model(),
            chat.model()
        );

        Ok(Self::new(Arc::new(embedder), Arc::new(chat), vector_store))
    }

    /// Build the query service.
    pub fn query_service(&self, settings: &Settings) -> Result<QueryService> {
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;
        Ok(QueryService::new(
            self.embedder.clone(),
            self.vector_store.clone(),
            self.chat.clone(),
            RagConfig {
                top_k: settings.rag.top_k,
            },
        )
        .with_prompts(prompts))
    }

    /// Build the ingestion pipeline.
    pub fn ingest_pipeline(&self, settings: &Settings) -> Result<IngestPipeline> {
        IngestPipeline::new(
            CharChunker::from_settings(&settings.chunking)?,
            self.embedder.clone(),
            self.vector_store.clone(),
            IngestConfig::from_settings(&settings.ingest),
        )
    }
}

/// Retry policy for embedding and chat calls.
fn provider_retry(settings: &Settings) -> RetryPolicy {
    RetryPolicy::new(
        settings.openai.max_attempts,
        Duration::from_millis(settings.openai.initial_backoff_ms),
    )
}
