//! Ingestion pipeline.
//!
//! Chunks each talk, embeds every chunk and writes the resulting records to
//! the vector store in fixed-size batches.

use crate::chunking::CharChunker;
use crate::config::IngestSettings;
use crate::dataset::Talk;
use crate::embedding::Embedder;
use crate::error::{Result, TalkRagError};
use crate::retry::RetryPolicy;
use crate::vector_store::{RecordMetadata, VectorRecord, VectorStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Tunables for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Records per upsert call.
    pub batch_size: usize,
    /// Pause after each embedding call.
    pub embed_delay: Duration,
    /// Retry policy for a failing upsert batch.
    pub upsert_retry: RetryPolicy,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self::from_settings(&IngestSettings::default())
    }
}

impl IngestConfig {
    pub fn from_settings(settings: &IngestSettings) -> Self {
        Self {
            batch_size: settings.batch_size,
            embed_delay: Duration::from_millis(settings.embed_delay_ms),
            upsert_retry: RetryPolicy::new(
                settings.max_attempts,
                Duration::from_millis(settings.initial_backoff_ms),
            ),
        }
    }
}

/// Counters from one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Talks processed.
    pub talks: usize,
    /// Chunks produced by the chunker.
    pub chunks_total: usize,
    /// Chunks written to the index.
    pub chunks_indexed: usize,
    /// Chunks dropped because their embedding failed.
    pub chunks_skipped: usize,
    /// Upsert calls made.
    pub batches: usize,
}

/// Chunk → embed → batched upsert.
pub struct IngestPipeline {
    chunker: CharChunker,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    config: IngestConfig,
}

impl IngestPipeline {
    /// Create a pipeline. Fails on a zero batch size.
    pub fn new(
        chunker: CharChunker,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        config: IngestConfig,
    ) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(TalkRagError::Config(
                "batch size must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            chunker,
            embedder,
            vector_store,
            config,
        })
    }

    /// Ingest all talks.
    pub async fn ingest(&self, talks: &[Talk]) -> Result<IngestReport> {
        self.ingest_with_progress(talks, |_, _| {}).await
    }

    /// Ingest all talks, calling `on_talk` after each talk is processed.
    #[instrument(skip_all, fields(talks = talks.len()))]
    pub async fn ingest_with_progress<F>(
        &self,
        talks: &[Talk],
        mut on_talk: F,
    ) -> Result<IngestReport>
    where
        F: FnMut(&Talk, &IngestReport),
    {
        let mut report = IngestReport::default();
        let mut batch: Vec<VectorRecord> = Vec::with_capacity(self.config.batch_size);

        for talk in talks {
            let chunks = self.chunker.chunk_talk(talk);
            report.chunks_total += chunks.len();
            debug!("Talk {} produced {} chunks", talk.talk_id, chunks.len());

            for chunk in chunks {
                let id = chunk.record_id(&talk.talk_id);
                let embedded = self.embedder.embed(&chunk.text).await;

                match embedded {
                    Ok(values) => {
                        batch.push(VectorRecord {
                            id,
                            values,
                            metadata: RecordMetadata {
                                talk_id: talk.talk_id.clone(),
                                title: talk.title.clone(),
                                text: chunk.text,
                            },
                        });
                    }
                    Err(e) => {
                        warn!("Skipping chunk {}: {}", id, e);
                        report.chunks_skipped += 1;
                    }
                }

                if batch.len() >= self.config.batch_size {
                    self.flush(&mut batch, &mut report).await?;
                }

                if !self.config.embed_delay.is_zero() {
                    tokio::time::sleep(self.config.embed_delay).await;
                }
            }

            report.talks += 1;
            info!("Processed talk {}: {}", talk.talk_id, talk.title);
            on_talk(talk, &report);
        }

        self.flush(&mut batch, &mut report).await?;

        info!(
            "Ingestion complete: {} talks, {} chunks indexed, {} skipped, {} batches",
            report.talks, report.chunks_indexed, report.chunks_skipped, report.batches
        );
        Ok(report)
    }

    /// Write the buffered records, retrying per policy, then clear the buffer.
    async fn flush(&self, batch: &mut Vec<VectorRecord>, report: &mut IngestReport) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let records: &[VectorRecord] = batch;
        let mut attempts = 0u32;
        let written = self
            .config
            .upsert_retry
            .run("upsert", || {
                attempts += 1;
                self.vector_store.upsert(records)
            })
            .await;

        if let Err(e) = written {
            return Err(TalkRagError::Ingest(format!(
                "batch {} ({} records from {}) not written after {} attempt(s): {}",
                report.batches + 1,
                records.len(),
                records[0].id,
                attempts,
                e
            )));
        }

        report.batches += 1;
        report.chunks_indexed += batch.len();
        debug!("Flushed batch {} ({} records)", report.batches, batch.len());
        batch.clear();
        Ok(())
    }
}
