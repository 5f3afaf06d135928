//! Vector store abstraction for talkrag.
//!
//! Provides a trait-based interface over the nearest-neighbour index that
//! holds embedded transcript chunks.

mod memory;
mod pinecone;

pub use memory::MemoryVectorStore;
pub use pinecone::{PineconeVectorStore, CONTROL_PLANE_URL};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata stored alongside each vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub talk_id: String,
    pub title: String,
    /// Header-prefixed chunk text, exactly as embedded.
    pub text: String,
}

/// The unit persisted to the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// `{talk_id}_{chunk_index}`; upserting the same id overwrites.
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: RecordMetadata,
}

/// One ranked hit from a nearest-neighbour query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    /// Similarity score (higher is better).
    pub score: f32,
    /// Present when the query asked for metadata.
    pub metadata: Option<RecordMetadata>,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or overwrite records by id. Returns the number written.
    async fn upsert(&self, records: &[VectorRecord]) -> Result<usize>;

    /// Return up to `top_k` records nearest to `vector`, best first.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<QueryMatch>>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
