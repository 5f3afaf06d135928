//! Context building for RAG responses.

use crate::vector_store::QueryMatch;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Separator placed between retrieved passages in the prompt.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// A retrieved passage, as reported back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextChunk {
    pub talk_id: String,
    pub title: String,
    /// Similarity score from the index.
    pub score: f32,
    /// Full header-prefixed chunk text.
    pub chunk: String,
}

/// Convert ranked matches into context chunks, keeping index order.
///
/// Matches that came back without metadata carry no text and are dropped.
pub fn context_from_matches(matches: Vec<QueryMatch>) -> Vec<ContextChunk> {
    matches
        .into_iter()
        .filter_map(|m| match m.metadata {
            Some(metadata) => Some(ContextChunk {
                talk_id: metadata.talk_id,
                title: metadata.title,
                score: m.score,
                chunk: metadata.text,
            }),
            None => {
                warn!("Match {} has no metadata, leaving it out of the context", m.id);
                None
            }
        })
        .collect()
}

/// Join the chunk texts into the block interpolated into the system prompt.
pub fn build_context_block(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.chunk.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}
