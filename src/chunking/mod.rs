//! Transcript chunking for embedding and retrieval.
//!
//! Transcripts are cut into overlapping fixed-size character windows and
//! each window is prefixed with the talk's title and speaker before it is
//! embedded, so that retrieved passages carry their own attribution.

mod fixed;

pub use fixed::{CharChunker, Chunks};

use crate::config::ChunkingSettings;
use crate::dataset::Talk;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A header-prefixed chunk of one talk, ready for embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalkChunk {
    /// Position of this chunk within the talk, from 0.
    pub index: usize,
    /// Rendered text, header included.
    pub text: String,
}

impl TalkChunk {
    /// Index record id for this chunk of `talk_id`.
    pub fn record_id(&self, talk_id: &str) -> String {
        format!("{}_{}", talk_id, self.index)
    }
}

/// Render the attribution header in front of a transcript slice.
pub fn render_chunk(title: &str, speaker: &str, chunk: &str) -> String {
    format!("Title: {}\nSpeaker: {}\nContent: {}", title, speaker, chunk)
}

impl CharChunker {
    /// Build a chunker from configuration.
    pub fn from_settings(settings: &ChunkingSettings) -> Result<Self> {
        Self::new(settings.chunk_chars, settings.overlap_chars)
    }

    /// Chunk and render one talk.
    pub fn chunk_talk(&self, talk: &Talk) -> Vec<TalkChunk> {
        self.chunks(&talk.transcript)
            .enumerate()
            .map(|(index, slice)| TalkChunk {
                index,
                text: render_chunk(&talk.title, &talk.speaker, slice),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_chunk() {
        assert_eq!(
            render_chunk("T", "S", "body"),
            "Title: T\nSpeaker: S\nContent: body"
        );
    }

    #[test]
    fn test_chunk_talk_ids_and_headers() {
        let chunker = CharChunker::new(4000, 800).unwrap();
        let talk = Talk::new("1", "T", "S", "x".repeat(5000));

        let chunks = chunker.chunk_talk(&talk);
        let ids: Vec<String> = chunks.iter().map(|c| c.record_id(&talk.talk_id)).collect();

        assert_eq!(ids, vec!["1_0", "1_1"]);
        for chunk in &chunks {
            assert!(chunk.text.starts_with("Title: T\nSpeaker: S\nContent: "));
        }
    }

    #[test]
    fn test_indices_strictly_increase() {
        let chunker = CharChunker::new(10, 3).unwrap();
        let talk = Talk::new("42", "T", "S", "abcdefghij".repeat(9));
        let chunks = chunker.chunk_talk(&talk);
        for (expected, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, expected);
        }
    }

    #[test]
    fn test_empty_transcript_yields_nothing() {
        let chunker = CharChunker::from_settings(&ChunkingSettings::default()).unwrap();
        assert!(chunker.chunk_talk(&Talk::new("9", "T", "S", "")).is_empty());
    }
}
