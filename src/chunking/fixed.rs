//! Fixed-size character chunking with overlap.

use crate::error::{Result, TalkRagError};

/// Splits text into fixed-size windows of characters.
///
/// Window *i* starts at character `i * (chunk_chars - overlap_chars)` and
/// holds up to `chunk_chars` characters. Offsets count chars, not bytes, so
/// a window never cuts through a UTF-8 sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharChunker {
    chunk_chars: usize,
    overlap_chars: usize,
}

impl CharChunker {
    /// Create a chunker. Fails if the stride would not advance.
    pub fn new(chunk_chars: usize, overlap_chars: usize) -> Result<Self> {
        if chunk_chars == 0 {
            return Err(TalkRagError::Config(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if overlap_chars >= chunk_chars {
            return Err(TalkRagError::Config(format!(
                "overlap ({}) must be smaller than chunk size ({})",
                overlap_chars, chunk_chars
            )));
        }
        Ok(Self {
            chunk_chars,
            overlap_chars,
        })
    }

    pub fn chunk_chars(&self) -> usize {
        self.chunk_chars
    }

    pub fn overlap_chars(&self) -> usize {
        self.overlap_chars
    }

    /// Distance in characters between consecutive chunk starts.
    pub fn stride(&self) -> usize {
        self.chunk_chars - self.overlap_chars
    }

    /// Iterate over the chunks of `text`.
    pub fn chunks<'a>(&self, text: &'a str) -> Chunks<'a> {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        Chunks {
            text,
            boundaries,
            chunk_chars: self.chunk_chars,
            stride: self.stride(),
            next_start: 0,
        }
    }

    /// Number of chunks a text of `char_len` characters produces.
    pub fn chunk_count(&self, char_len: usize) -> usize {
        char_len.div_ceil(self.stride())
    }
}

/// Iterator over the chunks of one text, in order.
#[derive(Debug)]
pub struct Chunks<'a> {
    text: &'a str,
    /// Byte offset of every char, followed by the text length.
    boundaries: Vec<usize>,
    chunk_chars: usize,
    stride: usize,
    next_start: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let char_len = self.boundaries.len() - 1;
        if self.next_start >= char_len {
            return None;
        }

        let start = self.next_start;
        let end = (start + self.chunk_chars).min(char_len);
        self.next_start += self.stride;

        Some(&self.text[self.boundaries[start]..self.boundaries[end]])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let char_len = self.boundaries.len() - 1;
        let remaining = char_len
            .saturating_sub(self.next_start)
            .div_ceil(self.stride);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Chunks<'_> {}
