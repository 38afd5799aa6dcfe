//! Sentence-aware document chunking.
//!
//! This module provides the [`Chunker`] trait and [`SentenceChunker`], which
//! splits extracted text at sentence terminators and greedily packs sentences
//! into size-bounded chunks with a word-level overlap carry between
//! consecutive chunks.

use crate::document::Chunk;

/// Minimum trimmed length a chunk must exceed to survive the post-filter.
const MIN_CHUNK_LEN: usize = 50;

/// A strategy for splitting extracted text into chunks.
///
/// Implementations produce [`Chunk`]s in document order with sequential
/// 0-based indices. Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split text into chunks.
    ///
    /// Returns an empty `Vec` if the text yields no chunk longer than the
    /// minimum survivable length.
    fn chunk(&self, text: &str) -> Vec<Chunk>;
}

/// Splits text into overlapping, size-bounded chunks along sentence
/// boundaries.
///
/// Sentences are delimited by `.`, `!`, or `?` and greedily accumulated,
/// joined by `". "`, until appending the next sentence would push the buffer
/// past `max_size` bytes. The emitted buffer's trailing `overlap / 5` words
/// seed the next buffer so adjacent chunks share context. Chunks whose
/// trimmed length is 50 bytes or less are dropped; surviving chunks are
/// indexed sequentially.
///
/// Text without any sentence terminator yields at most a single chunk.
///
/// # Example
///
/// ```rust,ignore
/// use docrag::SentenceChunker;
///
/// let chunker = SentenceChunker::new(1000, 100);
/// let chunks = chunker.chunk(&extracted_text);
/// ```
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    max_size: usize,
    overlap: usize,
}

impl SentenceChunker {
    /// Create a new `SentenceChunker`.
    ///
    /// # Arguments
    ///
    /// * `max_size` — maximum number of bytes per chunk buffer
    /// * `overlap` — overlap hint; `overlap / 5` trailing words are carried
    ///   into the next chunk
    pub fn new(max_size: usize, overlap: usize) -> Self {
        Self { max_size, overlap }
    }
}

impl Default for SentenceChunker {
    /// The reference configuration: 1000-byte chunks, overlap hint 100
    /// (a 20-word carry).
    fn default() -> Self {
        Self::new(1000, 100)
    }
}

/// The last `count` space-separated words of `text`, rejoined.
///
/// Returns an empty string when `count` is zero.
fn trailing_words(text: &str, count: usize) -> String {
    if count == 0 {
        return String::new();
    }
    let words: Vec<&str> = text.split(' ').collect();
    let start = words.len().saturating_sub(count);
    words[start..].join(" ")
}

impl Chunker for SentenceChunker {
    fn chunk(&self, text: &str) -> Vec<Chunk> {
        let sentences = text
            .split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mut raw: Vec<String> = Vec::new();
        let mut current = String::new();

        for sentence in sentences {
            let joined_len = if current.is_empty() {
                sentence.len()
            } else {
                current.len() + 2 + sentence.len()
            };

            if joined_len > self.max_size && !current.is_empty() {
                let carry = trailing_words(&current, self.overlap / 5);
                raw.push(std::mem::take(&mut current));
                if carry.is_empty() {
                    current.push_str(sentence);
                } else {
                    current = format!("{carry}. {sentence}");
                }
            } else {
                if !current.is_empty() {
                    current.push_str(". ");
                }
                current.push_str(sentence);
            }
        }

        let tail = current.trim();
        if !tail.is_empty() {
            raw.push(tail.to_string());
        }

        raw.into_iter()
            .filter(|c| c.len() > MIN_CHUNK_LEN)
            .enumerate()
            .map(|(index, text)| Chunk { text, index })
            .collect()
    }
}
