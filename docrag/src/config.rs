//! Configuration for the ingestion and retrieval core.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Tunable parameters shared by the chunker, pipeline, and synthesizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum chunk buffer size in bytes.
    pub chunk_size: usize,
    /// Overlap hint; `chunk_overlap / 5` trailing words carry between chunks.
    pub chunk_overlap: usize,
    /// Number of top results retrieved per question.
    pub top_k: usize,
    /// Number of chunks embedded per ingestion batch.
    pub batch_size: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { chunk_size: 1000, chunk_overlap: 100, top_k: 5, batch_size: 5 }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk buffer size in bytes.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the chunk overlap hint.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of top results retrieved per question.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the number of chunks embedded per ingestion batch.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidInput`] if:
    /// - `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    /// - `batch_size == 0`
    pub fn build(self) -> Result<RagConfig> {
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(RagError::InvalidInput(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(RagError::InvalidInput("top_k must be greater than zero".into()));
        }
        if self.config.batch_size == 0 {
            return Err(RagError::InvalidInput("batch_size must be greater than zero".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_overlap_not_below_chunk_size() {
        let err = RagConfig::builder().chunk_size(100).chunk_overlap(100).build().unwrap_err();
        assert!(matches!(err, RagError::InvalidInput(_)));
    }

    #[test]
    fn builder_accepts_defaults() {
        assert_eq!(RagConfig::builder().build().unwrap(), RagConfig::default());
    }
}
