//! Document ingestion pipeline.
//!
//! [`IngestPipeline`] coordinates the chunk → embed → upsert workflow by
//! composing a [`Chunker`], an [`EmbeddingProvider`], and a [`VectorIndex`].
//! Embedding calls run in fixed-size batches with an intra-batch stagger, so
//! in-flight provider requests never exceed the batch size.
//!
//! # Example
//!
//! ```rust,ignore
//! use docrag::{IngestPipeline, RagConfig, SentenceChunker, InMemoryIndex};
//!
//! let pipeline = IngestPipeline::builder()
//!     .config(RagConfig::default())
//!     .chunker(Arc::new(SentenceChunker::default()))
//!     .embedder(Arc::new(client))
//!     .index(Arc::new(index))
//!     .build()?;
//!
//! let chunk_count = pipeline.ingest("report.pdf", &extracted_text).await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::try_join_all;
use tracing::{error, info};
use uuid::Uuid;

use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::{DocumentSource, IndexedPoint, IngestOutcome, PointPayload};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorIndex;

/// Documents whose extracted text trims below this length are rejected
/// before chunking; they carry too little content to index.
const MIN_DOCUMENT_LEN: usize = 100;

/// Delay step between concurrent embedding calls within one batch: call
/// `idx` waits `idx * 100ms` before it is issued.
const BATCH_STAGGER: Duration = Duration::from_millis(100);

/// The ingestion orchestrator: chunk → embed (batched) → upsert.
///
/// Construct one via [`IngestPipeline::builder()`].
pub struct IngestPipeline {
    config: RagConfig,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl std::fmt::Debug for IngestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl IngestPipeline {
    /// Create a new [`IngestPipelineBuilder`].
    pub fn builder() -> IngestPipelineBuilder {
        IngestPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Ingest a single document: chunk, embed in staggered batches, and
    /// upsert one point per chunk. Returns the number of chunks indexed.
    ///
    /// Every point carries the filename, a per-document upload timestamp,
    /// its chunk index, and a fresh UUID — re-ingesting the same text
    /// creates new points rather than replacing old ones.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidInput`] for a blank filename, a document
    /// whose trimmed text is shorter than 100 bytes, or text that produces
    /// no chunks. Embedding and index failures propagate unchanged; a batch
    /// fails on its first failed embedding.
    pub async fn ingest(&self, filename: &str, text: &str) -> Result<usize> {
        if filename.trim().is_empty() {
            return Err(RagError::InvalidInput("filename is required".into()));
        }
        if text.trim().len() < MIN_DOCUMENT_LEN {
            return Err(RagError::InvalidInput(
                "document is empty or has too little text".into(),
            ));
        }

        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            return Err(RagError::InvalidInput("no valid chunks produced from document".into()));
        }

        self.index.ensure_collection().await?;
        let upload_time = Utc::now().to_rfc3339();

        for batch in chunks.chunks(self.config.batch_size) {
            let embeddings = try_join_all(batch.iter().enumerate().map(|(idx, chunk)| {
                let embedder = Arc::clone(&self.embedder);
                let text = chunk.text.clone();
                async move {
                    tokio::time::sleep(BATCH_STAGGER * idx as u32).await;
                    embedder.embed(&text).await
                }
            }))
            .await?;

            for (chunk, vector) in batch.iter().zip(embeddings) {
                let payload = PointPayload {
                    text: chunk.text.clone(),
                    filename: filename.to_string(),
                    upload_time: Some(upload_time.clone()),
                    chunk_index: chunk.index as u64,
                    stored_at: Utc::now().to_rfc3339(),
                    extra: HashMap::new(),
                };
                self.index.upsert(IndexedPoint { id: Uuid::new_v4(), vector, payload }).await?;
            }
        }

        info!(filename, chunk_count = chunks.len(), "ingested document");
        Ok(chunks.len())
    }

    /// Ingest a batch of documents, capturing the outcome per document.
    ///
    /// A failing document is recorded in its [`IngestOutcome`] and never
    /// aborts the rest of the batch.
    pub async fn ingest_all(&self, documents: &[DocumentSource]) -> Vec<IngestOutcome> {
        let mut outcomes = Vec::with_capacity(documents.len());
        for doc in documents {
            match self.ingest(&doc.filename, &doc.text).await {
                Ok(chunks) => outcomes.push(IngestOutcome::success(&doc.filename, chunks)),
                Err(e) => {
                    error!(filename = %doc.filename, error = %e, "failed to ingest document");
                    outcomes.push(IngestOutcome::failure(&doc.filename, &e));
                }
            }
        }
        outcomes
    }
}

/// Builder for constructing an [`IngestPipeline`].
///
/// `config` defaults to [`RagConfig::default()`]; the chunker, embedder, and
/// index are required.
#[derive(Default)]
pub struct IngestPipelineBuilder {
    config: Option<RagConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<dyn VectorIndex>>,
}

impl IngestPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector index.
    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Build the [`IngestPipeline`], validating that all required fields
    /// are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidInput`] if any required field is missing.
    pub fn build(self) -> Result<IngestPipeline> {
        let chunker = self
            .chunker
            .ok_or_else(|| RagError::InvalidInput("chunker is required".into()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::InvalidInput("embedder is required".into()))?;
        let index =
            self.index.ok_or_else(|| RagError::InvalidInput("index is required".into()))?;

        Ok(IngestPipeline {
            config: self.config.unwrap_or_default(),
            chunker,
            embedder,
            index,
        })
    }
}
