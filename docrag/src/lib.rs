//! # docrag
//!
//! Document ingestion and retrieval-augmented question answering over a
//! vector store.
//!
//! ## Overview
//!
//! The crate splits extracted document text into overlapping chunks, embeds
//! each chunk through a rate-limited provider client, and indexes the
//! vectors with per-chunk metadata. Questions are answered by embedding the
//! question, retrieving the nearest chunks, and conditioning a completion
//! on the assembled context.
//!
//! ```text
//! text → Chunker → Embedding Client → Vector Index
//!                                          ↓
//! question → Embedding Client → search → AnswerSynthesizer → answer + sources
//! ```
//!
//! ## Components
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`SentenceChunker`] | Sentence-boundary chunking with word overlap |
//! | [`OpenAiClient`] | Embeddings + completions over the OpenAI REST API |
//! | [`QdrantIndex`] / [`InMemoryIndex`] | [`VectorIndex`] backends |
//! | [`IngestPipeline`] | chunk → embed (staggered batches) → upsert |
//! | [`CorpusManager`] | Document listing and filename-scoped deletion |
//! | [`AnswerSynthesizer`] | Context assembly and grounded answering |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docrag::{
//!     AnswerSynthesizer, IngestPipeline, OpenAiClient, QdrantIndex, RagConfig,
//!     SentenceChunker,
//! };
//!
//! let client = Arc::new(OpenAiClient::from_env()?);
//! let index = Arc::new(QdrantIndex::new("http://localhost:6334", "documents", 1536)?);
//!
//! let pipeline = IngestPipeline::builder()
//!     .config(RagConfig::default())
//!     .chunker(Arc::new(SentenceChunker::default()))
//!     .embedder(client.clone())
//!     .index(index.clone())
//!     .build()?;
//! pipeline.ingest("report.pdf", &extracted_text).await?;
//!
//! let synthesizer = AnswerSynthesizer::new(client.clone(), client, index);
//! let answer = synthesizer.answer("What is the refund policy?").await?;
//! ```
//!
//! ## Features
//!
//! - `openai` (default) — the [`OpenAiClient`] provider
//! - `qdrant` — the [`QdrantIndex`] backend
//!
//! [`OpenAiClient`]: openai::OpenAiClient
//! [`QdrantIndex`]: qdrant::QdrantIndex

pub mod answer;
pub mod chunking;
pub mod config;
pub mod corpus;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
#[cfg(feature = "openai")]
pub mod openai;
pub mod pipeline;
#[cfg(feature = "qdrant")]
pub mod qdrant;
pub mod vectorstore;

pub use answer::{Answer, AnswerSynthesizer, SourceAttribution};
pub use chunking::{Chunker, SentenceChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use corpus::CorpusManager;
pub use document::{
    Chunk, DocumentSource, DocumentSummary, IndexedPoint, IngestOutcome, PointPayload,
    RetrievalResult,
};
pub use embedding::{CompletionProvider, EmbeddingProvider};
pub use error::{RagError, Result};
pub use inmemory::InMemoryIndex;
#[cfg(feature = "openai")]
pub use openai::{OpenAiClient, RequestPacer};
pub use pipeline::{IngestPipeline, IngestPipelineBuilder};
#[cfg(feature = "qdrant")]
pub use qdrant::QdrantIndex;
pub use vectorstore::{ScrollPage, ScrolledPoint, VectorIndex};
