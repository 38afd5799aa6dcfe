//! Data types for chunks, indexed points, and document-level views.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RagError;

/// A bounded slice of a document's extracted text, the unit of embedding
/// and retrieval.
///
/// Chunks are produced in document order; `index` is 0-based and sequential
/// within the source document. Consecutive chunks may share a bounded number
/// of trailing words (the chunker's overlap carry).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The chunk text, trimmed.
    pub text: String,
    /// Position of this chunk within its source document.
    pub index: usize,
}

/// A document handed to the ingestion pipeline: a filename plus the plain
/// text already extracted from it.
///
/// Extraction (PDF parsing, mime handling, upload limits) happens upstream;
/// the core only ever sees plain text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSource {
    /// The original filename, used to scope listing and deletion.
    pub filename: String,
    /// The extracted plain text.
    pub text: String,
}

impl DocumentSource {
    /// Create a new document source.
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self { filename: filename.into(), text: text.into() }
    }
}

/// Payload stored alongside each vector in the index.
///
/// `filename`, `upload_time`, and `chunk_index` tie a point back to the
/// document it came from; `stored_at` records when the point was written.
/// Additional string metadata is carried inline via `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointPayload {
    /// The chunk text.
    pub text: String,
    /// Filename of the source document.
    pub filename: String,
    /// RFC 3339 timestamp of the document upload, shared by all chunks of
    /// one ingestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_time: Option<String>,
    /// Position of the chunk within its source document.
    pub chunk_index: u64,
    /// RFC 3339 timestamp of when this point was written to the index.
    pub stored_at: String,
    /// Additional string metadata, stored inline with the named fields.
    #[serde(flatten)]
    pub extra: HashMap<String, String>,
}

/// A vector plus payload as stored by the index.
///
/// Identity is the UUID, not the content: re-ingesting identical text
/// creates new points. The index owns the point once upserted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexedPoint {
    /// Point identity within the index.
    pub id: Uuid,
    /// The embedding vector; length must match the index dimensionality.
    pub vector: Vec<f32>,
    /// Chunk text and document metadata.
    pub payload: PointPayload,
}

/// A retrieved chunk with its similarity score, produced per query and
/// discarded after response assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// The chunk text.
    pub text: String,
    /// Cosine similarity against the query vector (nominally 0–1).
    pub score: f32,
    /// Filename of the source document.
    pub filename: String,
    /// Position of the chunk within its source document.
    pub chunk_index: u64,
}

/// Per-document aggregate derived by grouping indexed points by filename.
///
/// Recomputed on every listing request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSummary {
    /// Filename the chunks were grouped by.
    pub filename: String,
    /// Upload time of the first point seen for this filename, falling back
    /// to its `stored_at` stamp.
    pub upload_time: String,
    /// Number of points carrying this filename.
    pub total_chunks: usize,
}

/// The outcome of ingesting one document in a batch.
///
/// Ingestion failures are captured per document so one bad file does not
/// abort the rest of the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOutcome {
    /// Filename of the document this outcome belongs to.
    pub filename: String,
    /// Number of chunks indexed, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<usize>,
    /// Failure description, present on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngestOutcome {
    /// Record a successfully ingested document.
    pub fn success(filename: impl Into<String>, chunks: usize) -> Self {
        Self { filename: filename.into(), chunks: Some(chunks), error: None }
    }

    /// Record a failed document.
    pub fn failure(filename: impl Into<String>, error: &RagError) -> Self {
        Self { filename: filename.into(), chunks: None, error: Some(error.to_string()) }
    }

    /// Whether the document was ingested successfully.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
