//! Vector index trait: one named collection of embedded chunks.

use async_trait::async_trait;
use uuid::Uuid;

use crate::document::{IndexedPoint, PointPayload, RetrievalResult};
use crate::error::Result;

/// A point as returned by [`VectorIndex::scroll`]: identity plus payload,
/// without the vector (enumeration never needs it).
#[derive(Debug, Clone)]
pub struct ScrolledPoint {
    /// Point identity within the index.
    pub id: Uuid,
    /// Chunk text and document metadata.
    pub payload: PointPayload,
}

/// One page of a scroll enumeration.
#[derive(Debug, Clone)]
pub struct ScrollPage {
    /// The points in this page, in the store's stable enumeration order.
    pub points: Vec<ScrolledPoint>,
    /// Cursor for the next page; `None` signals the end of the collection.
    pub next_cursor: Option<String>,
}

/// A storage backend holding (vector, payload) points in a single named
/// collection with fixed dimensionality and cosine-similarity search.
///
/// The collection name and dimensionality are fixed when the index is
/// constructed. The index is the sole durable store in the system: chunk
/// and document records are never cached or mirrored elsewhere.
///
/// # Example
///
/// ```rust,ignore
/// use docrag::{InMemoryIndex, VectorIndex};
///
/// let index = InMemoryIndex::new("documents", 1536);
/// index.ensure_collection().await?;
/// index.upsert(point).await?;
/// let hits = index.search(&query_vector, 5).await?;
/// ```
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return the dimensionality this index accepts.
    fn dimensions(&self) -> usize;

    /// Create the backing collection if it does not exist yet. Idempotent.
    ///
    /// Must run (directly or transitively) before any operation that touches
    /// the collection; the store starts uninitialized.
    async fn ensure_collection(&self) -> Result<()>;

    /// Insert or replace a single point. The point is visible to subsequent
    /// searches and scrolls as soon as this returns.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidVector`](crate::RagError::InvalidVector) if
    /// the vector length does not match [`dimensions`](VectorIndex::dimensions),
    /// and [`RagError::InvalidPayload`](crate::RagError::InvalidPayload) if the
    /// payload text is empty. In both cases nothing is persisted.
    async fn upsert(&self, point: IndexedPoint) -> Result<()>;

    /// Return up to `limit` nearest points by cosine similarity, best first.
    ///
    /// An empty collection yields an empty `Vec`, not an error. The relative
    /// order of equal-score results is store-defined.
    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<RetrievalResult>>;

    /// Enumerate stored points in stable batches of at most `page_size`.
    ///
    /// Pass `None` to start from the beginning and the previous page's
    /// `next_cursor` to continue; a returned `None` cursor signals the end.
    /// Metadata filtering is the caller's job, performed client-side over
    /// the scrolled pages.
    async fn scroll(&self, page_size: usize, cursor: Option<String>) -> Result<ScrollPage>;

    /// Remove points by id. Removal is best-effort and idempotent: ids that
    /// are already absent are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidInput`](crate::RagError::InvalidInput) if
    /// `ids` is empty; an empty deletion is a caller error.
    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<()>;
}
