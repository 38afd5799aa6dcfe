//! In-memory vector index using cosine similarity.
//!
//! This module provides [`InMemoryIndex`], a zero-dependency index backed by
//! a `Vec` behind a `tokio::sync::RwLock`. Points keep their insertion order,
//! which gives [`scroll`](crate::VectorIndex::scroll) a stable enumeration.
//! Suitable for development and tests.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::document::{IndexedPoint, RetrievalResult};
use crate::error::{RagError, Result};
use crate::vectorstore::{ScrollPage, ScrolledPoint, VectorIndex};

/// An in-memory [`VectorIndex`] using cosine similarity for search.
///
/// The collection starts uninitialized, mirroring a remote store:
/// [`ensure_collection`](VectorIndex::ensure_collection) must run before
/// search or deletion will succeed.
#[derive(Debug)]
pub struct InMemoryIndex {
    collection: String,
    dimensions: usize,
    points: RwLock<Option<Vec<IndexedPoint>>>,
}

impl InMemoryIndex {
    /// Create a new index for the named collection with the given
    /// dimensionality. The collection itself is not created until
    /// [`ensure_collection`](VectorIndex::ensure_collection) runs.
    pub fn new(collection: impl Into<String>, dimensions: usize) -> Self {
        Self { collection: collection.into(), dimensions, points: RwLock::new(None) }
    }

    fn missing_collection(&self) -> RagError {
        RagError::Store {
            backend: "in-memory".to_string(),
            message: format!("collection '{}' does not exist", self.collection),
        }
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn ensure_collection(&self) -> Result<()> {
        let mut points = self.points.write().await;
        if points.is_none() {
            *points = Some(Vec::new());
        }
        Ok(())
    }

    async fn upsert(&self, point: IndexedPoint) -> Result<()> {
        if point.vector.len() != self.dimensions {
            return Err(RagError::InvalidVector {
                expected: self.dimensions,
                actual: point.vector.len(),
            });
        }
        if point.payload.text.trim().is_empty() {
            return Err(RagError::InvalidPayload("chunk text must not be empty".into()));
        }

        let mut points = self.points.write().await;
        let store = points.get_or_insert_with(Vec::new);
        match store.iter_mut().find(|p| p.id == point.id) {
            Some(existing) => *existing = point,
            None => store.push(point),
        }
        Ok(())
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<RetrievalResult>> {
        if query.len() != self.dimensions {
            return Err(RagError::InvalidVector { expected: self.dimensions, actual: query.len() });
        }

        let points = self.points.read().await;
        let store = points.as_ref().ok_or_else(|| self.missing_collection())?;

        let mut scored: Vec<RetrievalResult> = store
            .iter()
            .map(|point| RetrievalResult {
                text: point.payload.text.clone(),
                score: cosine_similarity(&point.vector, query),
                filename: point.payload.filename.clone(),
                chunk_index: point.payload.chunk_index,
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn scroll(&self, page_size: usize, cursor: Option<String>) -> Result<ScrollPage> {
        let mut points = self.points.write().await;
        let store = points.get_or_insert_with(Vec::new);

        let offset = match cursor {
            Some(cursor) => cursor.parse::<usize>().map_err(|_| {
                RagError::InvalidInput(format!("malformed scroll cursor '{cursor}'"))
            })?,
            None => 0,
        };

        let end = offset.saturating_add(page_size).min(store.len());
        let page: Vec<ScrolledPoint> = store[offset.min(store.len())..end]
            .iter()
            .map(|p| ScrolledPoint { id: p.id, payload: p.payload.clone() })
            .collect();

        let next_cursor = if end < store.len() { Some(end.to_string()) } else { None };
        Ok(ScrollPage { points: page, next_cursor })
    }

    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<()> {
        if ids.is_empty() {
            return Err(RagError::InvalidInput("at least one point id is required".into()));
        }

        let mut points = self.points.write().await;
        let store = points.as_mut().ok_or_else(|| self.missing_collection())?;
        store.retain(|p| !ids.contains(&p.id));
        Ok(())
    }
}
