//! Document-level views over per-chunk storage.
//!
//! The index stores one point per chunk; [`CorpusManager`] recovers the
//! document level by scrolling the collection and grouping points by their
//! `filename` payload field. Nothing here is persisted — every listing is
//! recomputed from the index, and deletion is a scan-then-delete over the
//! full collection.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::document::DocumentSummary;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorIndex;

/// Page size used for scroll enumeration.
const SCROLL_PAGE_SIZE: usize = 100;

/// Upper bound on points scanned by a listing. Collections larger than this
/// produce incomplete summaries; the cap keeps listing memory bounded and is
/// a known limitation at scale.
const MAX_LISTED_POINTS: usize = 1000;

/// Aggregates per-chunk points into per-document summaries and performs
/// filename-scoped bulk deletion.
pub struct CorpusManager {
    index: Arc<dyn VectorIndex>,
}

impl CorpusManager {
    /// Create a manager over the given index.
    pub fn new(index: Arc<dyn VectorIndex>) -> Self {
        Self { index }
    }

    /// List the documents currently in the corpus, in first-seen scroll
    /// order.
    ///
    /// Scans up to 1000 points; each document's `upload_time` comes from the
    /// first point encountered for its filename (falling back to that
    /// point's `stored_at`).
    pub async fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
        self.index.ensure_collection().await?;

        let mut summaries: Vec<DocumentSummary> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut scanned = 0usize;
        let mut cursor: Option<String> = None;

        'scan: loop {
            let page = self.index.scroll(SCROLL_PAGE_SIZE, cursor).await?;
            for point in page.points {
                if scanned >= MAX_LISTED_POINTS {
                    debug!(cap = MAX_LISTED_POINTS, "listing scan cap reached, summaries may be incomplete");
                    break 'scan;
                }
                scanned += 1;

                let payload = point.payload;
                match positions.get(&payload.filename) {
                    Some(&pos) => summaries[pos].total_chunks += 1,
                    None => {
                        positions.insert(payload.filename.clone(), summaries.len());
                        summaries.push(DocumentSummary {
                            filename: payload.filename,
                            upload_time: payload.upload_time.unwrap_or(payload.stored_at),
                            total_chunks: 1,
                        });
                    }
                }
            }

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(summaries)
    }

    /// Delete every chunk belonging to the named document.
    ///
    /// Scrolls the full collection, collects the ids of points whose
    /// `filename` matches exactly (no normalization), and removes them in a
    /// single bulk call. Returns the number of points deleted. The scan is
    /// read-only until the final delete, so an interrupted deletion leaves
    /// no partial side effects.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidInput`] for a blank filename and
    /// [`RagError::NotFound`] when no point matches.
    pub async fn delete_document(&self, filename: &str) -> Result<usize> {
        if filename.trim().is_empty() {
            return Err(RagError::InvalidInput("filename is required for deletion".into()));
        }

        self.index.ensure_collection().await?;

        let mut ids: Vec<Uuid> = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self.index.scroll(SCROLL_PAGE_SIZE, cursor).await?;
            ids.extend(
                page.points.iter().filter(|p| p.payload.filename == filename).map(|p| p.id),
            );
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        if ids.is_empty() {
            return Err(RagError::NotFound(format!("no chunks found for document '{filename}'")));
        }

        self.index.delete_by_ids(&ids).await?;
        info!(filename, deleted = ids.len(), "deleted document");
        Ok(ids.len())
    }
}
