//! Qdrant vector index backend.
//!
//! Provides [`QdrantIndex`], a [`VectorIndex`] implementation over the
//! [qdrant-client](https://docs.rs/qdrant-client) crate (gRPC). The
//! collection is created lazily with cosine distance; chunk payloads map to
//! Qdrant point payloads field by field.
//!
//! This module is only available when the `qdrant` feature is enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use docrag::qdrant::QdrantIndex;
//!
//! let index = QdrantIndex::new("http://localhost:6334", "documents", 1536)?;
//! index.ensure_collection().await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, DeletePointsBuilder, Distance, PointId, PointStruct, PointsIdsList,
    ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue,
    VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tracing::debug;
use uuid::Uuid;

use crate::document::{IndexedPoint, PointPayload, RetrievalResult};
use crate::error::{RagError, Result};
use crate::vectorstore::{ScrollPage, ScrolledPoint, VectorIndex};

/// Payload fields with dedicated columns in [`PointPayload`]; everything
/// else read back from a point lands in `extra`.
const NAMED_FIELDS: [&str; 4] = ["text", "filename", "upload_time", "stored_at"];

/// A [`VectorIndex`] backed by [Qdrant](https://qdrant.tech/).
///
/// Wraps a [`qdrant_client::Qdrant`] client over one collection with cosine
/// distance. Upserts and deletes wait for server acknowledgement, so points
/// are visible to subsequent searches and scrolls as soon as the call
/// returns.
pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
    dimensions: usize,
}

impl QdrantIndex {
    /// Create a new index connecting to the given URL.
    pub fn new(url: &str, collection: impl Into<String>, dimensions: usize) -> Result<Self> {
        let client = Qdrant::from_url(url).build().map_err(Self::map_err)?;
        Ok(Self { client, collection: collection.into(), dimensions })
    }

    /// Create a new index from an existing client.
    pub fn from_client(client: Qdrant, collection: impl Into<String>, dimensions: usize) -> Self {
        Self { client, collection: collection.into(), dimensions }
    }

    fn map_err(e: qdrant_client::QdrantError) -> RagError {
        RagError::Store { backend: "qdrant".to_string(), message: e.to_string() }
    }

    /// Extract a string from a Qdrant payload value.
    fn extract_string(value: &QdrantValue) -> Option<String> {
        match &value.kind {
            Some(Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        }
    }

    /// Extract an unsigned integer from a Qdrant payload value.
    fn extract_u64(value: &QdrantValue) -> Option<u64> {
        match &value.kind {
            Some(Kind::IntegerValue(i)) if *i >= 0 => Some(*i as u64),
            _ => None,
        }
    }

    fn payload_from_map(map: &HashMap<String, QdrantValue>) -> PointPayload {
        let get_string =
            |field: &str| map.get(field).and_then(Self::extract_string);

        let extra: HashMap<String, String> = map
            .iter()
            .filter(|(k, _)| !NAMED_FIELDS.contains(&k.as_str()) && k.as_str() != "chunk_index")
            .filter_map(|(k, v)| Self::extract_string(v).map(|s| (k.clone(), s)))
            .collect();

        PointPayload {
            text: get_string("text").unwrap_or_default(),
            filename: get_string("filename").unwrap_or_default(),
            upload_time: get_string("upload_time"),
            chunk_index: map.get("chunk_index").and_then(Self::extract_u64).unwrap_or(0),
            stored_at: get_string("stored_at").unwrap_or_default(),
            extra,
        }
    }

    fn point_uuid(id: Option<&PointId>) -> Option<Uuid> {
        match id.and_then(|pid| pid.point_id_options.as_ref()) {
            Some(PointIdOptions::Uuid(s)) => Uuid::parse_str(s).ok(),
            _ => None,
        }
    }

    fn cursor_from_offset(offset: Option<PointId>) -> Option<String> {
        match offset.and_then(|pid| pid.point_id_options) {
            Some(PointIdOptions::Uuid(s)) => Some(s),
            Some(PointIdOptions::Num(n)) => Some(n.to_string()),
            None => None,
        }
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn ensure_collection(&self) -> Result<()> {
        let collections = self.client.list_collections().await.map_err(Self::map_err)?;
        let exists = collections.collections.iter().any(|c| c.name == self.collection);
        if exists {
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection).vectors_config(
                    VectorParamsBuilder::new(self.dimensions as u64, Distance::Cosine),
                ),
            )
            .await
            .map_err(Self::map_err)?;

        debug!(collection = %self.collection, dimensions = self.dimensions, "created qdrant collection");
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

        self.ensure_collection().await?;

        let payload_value = serde_json::to_value(&point.payload).map_err(|e| {
            RagError::InvalidPayload(format!("payload failed to serialize: {e}"))
        })?;
        let payload = Payload::try_from(payload_value)
            .map_err(|e| RagError::InvalidPayload(format!("payload rejected by qdrant: {e}")))?;

        let points = vec![PointStruct::new(point.id.to_string(), point.vector, payload)];
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(Self::map_err)?;

        debug!(collection = %self.collection, id = %point.id, "upserted point");
        Ok(())
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<RetrievalResult>> {
        if query.len() != self.dimensions {
            return Err(RagError::InvalidVector { expected: self.dimensions, actual: query.len() });
        }

        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, query.to_vec(), limit as u64)
                    .with_payload(true),
            )
            .await
            .map_err(Self::map_err)?;

        let results = response
            .result
            .into_iter()
            .map(|scored| {
                let payload = Self::payload_from_map(&scored.payload);
                RetrievalResult {
                    text: payload.text,
                    score: scored.score,
                    filename: payload.filename,
                    chunk_index: payload.chunk_index,
                }
            })
            .collect();

        Ok(results)
    }

    async fn scroll(&self, page_size: usize, cursor: Option<String>) -> Result<ScrollPage> {
        self.ensure_collection().await?;

        let mut builder = ScrollPointsBuilder::new(&self.collection)
            .limit(page_size as u32)
            .with_payload(true)
            .with_vectors(false);
        if let Some(offset) = cursor {
            builder = builder.offset(offset);
        }

        let response = self.client.scroll(builder).await.map_err(Self::map_err)?;

        let points = response
            .result
            .into_iter()
            .filter_map(|point| {
                let id = Self::point_uuid(point.id.as_ref())?;
                Some(ScrolledPoint { id, payload: Self::payload_from_map(&point.payload) })
            })
            .collect();

        Ok(ScrollPage { points, next_cursor: Self::cursor_from_offset(response.next_page_offset) })
    }

    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<()> {
        if ids.is_empty() {
            return Err(RagError::InvalidInput("at least one point id is required".into()));
        }

        let point_ids: Vec<PointId> = ids.iter().map(|id| id.to_string().into()).collect();
        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection)
                    .points(PointsIdsList { ids: point_ids })
                    .wait(true),
            )
            .await
            .map_err(Self::map_err)?;

        debug!(collection = %self.collection, count = ids.len(), "deleted points");
        Ok(())
    }
}
