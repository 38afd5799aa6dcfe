//! Shared test doubles and fixtures for the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use docrag::{
    CompletionProvider, EmbeddingProvider, IndexedPoint, PointPayload, RagError, Result,
};

/// Derive a deterministic non-zero unit vector from text.
fn vector_for(text: &str, dimensions: usize) -> Vec<f32> {
    let bytes = text.as_bytes();
    let mut v: Vec<f32> = (0..dimensions)
        .map(|i| {
            let byte = bytes.get(i % bytes.len().max(1)).copied().unwrap_or(7);
            ((byte as f32) + (i as f32) * 0.37).sin()
        })
        .collect();
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    } else {
        v[0] = 1.0;
    }
    v
}

/// An [`EmbeddingProvider`] that records every call and returns either a
/// fixed vector or one derived from the input text.
pub struct FakeEmbedder {
    dimensions: usize,
    fixed: Option<Vec<f32>>,
    pub calls: Mutex<Vec<(String, Instant)>>,
}

impl FakeEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, fixed: None, calls: Mutex::new(Vec::new()) }
    }

    /// Return the same vector for every input.
    pub fn returning(vector: Vec<f32>) -> Self {
        Self { dimensions: vector.len(), fixed: Some(vector), calls: Mutex::new(Vec::new()) }
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    pub async fn call_instants(&self) -> Vec<Instant> {
        self.calls.lock().await.iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(RagError::InvalidInput("text is required for embedding".into()));
        }
        self.calls.lock().await.push((text.to_string(), Instant::now()));
        Ok(match &self.fixed {
            Some(v) => v.clone(),
            None => vector_for(text, self.dimensions),
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// An [`EmbeddingProvider`] that fails every call with a provider error.
pub struct FailingEmbedder {
    dimensions: usize,
}

impl FailingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RagError::Provider { provider: "fake".into(), message: "embedding backend down".into() })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// A [`CompletionProvider`] that records (context, question) pairs and
/// returns a canned reply.
pub struct FakeCompleter {
    reply: String,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeCompleter {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), calls: Mutex::new(Vec::new()) }
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    pub async fn contexts(&self) -> Vec<String> {
        self.calls.lock().await.iter().map(|(ctx, _)| ctx.clone()).collect()
    }
}

#[async_trait]
impl CompletionProvider for FakeCompleter {
    async fn complete(&self, context: &str, question: &str) -> Result<String> {
        self.calls.lock().await.push((context.to_string(), question.to_string()));
        Ok(self.reply.clone())
    }
}

/// Build an indexed point with the given document coordinates.
pub fn make_point(filename: &str, chunk_index: u64, vector: Vec<f32>, text: &str) -> IndexedPoint {
    IndexedPoint {
        id: Uuid::new_v4(),
        vector,
        payload: PointPayload {
            text: text.to_string(),
            filename: filename.to_string(),
            upload_time: Some("2026-08-01T10:00:00+00:00".to_string()),
            chunk_index,
            stored_at: "2026-08-01T10:00:01+00:00".to_string(),
            extra: HashMap::new(),
        },
    }
}
