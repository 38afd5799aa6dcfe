//! Capability traits for the embedding and completion providers.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that converts text into fixed-dimension embedding vectors.
///
/// Implementations wrap an external embedding backend behind a unified async
/// interface and own whatever throttling that backend requires.
///
/// # Example
///
/// ```rust,ignore
/// use docrag::EmbeddingProvider;
///
/// let vector = provider.embed("what is the refund policy?").await?;
/// assert_eq!(vector.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidInput`](crate::RagError::InvalidInput) for
    /// empty or whitespace-only text without contacting the backend; provider
    /// failures surface as `RateLimited`, `Unauthorized`, `Timeout`, or
    /// `Provider`.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}

/// A provider that synthesizes a grounded answer from assembled context.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Produce an answer for `question` conditioned on `context`.
    ///
    /// Fails under the same taxonomy as
    /// [`EmbeddingProvider::embed`].
    async fn complete(&self, context: &str, question: &str) -> Result<String>;
}
