//! Error types for the `docrag` crate.

use thiserror::Error;

/// Errors that can occur across the ingestion and retrieval core.
///
/// Provider-boundary failures (`RateLimited`, `Unauthorized`, `Timeout`,
/// `Provider`) are never retried internally; callers decide whether a retry
/// makes sense. `InvalidInput` always indicates a caller error.
#[derive(Debug, Error)]
pub enum RagError {
    /// The caller supplied empty, oversized, or otherwise malformed input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The provider rejected the request with HTTP 429. The caller may retry later.
    #[error("Rate limit exceeded by provider '{provider}'")]
    RateLimited {
        /// The provider that throttled the request.
        provider: String,
    },

    /// The provider rejected the credentials (HTTP 401). Not retryable.
    #[error("Provider '{provider}' rejected the API key")]
    Unauthorized {
        /// The provider that rejected the request.
        provider: String,
    },

    /// The provider did not respond within the request timeout.
    #[error("Request to provider '{provider}' timed out")]
    Timeout {
        /// The provider that failed to respond.
        provider: String,
    },

    /// Any other provider-side failure, carrying the upstream message.
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A vector's length does not match the index's configured dimensionality.
    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidVector {
        /// The dimensionality the index was created with.
        expected: usize,
        /// The length of the rejected vector.
        actual: usize,
    },

    /// A point payload failed validation before upsert.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// The requested deletion target does not exist in the index.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A vector index operation failed, wrapping the backend message.
    #[error("Vector index error ({backend}): {message}")]
    Store {
        /// The index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for ingestion and retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
