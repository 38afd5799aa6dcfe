//! OpenAI embedding and completion provider.
//!
//! [`OpenAiClient`] implements both [`EmbeddingProvider`] and
//! [`CompletionProvider`] over the OpenAI REST API using `reqwest`, and owns
//! a [`RequestPacer`] that spaces outbound calls to stay inside the
//! provider's rate limits.
//!
//! This module is only available when the `openai` feature is enabled.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error};

use crate::embedding::{CompletionProvider, EmbeddingProvider};
use crate::error::{RagError, Result};

const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The default embedding model and its dimensionality.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
const DEFAULT_DIMENSIONS: usize = 1536;

/// The default chat model used for answer synthesis.
const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo";

/// Minimum spacing between any two outbound provider calls.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(100);

/// Per-request timeouts at the provider boundary. Timeouts surface as
/// [`RagError::Timeout`] and are never retried internally.
const EMBED_TIMEOUT: Duration = Duration::from_secs(30);
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(45);

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions using only the provided context. If the context does not contain enough information to answer, say so rather than guessing. Refer to the numbered sources you relied on.";

/// Spaces outbound provider calls so consecutive requests are at least a
/// minimum interval apart.
///
/// The last-request instant is guarded by a mutex and the holder sleeps out
/// the remainder of the interval before stamping its slot, so concurrent
/// callers queue behind one another rather than stampede the provider.
#[derive(Debug)]
pub struct RequestPacer {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestPacer {
    /// Create a pacer enforcing the given minimum interval between calls.
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval, last_request: Mutex::new(None) }
    }

    /// Wait until the minimum interval since the previous call has elapsed,
    /// then claim the current slot.
    pub async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// An [`EmbeddingProvider`] and [`CompletionProvider`] backed by the OpenAI
/// REST API.
///
/// # Configuration
///
/// - `embedding_model` – defaults to `text-embedding-ada-002` (1536 dims).
/// - `completion_model` – defaults to `gpt-3.5-turbo`.
/// - `api_key` – from the constructor or the `OPENAI_API_KEY` environment
///   variable.
///
/// # Example
///
/// ```rust,ignore
/// use docrag::openai::OpenAiClient;
///
/// let client = OpenAiClient::from_env()?;
/// let vector = client.embed("hello world").await?;
/// let answer = client.complete(&context, "what changed?").await?;
/// ```
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    embedding_model: String,
    completion_model: String,
    system_prompt: String,
    dimensions: usize,
    pacer: RequestPacer,
}

impl OpenAiClient {
    /// Create a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidInput`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::InvalidInput("API key must not be empty".into()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            embedding_model: DEFAULT_EMBEDDING_MODEL.into(),
            completion_model: DEFAULT_COMPLETION_MODEL.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            dimensions: DEFAULT_DIMENSIONS,
            pacer: RequestPacer::new(MIN_REQUEST_INTERVAL),
        })
    }

    /// Create a new client using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            RagError::InvalidInput("OPENAI_API_KEY environment variable not set".into())
        })?;
        Self::new(api_key)
    }

    /// Set the embedding model name.
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set the dimensionality reported for the configured embedding model.
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self
    }

    /// Set the chat model used for completions.
    pub fn with_completion_model(mut self, model: impl Into<String>) -> Self {
        self.completion_model = model.into();
        self
    }

    /// Replace the fixed system prompt used for completions.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Override the minimum interval between outbound calls.
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.pacer = RequestPacer::new(interval);
        self
    }

    /// Map a transport-level failure onto the error taxonomy.
    fn map_transport(e: reqwest::Error) -> RagError {
        if e.is_timeout() {
            return RagError::Timeout { provider: "OpenAI".into() };
        }
        RagError::Provider { provider: "OpenAI".into(), message: format!("request failed: {e}") }
    }

    /// Map a non-success HTTP status onto the error taxonomy, pulling the
    /// upstream message out of the error body when it parses.
    fn map_status(status: StatusCode, body: &str) -> RagError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => RagError::RateLimited { provider: "OpenAI".into() },
            StatusCode::UNAUTHORIZED => RagError::Unauthorized { provider: "OpenAI".into() },
            _ => {
                let detail = serde_json::from_str::<ErrorResponse>(body)
                    .map(|e| e.error.message)
                    .unwrap_or_else(|_| body.to_string());
                RagError::Provider {
                    provider: "OpenAI".into(),
                    message: format!("API returned {status}: {detail}"),
                }
            }
        }
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── Provider implementations ───────────────────────────────────────

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RagError::InvalidInput("text is required for embedding".into()));
        }

        debug!(provider = "OpenAI", text_len = trimmed.len(), model = %self.embedding_model, "embedding text");

        self.pacer.pace().await;

        let request_body = EmbeddingRequest { model: &self.embedding_model, input: trimmed };

        let response = self
            .client
            .post(OPENAI_EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .timeout(EMBED_TIMEOUT)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "OpenAI", error = %e, "embedding request failed");
                Self::map_transport(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(provider = "OpenAI", %status, "embeddings API error");
            return Err(Self::map_status(status, &body));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = "OpenAI", error = %e, "failed to parse embeddings response");
            RagError::Provider {
                provider: "OpenAI".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        parsed.data.into_iter().next().map(|d| d.embedding).ok_or_else(|| RagError::Provider {
            provider: "OpenAI".into(),
            message: "API returned empty response".into(),
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, context: &str, question: &str) -> Result<String> {
        if context.trim().is_empty() || question.trim().is_empty() {
            return Err(RagError::InvalidInput("both context and question are required".into()));
        }

        debug!(provider = "OpenAI", context_len = context.len(), model = %self.completion_model, "requesting completion");

        self.pacer.pace().await;

        let user_prompt = format!(
            "Context Information: {context}\nQuestion: {question}\nPlease provide a clear, accurate answer based on the context above."
        );
        let request_body = ChatRequest {
            model: &self.completion_model,
            messages: vec![
                ChatMessage { role: "system", content: &self.system_prompt },
                ChatMessage { role: "user", content: &user_prompt },
            ],
            max_tokens: 1000,
            temperature: 0.7,
            top_p: 0.9,
        };

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .timeout(COMPLETION_TIMEOUT)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "OpenAI", error = %e, "completion request failed");
                Self::map_transport(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(provider = "OpenAI", %status, "chat API error");
            return Err(Self::map_status(status, &body));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = "OpenAI", error = %e, "failed to parse chat response");
            RagError::Provider {
                provider: "OpenAI".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| RagError::Provider {
                provider: "OpenAI".into(),
                message: "API returned no choices".into(),
            })
    }
}
