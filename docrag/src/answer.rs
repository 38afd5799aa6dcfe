//! Answer synthesis from retrieved context.
//!
//! [`AnswerSynthesizer`] turns a natural-language question into a grounded
//! answer: embed the question, retrieve the nearest chunks, assemble a
//! numbered context block, and hand it to the completion provider. Each
//! answer ships with source attributions mirroring the context entries.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::embedding::{CompletionProvider, EmbeddingProvider};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorIndex;

/// Number of chunks retrieved per question unless overridden.
const DEFAULT_TOP_K: usize = 5;

/// Questions longer than this are rejected.
const MAX_QUESTION_LEN: usize = 1000;

/// Length of the source preview excerpt, in characters.
const PREVIEW_LEN: usize = 200;

/// Delimiter between context entries.
const CONTEXT_DELIMITER: &str = "\n\n---\n\n";

/// Returned when retrieval finds nothing; an empty corpus or off-topic
/// question is a normal outcome, not an error.
const NO_INFORMATION_ANSWER: &str = "I couldn't find relevant information in the uploaded documents to answer your question. Please make sure you've uploaded relevant documents first.";

/// Attribution for one context entry backing an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceAttribution {
    /// 1-based position of this source in the context block.
    pub index: usize,
    /// Relevance percentage, formatted with one decimal (e.g. `"87.3%"`).
    pub relevance: String,
    /// Filename of the source document.
    pub filename: String,
    /// Position of the chunk within its source document.
    pub chunk_index: u64,
    /// The first 200 characters of the chunk, suffixed with an ellipsis.
    pub preview: String,
}

/// A synthesized answer plus the sources it was grounded on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The answer text, trimmed.
    pub answer: String,
    /// One attribution per context entry, in retrieval order.
    pub sources: Vec<SourceAttribution>,
}

/// Assembles ranked context from the index and synthesizes grounded
/// answers through a [`CompletionProvider`].
pub struct AnswerSynthesizer {
    embedder: Arc<dyn EmbeddingProvider>,
    completer: Arc<dyn CompletionProvider>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
}

impl AnswerSynthesizer {
    /// Create a synthesizer retrieving the default number of chunks per
    /// question.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        completer: Arc<dyn CompletionProvider>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self { embedder, completer, index, top_k: DEFAULT_TOP_K }
    }

    /// Override how many chunks are retrieved per question.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answer a question from the indexed corpus.
    ///
    /// Zero retrieved chunks yield a fixed no-information answer with an
    /// empty source list — a successful response, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidInput`] for an empty question or one
    /// longer than 1000 characters. Embedding, search, and completion
    /// failures propagate unchanged.
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        let trimmed = question.trim();
        if trimmed.is_empty() {
            return Err(RagError::InvalidInput("question must be a non-empty string".into()));
        }
        if question.len() > MAX_QUESTION_LEN {
            return Err(RagError::InvalidInput(
                "question is too long (max 1000 characters)".into(),
            ));
        }

        debug!(question_len = trimmed.len(), top_k = self.top_k, "answering question");

        let query = self.embedder.embed(trimmed).await?;
        self.index.ensure_collection().await?;
        let results = self.index.search(&query, self.top_k).await?;

        if results.is_empty() {
            info!("no relevant chunks retrieved");
            return Ok(Answer { answer: NO_INFORMATION_ANSWER.to_string(), sources: Vec::new() });
        }

        let context = results
            .iter()
            .enumerate()
            .map(|(i, r)| {
                format!(
                    "[Source {}] File: {}, Chunk: {} (Relevance: {:.1}%)\n{}",
                    i + 1,
                    r.filename,
                    r.chunk_index,
                    r.score * 100.0,
                    r.text
                )
            })
            .collect::<Vec<_>>()
            .join(CONTEXT_DELIMITER);

        let answer = self.completer.complete(&context, trimmed).await?;

        let sources = results
            .iter()
            .enumerate()
            .map(|(i, r)| SourceAttribution {
                index: i + 1,
                relevance: format!("{:.1}%", r.score * 100.0),
                filename: r.filename.clone(),
                chunk_index: r.chunk_index,
                preview: preview(&r.text),
            })
            .collect();

        info!(source_count = results.len(), "answer synthesized");
        Ok(Answer { answer, sources })
    }
}

/// The first 200 characters of `text`, suffixed with an ellipsis marker.
fn preview(text: &str) -> String {
    let excerpt: String = text.chars().take(PREVIEW_LEN).collect();
    format!("{excerpt}…")
}
