//! Chapter summarization service

use std::sync::Arc;

use super::backend::SummarizationBackend;
use super::types::{GenerationParams, SummarizeError, EMPTY_CONTENT_SUMMARY, MAX_INPUT_CHARS};

/// Summarizes chapter content with a shared backend
#[derive(Clone)]
pub struct Summarizer {
    backend: Arc<dyn SummarizationBackend>,
    params: GenerationParams,
}

impl Summarizer {
    pub fn new(backend: Arc<dyn SummarizationBackend>) -> Self {
        Self::with_params(backend, GenerationParams::default())
    }

    pub fn with_params(backend: Arc<dyn SummarizationBackend>, params: GenerationParams) -> Self {
        Self { backend, params }
    }

    pub fn backend(&self) -> &Arc<dyn SummarizationBackend> {
        &self.backend
    }

    /// Summarize one chapter
    ///
    /// Whitespace-only content yields [`EMPTY_CONTENT_SUMMARY`] without a
    /// model call. Otherwise only the first [`MAX_INPUT_CHARS`] characters
    /// of the trimmed content are sent and the first candidate is returned.
    pub async fn summarize(&self, content: &str) -> Result<String, SummarizeError> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(EMPTY_CONTENT_SUMMARY.to_string());
        }

        let input = truncate_chars(content, MAX_INPUT_CHARS);
        tracing::debug!(
            backend = ?self.backend.kind(),
            model = self.backend.model(),
            chars = input.chars().count(),
            "Summarizing chapter"
        );

        let candidates = self.backend.summarize(input, &self.params).await?;
        candidates
            .into_iter()
            .next()
            .map(|candidate| candidate.summary_text)
            .ok_or(SummarizeError::NoCandidates)
    }
}

/// Return the first `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
