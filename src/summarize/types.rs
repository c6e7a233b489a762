//! Summarization types

use serde::{Deserialize, Serialize};

/// Characters of chapter content forwarded to the model; the rest is dropped
pub const MAX_INPUT_CHARS: usize = 2000;

/// Minimum summary length requested from the model (tokens)
pub const MIN_SUMMARY_LENGTH: u32 = 150;

/// Maximum summary length requested from the model (tokens)
pub const MAX_SUMMARY_LENGTH: u32 = 500;

/// Returned instead of a summary when a chapter has no content
pub const EMPTY_CONTENT_SUMMARY: &str = "No content to summarize.";

/// Summarization backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hugging Face inference API (`[{"summary_text": ...}]` responses)
    HuggingFace,
    /// Ollama generate API
    Ollama,
}

impl Default for BackendKind {
    fn default() -> Self {
        Self::HuggingFace
    }
}

impl BackendKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => Some(Self::HuggingFace),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    pub fn default_url(&self) -> &'static str {
        match self {
            Self::HuggingFace => "https://api-inference.huggingface.co",
            Self::Ollama => "http://localhost:11434",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::HuggingFace => "sshleifer/distilbart-cnn-12-6",
            Self::Ollama => "llama3",
        }
    }
}

/// Decoding bounds passed to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationParams {
    pub min_length: u32,
    pub max_length: u32,
    pub do_sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            min_length: MIN_SUMMARY_LENGTH,
            max_length: MAX_SUMMARY_LENGTH,
            do_sample: false,
        }
    }
}

/// One generated summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCandidate {
    pub summary_text: String,
}

/// Summarization error types
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("Summarization backend not available: {0}")]
    Unavailable(String),

    #[error("Failed to call summarization backend: {0}")]
    Request(String),

    #[error("Summarization backend returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response from summarization backend: {0}")]
    InvalidResponse(String),

    #[error("Summarization backend returned no candidates")]
    NoCandidates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!(BackendKind::parse("HuggingFace"), Some(BackendKind::HuggingFace));
        assert_eq!(BackendKind::parse(" ollama "), Some(BackendKind::Ollama));
        assert_eq!(BackendKind::parse("openai"), None);
    }

    #[test]
    fn test_default_params_are_deterministic() {
        let params = GenerationParams::default();
        assert_eq!(params.min_length, 150);
        assert_eq!(params.max_length, 500);
        assert!(!params.do_sample);
    }
}
