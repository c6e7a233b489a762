//! Summarization Module
//!
//! Wraps an external pretrained summarization model behind a backend trait.
//!
//! Supports multiple backends:
//! - Hugging Face inference API (hosted or self-hosted, default)
//! - Ollama (local LLM, prompted to summarize)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chapterwise::summarize::{build_backend, Summarizer};
//!
//! let backend = build_backend(&config.summarizer)?;
//! let summarizer = Summarizer::new(backend);
//!
//! // Empty content short-circuits without calling the model
//! let summary = summarizer.summarize(&chapter.content).await?;
//! ```

mod backend;
mod service;
mod types;

pub use backend::{build_backend, HuggingFaceBackend, OllamaBackend, SummarizationBackend};
pub use service::{truncate_chars, Summarizer};
pub use types::{
    BackendKind, GenerationParams, SummarizeError, SummaryCandidate, EMPTY_CONTENT_SUMMARY,
    MAX_INPUT_CHARS, MAX_SUMMARY_LENGTH, MIN_SUMMARY_LENGTH,
};

#[cfg(test)]
pub use backend::MockBackend;
