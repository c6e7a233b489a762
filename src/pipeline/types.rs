//! Pipeline types

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::ExtractError;
use crate::quiz::Mcq;
use crate::summarize::SummarizeError;

/// Processing output for one chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterResult {
    /// Chapter title
    pub chapter: String,
    pub summary: String,
    pub mcqs: Vec<Mcq>,
}

/// Progress notifications emitted while a document is processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    Extracting { path: PathBuf },
    Splitting,
    ChaptersFound(usize),
    PreparingModel { model: String },
    ProcessingChapter { index: usize, title: String },
    Finished { chapters: usize },
}

impl fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extracting { path } => write!(f, "Extracting text from {} ...", path.display()),
            Self::Splitting => write!(f, "Splitting text into chapters..."),
            Self::ChaptersFound(count) => write!(f, "Found {} chapters/sections.", count),
            Self::PreparingModel { .. } => write!(f, "Loading summarization model..."),
            Self::ProcessingChapter { title, .. } => write!(f, "Processing {} ...", title),
            Self::Finished { chapters } => write!(f, "Processed {} chapters.", chapters),
        }
    }
}

/// Stage at which a pipeline run failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Extraction,
    Summarization,
}

/// Pipeline errors, tagged with the failing stage
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error("Failed to summarize '{chapter}': {source}")]
    Summarization {
        chapter: String,
        #[source]
        source: SummarizeError,
    },
}

impl PipelineError {
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Extraction(_) => PipelineStage::Extraction,
            Self::Summarization { .. } => PipelineStage::Summarization,
        }
    }
}
