//! Book processing pipeline
//!
//! Extract → split → summarize → quiz, shared by the web front end, the
//! background task runner and the CLI.

mod orchestrator;
mod report;
mod types;

pub use orchestrator::Pipeline;
pub use report::format_text_report;
pub use types::{ChapterResult, PipelineError, PipelineEvent, PipelineStage};
