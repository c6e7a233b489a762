//! Document handling
//!
//! Turns an uploaded file into ordered chapters:
//! - `extract`: PDF (MuPDF) and plain-text extraction into a single string
//! - `splitter`: "Chapter N" marker segmentation with a full-text fallback

pub mod extract;
pub mod splitter;
mod types;

pub use extract::{extract_pdf_text, extract_text, ExtractError};
pub use splitter::{split_into_chapters, FULL_TEXT_TITLE};
pub use types::{Chapter, DocumentFormat};
