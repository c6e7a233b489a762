//! Text extraction
//!
//! PDF text comes from MuPDF's text layer, one page after another. Plain
//! text files are read as strict UTF-8 with universal newlines.

use std::path::Path;

use mupdf::{Document, TextPageOptions};
use thiserror::Error;

use super::types::DocumentFormat;

/// Extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format '{0}'. Please provide a PDF or TXT file.")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Text file is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),
}

impl From<mupdf::Error> for ExtractError {
    fn from(err: mupdf::Error) -> Self {
        ExtractError::Pdf(err.to_string())
    }
}

/// Extract the full text of a PDF or TXT file
///
/// The format is decided by the file extension. PDF extraction runs on the
/// blocking pool because MuPDF calls are synchronous.
pub async fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| {
        ExtractError::UnsupportedFormat(
            path.extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default(),
        )
    })?;

    match format {
        DocumentFormat::Txt => {
            let bytes = tokio::fs::read(path).await?;
            let text = String::from_utf8(bytes)?;
            Ok(normalize_newlines(&text))
        }
        DocumentFormat::Pdf => {
            let path = path.to_path_buf();
            tokio::task::spawn_blocking(move || extract_pdf_text(&path))
                .await
                .map_err(|e| ExtractError::Pdf(format!("extraction task failed: {}", e)))?
        }
    }
}

/// Extract text from every page of a PDF
pub fn extract_pdf_text(path: &Path) -> Result<String, ExtractError> {
    let path_str = path.to_string_lossy();
    let doc = Document::open(&*path_str)?;
    let page_count = doc.page_count()?;

    let mut text = String::new();
    for index in 0..page_count {
        let page = doc.load_page(index)?;
        let page_text = page.to_text_page(TextPageOptions::empty())?.to_text()?;
        text.push_str(&page_text);
        if !page_text.ends_with('\n') {
            text.push('\n');
        }
    }

    tracing::debug!(
        path = %path.display(),
        pages = page_count,
        chars = text.chars().count(),
        "Extracted PDF text"
    );

    Ok(text)
}

/// Convert `\r\n` and lone `\r` line endings to `\n`
fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
