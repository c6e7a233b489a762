//! Upload types

use std::io::Write;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use uuid::Uuid;

use super::filename::stored_file_name;
use crate::document::DocumentFormat;

// ============================================================================
// Error Types
// ============================================================================

/// Upload error types
///
/// The display strings are shown to users on the upload page.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file part")]
    MissingFile,

    #[error("No selected file")]
    EmptyFilename,

    #[error("Unsupported file type")]
    UnsupportedType(String),

    #[error("Failed to read upload: {0}")]
    Multipart(String),

    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::MissingFile | Self::EmptyFilename | Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedType(_) => StatusCode::BAD_REQUEST,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ============================================================================
// Uploaded File
// ============================================================================

/// A validated upload held in memory
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name as sent by the client
    pub file_name: String,
    pub format: DocumentFormat,
    pub data: Bytes,
}

impl UploadedFile {
    /// Save under `dir` for background processing, returning the path
    pub async fn save_to_dir(&self, dir: &Path, task_id: Uuid) -> Result<PathBuf, UploadError> {
        let path = dir.join(stored_file_name(task_id, &self.file_name, self.format));
        tokio::fs::write(&path, &self.data).await?;

        tracing::debug!(
            task_id = %task_id,
            path = %path.display(),
            bytes = self.data.len(),
            "Saved upload"
        );
        Ok(path)
    }

    /// Write to a temporary file that is deleted when dropped
    ///
    /// The temporary name keeps the document extension so extraction can
    /// pick the right format.
    pub async fn write_temp(&self) -> Result<tempfile::NamedTempFile, UploadError> {
        let data = self.data.clone();
        let suffix = format!(".{}", self.format.extension());

        tokio::task::spawn_blocking(move || {
            let mut file = tempfile::Builder::new()
                .prefix("chapterwise-")
                .suffix(&suffix)
                .tempfile()?;
            file.write_all(&data)?;
            file.flush()?;
            Ok::<_, UploadError>(file)
        })
        .await
        .map_err(|e| UploadError::Io(std::io::Error::other(e.to_string())))?
    }
}
