//! Multipart upload parsing

use axum::extract::Multipart;

use super::types::{UploadError, UploadedFile};
use crate::document::DocumentFormat;

/// Multipart field carrying the document
pub const FILE_FIELD: &str = "file";

/// Read and validate the document from a multipart upload
///
/// The file's bytes are only read once its name and extension passed
/// validation.
pub async fn read_upload(multipart: &mut Multipart) -> Result<UploadedFile, UploadError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        UploadError::Multipart(e.to_string())
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("").to_string();
        if file_name.is_empty() {
            return Err(UploadError::EmptyFilename);
        }

        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_string())
            .unwrap_or_default();
        let format = DocumentFormat::from_extension(&extension).ok_or_else(|| {
            tracing::debug!(file_name = %file_name, "Rejected upload with unsupported type");
            UploadError::UnsupportedType(extension.clone())
        })?;

        let data = field
            .bytes()
            .await
            .map_err(|e| UploadError::Multipart(e.to_string()))?;

        tracing::debug!(file_name = %file_name, bytes = data.len(), "Received upload");
        return Ok(UploadedFile {
            file_name,
            format,
            data,
        });
    }

    Err(UploadError::MissingFile)
}
