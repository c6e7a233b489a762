//! Export endpoints

use axum::{
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::export::{render_pdf, to_python_json, JSON_EXPORT_FILENAME, PDF_EXPORT_FILENAME};
use crate::pipeline::ChapterResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/json", post(export_json))
        .route("/pdf", post(export_pdf))
}

fn attachment(content_type: &'static str, file_name: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

/// Re-serialize any JSON payload as a downloadable file
async fn export_json(Json(payload): Json<Value>) -> Result<Response> {
    let body = to_python_json(&payload)
        .map_err(|e| AppError::Internal(format!("Failed to serialize export: {}", e)))?;
    Ok(attachment("application/json", JSON_EXPORT_FILENAME, body))
}

/// Render the chapter results as a downloadable PDF
async fn export_pdf(Json(results): Json<Vec<ChapterResult>>) -> Result<Response> {
    let body = tokio::task::spawn_blocking(move || render_pdf(&results))
        .await
        .map_err(|e| AppError::Internal(format!("PDF export task failed: {}", e)))??;
    Ok(attachment("application/pdf", PDF_EXPORT_FILENAME, body))
}
