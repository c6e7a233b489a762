//! Upload and result pages
//!
//! - `POST /` stores the upload and processes it in the background; the
//!   browser is sent to `/processing`, which polls via the `task_id` cookie
//! - `POST /summarize` processes the upload inside the request

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::html::{render_index, render_processing, render_results, IndexView};
use crate::state::AppState;
use crate::tasks::TaskState;
use crate::upload::{read_upload, UploadError};

/// Cookie correlating a browser with its background task
pub const TASK_COOKIE: &str = "task_id";

/// Shown when the cookie names a task the store no longer holds
pub const TASK_EXPIRED_MESSAGE: &str = "Task not found or expired";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(upload_async))
        .route("/processing", get(processing))
        .route("/summarize", post(summarize_sync))
}

async fn index() -> Html<String> {
    Html(render_index(&IndexView::default()))
}

fn index_with_error(status: StatusCode, message: &str) -> Response {
    (status, Html(render_index(&IndexView::error(message)))).into_response()
}

fn upload_error_page(err: &UploadError) -> Response {
    if let UploadError::Io(e) = err {
        tracing::error!("Failed to store upload: {}", e);
    }
    index_with_error(err.status_code(), &err.to_string())
}

/// Accept an upload for background processing
async fn upload_async(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let upload = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(e) => return upload_error_page(&e),
    };

    let task_id = Uuid::new_v4();
    let upload_dir = &state.config().uploads.dir;

    let saved = match tokio::fs::create_dir_all(upload_dir).await {
        Ok(()) => upload.save_to_dir(upload_dir, task_id).await,
        Err(e) => Err(UploadError::Io(e)),
    };
    let path = match saved {
        Ok(path) => path,
        Err(e) => return upload_error_page(&e),
    };

    state.tasks().insert_pending(task_id, &upload.file_name);
    state.runner().submit(task_id, path);

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        TASK_COOKIE, task_id
    );
    ([(header::SET_COOKIE, cookie)], Redirect::to("/processing")).into_response()
}

/// Show the outcome of the browser's background task, or keep waiting
async fn processing(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(task_id) = task_id_from_cookies(&headers) else {
        return Html(render_processing()).into_response();
    };

    match state.tasks().take(task_id) {
        Some(TaskState::Done(results)) => (
            [(header::SET_COOKIE, expired_cookie())],
            Html(render_index(&IndexView::results(&results))),
        )
            .into_response(),
        Some(TaskState::Failed(message)) => (
            [(header::SET_COOKIE, expired_cookie())],
            Html(render_index(&IndexView::error(&format!(
                "Error processing file: {}",
                message
            )))),
        )
            .into_response(),
        Some(TaskState::Pending) => Html(render_processing()).into_response(),
        None => {
            tracing::debug!(task_id = %task_id, "Polled task is no longer tracked");
            (
                [(header::SET_COOKIE, expired_cookie())],
                Html(render_index(&IndexView::error(TASK_EXPIRED_MESSAGE))),
            )
                .into_response()
        }
    }
}

/// Process an upload inside the request
///
/// The document lives in a temporary file that is removed once the request
/// finishes, whatever the outcome.
async fn summarize_sync(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let upload = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(e) => return upload_error_page(&e),
    };

    let temp = match upload.write_temp().await {
        Ok(temp) => temp,
        Err(e) => {
            return index_with_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Error processing file: {}", e),
            )
        }
    };

    tracing::info!(file_name = %upload.file_name, "Processing upload in request");
    match state.pipeline().run(temp.path()).await {
        Ok(results) => {
            tracing::info!(
                file_name = %upload.file_name,
                chapters = results.len(),
                "Processed upload"
            );
            Html(render_results(&results)).into_response()
        }
        Err(e) => {
            tracing::warn!(
                file_name = %upload.file_name,
                stage = ?e.stage(),
                error = %e,
                "Processing failed"
            );
            index_with_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Error processing file: {}", e),
            )
        }
    }
}

fn expired_cookie() -> String {
    format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", TASK_COOKIE)
}

/// Find the task id in the request's `Cookie` headers
fn task_id_from_cookies(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TASK_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::http::HeaderValue;
    use axum_test::multipart::{MultipartForm, Part};

    use crate::routes::test_support::test_app;
    use crate::summarize::{MockBackend, EMPTY_CONTENT_SUMMARY};

    const BOOK: &str = "Chapter 1 Intro\nHello world. This is a test. Another sentence. Final one.";

    fn file_form(name: &str, contents: &str) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(contents.as_bytes().to_vec())
                .file_name(name)
                .mime_type("text/plain"),
        )
    }

    fn upload_dir_entries(dir: &tempfile::TempDir) -> usize {
        std::fs::read_dir(dir.path()).unwrap().count()
    }

    #[tokio::test]
    async fn test_index_page() {
        let app = test_app(MockBackend::echo()).await;
        let response = app.server.get("/").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains(r#"action="/summarize""#));
        assert!(html.contains(r#"id="dark-mode-toggle""#));
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_rejected() {
        let app = test_app(MockBackend::echo()).await;

        let response = app
            .server
            .post("/")
            .multipart(file_form("report.docx", "binary-ish"))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.text().contains("Unsupported file type"));
        assert_eq!(upload_dir_entries(&app.upload_dir), 0);
        assert!(app.state.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_missing_and_empty_file_fields() {
        let app = test_app(MockBackend::echo()).await;

        let form = MultipartForm::new().add_text("other", "value");
        let response = app.server.post("/").multipart(form).await;
        assert!(response.text().contains("No file part"));

        let response = app.server.post("/summarize").multipart(file_form("", "")).await;
        assert!(response.text().contains("No selected file"));
        assert_eq!(app.backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_async_upload_flow() {
        let app = test_app(MockBackend::echo()).await;

        let response = app.server.post("/").multipart(file_form("My Book.txt", BOOK)).await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/processing");

        let cookie = response.header("set-cookie");
        let cookie = cookie.to_str().unwrap();
        let pair = cookie.split(';').next().unwrap().to_string();
        let task_id = Uuid::parse_str(pair.trim_start_matches("task_id=")).unwrap();

        for _ in 0..200 {
            if app.state.tasks().state(task_id) != Some(TaskState::Pending) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(matches!(app.state.tasks().state(task_id), Some(TaskState::Done(_))));

        let response = app
            .server
            .get("/processing")
            .add_header(header::COOKIE, HeaderValue::from_str(&pair).unwrap())
            .await;
        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Chapter 1 Intro"));
        assert!(html.contains("What is the main idea of: 'Hello world'?"));

        // Results are handed out once
        let response = app
            .server
            .get("/processing")
            .add_header(header::COOKIE, HeaderValue::from_str(&pair).unwrap())
            .await;
        assert!(response.text().contains(TASK_EXPIRED_MESSAGE));

        // The stored upload is removed after processing
        for _ in 0..100 {
            if upload_dir_entries(&app.upload_dir) == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(upload_dir_entries(&app.upload_dir), 0);
    }

    #[tokio::test]
    async fn test_processing_without_cookie() {
        let app = test_app(MockBackend::echo()).await;
        let response = app.server.get("/processing").await;

        response.assert_status_ok();
        assert!(response.text().contains("Processing your book"));
    }

    #[tokio::test]
    async fn test_failed_task_shows_error() {
        let app = test_app(MockBackend::echo()).await;
        let task_id = Uuid::new_v4();
        app.state.tasks().insert_pending(task_id, "book.txt");
        app.state.tasks().fail(task_id, "model is overloaded");

        let response = app
            .server
            .get("/processing")
            .add_header(
                header::COOKIE,
                HeaderValue::from_str(&format!("theme=dark; task_id={}", task_id)).unwrap(),
            )
            .await;

        assert!(response
            .text()
            .contains("Error processing file: model is overloaded"));
        assert!(app.state.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_evicted_task_stops_polling() {
        let app = test_app(MockBackend::echo()).await;
        let evicted = Uuid::new_v4();
        app.state.tasks().insert_pending(evicted, "book.txt");
        app.state.tasks().fail(evicted, "model is overloaded");

        let capacity = app.state.config().tasks.capacity;
        for i in 0..capacity {
            app.state
                .tasks()
                .insert_pending(Uuid::new_v4(), &format!("book{}.txt", i));
        }
        assert_eq!(app.state.tasks().state(evicted), None);

        let response = app
            .server
            .get("/processing")
            .add_header(
                header::COOKIE,
                HeaderValue::from_str(&format!("task_id={}", evicted)).unwrap(),
            )
            .await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains(TASK_EXPIRED_MESSAGE));
        assert!(!html.contains(r#"http-equiv="refresh""#));
        let cookie = response.header("set-cookie");
        assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_sync_summarize() {
        let app = test_app(MockBackend::returning("A calm summary. It ends well.")).await;

        let book = "Chapter 1 Calm\nThe lake was still.\nChapter 2 Empty\n   \n";
        let response = app
            .server
            .post("/summarize")
            .multipart(file_form("Lake.TXT", book))
            .await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Chapter 1 Calm"));
        assert!(html.contains("A calm summary. It ends well."));
        assert!(html.contains(EMPTY_CONTENT_SUMMARY));
        assert_eq!(app.backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_sync_summarize_backend_failure() {
        let app = test_app(MockBackend::failing()).await;

        let response = app
            .server
            .post("/summarize")
            .multipart(file_form("book.txt", BOOK))
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().contains("Error processing file:"));
    }

    #[test]
    fn test_task_id_from_cookies() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(
            header::COOKIE,
            HeaderValue::from_str(&format!("a=1; task_id={}", id)).unwrap(),
        );
        assert_eq!(task_id_from_cookies(&headers), Some(id));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("task_id=garbage"));
        assert_eq!(task_id_from_cookies(&headers), None);
    }
}
