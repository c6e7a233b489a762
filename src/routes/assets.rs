//! Static asset endpoints

use axum::{http::header, response::IntoResponse, routing::get, Router};

use crate::html::{SCRIPT_JS, STYLE_CSS};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/style.css", get(style))
        .route("/script.js", get(script))
}

async fn style() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        SCRIPT_JS,
    )
}
