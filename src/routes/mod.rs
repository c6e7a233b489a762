//! Route modules for the Chapterwise server

pub mod assets;
pub mod contact;
pub mod export;
pub mod health;
pub mod pages;
pub mod tasks;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let body_limit = state.config().uploads.max_bytes;

    Router::new()
        .merge(pages::router())
        .merge(contact::router())
        .nest("/export", export::router())
        .nest("/api/v1/tasks", tasks::router())
        .nest("/static", assets::router())
        .route("/health", get(health::health_check))
        .route("/api/v1/health", get(health::health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum_test::TestServer;

    use crate::config::Config;
    use crate::db::create_memory_pool;
    use crate::state::AppState;
    use crate::summarize::MockBackend;

    pub struct TestApp {
        pub server: TestServer,
        pub state: AppState,
        pub backend: Arc<MockBackend>,
        pub upload_dir: tempfile::TempDir,
    }

    pub async fn test_app(backend: MockBackend) -> TestApp {
        let upload_dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.uploads.dir = upload_dir.path().to_path_buf();

        let pool = create_memory_pool().await.unwrap();
        let backend = Arc::new(backend);
        let state = AppState::new(config, pool, backend.clone());
        let server = TestServer::new(super::router(state.clone())).unwrap();

        TestApp {
            server,
            state,
            backend,
            upload_dir,
        }
    }
}
