//! Application state management

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::pipeline::Pipeline;
use crate::summarize::{SummarizationBackend, Summarizer};
use crate::tasks::{TaskRunner, TaskStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
    pipeline: Pipeline,
    tasks: TaskStore,
    runner: TaskRunner,
}

impl AppState {
    /// Create a new application state
    ///
    /// The backend is shared by the in-request pipeline and every
    /// background task.
    pub fn new(config: Config, db: SqlitePool, backend: Arc<dyn SummarizationBackend>) -> Self {
        let pipeline = Pipeline::new(Summarizer::new(backend));
        let tasks = TaskStore::new(
            config.tasks.capacity,
            Duration::from_secs(config.tasks.ttl_secs),
            Duration::from_secs(config.tasks.timeout_secs),
        );
        let runner = TaskRunner::new(
            pipeline.clone(),
            tasks.clone(),
            config.tasks.max_concurrent,
            Duration::from_secs(config.tasks.timeout_secs),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                pipeline,
                tasks,
                runner,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Get the processing pipeline
    pub fn pipeline(&self) -> &Pipeline {
        &self.inner.pipeline
    }

    /// Get the task store
    pub fn tasks(&self) -> &TaskStore {
        &self.inner.tasks
    }

    /// Get the background task runner
    pub fn runner(&self) -> &TaskRunner {
        &self.inner.runner
    }
}
