//! Supervised background pipeline runs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use uuid::Uuid;

use super::store::TaskStore;
use super::types::TIMED_OUT_MESSAGE;
use crate::pipeline::{ChapterResult, Pipeline};

/// Failure message recorded when a job panics
pub const PANIC_MESSAGE: &str = "Processing failed unexpectedly";

/// Runs pipelines for uploaded files and records outcomes in a `TaskStore`
#[derive(Clone)]
pub struct TaskRunner {
    pipeline: Pipeline,
    store: TaskStore,
    permits: Arc<Semaphore>,
    job_timeout: Duration,
}

impl TaskRunner {
    pub fn new(
        pipeline: Pipeline,
        store: TaskStore,
        max_concurrent: usize,
        job_timeout: Duration,
    ) -> Self {
        Self {
            pipeline,
            store,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            job_timeout,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Process `path` in the background for a task already marked pending
    ///
    /// The uploaded file is removed once the job ends, whatever the outcome.
    /// The returned handle resolves after the outcome has been recorded.
    pub fn submit(&self, task_id: Uuid, path: PathBuf) -> JoinHandle<()> {
        let job = tokio::spawn(run_job(
            self.pipeline.clone(),
            self.permits.clone(),
            self.job_timeout,
            task_id,
            path.clone(),
        ));

        let store = self.store.clone();
        tokio::spawn(async move {
            let outcome = job.await;

            if let Err(e) = tokio::fs::remove_file(&path).await {
                tracing::debug!(task_id = %task_id, path = %path.display(), error = %e, "Upload already removed");
            }

            match outcome {
                Ok(Ok(results)) => {
                    store.complete(task_id, results);
                }
                Ok(Err(message)) => {
                    store.fail(task_id, message);
                }
                Err(e) if e.is_panic() => {
                    tracing::error!(task_id = %task_id, "Task panicked");
                    store.fail(task_id, PANIC_MESSAGE);
                }
                Err(e) => {
                    store.fail(task_id, format!("Processing was cancelled: {}", e));
                }
            }
        })
    }
}

async fn run_job(
    pipeline: Pipeline,
    permits: Arc<Semaphore>,
    job_timeout: Duration,
    task_id: Uuid,
    path: PathBuf,
) -> Result<Vec<ChapterResult>, String> {
    let _permit = permits
        .acquire_owned()
        .await
        .map_err(|e| format!("Task runner unavailable: {}", e))?;

    tracing::debug!(task_id = %task_id, path = %path.display(), "Starting task");

    let run = pipeline.run_with_progress(&path, |event| {
        tracing::info!(task_id = %task_id, "{}", event);
    });

    match timeout(job_timeout, run).await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(_) => Err(TIMED_OUT_MESSAGE.to_string()),
    }
}
