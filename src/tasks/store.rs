//! Task Store
//!
//! Bounded in-memory task state with:
//! - LRU eviction once capacity is reached
//! - TTL expiry swept by a background task
//! - Pending tasks marked failed after a processing timeout
//! - Terminal entries removed when they are taken

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use lru::LruCache;
use parking_lot::Mutex;
use uuid::Uuid;

use super::types::{TaskEntry, TaskState, TIMED_OUT_MESSAGE};

/// Interval between expiry sweeps
const CLEANUP_INTERVAL_SECS: u64 = 60;

// ============================================================================
// Task Store
// ============================================================================

#[derive(Clone)]
pub struct TaskStore {
    inner: Arc<TaskStoreInner>,
}

struct TaskStoreInner {
    tasks: Mutex<LruCache<Uuid, TaskEntry>>,

    /// Entries older than this are swept
    ttl: chrono::Duration,

    /// Pending entries older than this are marked failed
    pending_timeout: chrono::Duration,
}

impl TaskStore {
    pub fn new(capacity: usize, ttl: Duration, pending_timeout: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(TaskStoreInner {
                tasks: Mutex::new(LruCache::new(capacity)),
                ttl: to_chrono(ttl),
                pending_timeout: to_chrono(pending_timeout),
            }),
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Track a new pending task
    pub fn insert_pending(&self, id: Uuid, file_name: &str) {
        let evicted = self
            .inner
            .tasks
            .lock()
            .push(id, TaskEntry::pending(id, file_name));

        if let Some((evicted_id, entry)) = evicted {
            if evicted_id != id {
                tracing::warn!(
                    task_id = %evicted_id,
                    file_name = %entry.file_name,
                    state = entry.state.label(),
                    "Evicted task to stay within capacity"
                );
            }
        }

        tracing::info!(task_id = %id, file_name = %file_name, "Created task");
    }

    /// Record results for a pending task
    ///
    /// Returns false if the task is unknown (evicted or expired) or no
    /// longer pending.
    pub fn complete(&self, id: Uuid, results: Vec<crate::pipeline::ChapterResult>) -> bool {
        let chapters = results.len();
        let updated = self.finish(id, TaskState::Done(results));
        if updated {
            tracing::info!(task_id = %id, chapters = chapters, "Task completed");
        }
        updated
    }

    /// Record a failure for a pending task
    pub fn fail(&self, id: Uuid, message: impl Into<String>) -> bool {
        let message = message.into();
        let updated = self.finish(id, TaskState::Failed(message.clone()));
        if updated {
            tracing::warn!(task_id = %id, error = %message, "Task failed");
        }
        updated
    }

    fn finish(&self, id: Uuid, state: TaskState) -> bool {
        let mut tasks = self.inner.tasks.lock();
        match tasks.get_mut(&id) {
            Some(entry) if !entry.state.is_terminal() => {
                entry.state = state;
                true
            }
            Some(_) => false,
            None => {
                tracing::warn!(task_id = %id, "Task finished after it was evicted");
                false
            }
        }
    }

    // ========================================================================
    // Query Methods
    // ========================================================================

    /// Current state of a task, leaving it in the store
    pub fn state(&self, id: Uuid) -> Option<TaskState> {
        let mut tasks = self.inner.tasks.lock();
        let entry = tasks.get_mut(&id)?;
        self.apply_timeout(entry);
        Some(entry.state.clone())
    }

    /// Current state of a task, removing it once it is terminal
    pub fn take(&self, id: Uuid) -> Option<TaskState> {
        let mut tasks = self.inner.tasks.lock();
        let entry = tasks.get_mut(&id)?;
        self.apply_timeout(entry);

        if entry.state.is_terminal() {
            tasks.pop(&id).map(|entry| entry.state)
        } else {
            Some(TaskState::Pending)
        }
    }

    pub fn len(&self) -> usize {
        self.inner.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn apply_timeout(&self, entry: &mut TaskEntry) {
        if entry.state == TaskState::Pending && entry.age() > self.inner.pending_timeout {
            tracing::warn!(
                task_id = %entry.id,
                file_name = %entry.file_name,
                "Task exceeded processing timeout"
            );
            entry.state = TaskState::Failed(TIMED_OUT_MESSAGE.to_string());
        }
    }

    // ========================================================================
    // Cleanup
    // ========================================================================

    /// Remove entries older than the TTL
    ///
    /// Returns the number of entries removed
    pub fn cleanup_expired(&self) -> usize {
        let cutoff = Utc::now() - self.inner.ttl;
        let mut tasks = self.inner.tasks.lock();

        let expired: Vec<Uuid> = tasks
            .iter()
            .filter(|(_, entry)| entry.created_at < cutoff)
            .map(|(id, _)| *id)
            .collect();

        for id in &expired {
            tasks.pop(id);
        }

        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "Cleaned up expired tasks");
        }

        expired.len()
    }

    /// Start background cleanup task
    pub fn start_cleanup_task(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(CLEANUP_INTERVAL_SECS));

            loop {
                interval.tick().await;
                self.cleanup_expired();
            }
        })
    }

    #[cfg(test)]
    fn backdate(&self, id: Uuid, by: chrono::Duration) {
        if let Some(entry) = self.inner.tasks.lock().peek_mut(&id) {
            entry.created_at = entry.created_at - by;
        }
    }
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::days(365))
}

// ============================================================================
// Tests
// ============================================================================
