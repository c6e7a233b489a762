//! Task types

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::pipeline::ChapterResult;

/// Failure message recorded for tasks that stay pending too long
pub const TIMED_OUT_MESSAGE: &str = "Processing timed out";

/// State of a background task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Done(Vec<ChapterResult>),
    Failed(String),
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done(_) => "done",
            Self::Failed(_) => "failed",
        }
    }
}

/// A tracked task
#[derive(Debug, Clone)]
pub struct TaskEntry {
    pub id: Uuid,
    pub file_name: String,
    pub state: TaskState,
    pub created_at: DateTime<Utc>,
}

impl TaskEntry {
    pub fn pending(id: Uuid, file_name: impl Into<String>) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            state: TaskState::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.created_at
    }
}

/// Task status as reported by the API
#[derive(Debug, Clone, Serialize)]
pub struct TaskStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ChapterResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<TaskState> for TaskStatus {
    fn from(state: TaskState) -> Self {
        let status = state.label();
        match state {
            TaskState::Pending => Self {
                status,
                results: None,
                error: None,
            },
            TaskState::Done(results) => Self {
                status,
                results: Some(results),
                error: None,
            },
            TaskState::Failed(message) => Self {
                status,
                results: None,
                error: Some(message),
            },
        }
    }
}
