//! Task status API

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::tasks::TaskStatus;

pub fn router() -> Router<AppState> {
    Router::new().route("/:id", get(task_status))
}

/// Report a task's state without consuming it
async fn task_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskStatus>> {
    let task_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest(format!("Invalid task id: {}", id)))?;

    let task_state = state
        .tasks()
        .state(task_id)
        .ok_or_else(|| AppError::NotFound(format!("Task not found: {}", task_id)))?;

    Ok(Json(TaskStatus::from(task_state)))
}
