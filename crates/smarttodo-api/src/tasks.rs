use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, info};

use smarttodo_db::Database;
use smarttodo_db::models::TaskRow;
use smarttodo_types::Task;
use smarttodo_types::api::{AckResponse, CreateTaskRequest, DeleteTaskRequest, UpdateTaskRequest};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /api/getTasks: every task owned by the caller, newest first.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let uid = user.id.to_string();
    let rows = run_db(&state, move |db| db.list_tasks(&uid))
        .await
        .map_err(|e| ApiError::internal("Error fetching tasks", e))?;

    Ok(Json(rows.into_iter().map(TaskRow::into_task).collect()))
}

/// POST /api/saveTask: `{ description }` → 201 with the stored task.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let description = validate_description(req.description)?;

    let uid = user.id.to_string();
    let row = run_db(&state, move |db| db.insert_task(&uid, &description))
        .await
        .map_err(|e| ApiError::internal("Error saving task", e))?;

    info!("Task {} created by {}", row.id, user.id);
    Ok((StatusCode::CREATED, Json(row.into_task())))
}

/// PUT /api/updateTask: `{ id, completed }`.
///
/// Responds with the updated task, or `null` when the caller owns no task with
/// that id. A missing row and someone else's row look identical.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Option<Task>>, ApiError> {
    let Json(req) = body?;
    let (Some(id), Some(completed)) = (req.id, req.completed) else {
        return Err(ApiError::validation(
            "Task ID and completion status are required",
        ));
    };

    let uid = user.id.to_string();
    let row = run_db(&state, move |db| db.set_task_completed(id, &uid, completed))
        .await
        .map_err(|e| ApiError::internal("Error updating task", e))?;

    if row.is_none() {
        debug!("Update of task {} by {} matched nothing", id, user.id);
    }

    Ok(Json(row.map(TaskRow::into_task)))
}

/// DELETE /api/deleteTask: `{ id }`. Acknowledges whether or not anything
/// was removed.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<DeleteTaskRequest>, JsonRejection>,
) -> Result<Json<AckResponse>, ApiError> {
    let Json(req) = body?;
    let id = req.id.ok_or_else(|| ApiError::validation("Task ID is required"))?;

    let uid = user.id.to_string();
    let removed = run_db(&state, move |db| db.delete_task(id, &uid))
        .await
        .map_err(|e| ApiError::internal("Error deleting task", e))?;

    if removed > 0 {
        info!("Task {} deleted by {}", id, user.id);
    } else {
        debug!("Delete of task {} by {} matched nothing", id, user.id);
    }

    Ok(Json(AckResponse {
        message: "Task deleted".into(),
    }))
}

fn validate_description(description: Option<String>) -> Result<String, ApiError> {
    let description = description.unwrap_or_default();
    if description.trim().is_empty() {
        return Err(ApiError::validation("Task description is required"));
    }
    Ok(description)
}

/// Run a blocking store call off the async runtime.
async fn run_db<F, T>(state: &AppState, f: F) -> anyhow::Result<T>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_must_have_content() {
        assert!(validate_description(None).is_err());
        assert!(validate_description(Some(String::new())).is_err());
        assert!(validate_description(Some(" \t\n".into())).is_err());
    }

    #[test]
    fn description_is_kept_verbatim() {
        assert_eq!(validate_description(Some(" Buy milk".into())).unwrap(), " Buy milk");
    }

    #[test]
    fn long_descriptions_are_accepted() {
        let long = "é".repeat(5_000);
        assert_eq!(validate_description(Some(long.clone())).unwrap(), long);
    }
}
