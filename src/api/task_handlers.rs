//! Task API handlers (JSON, bearer protected)

use crate::auth::Claims;
use crate::error::AppError;
use crate::tasks::Task;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

/// List all tasks
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "Tasks",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All tasks in creation order", body = [crate::api::models::TaskSchema]),
        (status = 401, description = "Missing bearer token"),
        (status = 403, description = "Invalid bearer token")
    )
)]
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    Json(state.tasks.list())
}

/// Create a task from an arbitrary JSON object
#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "Tasks",
    security(("bearer" = [])),
    request_body = crate::api::models::TaskSchema,
    responses(
        (status = 201, description = "Task created", body = crate::api::models::TaskSchema),
        (status = 401, description = "Missing bearer token"),
        (status = 403, description = "Invalid bearer token")
    )
)]
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(fields): Json<Map<String, Value>>,
) -> (StatusCode, Json<Task>) {
    let task = state.tasks.create(fields);
    info!(id = task.id, user = %claims.sub, "Received task creation request");
    (StatusCode::CREATED, Json(task))
}

/// Merge fields into an existing task
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    security(("bearer" = [])),
    params(("id" = u64, Path, description = "Task id")),
    request_body = crate::api::models::TaskSchema,
    responses(
        (status = 200, description = "Task updated", body = crate::api::models::TaskSchema),
        (status = 404, description = "Task not found")
    )
)]
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Task>, AppError> {
    Ok(Json(state.tasks.update(id, fields)?))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    security(("bearer" = [])),
    params(("id" = u64, Path, description = "Task id")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    state.tasks.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}
