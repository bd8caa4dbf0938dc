use axum::extract::State;
use serde_json::Value;

use crate::app::AppState;
use crate::middleware::{AdminUser, ApiJson, ApiPath, ApiResponse, ApiResult};
use crate::services::{CreatedTask, NewTask, TaskPatch, TaskService};

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiJson(input): ApiJson<NewTask>,
) -> ApiResult<CreatedTask> {
    let created = TaskService::new(state.db.pool()).create(input).await?;
    Ok(ApiResponse::created(created))
}

/// PUT /api/tasks/:id
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<TaskPatch>,
) -> ApiResult<Value> {
    TaskService::new(state.db.pool()).update(id, patch).await?;
    Ok(ApiResponse::message("Task updated successfully"))
}

/// DELETE /api/tasks/:id
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    TaskService::new(state.db.pool()).delete(id).await?;
    Ok(ApiResponse::message("Task deleted successfully"))
}
