use axum::extract::State;

use crate::app::AppState;
use crate::database::models::Task;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::TaskService;

/// GET /api/tasks - every task, newest first
pub async fn list(State(state): State<AppState>, _user: AuthUser) -> ApiResult<Vec<Task>> {
    let tasks = TaskService::new(state.db.pool()).list().await?;
    Ok(ApiResponse::success(tasks))
}
