use axum::extract::State;
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::UserSummary;
use crate::middleware::{AdminUser, ApiJson, ApiPath, ApiResponse, ApiResult};
use crate::services::{CreatedUser, NewUser, UserPatch, UserService};

/// GET /api/users
pub async fn list(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Vec<UserSummary>> {
    let users = UserService::new(state.db.pool(), &state.passwords).list().await?;
    Ok(ApiResponse::success(users))
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiJson(input): ApiJson<NewUser>,
) -> ApiResult<CreatedUser> {
    let created = UserService::new(state.db.pool(), &state.passwords).create(input).await?;
    Ok(ApiResponse::created(created))
}

/// PUT /api/users/:id
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<UserPatch>,
) -> ApiResult<Value> {
    UserService::new(state.db.pool(), &state.passwords).update(id, patch).await?;
    Ok(ApiResponse::message("User updated successfully"))
}

/// DELETE /api/users/:id - never the caller's own account
pub async fn delete(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    UserService::new(state.db.pool(), &state.passwords).delete(&admin, id).await?;
    Ok(ApiResponse::message("User deleted successfully"))
}
