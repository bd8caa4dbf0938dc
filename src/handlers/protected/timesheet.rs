use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::EntryDetails;
use crate::middleware::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult, AuthUser};
use crate::services::{EntryPatch, NewEntry, Scope, ScopeQuery, TimesheetService};

/// GET /api/timesheet?startDate&endDate&userId
pub async fn list(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiQuery(query): ApiQuery<ScopeQuery>,
) -> ApiResult<Vec<EntryDetails>> {
    let scope = Scope::resolve(&principal, &query)?;
    let entries = TimesheetService::new(state.db.pool()).list(&scope).await?;
    Ok(ApiResponse::success(entries))
}

/// POST /api/timesheet - log hours for the signed-in user
pub async fn create(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiJson(input): ApiJson<NewEntry>,
) -> ApiResult<Value> {
    let id = TimesheetService::new(state.db.pool()).create(&principal, input).await?;
    Ok(ApiResponse::created(json!({
        "id": id,
        "message": "Timesheet entry created successfully"
    })))
}

/// PUT /api/timesheet/:id - owner or admin
pub async fn update(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<EntryPatch>,
) -> ApiResult<Value> {
    TimesheetService::new(state.db.pool()).update(&principal, id, patch).await?;
    Ok(ApiResponse::message("Entry updated successfully"))
}

/// DELETE /api/timesheet/:id - owner or admin
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    TimesheetService::new(state.db.pool()).delete(&principal, id).await?;
    Ok(ApiResponse::message("Entry deleted successfully"))
}
