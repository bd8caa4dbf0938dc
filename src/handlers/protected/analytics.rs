use axum::extract::State;

use crate::app::AppState;
use crate::middleware::{ApiQuery, ApiResponse, ApiResult, AuthUser};
use crate::services::{AnalyticsReport, AnalyticsService, Scope, ScopeQuery};

/// GET /api/timesheet/analytics?startDate&endDate&userId
///
/// `hoursByUser` is only populated for admins.
pub async fn report(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiQuery(query): ApiQuery<ScopeQuery>,
) -> ApiResult<AnalyticsReport> {
    let scope = Scope::resolve(&principal, &query)?;
    let report = AnalyticsService::new(state.db.pool()).report(&principal, &scope).await?;
    Ok(ApiResponse::success(report))
}
