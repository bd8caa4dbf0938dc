use axum::extract::State;
use serde_json::Value;
use tower_sessions::Session;

use crate::app::AppState;
use crate::auth::Principal;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, CurrentSession};
use crate::services::{AuthService, LoginRequest};
use crate::session::PRINCIPAL_KEY;

/// POST /api/auth/login - verify credentials, bind the principal to a fresh session
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Principal> {
    let principal = AuthService::new(state.db.pool(), &state.passwords)
        .login(request)
        .await?;

    session.cycle_id().await?;
    session.insert(PRINCIPAL_KEY, &principal).await?;
    tracing::info!("User '{}' (id {}) logged in", principal.username, principal.id);
    Ok(ApiResponse::success(principal))
}

/// POST /api/auth/logout - destroy the session; the cookie is expired on the way out
pub async fn logout(session: Session, current: CurrentSession) -> ApiResult<Value> {
    session.flush().await.map_err(|e| {
        tracing::error!("Logout failed: {}", e);
        ApiError::internal_server_error("Logout failed")
    })?;

    if let Some(principal) = current.principal {
        tracing::info!("User '{}' (id {}) logged out", principal.username, principal.id);
    }
    Ok(ApiResponse::message("Logged out successfully"))
}
