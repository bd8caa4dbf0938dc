use crate::auth::Principal;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/auth/me
pub async fn me(AuthUser(principal): AuthUser) -> ApiResult<Principal> {
    Ok(ApiResponse::success(principal))
}
