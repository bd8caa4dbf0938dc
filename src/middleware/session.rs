use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

use crate::app::AppState;
use crate::auth::Principal;
use crate::database::models::UserRecord;
use crate::database::repository::USERS;
use crate::database::Repository;
use crate::error::ApiError;
use crate::session::PRINCIPAL_KEY;

/// Who the session cookie resolved to for this request
#[derive(Debug, Clone, Default)]
pub struct CurrentSession {
    pub principal: Option<Principal>,
}

/// Resolve the session into a [`CurrentSession`] request extension.
///
/// Runs for every route. Missing, unknown and expired cookies all resolve to
/// an anonymous session; the guards decide what that means. The stored
/// principal is re-read from `users` so deletions and role changes apply to
/// sessions that are already open.
pub async fn session_middleware(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = match session.get::<Principal>(PRINCIPAL_KEY).await? {
        Some(stored) => refresh(&state, &session, stored).await?,
        None => None,
    };
    if let Some(principal) = &principal {
        tracing::debug!("Request from user '{}' (id {})", principal.username, principal.id);
    }

    request.extensions_mut().insert(CurrentSession { principal });
    Ok(next.run(request).await)
}

async fn refresh(state: &AppState, session: &Session, stored: Principal) -> Result<Option<Principal>, ApiError> {
    let user = Repository::<UserRecord>::new(USERS, state.db.pool())
        .select_one(stored.id)
        .await?;

    match user {
        None => {
            tracing::info!("Ending session of deleted user {}", stored.id);
            session.flush().await?;
            Ok(None)
        }
        Some(user) => {
            let current = Principal::from(user);
            if current != stored {
                session.insert(PRINCIPAL_KEY, &current).await?;
            }
            Ok(Some(current))
        }
    }
}
