use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::auth::{Passwords, Principal};
use crate::error::ApiError;
use crate::services::user_service::UserService;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    passwords: &'a Passwords,
}

impl<'a> AuthService<'a> {
    pub fn new(pool: &'a SqlitePool, passwords: &'a Passwords) -> Self {
        Self { pool, passwords }
    }

    /// Check credentials and return the principal to bind to the session.
    ///
    /// Unknown usernames and wrong passwords fail identically, and both pay
    /// for one password verification.
    pub async fn login(&self, request: LoginRequest) -> Result<Principal, ApiError> {
        let (username, password) = match (request.username, request.password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
            _ => return Err(ApiError::validation("Username and password required")),
        };

        let user = UserService::new(self.pool, self.passwords)
            .find_by_username(&username)
            .await?;
        let verified = match &user {
            Some(user) => self.passwords.verify(&password, &user.password).await?,
            None => self.passwords.verify_absent(&password).await?,
        };

        match user {
            Some(user) if verified => Ok(Principal::from(user)),
            _ => {
                warn!("Failed login for username '{}'", username);
                Err(ApiError::InvalidCredentials)
            }
        }
    }
}
