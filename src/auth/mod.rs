pub mod password;

use serde::{Deserialize, Serialize};

use crate::database::models::{Role, UserRecord};
use crate::error::ApiError;

pub use password::{PasswordError, Passwords};

/// The identity bound to a session. Also the public projection of a user
/// returned by login and `/api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<UserRecord> for Principal {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            role: user.role,
        }
    }
}

/// What a handler requires of the caller. `Admin` implies `Authenticated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Authenticated,
    Admin,
}

/// Single authorization step run before a protected handler.
///
/// No principal is always `NotAuthenticated`, even for admin routes, so the
/// authentication check happens first.
pub fn authorize(principal: Option<&Principal>, required: Capability) -> Result<&Principal, ApiError> {
    let principal = principal.ok_or_else(ApiError::not_authenticated)?;

    match required {
        Capability::Authenticated => Ok(principal),
        Capability::Admin if principal.is_admin() => Ok(principal),
        Capability::Admin => {
            tracing::warn!(
                "Admin capability denied for user '{}' (id {})",
                principal.username,
                principal.id
            );
            Err(ApiError::forbidden("Forbidden. Admin access required."))
        }
    }
}
