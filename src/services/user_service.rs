use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::auth::{Passwords, Principal};
use crate::database::models::{Role, UserRecord, UserSummary};
use crate::database::repository::USERS;
use crate::database::{Changeset, DatabaseError, Repository};
use crate::error::ApiError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
}

/// Partial account update. An unrecognized role is dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub role: Role,
    pub message: &'static str,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `username` is the only unique column on `users`
fn username_taken(err: impl Into<DatabaseError>) -> ApiError {
    match err.into() {
        DatabaseError::UniqueViolation(_) => ApiError::conflict("Username already exists"),
        other => other.into(),
    }
}

pub struct UserService<'a> {
    pool: &'a SqlitePool,
    passwords: &'a Passwords,
}

impl<'a> UserService<'a> {
    pub fn new(pool: &'a SqlitePool, passwords: &'a Passwords) -> Self {
        Self { pool, passwords }
    }

    fn repository(&self) -> Repository<'a, UserRecord> {
        Repository::new(USERS, self.pool)
    }

    /// Newest first, without password hashes
    pub async fn list(&self) -> Result<Vec<UserSummary>, ApiError> {
        let users = sqlx::query_as::<_, UserSummary>(
            "SELECT id, username, full_name, role, created_at FROM users ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(users)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, ApiError> {
        let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    pub async fn create(&self, input: NewUser) -> Result<CreatedUser, ApiError> {
        let (username, password, full_name, role) = match (
            present(input.username),
            present(input.password),
            present(input.full_name),
            present(input.role),
        ) {
            (Some(u), Some(p), Some(f), Some(r)) => (u, p, f, r),
            _ => return Err(ApiError::validation("All fields required")),
        };
        let role = role
            .parse::<Role>()
            .map_err(|_| ApiError::field("role", "Invalid role"))?;

        let hash = self.passwords.hash(&password).await?;
        let id = sqlx::query("INSERT INTO users (username, password, full_name, role) VALUES (?, ?, ?, ?)")
            .bind(&username)
            .bind(&hash)
            .bind(&full_name)
            .bind(role)
            .execute(self.pool)
            .await
            .map_err(username_taken)?
            .last_insert_rowid();

        info!("Created {} account '{}' (id {})", role, username, id);
        Ok(CreatedUser {
            id,
            username,
            full_name,
            role,
            message: "User created successfully",
        })
    }

    pub async fn update(&self, id: i64, patch: UserPatch) -> Result<(), ApiError> {
        let repo = self.repository();
        if !repo.exists(id).await? {
            return Err(ApiError::not_found("User not found"));
        }

        let role = patch.role.and_then(|r| r.parse::<Role>().ok());
        let password = match present(patch.password) {
            Some(p) => Some(self.passwords.hash(&p).await?),
            None => None,
        };

        let changes = Changeset::new()
            .set_opt("username", present(patch.username))
            .set_opt("full_name", present(patch.full_name))
            .set_opt("role", role.map(|r| r.as_str()))
            .set_opt("password", password);
        if changes.is_empty() {
            return Err(ApiError::validation("No fields to update"));
        }

        repo.update(id, &changes).await.map_err(username_taken)?;
        info!("Updated user {} ({})", id, changes.columns().join(", "));
        Ok(())
    }

    /// An admin cannot remove the account they are signed in with
    pub async fn delete(&self, caller: &Principal, id: i64) -> Result<(), ApiError> {
        if caller.id == id {
            warn!("User {} attempted to delete their own account", caller.id);
            return Err(ApiError::validation("Cannot delete your own account"));
        }
        if self.repository().delete(id).await? == 0 {
            return Err(ApiError::not_found("User not found"));
        }
        info!("User {} deleted user {}", caller.id, id);
        Ok(())
    }

    /// Create the bootstrap administrator unless that username already exists
    pub async fn ensure_admin(&self, username: &str, password: &str) -> Result<bool, ApiError> {
        if self.find_by_username(username).await?.is_some() {
            return Ok(false);
        }
        let hash = self.passwords.hash(password).await?;
        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO users (username, password, full_name, role) VALUES (?, ?, 'Administrator', 'admin')",
        )
        .bind(username)
        .bind(&hash)
        .execute(self.pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            info!("Created bootstrap admin account '{}'", username);
        }
        Ok(inserted > 0)
    }
}
