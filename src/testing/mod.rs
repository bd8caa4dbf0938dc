//! Fixtures shared by unit tests and the `tests/` integration suite.
//!
//! Every call opens a fresh in-memory database, so tests never share rows.

use sqlx::SqlitePool;

use crate::app::{self, AppState};
use crate::auth::{Passwords, Principal};
use crate::config::AppConfig;
use crate::database::models::Role;
use crate::database::DatabaseManager;

/// Empty schema on a private in-memory database
pub async fn test_database() -> DatabaseManager {
    let db = DatabaseManager::connect(&AppConfig::testing().database)
        .await
        .expect("open in-memory database");
    db.initialize().await.expect("initialize schema");
    db
}

/// Cheap argon2 parameters
pub fn test_passwords() -> Passwords {
    Passwords::from_config(&AppConfig::testing().security).expect("valid test hash params")
}

/// Full application state with the bootstrap admin seeded
pub async fn test_state() -> AppState {
    test_state_with(AppConfig::testing()).await
}

/// Same as [`test_state`] over a tweaked configuration
pub async fn test_state_with(config: AppConfig) -> AppState {
    app::build_state(config).await.expect("build test state")
}

/// Insert an account with a real password hash
pub async fn seed_user(pool: &SqlitePool, passwords: &Passwords, username: &str, password: &str, role: Role) -> Principal {
    let hash = passwords.hash(password).await.expect("hash password");
    insert_user(pool, username, &hash, role).await
}

/// Insert an account that can never log in. For tests that only need an identity.
pub async fn seed_principal(pool: &SqlitePool, username: &str, role: Role) -> Principal {
    insert_user(pool, username, "!", role).await
}

async fn insert_user(pool: &SqlitePool, username: &str, hash: &str, role: Role) -> Principal {
    let full_name = format!("{} (test)", username);
    let id = sqlx::query("INSERT INTO users (username, password, full_name, role) VALUES (?, ?, ?, ?)")
        .bind(username)
        .bind(hash)
        .bind(&full_name)
        .bind(role)
        .execute(pool)
        .await
        .expect("insert user")
        .last_insert_rowid();

    Principal {
        id,
        username: username.to_string(),
        full_name,
        role,
    }
}

pub async fn seed_task(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query("INSERT INTO tasks (task_name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await
        .expect("insert task")
        .last_insert_rowid()
}

/// `date` is `YYYY-MM-DD`
pub async fn seed_entry(pool: &SqlitePool, user_id: i64, task_id: i64, hours: f64, date: &str) -> i64 {
    sqlx::query("INSERT INTO timesheet_entries (user_id, task_id, hours_spent, entry_date) VALUES (?, ?, ?, ?)")
        .bind(user_id)
        .bind(task_id)
        .bind(hours)
        .bind(date)
        .execute(pool)
        .await
        .expect("insert entry")
        .last_insert_rowid()
}
