//! Cookie sessions on top of `tower-sessions`.
//!
//! Development and tests keep sessions in process; deployed instances share
//! them through the `tower_sessions` table in the application database.

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_sessions::cookie::SameSite;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, ExpiredDeletion, SessionStore};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::{SessionConfig, SessionStoreKind};

/// Session key holding the signed-in [`crate::auth::Principal`]
pub const PRINCIPAL_KEY: &str = "principal";

/// The configured session store
#[derive(Debug, Clone)]
pub enum SessionBackend {
    Memory(MemoryStore),
    Database(SqliteStore),
}

impl SessionBackend {
    pub fn kind(&self) -> SessionStoreKind {
        match self {
            SessionBackend::Memory(_) => SessionStoreKind::Memory,
            SessionBackend::Database(_) => SessionStoreKind::Database,
        }
    }
}

#[async_trait]
impl SessionStore for SessionBackend {
    async fn save(&self, record: &Record) -> session_store::Result<()> {
        match self {
            SessionBackend::Memory(store) => store.save(record).await,
            SessionBackend::Database(store) => store.save(record).await,
        }
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        match self {
            SessionBackend::Memory(store) => store.load(session_id).await,
            SessionBackend::Database(store) => store.load(session_id).await,
        }
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        match self {
            SessionBackend::Memory(store) => store.delete(session_id).await,
            SessionBackend::Database(store) => store.delete(session_id).await,
        }
    }
}

/// Open the store. The database variant creates its table on first use.
pub async fn build_store(kind: SessionStoreKind, pool: &SqlitePool) -> Result<SessionBackend, sqlx::Error> {
    match kind {
        SessionStoreKind::Memory => Ok(SessionBackend::Memory(MemoryStore::default())),
        SessionStoreKind::Database => {
            let store = SqliteStore::new(pool.clone());
            store.migrate().await?;
            Ok(SessionBackend::Database(store))
        }
    }
}

/// HttpOnly, SameSite=Lax cookie that expires after `ttl_hours` without a request
pub fn layer(backend: SessionBackend, config: &SessionConfig) -> SessionManagerLayer<SessionBackend> {
    SessionManagerLayer::new(backend)
        .with_name(config.cookie_name.clone())
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(config.cookie_secure)
        .with_expiry(Expiry::OnInactivity(config.ttl()))
}

/// Delete expired rows for the lifetime of the process. The memory store
/// drops expired records on load, so it gets no task.
pub fn spawn_deletion_task(backend: &SessionBackend, every: Duration) -> Option<JoinHandle<()>> {
    match backend {
        SessionBackend::Memory(_) => None,
        SessionBackend::Database(store) => {
            let store = store.clone();
            Some(tokio::spawn(async move {
                if let Err(e) = store.continuously_delete_expired(every).await {
                    tracing::error!("Expired session cleanup stopped: {}", e);
                }
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[tokio::test]
    async fn memory_backend_needs_no_table() {
        let db = testing::test_database().await;
        let backend = build_store(SessionStoreKind::Memory, db.pool()).await.unwrap();

        assert_eq!(backend.kind(), SessionStoreKind::Memory);
        assert!(spawn_deletion_task(&backend, Duration::from_secs(60)).is_none());
    }

    #[tokio::test]
    async fn database_backend_migrates_its_table() {
        let db = testing::test_database().await;
        let backend = build_store(SessionStoreKind::Database, db.pool()).await.unwrap();
        assert_eq!(backend.kind(), SessionStoreKind::Database);

        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'tower_sessions'")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(count, 1);

        // Migrating twice is harmless
        build_store(SessionStoreKind::Database, db.pool()).await.unwrap();

        let task = spawn_deletion_task(&backend, Duration::from_secs(60)).unwrap();
        task.abort();
    }
}
