use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStoreKind {
    Memory,
    Database,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub ttl_hours: u64,
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub store: SessionStoreKind,
    pub purge_interval_secs: u64,
}

impl SessionConfig {
    pub fn ttl(&self) -> tower_sessions::cookie::time::Duration {
        tower_sessions::cookie::time::Duration::hours(self.ttl_hours as i64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub admin_username: String,
    pub admin_password: String,
    /// Argon2 memory cost in KiB
    pub hash_memory_kib: u32,
    pub hash_iterations: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Session overrides
        if let Ok(v) = env::var("SESSION_TTL_HOURS") {
            self.session.ttl_hours = v.parse().unwrap_or(self.session.ttl_hours);
        }
        if let Ok(v) = env::var("SESSION_COOKIE_NAME") {
            self.session.cookie_name = v;
        }
        if let Ok(v) = env::var("SESSION_COOKIE_SECURE") {
            self.session.cookie_secure = v.parse().unwrap_or(self.session.cookie_secure);
        }
        if let Ok(v) = env::var("SESSION_STORE") {
            self.session.store = match v.as_str() {
                "memory" => SessionStoreKind::Memory,
                "database" | "db" => SessionStoreKind::Database,
                _ => self.session.store,
            };
        }
        if let Ok(v) = env::var("SESSION_PURGE_INTERVAL_SECS") {
            self.session.purge_interval_secs = v.parse().unwrap_or(self.session.purge_interval_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("ADMIN_USERNAME") {
            self.security.admin_username = v;
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD") {
            self.security.admin_password = v;
        }
        if let Ok(v) = env::var("SECURITY_HASH_MEMORY_KIB") {
            self.security.hash_memory_kib = v.parse().unwrap_or(self.security.hash_memory_kib);
        }
        if let Ok(v) = env::var("SECURITY_HASH_ITERATIONS") {
            self.security.hash_iterations = v.parse().unwrap_or(self.security.hash_iterations);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "sqlite://timesheet.db".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            session: SessionConfig {
                ttl_hours: 24,
                cookie_name: "timesheet.sid".to_string(),
                cookie_secure: false,
                store: SessionStoreKind::Memory,
                purge_interval_secs: 300,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                admin_username: "admin".to_string(),
                admin_password: "admin123".to_string(),
                hash_memory_kib: 19 * 1024,
                hash_iterations: 2,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "sqlite://timesheet.db".to_string(),
                max_connections: 10,
                connection_timeout: 10,
            },
            session: SessionConfig {
                ttl_hours: 24,
                cookie_name: "timesheet.sid".to_string(),
                cookie_secure: true,
                store: SessionStoreKind::Database,
                purge_interval_secs: 300,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                admin_username: "admin".to_string(),
                admin_password: "admin123".to_string(),
                hash_memory_kib: 19 * 1024,
                hash_iterations: 2,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "sqlite://timesheet.db".to_string(),
                max_connections: 20,
                connection_timeout: 5,
            },
            session: SessionConfig {
                ttl_hours: 24,
                cookie_name: "timesheet.sid".to_string(),
                cookie_secure: true,
                store: SessionStoreKind::Database,
                purge_interval_secs: 900,
            },
            security: SecurityConfig {
                enable_cors: false,
                cors_origins: vec![],
                admin_username: "admin".to_string(),
                admin_password: "admin123".to_string(),
                hash_memory_kib: 19 * 1024,
                hash_iterations: 2,
            },
        }
    }

    /// In-memory store, memory sessions and a cheap password hash.
    pub fn testing() -> Self {
        let mut config = Self::development();
        config.database.url = "sqlite::memory:".to_string();
        config.database.max_connections = 1;
        config.security.enable_cors = false;
        config.security.hash_memory_kib = 1024;
        config.security.hash_iterations = 1;
        config
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
