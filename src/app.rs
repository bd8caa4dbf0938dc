use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::Passwords;
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::handlers::{elevated, protected, public};
use crate::services::UserService;
use crate::session::{self, SessionBackend};

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseManager,
    pub sessions: SessionBackend,
    pub passwords: Passwords,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn new(db: DatabaseManager, config: AppConfig) -> anyhow::Result<Self> {
        let passwords = Passwords::from_config(&config.security)?;
        let sessions = session::build_store(config.session.store, db.pool()).await?;
        Ok(Self {
            db,
            sessions,
            passwords,
            config: Arc::new(config),
        })
    }
}

/// Connect, create the schema, seed the bootstrap admin
pub async fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let db = DatabaseManager::connect(&config.database).await?;
    db.initialize().await?;

    let state = AppState::new(db, config).await?;
    let security = &state.config.security;
    UserService::new(state.db.pool(), &state.passwords)
        .ensure_admin(&security.admin_username, &security.admin_password)
        .await?;
    Ok(state)
}

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(auth_routes())
        .merge(task_routes())
        .merge(timesheet_routes())
        .merge(user_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::session_middleware,
        ))
        .layer(session::layer(state.sessions.clone(), &state.config.session))
        .layer(TraceLayer::new_for_http());

    if state.config.security.enable_cors {
        app = app.layer(cors_layer(&state.config));
    }

    app.with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(public::auth::login))
        .route("/api/auth/logout", post(public::auth::logout))
        .route("/api/auth/me", get(protected::auth::me))
}

fn task_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/tasks",
            get(protected::tasks::list).post(elevated::tasks::create),
        )
        .route(
            "/api/tasks/:id",
            put(elevated::tasks::update).delete(elevated::tasks::delete),
        )
}

fn timesheet_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/timesheet",
            get(protected::timesheet::list).post(protected::timesheet::create),
        )
        .route("/api/timesheet/analytics", get(protected::analytics::report))
        .route(
            "/api/timesheet/:id",
            put(protected::timesheet::update).delete(protected::timesheet::delete),
        )
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/users",
            get(elevated::users::list).post(elevated::users::create),
        )
        .route(
            "/api/users/:id",
            put(elevated::users::update).delete(elevated::users::delete),
        )
}

/// Credentialed CORS for the configured origins. Unparsable origins are skipped.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    info!("CORS enabled for {} origin(s)", origins.len());

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
