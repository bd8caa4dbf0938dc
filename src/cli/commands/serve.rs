use clap::Args;
use std::time::Duration;
use tracing::info;

use crate::app;
use crate::config::AppConfig;
use crate::session;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Bind address (overrides HOST)")]
    pub host: Option<String>,

    #[arg(long, help = "Listen port (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "SQLite URL (overrides DATABASE_URL)")]
    pub database_url: Option<String>,
}

impl ServeArgs {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = self.database_url {
            config.database.url = url;
        }
        config
    }
}

pub async fn handle(args: ServeArgs, config: AppConfig) -> anyhow::Result<()> {
    let config = args.apply(config);
    info!("Starting Timesheet API in {:?} mode", config.environment);

    let state = app::build_state(config).await?;
    let cleanup = session::spawn_deletion_task(
        &state.sessions,
        Duration::from_secs(state.config.session.purge_interval_secs.max(1)),
    );

    let bind_addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;
    info!("Timesheet API listening on http://{}", bind_addr);

    let db = state.db.clone();
    axum::serve(listener, app::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(cleanup) = cleanup {
        cleanup.abort();
    }
    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
