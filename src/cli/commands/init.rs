use clap::Args;
use serde_json::json;

use crate::app;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    #[arg(long, help = "SQLite URL (overrides DATABASE_URL)")]
    pub database_url: Option<String>,
}

pub async fn handle(args: InitArgs, mut config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    let url = config.database.url.clone();
    let admin = config.security.admin_username.clone();

    let state = app::build_state(config).await?;
    state.db.close().await;

    output_success(
        output_format,
        &format!("Initialized database at {}", url),
        Some(json!({ "database": url, "admin": admin })),
    )
}
