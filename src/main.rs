use clap::Parser;
use tracing_subscriber::EnvFilter;

use timesheet::cli::{self, Cli};
use timesheet::config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, PORT, etc. can live next to the binary
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("timesheet=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::config().clone();

    if let Err(e) = cli::run(cli, config).await {
        match std::env::var("TIMESHEET_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
