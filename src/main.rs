// Ledgerlens - CLI Entry Point

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ledgerlens::cli::Cli;
use ledgerlens::commands;
use ledgerlens::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ledgerlens=warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let state = AppState::initialize()?;
    commands::run(&state, cli).await?;
    Ok(())
}
