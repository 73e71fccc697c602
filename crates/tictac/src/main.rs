//! tictac - terminal tic-tac-toe with an optional random computer opponent.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::GameConfig;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let source = GameConfig::source(cli.config.as_deref());
    let config = GameConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(&cli);

    // the log path comes from the config, so nothing can be logged before this
    init_tracing(config.log_file())?;
    info!(?source, ?config, "Configuration loaded");
    info!(
        opponent = ?config.opponent(),
        delay_ms = config.think_delay_ms(),
        seed = ?config.seed(),
        "Starting tictac"
    );

    tui::run(&config).await
}

/// Logs to a file so output does not interfere with the TUI.
fn init_tracing(path: &Path) -> Result<()> {
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
