//! Binary crate for the `weather` terminal app.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - The full-screen terminal UI

use clap::Parser;
use std::path::PathBuf;
use weather_core::Config;

mod app;
mod cli;
mod search;
mod theme;
mod toast;
mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}

/// Logs go to a file; the terminal belongs to the UI.
pub(crate) fn init_logging() -> anyhow::Result<PathBuf> {
    let dirs = Config::project_dirs()?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    let log_path = data_dir.join("weather.log");
    let log_file = std::fs::OpenOptions::new().create(true).append(true).open(&log_path)?;

    let log_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,hyper_util=warn,reqwest=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    Ok(log_path)
}
