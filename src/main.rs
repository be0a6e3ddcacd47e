//! Quantum Gomoku - terminal client
//!
//! Plays quantum gomoku against an authoritative game service.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use quantum_gomoku::{ClientConfig, DEFAULT_LOG_FILTER};
use std::path::Path;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { server_url, config } => run_play(server_url, &config).await,
        Command::CheckConfig { config } => {
            initialize_console_tracing();
            check_config(&config)
        }
    }
}

/// Run the terminal client
async fn run_play(server_url: Option<String>, config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load_or_default(config_path)?;
    if let Some(url) = server_url {
        config = config.with_server_url(url);
    }
    quantum_gomoku::tui::run_tui(config).await
}

/// Validate a config file and print what the client would use
#[instrument(skip_all, fields(config_path = %config_path.display()))]
fn check_config(config_path: &Path) -> Result<()> {
    let config = ClientConfig::from_file(config_path)?;
    info!("Config is valid");
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn initialize_console_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
