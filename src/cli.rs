//! Command-line interface for quantum_gomoku.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quantum Gomoku - terminal client for the quantum gomoku service
#[derive(Parser, Debug)]
#[command(name = "quantum_gomoku")]
#[command(about = "Play quantum gomoku against an authoritative game service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the terminal UI client
    Play {
        /// Game service URL, overrides the config file
        #[arg(long)]
        server_url: Option<String>,

        /// Path to the client config file (defaults are used if it is missing)
        #[arg(short, long, default_value = "quantum_gomoku.toml")]
        config: PathBuf,
    },

    /// Validate a config file and print the effective settings
    CheckConfig {
        /// Path to the client config file
        #[arg(short, long, default_value = "quantum_gomoku.toml")]
        config: PathBuf,
    },
}
