//! Command-line interface for strictly_bulls.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Bulls - Bulls and Cows game server and terminal client
#[derive(Parser, Debug)]
#[command(name = "strictly_bulls")]
#[command(about = "Guess the secret four-digit number", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./strictly_bulls.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Play in the terminal against a running server
    Play {
        /// Game server URL
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server_url: String,

        /// Player name; each player has their own game
        #[arg(long, default_value = "default")]
        player: String,

        /// Attempt limit: 10, 15, 20, or 0 for unlimited
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },

    /// Print the effective configuration and exit
    Config,
}
