//! Strictly Bulls - Unified CLI
//!
//! Bulls and Cows game server and terminal client.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use strictly_bulls::{RestGameClient, ServiceConfig, SessionController, play, server};
use strictly_bulls_cows::AttemptLimit;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ServiceConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Serve { port, host } => run_server(config.with_bind(host, port)).await,
        Command::Play {
            server_url,
            player,
            limit,
        } => run_play(config, server_url, player, limit).await,
        Command::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

/// Run the HTTP game server
#[instrument(skip_all)]
async fn run_server(config: ServiceConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,strictly_bulls=debug")),
        )
        .init();

    info!(
        addr = %config.bind_address(),
        default_limit = %config.default_attempt_limit(),
        "Starting Strictly Bulls server"
    );

    server::serve(SessionController::default(), &config).await
}

/// Run the terminal client
#[instrument(skip(config))]
async fn run_play(config: ServiceConfig, server_url: String, player: String, limit: u32) -> Result<()> {
    // Logs go to stderr so they don't interleave with the board on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let limit = AttemptLimit::try_from(limit)?;
    let client = RestGameClient::for_player(server_url, player);
    play::run(client, limit, config.heartbeat_interval()).await
}
