//! discography CLI - runs the artists and albums HTTP service
//!
//! Configuration is layered: ~/.discography/config.toml, then environment
//! (`DATABASE_URL`, `DISCOGRAPHY_BIND`, `.env` via dotenvy), then flags.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use discography_server::AppConfig;

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "discography",
    author,
    version,
    about = "HTTP service for a catalog of artists and their albums"
)]
struct Cli {
    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.discography/config.toml)
    #[arg(long, global = true, env = "DISCOGRAPHY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init_tracing(&TracingConfig { debug: cli.debug }).ok();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args, config).await?,
    }

    Ok(())
}
