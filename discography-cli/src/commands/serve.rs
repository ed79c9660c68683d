//! HTTP server command
//!
//! Flags override the values loaded from config file and environment.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use discography_server::AppConfig;

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3030)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

impl ServeArgs {
    /// Fold flag values into `config`.
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(bind) = self.bind {
            config.server.bind_addr = bind;
        }
        if let Some(url) = self.database_url.filter(|u| !u.trim().is_empty()) {
            config.database.url = Some(url);
        }
        if let Some(max) = self.max_connections {
            config.database.max_connections = max;
        }
        if self.cors_permissive {
            config.server.cors_permissive = true;
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, mut config: AppConfig) -> Result<()> {
    args.apply(&mut config);

    tracing::info!("Starting discography server on {}", config.server.bind_addr);

    // Blocks until shutdown
    discography_server::serve(config)
        .await
        .context("Server error")?;

    Ok(())
}
