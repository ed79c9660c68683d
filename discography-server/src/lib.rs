//! discography-server: HTTP service for artists and albums
//!
//! Validated repositories over PostgreSQL, exposed through a small
//! JSON API. The data layer sits behind the [`db::Catalog`] trait.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;

use std::sync::Arc;

pub use config::{AppConfig, DatabaseConfig, ServerConfig};
pub use error::{Error, Result};

/// Start the HTTP server: connect, bootstrap the schema, then serve.
pub async fn serve(config: AppConfig) -> Result<()> {
    let database_url = config.database_url()?;
    let pool = db::create_pool_from_config(database_url, &config.database).await?;

    db::schema::bootstrap(&pool).await?;

    let catalog = Arc::new(db::PgCatalog::new(pool));
    http::run_server(catalog, &config.server).await?;

    Ok(())
}
