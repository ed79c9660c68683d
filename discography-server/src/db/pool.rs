//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection and acquire-timeout limits.
//! The pool is created once at startup and handed to `PgCatalog`; nothing
//! else holds connections.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default time to wait for a free connection before giving up.
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Create a PostgreSQL connection pool with default limits.
///
/// # Errors
///
/// Returns an error if the initial connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/discography").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(
        database_url,
        DEFAULT_MAX_CONNECTIONS,
        Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
    )
    .await
}

/// Create a PostgreSQL connection pool with custom options.
///
/// # Arguments
///
/// * `database_url` - PostgreSQL connection string
/// * `max_connections` - Maximum number of connections in the pool
/// * `acquire_timeout` - How long an operation waits for a connection
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await
}

/// Create a pool from the `[database]` config section.
pub async fn create_pool_from_config(
    database_url: &str,
    config: &DatabaseConfig,
) -> Result<PgPool, sqlx::Error> {
    tracing::info!(
        max_connections = config.max_connections,
        acquire_timeout_secs = config.acquire_timeout_secs,
        "Connecting to database"
    );
    create_pool_with_options(
        database_url,
        config.max_connections.max(1),
        Duration::from_secs(config.acquire_timeout_secs),
    )
    .await
}
