//! Schema bootstrap for the artists and albums tables
//!
//! Idempotent: every statement is `IF NOT EXISTS`, so it runs on each start.
//! The expression indexes on `LOWER(...)` back the case-insensitive
//! uniqueness rules for concurrent writers that slip past the pre-checks.

use sqlx::PgPool;

/// Unique index enforcing case-insensitive artist names
pub const ARTIST_NAME_INDEX: &str = "artists_name_lower_key";

/// Unique index enforcing case-insensitive album titles
pub const ALBUM_TITLE_INDEX: &str = "albums_title_lower_key";

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS artists (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL CHECK (btrim(name) <> ''),
        genre TEXT NOT NULL CHECK (btrim(genre) <> '')
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS artists_name_lower_key ON artists (LOWER(name))",
    r#"
    CREATE TABLE IF NOT EXISTS albums (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL CHECK (btrim(title) <> ''),
        year INTEGER NOT NULL,
        artist_id BIGINT NOT NULL REFERENCES artists (id)
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS albums_title_lower_key ON albums (LOWER(title))",
    "CREATE INDEX IF NOT EXISTS albums_artist_id_idx ON albums (artist_id)",
];

/// Create tables and indexes if they don't exist yet.
pub async fn bootstrap(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Bootstrapping schema...");

    let mut tx = pool.begin().await?;
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!("Schema ready");
    Ok(())
}
