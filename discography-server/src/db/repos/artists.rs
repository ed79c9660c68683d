//! Artist repository
//!
//! - list / find: single query, no transaction
//! - create / update: case-insensitive name pre-check and write in one
//!   transaction; unique violations from the store map to `DuplicateName`

use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::db::error::{violation, RepoError, Violation};
use crate::models::{ArtistPatch, NewArtist};

/// Artist record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub genre: String,
}

/// Artist repository
pub struct ArtistRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ArtistRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all artists ordered by name.
    pub async fn list(&self) -> Result<Vec<Artist>, RepoError> {
        let artists = sqlx::query_as::<_, Artist>(
            "SELECT id, name, genre FROM artists ORDER BY name ASC, id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(artists)
    }

    /// Find an artist by name, ignoring case.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Artist>, RepoError> {
        let artist = sqlx::query_as::<_, Artist>(
            r#"
            SELECT id, name, genre
            FROM artists
            WHERE LOWER(name) = LOWER($1)
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(artist)
    }

    /// Create an artist.
    ///
    /// Fails with `DuplicateName` if another artist already has this name
    /// under case-insensitive comparison.
    pub async fn create(&self, new: NewArtist) -> Result<Artist, RepoError> {
        let mut tx = self.pool.begin().await?;

        if name_taken(&mut tx, new.name.as_str(), None).await? {
            return Err(RepoError::DuplicateName {
                name: new.name.into_string(),
            });
        }

        let artist = sqlx::query_as::<_, Artist>(
            r#"
            INSERT INTO artists (name, genre)
            VALUES ($1, $2)
            RETURNING id, name, genre
            "#,
        )
        .bind(new.name.as_str())
        .bind(new.genre.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| remap(e, new.name.as_str()))?;

        tx.commit().await?;

        tracing::info!(artist_id = artist.id, name = %artist.name, "Artist created");
        Ok(artist)
    }

    /// Apply a partial update.
    ///
    /// Returns `Ok(None)` when no artist has this id.
    pub async fn update(&self, id: i64, patch: ArtistPatch) -> Result<Option<Artist>, RepoError> {
        if patch.is_empty() {
            return Err(RepoError::NoFieldsProvided);
        }

        let mut tx = self.pool.begin().await?;

        if let Some(name) = &patch.name {
            if name_taken(&mut tx, name.as_str(), Some(id)).await? {
                return Err(RepoError::DuplicateName {
                    name: name.as_str().to_owned(),
                });
            }
        }

        let name = patch.name.as_ref().map(|n| n.as_str());
        let genre = patch.genre.as_ref().map(|g| g.as_str());

        let artist = sqlx::query_as::<_, Artist>(
            r#"
            UPDATE artists
            SET name = COALESCE($2, name),
                genre = COALESCE($3, genre)
            WHERE id = $1
            RETURNING id, name, genre
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(genre)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| remap(e, name.unwrap_or_default()))?;

        tx.commit().await?;

        match &artist {
            Some(a) => tracing::debug!(artist_id = a.id, "Artist updated"),
            None => tracing::debug!(artist_id = id, "Artist not found for update"),
        }
        Ok(artist)
    }
}

/// Whether another artist (other than `exclude`) already uses `name`.
async fn name_taken(
    conn: &mut PgConnection,
    name: &str,
    exclude: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let (taken,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM artists
            WHERE LOWER(name) = LOWER($1)
              AND ($2::BIGINT IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(name)
    .bind(exclude)
    .fetch_one(conn)
    .await?;

    Ok(taken)
}

/// Map a write failure: the only unique index on `artists` is the name.
fn remap(err: sqlx::Error, name: &str) -> RepoError {
    match violation(&err) {
        Some(Violation::Unique) => {
            tracing::warn!(name, "Duplicate artist name caught by store constraint");
            RepoError::DuplicateName {
                name: name.to_owned(),
            }
        }
        _ => RepoError::StoreUnavailable(err),
    }
}
