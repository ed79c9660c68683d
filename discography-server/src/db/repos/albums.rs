//! Album repository
//!
//! Albums carry the extra rules:
//! - titles are unique across all albums, ignoring case (pre-check, then the
//!   unique index as a safety net)
//! - `artist_id` must reference an existing artist (foreign key, remapped to
//!   `ArtistNotFound`)

use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::db::error::{violation, RepoError, Violation};
use crate::models::{AlbumPatch, NewAlbum};

/// Album record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub artist_id: i64,
}

/// Album repository
pub struct AlbumRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> AlbumRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all albums ordered by title.
    pub async fn list(&self) -> Result<Vec<Album>, RepoError> {
        let albums = sqlx::query_as::<_, Album>(
            "SELECT id, title, year, artist_id FROM albums ORDER BY title ASC, id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(albums)
    }

    /// List albums belonging to one artist. Empty when there are none.
    pub async fn list_by_artist(&self, artist_id: i64) -> Result<Vec<Album>, RepoError> {
        let albums = sqlx::query_as::<_, Album>(
            r#"
            SELECT id, title, year, artist_id
            FROM albums
            WHERE artist_id = $1
            ORDER BY title ASC, id ASC
            "#,
        )
        .bind(artist_id)
        .fetch_all(self.pool)
        .await?;

        Ok(albums)
    }

    /// Create an album.
    ///
    /// Checks run in order: title pre-check (`DuplicateTitle`, nothing is
    /// inserted), then the insert itself (`ArtistNotFound` on a foreign-key
    /// violation).
    pub async fn create(&self, new: NewAlbum) -> Result<Album, RepoError> {
        let mut tx = self.pool.begin().await?;

        if title_taken(&mut tx, new.title.as_str(), None).await? {
            return Err(RepoError::DuplicateTitle {
                title: new.title.into_string(),
            });
        }

        let album = sqlx::query_as::<_, Album>(
            r#"
            INSERT INTO albums (title, year, artist_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, year, artist_id
            "#,
        )
        .bind(new.title.as_str())
        .bind(new.year.get())
        .bind(new.artist_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| remap(e, new.title.as_str(), new.artist_id))?;

        tx.commit().await?;

        tracing::info!(
            album_id = album.id,
            artist_id = album.artist_id,
            title = %album.title,
            "Album created"
        );
        Ok(album)
    }

    /// Apply a partial update.
    ///
    /// Returns `Ok(None)` when no album has this id.
    pub async fn update(&self, id: i64, patch: AlbumPatch) -> Result<Option<Album>, RepoError> {
        if patch.is_empty() {
            return Err(RepoError::NoFieldsProvided);
        }

        let mut tx = self.pool.begin().await?;

        if let Some(title) = &patch.title {
            if title_taken(&mut tx, title.as_str(), Some(id)).await? {
                return Err(RepoError::DuplicateTitle {
                    title: title.as_str().to_owned(),
                });
            }
        }

        let title = patch.title.as_ref().map(|t| t.as_str());

        let album = sqlx::query_as::<_, Album>(
            r#"
            UPDATE albums
            SET title = COALESCE($2, title),
                year = COALESCE($3, year),
                artist_id = COALESCE($4, artist_id)
            WHERE id = $1
            RETURNING id, title, year, artist_id
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(patch.year.map(|y| y.get()))
        .bind(patch.artist_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| remap(e, title.unwrap_or_default(), patch.artist_id.unwrap_or_default()))?;

        tx.commit().await?;

        match &album {
            Some(a) => tracing::debug!(album_id = a.id, "Album updated"),
            None => tracing::debug!(album_id = id, "Album not found for update"),
        }
        Ok(album)
    }
}

/// Whether an album (other than `exclude`) already uses `title`.
async fn title_taken(
    conn: &mut PgConnection,
    title: &str,
    exclude: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let (taken,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM albums
            WHERE LOWER(title) = LOWER($1)
              AND ($2::BIGINT IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(title)
    .bind(exclude)
    .fetch_one(conn)
    .await?;

    Ok(taken)
}

/// Map a write failure to the album error it stands for.
fn remap(err: sqlx::Error, title: &str, artist_id: i64) -> RepoError {
    match violation(&err) {
        Some(Violation::ForeignKey) => RepoError::ArtistNotFound { artist_id },
        Some(Violation::Unique) => {
            tracing::warn!(title, "Duplicate album title caught by store constraint");
            RepoError::DuplicateTitle {
                title: title.to_owned(),
            }
        }
        None => RepoError::StoreUnavailable(err),
    }
}
