//! Musical collection: every artist with its albums
//!
//! One LEFT JOIN query (no N+1), grouped in process. Artists without albums
//! come back with an empty list.

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::{Album, Artist};
use crate::db::error::RepoError;

/// An artist and all of its albums
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistWithAlbums {
    #[serde(flatten)]
    pub artist: Artist,
    pub albums: Vec<Album>,
}

/// One joined row; album columns are NULL for artists without albums
#[derive(Debug, FromRow)]
struct CollectionRow {
    artist_id: i64,
    name: String,
    genre: String,
    album_id: Option<i64>,
    title: Option<String>,
    year: Option<i32>,
}

/// Collection repository
pub struct CollectionRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CollectionRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All artists ordered by name, each with albums ordered by title.
    pub async fn list(&self) -> Result<Vec<ArtistWithAlbums>, RepoError> {
        let rows = sqlx::query_as::<_, CollectionRow>(
            r#"
            SELECT
                ar.id AS artist_id,
                ar.name,
                ar.genre,
                al.id AS album_id,
                al.title,
                al.year
            FROM artists ar
            LEFT JOIN albums al ON al.artist_id = ar.id
            ORDER BY ar.name ASC, ar.id ASC, al.title ASC, al.id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(group_rows(rows))
    }
}

/// Fold rows sorted by artist into one entry per artist.
fn group_rows(rows: Vec<CollectionRow>) -> Vec<ArtistWithAlbums> {
    let mut collection: Vec<ArtistWithAlbums> = Vec::new();

    for row in rows {
        let album = match (row.album_id, row.title, row.year) {
            (Some(id), Some(title), Some(year)) => Some(Album {
                id,
                title,
                year,
                artist_id: row.artist_id,
            }),
            _ => None,
        };

        match collection.last_mut() {
            Some(entry) if entry.artist.id == row.artist_id => {
                entry.albums.extend(album);
            }
            _ => collection.push(ArtistWithAlbums {
                artist: Artist {
                    id: row.artist_id,
                    name: row.name,
                    genre: row.genre,
                },
                albums: album.into_iter().collect(),
            }),
        }
    }

    collection
}
