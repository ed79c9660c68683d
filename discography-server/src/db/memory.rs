//! In-memory catalog for tests
//!
//! Applies the same rules as the PostgreSQL repositories: case-insensitive
//! uniqueness, referential checks, partial updates and result ordering.
//! `set_unavailable(true)` makes every call fail as if the pool were gone.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::catalog::Catalog;
use super::error::RepoError;
use super::repos::{Album, Artist, ArtistWithAlbums};
use crate::models::{AlbumPatch, ArtistPatch, NewAlbum, NewArtist};

#[derive(Default)]
struct Tables {
    artists: Vec<Artist>,
    albums: Vec<Album>,
    next_artist_id: i64,
    next_album_id: i64,
}

impl Tables {
    fn name_taken(&self, name: &str, exclude: Option<i64>) -> bool {
        let name = name.to_lowercase();
        self.artists
            .iter()
            .any(|a| Some(a.id) != exclude && a.name.to_lowercase() == name)
    }

    fn title_taken(&self, title: &str, exclude: Option<i64>) -> bool {
        let title = title.to_lowercase();
        self.albums
            .iter()
            .any(|a| Some(a.id) != exclude && a.title.to_lowercase() == title)
    }

    fn artist_exists(&self, id: i64) -> bool {
        self.artists.iter().any(|a| a.id == id)
    }
}

/// Mock catalog for testing
#[derive(Default)]
pub struct MemoryCatalog {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a store outage (or recovery).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), RepoError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepoError::StoreUnavailable(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn by_name(a: &Artist, b: &Artist) -> std::cmp::Ordering {
    a.name.cmp(&b.name).then(a.id.cmp(&b.id))
}

fn by_title(a: &Album, b: &Album) -> std::cmp::Ordering {
    a.title.cmp(&b.title).then(a.id.cmp(&b.id))
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn ping(&self) -> Result<(), RepoError> {
        self.check_available()
    }

    async fn list_artists(&self) -> Result<Vec<Artist>, RepoError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        let mut artists = tables.artists.clone();
        artists.sort_by(by_name);
        Ok(artists)
    }

    async fn find_artist_by_name(&self, name: &str) -> Result<Option<Artist>, RepoError> {
        self.check_available()?;
        let name = name.to_lowercase();
        let tables = self.tables.lock().await;
        Ok(tables
            .artists
            .iter()
            .find(|a| a.name.to_lowercase() == name)
            .cloned())
    }

    async fn create_artist(&self, new: NewArtist) -> Result<Artist, RepoError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;

        if tables.name_taken(new.name.as_str(), None) {
            return Err(RepoError::DuplicateName {
                name: new.name.into_string(),
            });
        }

        tables.next_artist_id += 1;
        let artist = Artist {
            id: tables.next_artist_id,
            name: new.name.into_string(),
            genre: new.genre.into_string(),
        };
        tables.artists.push(artist.clone());
        Ok(artist)
    }

    async fn update_artist(
        &self,
        id: i64,
        patch: ArtistPatch,
    ) -> Result<Option<Artist>, RepoError> {
        if patch.is_empty() {
            return Err(RepoError::NoFieldsProvided);
        }
        self.check_available()?;
        let mut tables = self.tables.lock().await;

        if let Some(name) = &patch.name {
            if tables.name_taken(name.as_str(), Some(id)) {
                return Err(RepoError::DuplicateName {
                    name: name.as_str().to_owned(),
                });
            }
        }

        let Some(artist) = tables.artists.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            artist.name = name.into_string();
        }
        if let Some(genre) = patch.genre {
            artist.genre = genre.into_string();
        }
        Ok(Some(artist.clone()))
    }

    async fn list_albums(&self) -> Result<Vec<Album>, RepoError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        let mut albums = tables.albums.clone();
        albums.sort_by(by_title);
        Ok(albums)
    }

    async fn list_albums_by_artist(&self, artist_id: i64) -> Result<Vec<Album>, RepoError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        let mut albums: Vec<Album> = tables
            .albums
            .iter()
            .filter(|a| a.artist_id == artist_id)
            .cloned()
            .collect();
        albums.sort_by(by_title);
        Ok(albums)
    }

    async fn create_album(&self, new: NewAlbum) -> Result<Album, RepoError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;

        if tables.title_taken(new.title.as_str(), None) {
            return Err(RepoError::DuplicateTitle {
                title: new.title.into_string(),
            });
        }
        if !tables.artist_exists(new.artist_id) {
            return Err(RepoError::ArtistNotFound {
                artist_id: new.artist_id,
            });
        }

        tables.next_album_id += 1;
        let album = Album {
            id: tables.next_album_id,
            title: new.title.into_string(),
            year: new.year.get(),
            artist_id: new.artist_id,
        };
        tables.albums.push(album.clone());
        Ok(album)
    }

    async fn update_album(&self, id: i64, patch: AlbumPatch) -> Result<Option<Album>, RepoError> {
        if patch.is_empty() {
            return Err(RepoError::NoFieldsProvided);
        }
        self.check_available()?;
        let mut tables = self.tables.lock().await;

        if let Some(title) = &patch.title {
            if tables.title_taken(title.as_str(), Some(id)) {
                return Err(RepoError::DuplicateTitle {
                    title: title.as_str().to_owned(),
                });
            }
        }

        // Unknown album wins over unknown artist: the store only checks the
        // foreign key on rows it actually updates.
        if !tables.albums.iter().any(|a| a.id == id) {
            return Ok(None);
        }
        if let Some(artist_id) = patch.artist_id {
            if !tables.artist_exists(artist_id) {
                return Err(RepoError::ArtistNotFound { artist_id });
            }
        }

        let Some(album) = tables.albums.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            album.title = title.into_string();
        }
        if let Some(year) = patch.year {
            album.year = year.get();
        }
        if let Some(artist_id) = patch.artist_id {
            album.artist_id = artist_id;
        }
        Ok(Some(album.clone()))
    }

    async fn musical_collection(&self) -> Result<Vec<ArtistWithAlbums>, RepoError> {
        self.check_available()?;
        let tables = self.tables.lock().await;

        let mut artists = tables.artists.clone();
        artists.sort_by(by_name);

        Ok(artists
            .into_iter()
            .map(|artist| {
                let mut albums: Vec<Album> = tables
                    .albums
                    .iter()
                    .filter(|a| a.artist_id == artist.id)
                    .cloned()
                    .collect();
                albums.sort_by(by_title);
                ArtistWithAlbums { artist, albums }
            })
            .collect())
    }
}
