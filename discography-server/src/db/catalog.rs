//! Catalog trait: the operations the HTTP layer may call
//!
//! Provides a trait over the artist/album store, with:
//! - `PgCatalog`, backed by the PostgreSQL repositories
//! - `MemoryCatalog` (see `db::memory`) for tests

use async_trait::async_trait;
use sqlx::PgPool;

use super::error::RepoError;
use super::repos::{
    Album, AlbumRepo, Artist, ArtistRepo, ArtistWithAlbums, CollectionRepo,
};
use crate::models::{AlbumPatch, ArtistPatch, NewAlbum, NewArtist};

/// Artist and album operations (testable)
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Check that the store answers.
    async fn ping(&self) -> Result<(), RepoError>;

    async fn list_artists(&self) -> Result<Vec<Artist>, RepoError>;

    async fn find_artist_by_name(&self, name: &str) -> Result<Option<Artist>, RepoError>;

    async fn create_artist(&self, new: NewArtist) -> Result<Artist, RepoError>;

    async fn update_artist(&self, id: i64, patch: ArtistPatch)
        -> Result<Option<Artist>, RepoError>;

    async fn list_albums(&self) -> Result<Vec<Album>, RepoError>;

    async fn list_albums_by_artist(&self, artist_id: i64) -> Result<Vec<Album>, RepoError>;

    async fn create_album(&self, new: NewAlbum) -> Result<Album, RepoError>;

    async fn update_album(&self, id: i64, patch: AlbumPatch) -> Result<Option<Album>, RepoError>;

    async fn musical_collection(&self) -> Result<Vec<ArtistWithAlbums>, RepoError>;
}

/// Catalog backed by PostgreSQL
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn ping(&self) -> Result<(), RepoError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_artists(&self) -> Result<Vec<Artist>, RepoError> {
        ArtistRepo::new(&self.pool).list().await
    }

    async fn find_artist_by_name(&self, name: &str) -> Result<Option<Artist>, RepoError> {
        ArtistRepo::new(&self.pool).find_by_name(name).await
    }

    async fn create_artist(&self, new: NewArtist) -> Result<Artist, RepoError> {
        ArtistRepo::new(&self.pool).create(new).await
    }

    async fn update_artist(
        &self,
        id: i64,
        patch: ArtistPatch,
    ) -> Result<Option<Artist>, RepoError> {
        ArtistRepo::new(&self.pool).update(id, patch).await
    }

    async fn list_albums(&self) -> Result<Vec<Album>, RepoError> {
        AlbumRepo::new(&self.pool).list().await
    }

    async fn list_albums_by_artist(&self, artist_id: i64) -> Result<Vec<Album>, RepoError> {
        AlbumRepo::new(&self.pool).list_by_artist(artist_id).await
    }

    async fn create_album(&self, new: NewAlbum) -> Result<Album, RepoError> {
        AlbumRepo::new(&self.pool).create(new).await
    }

    async fn update_album(&self, id: i64, patch: AlbumPatch) -> Result<Option<Album>, RepoError> {
        AlbumRepo::new(&self.pool).update(id, patch).await
    }

    async fn musical_collection(&self) -> Result<Vec<ArtistWithAlbums>, RepoError> {
        CollectionRepo::new(&self.pool).list().await
    }
}

#[cfg(test)]
mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;
    use crate::db::repos::test_support::{lazy_pool, test_pool, unique};

    #[tokio::test]
    async fn unreachable_store_is_unavailable() {
        let pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .expect("valid url");
        let catalog = PgCatalog::new(pool);

        let err = catalog.list_artists().await.unwrap_err();
        assert!(matches!(err, RepoError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn validation_errors_skip_the_store() {
        let catalog = PgCatalog::new(lazy_pool());
        let err = catalog
            .update_artist(1, ArtistPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NoFieldsProvided));
    }

    /// The end-to-end scenario against a real database.
    #[tokio::test]
    #[ignore = "requires database"]
    async fn catalog_scenario() {
        let catalog = PgCatalog::new(test_pool().await);
        let name = unique("Ana");
        let title = unique("Blue");

        let ana = catalog
            .create_artist(NewArtist::new(&name, "Jazz").unwrap())
            .await
            .unwrap();

        let err = catalog
            .create_artist(NewArtist::new(&name.to_lowercase(), "Rock").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::DuplicateName { .. }));

        catalog
            .create_album(NewAlbum::new(&title, 1959, ana.id).unwrap())
            .await
            .unwrap();

        let err = catalog
            .create_album(NewAlbum::new(&title.to_lowercase(), 2000, ana.id).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::DuplicateTitle { .. }));

        let err = catalog
            .create_album(NewAlbum::new(&unique("Kind of Blue"), 1959, ana.id + 999_999).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ArtistNotFound { .. }));

        let err = catalog
            .update_artist(ana.id, ArtistPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NoFieldsProvided));

        let missing = catalog
            .update_artist(i64::MAX, ArtistPatch::new(None, Some("Blues")).unwrap())
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
