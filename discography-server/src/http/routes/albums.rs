//! Album endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Router,
};
use serde::Deserialize;

use crate::db::Album;
use crate::http::envelope::Envelope;
use crate::http::error::ApiError;
use crate::http::extractors::{EntityId, JsonBody};
use crate::http::server::AppState;
use crate::models::{AlbumPatch, LooseInt, NewAlbum};

/// Create album request. `year` and `artist_id` may be numbers or numeric strings.
#[derive(Debug, Deserialize)]
pub struct CreateAlbumRequest {
    pub title: String,
    pub year: LooseInt,
    pub artist_id: LooseInt,
}

/// Update album request; absent or null fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAlbumRequest {
    pub title: Option<String>,
    pub year: Option<LooseInt>,
    pub artist_id: Option<LooseInt>,
}

/// GET /albums - all albums by title
async fn list_albums(State(state): State<AppState>) -> Result<Envelope<Vec<Album>>, ApiError> {
    let albums = state.catalog().list_albums().await?;
    Ok(Envelope::new(albums))
}

/// POST /albums - create an album
async fn create_album(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateAlbumRequest>,
) -> Result<(StatusCode, Envelope<Album>), ApiError> {
    let new = NewAlbum::new(
        &req.title,
        req.year.to_i64("year")?,
        req.artist_id.to_i64("artist_id")?,
    )?;

    let album = state.catalog().create_album(new).await?;
    Ok(Envelope::created(album))
}

/// PATCH /albums/{id} - partial update
async fn update_album(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonBody(req): JsonBody<UpdateAlbumRequest>,
) -> Result<Envelope<Album>, ApiError> {
    let year = req.year.map(|y| y.to_i64("year")).transpose()?;
    let artist_id = req.artist_id.map(|a| a.to_i64("artist_id")).transpose()?;
    let patch = AlbumPatch::new(req.title.as_deref(), year, artist_id)?;

    state
        .catalog()
        .update_album(id, patch)
        .await?
        .map(Envelope::new)
        .ok_or_else(|| ApiError::not_found("album", id))
}

/// Album routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/albums", get(list_albums).post(create_album))
        .route("/albums/{id}", patch(update_album))
}
