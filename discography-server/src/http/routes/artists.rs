//! Artist endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Router,
};
use serde::Deserialize;

use crate::db::{Album, Artist};
use crate::http::envelope::Envelope;
use crate::http::error::ApiError;
use crate::http::extractors::{EntityId, JsonBody};
use crate::http::server::AppState;
use crate::models::{ArtistPatch, NewArtist};

/// Create artist request
#[derive(Debug, Deserialize)]
pub struct CreateArtistRequest {
    pub name: String,
    pub genre: String,
}

/// Update artist request; absent or null fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateArtistRequest {
    pub name: Option<String>,
    pub genre: Option<String>,
}

/// GET /artists - all artists by name
async fn list_artists(State(state): State<AppState>) -> Result<Envelope<Vec<Artist>>, ApiError> {
    let artists = state.catalog().list_artists().await?;
    Ok(Envelope::new(artists))
}

/// POST /artists - create an artist
async fn create_artist(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateArtistRequest>,
) -> Result<(StatusCode, Envelope<Artist>), ApiError> {
    let new = NewArtist::new(&req.name, &req.genre)?;
    let artist = state.catalog().create_artist(new).await?;
    Ok(Envelope::created(artist))
}

/// GET /artists/by-name/{name} - case-insensitive lookup
async fn find_artist_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Envelope<Artist>, ApiError> {
    state
        .catalog()
        .find_artist_by_name(name.trim())
        .await?
        .map(Envelope::new)
        .ok_or_else(|| ApiError::not_found("artist", name))
}

/// PATCH /artists/{id} - partial update
async fn update_artist(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonBody(req): JsonBody<UpdateArtistRequest>,
) -> Result<Envelope<Artist>, ApiError> {
    let patch = ArtistPatch::new(req.name.as_deref(), req.genre.as_deref())?;

    state
        .catalog()
        .update_artist(id, patch)
        .await?
        .map(Envelope::new)
        .ok_or_else(|| ApiError::not_found("artist", id))
}

/// GET /artists/{id}/albums - albums of one artist
async fn list_artist_albums(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Envelope<Vec<Album>>, ApiError> {
    let albums = state.catalog().list_albums_by_artist(id).await?;
    Ok(Envelope::new(albums))
}

/// Artist routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/artists", get(list_artists).post(create_artist))
        .route("/artists/by-name/{name}", get(find_artist_by_name))
        .route("/artists/{id}", patch(update_artist))
        .route("/artists/{id}/albums", get(list_artist_albums))
}
