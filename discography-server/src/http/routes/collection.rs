//! Musical collection endpoint

use axum::{extract::State, routing::get, Router};

use crate::db::ArtistWithAlbums;
use crate::http::envelope::Envelope;
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /collection - every artist with its albums
async fn musical_collection(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<ArtistWithAlbums>>, ApiError> {
    let collection = state.catalog().musical_collection().await?;
    Ok(Envelope::new(collection))
}

/// Collection routes
pub fn router() -> Router<AppState> {
    Router::new().route("/collection", get(musical_collection))
}
