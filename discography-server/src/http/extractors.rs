//! Custom Axum extractors
//!
//! Rejections become `ApiError`s so malformed input gets the same JSON
//! error envelope as every other failure.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Extract a numeric entity id from the path
pub struct EntityId(pub i64);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::InvalidRequest {
                message: e.body_text(),
            })?;

        let id = id.trim().parse::<i64>().map_err(|_| ApiError::InvalidRequest {
            message: format!("invalid id '{}': expected an integer", id),
        })?;

        Ok(Self(id))
    }
}

/// JSON request body with envelope-shaped rejections
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::InvalidRequest {
                message: e.body_text(),
            })?;

        Ok(Self(value))
    }
}
