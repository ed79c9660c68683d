//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes:
//! `{"error": "<code>", "message": "<text>"}`. Store failures are logged
//! here and reported to clients with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::RepoError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Field validation failed (400)
    Validation(ValidationError),

    /// Body or path could not be parsed (400)
    InvalidRequest { message: String },

    /// Update without any field (400)
    NoFieldsProvided,

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Artist name already taken (409)
    DuplicateName { name: String },

    /// Album title already taken (409)
    DuplicateTitle { title: String },

    /// Referenced artist does not exist (422)
    ArtistNotFound { artist_id: i64 },

    /// Store unreachable or failing (503, logged)
    StoreUnavailable(sqlx::Error),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Status code and machine-readable error code.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            Self::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),
            Self::NoFieldsProvided => (StatusCode::BAD_REQUEST, "no_fields_provided"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            Self::DuplicateName { .. } => (StatusCode::CONFLICT, "duplicate_name"),
            Self::DuplicateTitle { .. } => (StatusCode::CONFLICT, "duplicate_title"),
            Self::ArtistNotFound { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "artist_not_found"),
            Self::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable"),
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::InvalidRequest { message } => message.clone(),
            Self::NoFieldsProvided => "at least one field must be provided".to_owned(),
            Self::NotFound { resource, id } => format!("{} '{}' not found", resource, id),
            Self::DuplicateName { name } => format!("an artist named '{}' already exists", name),
            Self::DuplicateTitle { title } => {
                format!("an album titled '{}' already exists", title)
            }
            Self::ArtistNotFound { artist_id } => format!("artist {} does not exist", artist_id),
            Self::StoreUnavailable(_) => "the data store is unavailable".to_owned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::StoreUnavailable(e) = &self {
            // Log the actual error, return generic message
            tracing::error!("Store unavailable: {}", e);
        }

        let (status, code) = self.status_and_code();
        let body = json!({
            "error": code,
            "message": self.message()
        });

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NoFieldsProvided => Self::NoFieldsProvided,
            RepoError::DuplicateName { name } => Self::DuplicateName { name },
            RepoError::DuplicateTitle { title } => Self::DuplicateTitle { title },
            RepoError::ArtistNotFound { artist_id } => Self::ArtistNotFound { artist_id },
            RepoError::StoreUnavailable(e) => Self::StoreUnavailable(e),
        }
    }
}
