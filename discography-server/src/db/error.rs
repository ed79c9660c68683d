//! Repository error types
//!
//! Every catalog operation fails with exactly one of these variants. Raw
//! store errors are classified by constraint kind and never leak to callers
//! except as the source of `StoreUnavailable`.

use sqlx::error::ErrorKind;

/// Repository error
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("update requires at least one field")]
    NoFieldsProvided,

    #[error("an artist named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("an album titled '{title}' already exists")]
    DuplicateTitle { title: String },

    #[error("artist {artist_id} does not exist")]
    ArtistNotFound { artist_id: i64 },

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),
}

/// Constraint violation reported by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Unique,
    ForeignKey,
}

/// Classify a store error by the constraint it violated, if any.
pub fn violation(err: &sqlx::Error) -> Option<Violation> {
    match err.as_database_error()?.kind() {
        ErrorKind::UniqueViolation => Some(Violation::Unique),
        ErrorKind::ForeignKeyViolation => Some(Violation::ForeignKey),
        _ => None,
    }
}
