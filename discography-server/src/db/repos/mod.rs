//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the shared pool, never holds a connection between calls
//! - Uses JOINs for list operations (no N+1)
//! - Pre-checks uniqueness inside the write transaction, and still remaps
//!   store constraint violations for writers that race past the check

pub mod albums;
pub mod artists;
pub mod collection;

pub use albums::{Album, AlbumRepo};
pub use artists::{Artist, ArtistRepo};
pub use collection::{ArtistWithAlbums, CollectionRepo};
