//! Input models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod album;
pub mod artist;
pub mod number;
pub mod validation;

pub use album::{AlbumPatch, AlbumTitle, NewAlbum, ReleaseYear};
pub use artist::{ArtistName, ArtistPatch, Genre, NewArtist};
pub use number::LooseInt;
pub use validation::ValidationError;
