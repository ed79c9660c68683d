//! Artist input types
//!
//! Names and genres are trimmed and checked once, here. Repositories only
//! ever see validated values.

use super::validation::{required_text, ValidationError};

/// Validated artist name (trimmed, non-empty)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtistName(String);

impl ArtistName {
    /// Create an artist name.
    ///
    /// # Example
    /// ```
    /// use discography_server::models::ArtistName;
    ///
    /// assert_eq!(ArtistName::new("  Miles Davis ").unwrap().as_str(), "Miles Davis");
    /// assert!(ArtistName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        required_text("name", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ArtistName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated genre (trimmed, non-empty)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Genre(String);

impl Genre {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        required_text("genre", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Genre {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Fields required to create an artist
#[derive(Debug, Clone)]
pub struct NewArtist {
    pub name: ArtistName,
    pub genre: Genre,
}

impl NewArtist {
    pub fn new(name: &str, genre: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: ArtistName::new(name)?,
            genre: Genre::new(genre)?,
        })
    }
}

/// Partial artist update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct ArtistPatch {
    pub name: Option<ArtistName>,
    pub genre: Option<Genre>,
}

impl ArtistPatch {
    /// Validate whichever raw fields are present.
    pub fn new(name: Option<&str>, genre: Option<&str>) -> Result<Self, ValidationError> {
        Ok(Self {
            name: name.map(ArtistName::new).transpose()?,
            genre: genre.map(Genre::new).transpose()?,
        })
    }

    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.genre.is_none()
    }
}
