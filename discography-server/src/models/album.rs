//! Album input types

use super::validation::{required_text, ValidationError};

/// Earliest accepted release year
pub const MIN_RELEASE_YEAR: i64 = 1000;

/// Latest accepted release year
pub const MAX_RELEASE_YEAR: i64 = 9999;

/// Validated album title (trimmed, non-empty)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlbumTitle(String);

impl AlbumTitle {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        required_text("title", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for AlbumTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Release year, four digits.
///
/// ```
/// use discography_server::models::ReleaseYear;
///
/// assert_eq!(ReleaseYear::new(1959).unwrap().get(), 1959);
/// assert!(ReleaseYear::new(-5).is_err());
/// assert!(ReleaseYear::new(20_000).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReleaseYear(i32);

impl ReleaseYear {
    pub fn new(year: i64) -> Result<Self, ValidationError> {
        if !(MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR).contains(&year) {
            return Err(ValidationError::OutOfRange {
                field: "year",
                min: MIN_RELEASE_YEAR,
                max: MAX_RELEASE_YEAR,
            });
        }

        // In range, so it fits
        Ok(Self(year as i32))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

/// Fields required to create an album
#[derive(Debug, Clone)]
pub struct NewAlbum {
    pub title: AlbumTitle,
    pub year: ReleaseYear,
    pub artist_id: i64,
}

impl NewAlbum {
    pub fn new(title: &str, year: i64, artist_id: i64) -> Result<Self, ValidationError> {
        Ok(Self {
            title: AlbumTitle::new(title)?,
            year: ReleaseYear::new(year)?,
            artist_id,
        })
    }
}

/// Partial album update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct AlbumPatch {
    pub title: Option<AlbumTitle>,
    pub year: Option<ReleaseYear>,
    pub artist_id: Option<i64>,
}

impl AlbumPatch {
    pub fn new(
        title: Option<&str>,
        year: Option<i64>,
        artist_id: Option<i64>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            title: title.map(AlbumTitle::new).transpose()?,
            year: year.map(ReleaseYear::new).transpose()?,
            artist_id,
        })
    }

    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.year.is_none() && self.artist_id.is_none()
    }
}
