//! Loosely-typed integers from request bodies
//!
//! Clients send years and ids either as JSON numbers or as numeric strings.

use serde::Deserialize;

use super::ValidationError;

/// Integer accepted as `1959` or `"1959"`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LooseInt {
    Number(i64),
    Text(String),
}

impl LooseInt {
    /// Coerce to `i64`, naming `field` in the error.
    pub fn to_i64(&self, field: &'static str) -> Result<i64, ValidationError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s.trim().parse().map_err(|_| ValidationError::InvalidFormat {
                field,
                reason: "expected an integer",
            }),
        }
    }
}
