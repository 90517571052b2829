//! Parcel identifiers.

use std::fmt;
use thiserror::Error;

/// Default minimum length; shorter identifiers are refused.
pub const DEFAULT_MIN_ID_LENGTH: usize = 14;

/// Reasons an identifier is refused before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidParcelId {
    #[error("missing parcel identifier")]
    Missing,

    #[error("parcel identifier '{id}' is too short ({length} < {min})")]
    TooShort {
        id: String,
        length: usize,
        min: usize,
    },

    #[error("parcel identifier contains a quote: {0}")]
    Quote(String),
}

/// A validated, opaque parcel identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParcelId(String);

impl ParcelId {
    /// Validates a raw identifier.
    ///
    /// Valid iff non-empty, at least `min_length` characters long and free
    /// of `'`. Surrounding whitespace is not trimmed.
    pub fn parse(raw: Option<&str>, min_length: usize) -> Result<Self, InvalidParcelId> {
        let raw = raw
            .filter(|raw| !raw.is_empty())
            .ok_or(InvalidParcelId::Missing)?;
        let length = raw.chars().count();
        if length < min_length {
            return Err(InvalidParcelId::TooShort {
                id: raw.to_string(),
                length,
                min: min_length,
            });
        }
        if raw.contains('\'') {
            return Err(InvalidParcelId::Quote(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParcelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ParcelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
