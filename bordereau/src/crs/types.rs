//! Spatial reference type definitions

use std::fmt;
use thiserror::Error;

/// A coordinate reference system identified by its EPSG code.
///
/// Only the EPSG authority is understood. The type says nothing about whether
/// a projection definition exists for the code; see
/// [`SpatialReference::decode`] for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpatialReference {
    code: u32,
}

impl SpatialReference {
    /// WGS84 geographic coordinates (longitude/latitude in degrees).
    pub const WGS84: SpatialReference = SpatialReference { code: 4326 };

    /// Creates a reference from a bare EPSG code.
    pub const fn epsg(code: u32) -> Self {
        Self { code }
    }

    /// Returns the numeric EPSG code.
    pub fn code(&self) -> u32 {
        self.code
    }

    /// Parses a CRS identifier.
    ///
    /// Accepted spellings:
    /// - `EPSG:2154` (any case)
    /// - `urn:ogc:def:crs:EPSG::2154` and `urn:ogc:def:crs:EPSG:6.9:2154`
    /// - `http://www.opengis.net/gml/srs/epsg.xml#2154`
    /// - `http://www.opengis.net/def/crs/EPSG/0/2154`
    pub fn parse(text: &str) -> Result<Self, CrsError> {
        let trimmed = text.trim();
        let upper = trimmed.to_ascii_uppercase();

        let code = if let Some(rest) = upper.strip_prefix("EPSG:") {
            rest
        } else if let Some(rest) = upper.strip_prefix("URN:OGC:DEF:CRS:EPSG:") {
            rest.rsplit(':').next().unwrap_or_default()
        } else if upper.starts_with("HTTP://WWW.OPENGIS.NET/GML/SRS/EPSG.XML#") {
            upper.rsplit('#').next().unwrap_or_default()
        } else if upper.starts_with("HTTP://WWW.OPENGIS.NET/DEF/CRS/EPSG/") {
            upper.rsplit('/').next().unwrap_or_default()
        } else {
            return Err(CrsError::Malformed(trimmed.to_string()));
        };

        code.parse::<u32>()
            .map(Self::epsg)
            .map_err(|_| CrsError::Malformed(trimmed.to_string()))
    }

    /// Parses a CRS identifier and requires a known projection definition.
    pub fn decode(text: &str) -> Result<Self, CrsError> {
        let srs = Self::parse(text)?;
        if super::registry::proj_definition(srs.code).is_none() {
            return Err(CrsError::Unsupported(srs.to_string()));
        }
        Ok(srs)
    }

    /// Returns true if a projection definition exists for this code.
    pub fn is_supported(&self) -> bool {
        super::registry::proj_definition(self.code).is_some()
    }

    /// Returns true for longitude/latitude systems (units are degrees).
    pub fn is_geographic(&self) -> bool {
        super::registry::is_geographic(self.code)
    }
}

impl fmt::Display for SpatialReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.code)
    }
}

/// Errors that can occur while decoding or applying a CRS.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CrsError {
    /// The identifier does not follow any known CRS syntax
    #[error("Malformed CRS identifier '{0}'")]
    Malformed(String),

    /// The identifier is well-formed but no definition is registered for it
    #[error("Unsupported CRS {0}")]
    Unsupported(String),

    /// The projection definition was rejected by the projection library
    #[error("Invalid projection for {srs}: {message}")]
    Projection { srs: String, message: String },

    /// A coordinate could not be transformed
    #[error("Transform {from} -> {to} failed: {message}")]
    Transform {
        from: String,
        to: String,
        message: String,
    },
}
