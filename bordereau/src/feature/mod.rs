//! Parcel lookup against a WFS feature service.
//!
//! The resolver issues one `GetFeature` request with a CQL equality filter on
//! the identifier attribute, decodes the GeoJSON answer and keeps the first
//! feature. No retries are attempted.

mod filter;
mod geojson;
mod resolver;

pub use filter::{AttributeFilter, FilterError};
pub use resolver::FeatureResolver;

use geo::MultiPolygon;
use thiserror::Error;

use crate::crs::{CrsError, SpatialReference};
use crate::geometry::BoundingBox;
use crate::http::HttpError;

/// A parcel as returned by the feature service.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFeature {
    /// Polygonal footprint in `crs`
    pub geometry: MultiPolygon<f64>,
    /// `None` when the CRS could not be determined
    pub crs: Option<SpatialReference>,
    /// Extent of the feature, tagged with `crs`
    pub bbox: BoundingBox,
}

/// Errors raised while resolving a parcel.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Malformed filter: {0}")]
    Filter(#[from] FilterError),

    #[error("Invalid feature service URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Feature service request failed: {0}")]
    Http(#[from] HttpError),

    #[error("Feature service exception: {0}")]
    ServiceException(String),

    #[error("Invalid feature response: {0}")]
    InvalidResponse(String),

    #[error("Feature has no geometry")]
    MissingGeometry,

    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    #[error("CRS error: {0}")]
    Crs(#[from] CrsError),
}
