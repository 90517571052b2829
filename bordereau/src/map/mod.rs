//! Raster maps from WMS `GetMap`.

mod fetcher;
mod request;

pub use fetcher::MapTileFetcher;
pub use request::GetMapRequest;

use thiserror::Error;

use crate::crs::CrsError;
use crate::http::HttpError;

/// Errors raised while fetching a map raster.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Invalid map service URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Map request failed: {0}")]
    Http(#[from] HttpError),

    #[error("Map service exception: {0}")]
    Service(String),

    #[error("Failed to decode map image: {0}")]
    Decode(String),

    #[error("Cannot frame map request: {0}")]
    Crs(#[from] CrsError),
}
