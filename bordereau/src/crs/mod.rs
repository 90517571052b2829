//! Coordinate reference systems
//!
//! Parses CRS identifiers as published by OGC services, keeps the table of
//! legacy-code compatibility shims, and reprojects coordinates with `proj4rs`.

mod registry;
mod transform;
mod types;

pub use registry::{apply_legacy_shim, is_geographic, proj_definition, LEGACY_CRS_SHIMS};
pub use transform::CrsTransformer;
pub use types::{CrsError, SpatialReference};
