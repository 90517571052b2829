//! Planar geometry for the framing region.
//!
//! - [`BoundingBox`] - CRS-tagged envelope with reprojection and pixel mapping
//! - [`GroundDistance`] - geodesic width of a box, in meters
//! - [`GeometryCalculator`] - buffer, envelope and distance for a feature

mod bbox;
mod calculator;
mod distance;

pub use bbox::BoundingBox;
pub use calculator::{GeometryCalculator, Region, DEFAULT_BUFFER_DISTANCE};
pub use distance::{orthodromic_width, GroundDistance};
