//! Ground distance across a bounding box.

use geo::{Distance, Geodesic, Point};

use super::bbox::BoundingBox;
use crate::crs::{CrsError, CrsTransformer};

/// Non-negative length on the ground, in meters.
///
/// Zero means the distance is unknown; consumers treat it as "no scale".
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct GroundDistance(f64);

impl GroundDistance {
    pub const UNKNOWN: GroundDistance = GroundDistance(0.0);

    /// Wraps a distance in meters. Negative and non-finite values become
    /// [`GroundDistance::UNKNOWN`].
    pub fn meters(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Self(value)
        } else {
            Self::UNKNOWN
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_known(&self) -> bool {
        self.0 > 0.0
    }
}

/// Geodesic length of the bottom edge of `bbox`.
///
/// Both bottom corners are brought into WGS84 and measured on the ellipsoid.
pub fn orthodromic_width(bbox: &BoundingBox) -> Result<GroundDistance, CrsError> {
    let srs = bbox
        .srs()
        .ok_or_else(|| CrsError::Unsupported("unresolved CRS".to_string()))?;
    let transformer = CrsTransformer::to_wgs84(srs)?;

    let (x1, y1) = bbox.bottom_left();
    let (x2, y2) = bbox.bottom_right();
    let (lon1, lat1) = transformer.transform(x1, y1)?;
    let (lon2, lat2) = transformer.transform(x2, y2)?;

    let meters = Geodesic.distance(Point::new(lon1, lat1), Point::new(lon2, lat2));
    Ok(GroundDistance::meters(meters))
}
