//! Coordinate transformation between registered CRSs.

use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use super::registry::proj_definition;
use super::types::{CrsError, SpatialReference};

/// Transforms coordinates from one spatial reference to another.
///
/// Geographic systems take and return degrees; the conversion to the
/// radians `proj4rs` expects happens internally.
pub struct CrsTransformer {
    source: SpatialReference,
    target: SpatialReference,
    source_proj: Proj,
    target_proj: Proj,
    identity: bool,
}

impl CrsTransformer {
    /// Create a transformer between two spatial references.
    ///
    /// # Errors
    /// Returns an error if either code has no registered definition or the
    /// definition is rejected by the projection library.
    pub fn new(source: SpatialReference, target: SpatialReference) -> Result<Self, CrsError> {
        let source_def =
            proj_definition(source.code()).ok_or_else(|| CrsError::Unsupported(source.to_string()))?;
        let target_def =
            proj_definition(target.code()).ok_or_else(|| CrsError::Unsupported(target.to_string()))?;

        let identity = source_def == target_def;

        let source_proj = Proj::from_proj_string(&source_def).map_err(|e| CrsError::Projection {
            srs: source.to_string(),
            message: format!("{e:?}"),
        })?;
        let target_proj = Proj::from_proj_string(&target_def).map_err(|e| CrsError::Projection {
            srs: target.to_string(),
            message: format!("{e:?}"),
        })?;

        Ok(Self {
            source,
            target,
            source_proj,
            target_proj,
            identity,
        })
    }

    /// Create a transformer from `source` to WGS84 longitude/latitude.
    pub fn to_wgs84(source: SpatialReference) -> Result<Self, CrsError> {
        Self::new(source, SpatialReference::WGS84)
    }

    /// True when both ends share the same definition (e.g. 3857 and 900913).
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Transform a single coordinate.
    pub fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), CrsError> {
        if self.identity {
            return Ok((x, y));
        }

        let (in_x, in_y) = if self.source.is_geographic() {
            (x.to_radians(), y.to_radians())
        } else {
            (x, y)
        };

        let mut point = (in_x, in_y, 0.0);

        transform(&self.source_proj, &self.target_proj, &mut point).map_err(|e| {
            CrsError::Transform {
                from: self.source.to_string(),
                to: self.target.to_string(),
                message: format!("{e:?}"),
            }
        })?;

        let (out_x, out_y) = if self.target.is_geographic() {
            (point.0.to_degrees(), point.1.to_degrees())
        } else {
            (point.0, point.1)
        };

        if !out_x.is_finite() || !out_y.is_finite() {
            return Err(CrsError::Transform {
                from: self.source.to_string(),
                to: self.target.to_string(),
                message: format!("non-finite result for ({x}, {y})"),
            });
        }

        Ok((out_x, out_y))
    }
}
