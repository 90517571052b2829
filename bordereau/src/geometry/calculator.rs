//! Framing region computation.

use geo::{BoundingRect, Buffer, Coord, MapCoords, MultiPolygon};
use tracing::{debug, error, warn};

use super::bbox::BoundingBox;
use super::distance::{orthodromic_width, GroundDistance};
use crate::crs::{CrsError, CrsTransformer, SpatialReference};
use crate::feature::ResolvedFeature;
use crate::pipeline::{Degradation, StageResult};

/// Default outward buffer, in the feature's native units.
pub const DEFAULT_BUFFER_DISTANCE: f64 = 10.0;

/// Region that frames both raster requests.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Framing box, in the target CRS when reprojection succeeded
    pub bbox: BoundingBox,
    /// Width of the bottom edge on the ground
    pub ground_distance: GroundDistance,
    /// Buffered parcel shape in the CRS of `bbox`
    pub highlight: Option<MultiPolygon<f64>>,
}

/// Buffers a feature, derives its framing box and ground distance.
#[derive(Debug, Clone)]
pub struct GeometryCalculator {
    buffer_distance: f64,
}

impl Default for GeometryCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_DISTANCE)
    }
}

impl GeometryCalculator {
    pub fn new(buffer_distance: f64) -> Self {
        Self { buffer_distance }
    }

    /// Computes the framing region for `feature`, reprojected into `target`.
    ///
    /// An unresolved feature CRS yields the raw feature box with no ground
    /// distance and no highlight. Reprojection and distance failures keep
    /// the region usable and are reported as degradations.
    pub fn compute_region(
        &self,
        feature: &ResolvedFeature,
        target: Option<SpatialReference>,
    ) -> StageResult<Region> {
        let Some(native) = feature.crs else {
            error!("Feature CRS unknown, using raw extent without buffer or scale");
            let region = Region {
                bbox: feature.bbox,
                ground_distance: GroundDistance::UNKNOWN,
                highlight: None,
            };
            return StageResult::Degraded(region, vec![Degradation::UnresolvedCrs]);
        };

        let mut degradations = Vec::new();

        let buffered = feature.geometry.buffer(self.buffer_distance);
        let envelope = match buffered.bounding_rect() {
            Some(rect) => BoundingBox::from_rect(rect, Some(native)),
            None => feature
                .bbox
                .with_srs(Some(native))
                .expand(self.buffer_distance),
        };
        debug!(
            srs = %native,
            envelope = %envelope.to_wms_param(),
            buffer = self.buffer_distance,
            "Buffered feature envelope"
        );

        let bbox = match target {
            Some(target) if target != native => match envelope.reproject(target) {
                Ok(reprojected) => reprojected,
                Err(e) => {
                    warn!(from = %native, to = %target, error = %e, "Envelope reprojection failed, keeping native CRS");
                    degradations.push(Degradation::ReprojectionFailed(e.to_string()));
                    envelope
                }
            },
            _ => envelope,
        };

        let highlight = match reproject_geometry(&buffered, native, bbox.srs()) {
            Ok(shape) => Some(shape),
            Err(e) => {
                warn!(error = %e, "Highlight geometry reprojection failed");
                degradations.push(Degradation::HighlightUnavailable(e.to_string()));
                None
            }
        };

        let ground_distance = match orthodromic_width(&bbox) {
            Ok(distance) => distance,
            Err(e) => {
                error!(bbox = %bbox.to_wms_param(), error = %e, "Ground distance computation failed");
                degradations.push(Degradation::GroundDistanceUnavailable(e.to_string()));
                GroundDistance::UNKNOWN
            }
        };
        debug!(
            bbox = %bbox.to_wms_param(),
            meters = ground_distance.value(),
            "Region computed"
        );

        StageResult::with_degradations(
            Region {
                bbox,
                ground_distance,
                highlight,
            },
            degradations,
        )
    }
}

fn reproject_geometry(
    geometry: &MultiPolygon<f64>,
    from: SpatialReference,
    to: Option<SpatialReference>,
) -> Result<MultiPolygon<f64>, CrsError> {
    let Some(to) = to.filter(|to| *to != from) else {
        return Ok(geometry.clone());
    };
    let transformer = CrsTransformer::new(from, to)?;
    if transformer.is_identity() {
        return Ok(geometry.clone());
    }
    let transformer = &transformer;
    geometry.try_map_coords(|c| {
        transformer
            .transform(c.x, c.y)
            .map(|(x, y)| Coord { x, y })
    })
}
