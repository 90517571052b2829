//! Bounding box tied to a spatial reference.

use geo::Rect;

use crate::crs::{CrsError, CrsTransformer, SpatialReference};

/// Axis-aligned envelope expressed in an optional spatial reference.
///
/// Invariant: `min_x <= max_x` and `min_y <= max_y`. The constructor
/// reorders swapped inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    srs: Option<SpatialReference>,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, srs: Option<SpatialReference>) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
            srs,
        }
    }

    pub fn from_rect(rect: Rect<f64>, srs: Option<SpatialReference>) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y, srs)
    }

    /// Builds a box from a GeoJSON `bbox` member (2D or 3D form).
    pub fn from_geojson(values: &[f64], srs: Option<SpatialReference>) -> Option<Self> {
        match values {
            [x1, y1, x2, y2] => Some(Self::new(*x1, *y1, *x2, *y2, srs)),
            [x1, y1, _, x2, y2, _] => Some(Self::new(*x1, *y1, *x2, *y2, srs)),
            _ => None,
        }
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn srs(&self) -> Option<SpatialReference> {
        self.srs
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn bottom_left(&self) -> (f64, f64) {
        (self.min_x, self.min_y)
    }

    pub fn bottom_right(&self) -> (f64, f64) {
        (self.max_x, self.min_y)
    }

    /// Returns the same box tagged with another spatial reference.
    pub fn with_srs(self, srs: Option<SpatialReference>) -> Self {
        Self { srs, ..self }
    }

    /// Grows the box by `distance` on every side.
    pub fn expand(&self, distance: f64) -> Self {
        Self::new(
            self.min_x - distance,
            self.min_y - distance,
            self.max_x + distance,
            self.max_y + distance,
            self.srs,
        )
    }

    /// Reprojects the box into `target`.
    ///
    /// The result is the envelope of the four corners and four edge
    /// midpoints after transformation, which covers the curvature most
    /// conic and cylindrical projections introduce along the edges.
    pub fn reproject(&self, target: SpatialReference) -> Result<Self, CrsError> {
        let source = self
            .srs
            .ok_or_else(|| CrsError::Unsupported("unresolved source CRS".to_string()))?;
        if source == target {
            return Ok(*self);
        }

        let transformer = CrsTransformer::new(source, target)?;
        let mid_x = (self.min_x + self.max_x) / 2.0;
        let mid_y = (self.min_y + self.max_y) / 2.0;
        let samples = [
            (self.min_x, self.min_y),
            (self.max_x, self.min_y),
            (self.max_x, self.max_y),
            (self.min_x, self.max_y),
            (mid_x, self.min_y),
            (mid_x, self.max_y),
            (self.min_x, mid_y),
            (self.max_x, mid_y),
        ];

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for (x, y) in samples {
            let (tx, ty) = transformer.transform(x, y)?;
            min_x = min_x.min(tx);
            min_y = min_y.min(ty);
            max_x = max_x.max(tx);
            max_y = max_y.max(ty);
        }

        Ok(Self::new(min_x, min_y, max_x, max_y, Some(target)))
    }

    /// Formats the box as a WMS `BBOX` parameter value.
    pub fn to_wms_param(&self) -> String {
        format!("{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// Maps a world coordinate onto a `width` × `height` raster covering
    /// this box. Pixel rows grow downwards.
    pub fn world_to_pixel(&self, x: f64, y: f64, width: u32, height: u32) -> (f32, f32) {
        let span_x = self.width().max(f64::EPSILON);
        let span_y = self.height().max(f64::EPSILON);
        let px = (x - self.min_x) / span_x * width as f64;
        let py = (self.max_y - y) / span_y * height as f64;
        (px as f32, py as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_swapped_corners() {
        let bbox = BoundingBox::new(10.0, 20.0, 0.0, 5.0, None);
        assert_eq!(bbox.min_x(), 0.0);
        assert_eq!(bbox.max_x(), 10.0);
        assert_eq!(bbox.min_y(), 5.0);
        assert_eq!(bbox.max_y(), 20.0);
    }

    #[test]
    fn test_from_geojson_accepts_2d_and_3d() {
        let flat = BoundingBox::from_geojson(&[1.0, 2.0, 3.0, 4.0], None).unwrap();
        let deep = BoundingBox::from_geojson(&[1.0, 2.0, 0.0, 3.0, 4.0, 9.0], None).unwrap();
        assert_eq!(flat, deep);
        assert!(BoundingBox::from_geojson(&[1.0, 2.0, 3.0], None).is_none());
    }

    #[test]
    fn test_expand() {
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 50.0, None).expand(10.0);
        assert_eq!(bbox.width(), 120.0);
        assert_eq!(bbox.height(), 70.0);
        assert_eq!(bbox.bottom_left(), (-10.0, -10.0));
        assert_eq!(bbox.bottom_right(), (110.0, -10.0));
    }

    #[test]
    fn test_wms_param() {
        let bbox = BoundingBox::new(700000.0, 6600000.5, 700120.0, 6600100.0, None);
        assert_eq!(bbox.to_wms_param(), "700000,6600000.5,700120,6600100");
    }

    #[test]
    fn test_world_to_pixel_flips_rows() {
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 100.0, None);
        assert_eq!(bbox.world_to_pixel(0.0, 100.0, 200, 200), (0.0, 0.0));
        assert_eq!(bbox.world_to_pixel(100.0, 0.0, 200, 200), (200.0, 200.0));
        assert_eq!(bbox.world_to_pixel(50.0, 25.0, 200, 200), (100.0, 150.0));
    }

    #[test]
    fn test_reproject_requires_source_crs() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0, None);
        assert!(bbox.reproject(SpatialReference::WGS84).is_err());
    }

    #[test]
    fn test_reproject_to_same_crs_is_noop() {
        let srs = SpatialReference::epsg(2154);
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0, Some(srs));
        assert_eq!(bbox.reproject(srs).unwrap(), bbox);
    }

    #[test]
    fn test_reproject_lambert93_to_wgs84() {
        let bbox = BoundingBox::new(
            699_000.0,
            6_599_000.0,
            701_000.0,
            6_601_000.0,
            Some(SpatialReference::epsg(2154)),
        );
        let wgs84 = bbox.reproject(SpatialReference::WGS84).unwrap();

        assert_eq!(wgs84.srs(), Some(SpatialReference::WGS84));
        assert!(wgs84.min_x() < 3.0 && wgs84.max_x() > 3.0);
        assert!(wgs84.min_y() < 46.5 && wgs84.max_y() > 46.5);
        // 2 km is roughly 0.026° of longitude at this latitude
        assert!((wgs84.width() - 0.026).abs() < 0.002, "width = {}", wgs84.width());
    }
}
