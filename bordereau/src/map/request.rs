//! WMS 1.1.1 `GetMap` request building.

use tracing::warn;
use url::Url;

use super::MapError;
use crate::config::MapLayerConfig;
use crate::crs::SpatialReference;
use crate::geometry::BoundingBox;

const WMS_VERSION: &str = "1.1.1";

/// Keys owned by the request; copies in the configured URL are replaced.
const OWNED_KEYS: &[&str] = &[
    "SERVICE",
    "VERSION",
    "REQUEST",
    "LAYERS",
    "STYLES",
    "SRS",
    "CRS",
    "BBOX",
    "WIDTH",
    "HEIGHT",
    "FORMAT",
    "TRANSPARENT",
];

/// A single-layer `GetMap` request.
#[derive(Debug, Clone, PartialEq)]
pub struct GetMapRequest {
    pub url: String,
    pub layer: String,
    /// CRS the map is requested in
    pub srs: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub bbox: BoundingBox,
    pub transparent: bool,
}

impl GetMapRequest {
    /// Request for `layer` framed by `bbox`.
    pub fn for_layer(layer: &MapLayerConfig, bbox: BoundingBox, width: u32, height: u32) -> Self {
        Self {
            url: layer.url.clone(),
            layer: layer.layer.clone(),
            srs: layer.srs.clone(),
            format: layer.format.clone(),
            width,
            height,
            bbox,
            transparent: false,
        }
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    /// Box expressed in the request CRS.
    ///
    /// The box is reprojected only when both its CRS and the layer CRS are
    /// known to the registry and differ; otherwise it is sent unchanged.
    /// A reprojected envelope covers the framing but its pixels no longer
    /// line up with a raster requested in the framing CRS.
    pub fn request_bbox(&self) -> Result<BoundingBox, MapError> {
        let target = match SpatialReference::decode(&self.srs) {
            Ok(target) => target,
            Err(_) => return Ok(self.bbox),
        };
        match self.bbox.srs() {
            Some(source) if source != target && source.is_supported() => {
                warn!(
                    layer = %self.layer,
                    from = %source,
                    to = %target,
                    "Layer SRS differs from the framing, raster will not align pixel-for-pixel"
                );
                Ok(self.bbox.reproject(target)?)
            }
            _ => Ok(self.bbox),
        }
    }

    /// Builds the full request URL.
    pub fn build_url(&self) -> Result<String, MapError> {
        let bbox = self.request_bbox()?;
        let mut url = Url::parse(&self.url).map_err(|e| MapError::InvalidUrl {
            url: self.url.clone(),
            message: e.to_string(),
        })?;

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| {
                !OWNED_KEYS
                    .iter()
                    .any(|owned| key.eq_ignore_ascii_case(owned))
            })
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        url.set_query(None);

        {
            let mut query = url.query_pairs_mut();
            for (key, value) in &kept {
                query.append_pair(key, value);
            }
            query
                .append_pair("SERVICE", "WMS")
                .append_pair("VERSION", WMS_VERSION)
                .append_pair("REQUEST", "GetMap")
                .append_pair("LAYERS", &self.layer)
                .append_pair("STYLES", "")
                .append_pair("SRS", &self.srs)
                .append_pair("BBOX", &bbox.to_wms_param())
                .append_pair("WIDTH", &self.width.to_string())
                .append_pair("HEIGHT", &self.height.to_string())
                .append_pair("FORMAT", &self.format)
                .append_pair(
                    "TRANSPARENT",
                    if self.transparent { "TRUE" } else { "FALSE" },
                );
        }

        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lambert_bbox() -> BoundingBox {
        BoundingBox::new(
            699_990.0,
            6_599_990.0,
            700_110.0,
            6_600_060.0,
            Some(SpatialReference::epsg(2154)),
        )
    }

    fn layer(url: &str, srs: &str) -> MapLayerConfig {
        MapLayerConfig::new(url, "qgis:geo_parcelle").with_srs(srs)
    }

    #[test]
    fn test_build_url() {
        let request = GetMapRequest::for_layer(
            &layer("http://geo.example.org/geoserver/wms", "EPSG:2154"),
            lambert_bbox(),
            595,
            380,
        )
        .with_transparent(true);

        let url = request.build_url().unwrap();
        assert_eq!(
            url,
            "http://geo.example.org/geoserver/wms?SERVICE=WMS&VERSION=1.1.1&REQUEST=GetMap\
             &LAYERS=qgis%3Ageo_parcelle&STYLES=&SRS=EPSG%3A2154\
             &BBOX=699990%2C6599990%2C700110%2C6600060&WIDTH=595&HEIGHT=380\
             &FORMAT=image%2Fpng&TRANSPARENT=TRUE"
        );
    }

    #[test]
    fn test_keeps_foreign_query_and_replaces_owned_keys() {
        let request = GetMapRequest::for_layer(
            &layer("http://osm.example.org/wms?map=osm&service=WMS&version=1.3.0", "EPSG:2154"),
            lambert_bbox(),
            10,
            10,
        );

        let url = request.build_url().unwrap();
        assert!(url.starts_with("http://osm.example.org/wms?map=osm&SERVICE=WMS&VERSION=1.1.1"));
        assert!(!url.contains("1.3.0"));
        assert!(url.ends_with("TRANSPARENT=FALSE"));
    }

    #[test]
    fn test_reprojects_bbox_into_layer_srs() {
        let request = GetMapRequest::for_layer(
            &layer("http://wms", "EPSG:900913"),
            lambert_bbox(),
            10,
            10,
        );

        let bbox = request.request_bbox().unwrap();
        assert_eq!(bbox.srs(), Some(SpatialReference::epsg(900913)));
        assert!((bbox.min_x() - 333_958.0).abs() < 100.0);
    }

    #[test]
    fn test_same_or_unknown_srs_is_untouched() {
        let same = GetMapRequest::for_layer(&layer("http://wms", "EPSG:2154"), lambert_bbox(), 1, 1);
        assert_eq!(same.request_bbox().unwrap(), lambert_bbox());

        let unknown_layer =
            GetMapRequest::for_layer(&layer("http://wms", "EPSG:32631"), lambert_bbox(), 1, 1);
        assert_eq!(unknown_layer.request_bbox().unwrap(), lambert_bbox());

        let untagged = BoundingBox::new(0.0, 0.0, 1.0, 1.0, None);
        let unknown_bbox = GetMapRequest::for_layer(&layer("http://wms", "EPSG:4326"), untagged, 1, 1);
        assert_eq!(unknown_bbox.request_bbox().unwrap(), untagged);
    }

    #[test]
    fn test_invalid_url() {
        let request = GetMapRequest::for_layer(&layer("wms", "EPSG:2154"), lambert_bbox(), 1, 1);
        assert!(matches!(request.build_url(), Err(MapError::InvalidUrl { .. })));
    }
}
