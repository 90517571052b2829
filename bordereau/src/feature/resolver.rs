//! WFS `GetFeature` lookup of a single parcel.

use std::sync::Arc;

use geo::BoundingRect;
use tracing::{debug, info, warn};
use url::Url;

use super::filter::AttributeFilter;
use super::geojson::{parse_feature_collection, FeatureCollection, NamedCrs};
use super::{ResolveError, ResolvedFeature};
use crate::config::FeatureServiceConfig;
use crate::crs::{apply_legacy_shim, SpatialReference};
use crate::geometry::BoundingBox;
use crate::http::HttpClient;
use crate::parcel::ParcelId;

const WFS_VERSION: &str = "1.0.0";
const OUTPUT_FORMAT: &str = "application/json";

/// Resolves parcel identifiers against a feature service.
pub struct FeatureResolver<C: HttpClient> {
    client: Arc<C>,
    config: FeatureServiceConfig,
}

impl<C: HttpClient> FeatureResolver<C> {
    pub fn new(client: Arc<C>, config: FeatureServiceConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &FeatureServiceConfig {
        &self.config
    }

    /// Builds the `GetFeature` URL for `parcel`.
    ///
    /// Query parameters already present in the configured URL are kept.
    pub fn build_url(&self, parcel: &ParcelId) -> Result<String, ResolveError> {
        let filter = AttributeFilter::equals(&self.config.id_attribute, parcel.as_str())?;
        let mut url = Url::parse(&self.config.url).map_err(|e| ResolveError::InvalidUrl {
            url: self.config.url.clone(),
            message: e.to_string(),
        })?;

        url.query_pairs_mut()
            .append_pair("SERVICE", "WFS")
            .append_pair("VERSION", WFS_VERSION)
            .append_pair("REQUEST", "GetFeature")
            .append_pair("TYPENAME", &self.config.layer)
            .append_pair("OUTPUTFORMAT", OUTPUT_FORMAT)
            .append_pair("SRSNAME", &self.config.srs)
            .append_pair("CQL_FILTER", &filter.to_string());

        Ok(url.into())
    }

    /// Looks `parcel` up and returns its first matching feature.
    ///
    /// `Ok(None)` means the service answered with no feature.
    pub fn resolve(&self, parcel: &ParcelId) -> Result<Option<ResolvedFeature>, ResolveError> {
        let url = self.build_url(parcel)?;
        debug!(parcel = %parcel, url = %url, "Querying feature service");

        let response = self.client.get(&url)?;
        if response.content_type_contains("xml") || looks_like_xml(&response.body) {
            let report = String::from_utf8_lossy(&response.body);
            return Err(ResolveError::ServiceException(excerpt(&report)));
        }

        let collection = parse_feature_collection(&response.body)?;
        self.first_feature(parcel, collection)
    }

    fn first_feature(
        &self,
        parcel: &ParcelId,
        collection: FeatureCollection,
    ) -> Result<Option<ResolvedFeature>, ResolveError> {
        let count = collection.features.len();
        let crs = self.feature_crs(collection.crs.as_ref())?;
        let collection_bbox = collection.bbox;

        let Some(feature) = collection.features.into_iter().next() else {
            info!(parcel = %parcel, "No feature matches parcel");
            return Ok(None);
        };
        if count > 1 {
            debug!(parcel = %parcel, count, "Several features match, using the first");
        }

        let geometry = feature
            .geometry
            .as_ref()
            .ok_or(ResolveError::MissingGeometry)?
            .to_multi_polygon()?;

        let bbox = feature
            .bbox
            .as_deref()
            .and_then(|values| BoundingBox::from_geojson(values, crs))
            .or_else(|| {
                collection_bbox
                    .as_deref()
                    .and_then(|values| BoundingBox::from_geojson(values, crs))
            })
            .or_else(|| {
                geometry
                    .bounding_rect()
                    .map(|rect| BoundingBox::from_rect(rect, crs))
            })
            .ok_or(ResolveError::MissingGeometry)?;

        debug!(
            parcel = %parcel,
            crs = ?crs.map(|c| c.to_string()),
            bbox = %bbox.to_wms_param(),
            "Feature resolved"
        );

        Ok(Some(ResolvedFeature {
            geometry,
            crs,
            bbox,
        }))
    }

    /// Determines the feature CRS.
    ///
    /// A configured native CRS covered by the legacy shim table wins over
    /// whatever the service declares; its replacement must decode.
    fn feature_crs(
        &self,
        declared: Option<&NamedCrs>,
    ) -> Result<Option<SpatialReference>, ResolveError> {
        let configured = self.config.srs.as_str();
        let shimmed = apply_legacy_shim(configured);
        if shimmed != configured {
            debug!(from = configured, to = shimmed, "Applying legacy CRS shim");
            return Ok(Some(SpatialReference::decode(shimmed)?));
        }

        let Some(name) = declared.and_then(NamedCrs::name) else {
            warn!("Feature collection declares no CRS");
            return Ok(None);
        };

        match SpatialReference::decode(name) {
            Ok(srs) => Ok(Some(srs)),
            Err(e) => {
                warn!(crs = name, error = %e, "Declared CRS cannot be decoded");
                Ok(None)
            }
        }
    }
}

fn looks_like_xml(body: &[u8]) -> bool {
    body.iter()
        .find(|b| !b.is_ascii_whitespace())
        .map(|b| *b == b'<')
        .unwrap_or(false)
}

fn excerpt(text: &str) -> String {
    const MAX: usize = 200;
    let trimmed = text.trim();
    match trimmed.char_indices().nth(MAX) {
        Some((index, _)) => format!("{}...", &trimmed[..index]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::MockHttpClient;
    use crate::http::{HttpError, HttpResponse};

    const PARCEL: &str = "2016220000AB0123";

    fn config(srs: &str) -> FeatureServiceConfig {
        FeatureServiceConfig {
            url: "http://geo.example.org/geoserver/wfs".to_string(),
            layer: "qgis:geo_parcelle".to_string(),
            id_attribute: "geo_parcelle".to_string(),
            srs: srs.to_string(),
            ..FeatureServiceConfig::default()
        }
    }

    fn parcel() -> ParcelId {
        ParcelId::parse(Some(PARCEL), 3).unwrap()
    }

    fn json(body: &str) -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse::new("application/json", body.as_bytes().to_vec()))
    }

    fn collection(crs: Option<&str>) -> String {
        let crs = crs
            .map(|name| format!(r#","crs":{{"type":"name","properties":{{"name":"{}"}}}}"#, name))
            .unwrap_or_default();
        format!(
            r#"{{"type":"FeatureCollection","features":[{{"type":"Feature","geometry":
            {{"type":"Polygon","coordinates":[[[700000,6600000],[700100,6600000],[700100,6600050],[700000,6600000]]]}},
            "properties":{{}}}}]{}}}"#,
            crs
        )
    }

    fn resolver(mock: MockHttpClient, srs: &str) -> (FeatureResolver<MockHttpClient>, Arc<MockHttpClient>) {
        let client = Arc::new(mock);
        (FeatureResolver::new(Arc::clone(&client), config(srs)), client)
    }

    #[test]
    fn test_build_url_encodes_filter() {
        let (resolver, _) = resolver(MockHttpClient::new(), "EPSG:2154");
        let url = resolver.build_url(&parcel()).unwrap();

        assert!(url.starts_with("http://geo.example.org/geoserver/wfs?SERVICE=WFS&VERSION=1.0.0&REQUEST=GetFeature"));
        assert!(url.contains("TYPENAME=qgis%3Ageo_parcelle"));
        assert!(url.contains("OUTPUTFORMAT=application%2Fjson"));
        assert!(url.contains("SRSNAME=EPSG%3A2154"));
        assert!(url.contains("CQL_FILTER=geo_parcelle+%3D+%272016220000AB0123%27"));
        assert!(!url.contains("MAXFEATURES"));
    }

    #[test]
    fn test_build_url_keeps_existing_query() {
        let client = Arc::new(MockHttpClient::new());
        let mut cfg = config("EPSG:2154");
        cfg.url = "http://geo.example.org/ows?map=cadastre".to_string();
        let resolver = FeatureResolver::new(client, cfg);

        let url = resolver.build_url(&parcel()).unwrap();
        assert!(url.starts_with("http://geo.example.org/ows?map=cadastre&SERVICE=WFS"));
    }

    #[test]
    fn test_invalid_url() {
        let client = Arc::new(MockHttpClient::new());
        let mut cfg = config("EPSG:2154");
        cfg.url = "not a url".to_string();
        let resolver = FeatureResolver::new(Arc::clone(&client), cfg);

        assert!(matches!(
            resolver.resolve(&parcel()),
            Err(ResolveError::InvalidUrl { .. })
        ));
        assert!(client.calls().is_empty());
    }

    #[test]
    fn test_resolves_first_feature_with_declared_crs() {
        let body = collection(Some("urn:ogc:def:crs:EPSG::2154"));
        let (resolver, client) = resolver(MockHttpClient::new().route("wfs", json(&body)), "EPSG:2154");

        let feature = resolver.resolve(&parcel()).unwrap().unwrap();
        assert_eq!(feature.crs, Some(SpatialReference::epsg(2154)));
        assert_eq!(feature.bbox.min_x(), 700_000.0);
        assert_eq!(feature.bbox.max_y(), 6_600_050.0);
        assert_eq!(feature.bbox.srs(), Some(SpatialReference::epsg(2154)));
        assert_eq!(client.calls_to("wfs"), 1);
    }

    #[test]
    fn test_zero_features_is_none() {
        let body = r#"{"type":"FeatureCollection","features":[],"crs":null}"#;
        let (resolver, _) = resolver(MockHttpClient::new().route("wfs", json(body)), "EPSG:2154");

        assert!(resolver.resolve(&parcel()).unwrap().is_none());
    }

    #[test]
    fn test_missing_crs_is_unresolved() {
        let body = collection(None);
        let (resolver, _) = resolver(MockHttpClient::new().route("wfs", json(&body)), "EPSG:2154");

        let feature = resolver.resolve(&parcel()).unwrap().unwrap();
        assert_eq!(feature.crs, None);
        assert_eq!(feature.bbox.srs(), None);
    }

    #[test]
    fn test_unknown_declared_crs_is_unresolved() {
        let body = collection(Some("EPSG:32631"));
        let (resolver, _) = resolver(MockHttpClient::new().route("wfs", json(&body)), "EPSG:2154");

        assert_eq!(resolver.resolve(&parcel()).unwrap().unwrap().crs, None);
    }

    #[test]
    fn test_legacy_shim_overrides_declared_crs() {
        let body = collection(Some("EPSG:2154"));
        let (resolver, _) = resolver(MockHttpClient::new().route("wfs", json(&body)), "EPSG:3857");

        let feature = resolver.resolve(&parcel()).unwrap().unwrap();
        assert_eq!(feature.crs, Some(SpatialReference::epsg(900913)));
    }

    #[test]
    fn test_feature_bbox_member_wins() {
        let body = r#"{"type":"FeatureCollection","features":[{"type":"Feature",
            "geometry":{"type":"Polygon","coordinates":[[[1,1],[2,1],[2,2],[1,1]]]},
            "bbox":[0,0,5,5]}],"bbox":[-10,-10,10,10]}"#;
        let (resolver, _) = resolver(MockHttpClient::new().route("wfs", json(body)), "EPSG:2154");

        let feature = resolver.resolve(&parcel()).unwrap().unwrap();
        assert_eq!(feature.bbox.max_x(), 5.0);
    }

    #[test]
    fn test_service_exception_is_failure() {
        let report = r#"<?xml version="1.0"?><ServiceExceptionReport version="1.2.0">
            <ServiceException>Feature type unknown</ServiceException></ServiceExceptionReport>"#;
        let mock = MockHttpClient::new().route(
            "wfs",
            Ok(HttpResponse::new("text/xml", report.as_bytes().to_vec())),
        );
        let (resolver, _) = resolver(mock, "EPSG:2154");

        assert!(matches!(
            resolver.resolve(&parcel()),
            Err(ResolveError::ServiceException(msg)) if msg.contains("Feature type unknown")
        ));
    }

    #[test]
    fn test_http_failure_is_failure() {
        let (resolver, _) = resolver(MockHttpClient::new(), "EPSG:2154");
        assert!(matches!(
            resolver.resolve(&parcel()),
            Err(ResolveError::Http(HttpError::Request { .. }))
        ));
    }

    #[test]
    fn test_missing_geometry_is_failure() {
        let body = r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":null}]}"#;
        let (resolver, _) = resolver(MockHttpClient::new().route("wfs", json(body)), "EPSG:2154");

        assert!(matches!(
            resolver.resolve(&parcel()),
            Err(ResolveError::MissingGeometry)
        ));
    }

    #[test]
    fn test_bad_attribute_is_malformed_filter() {
        let client = Arc::new(MockHttpClient::new());
        let mut cfg = config("EPSG:2154");
        cfg.id_attribute = "geo parcelle".to_string();
        let resolver = FeatureResolver::new(Arc::clone(&client), cfg);

        assert!(matches!(
            resolver.resolve(&parcel()),
            Err(ResolveError::Filter(_))
        ));
        assert!(client.calls().is_empty());
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let long = "é".repeat(300);
        let cut = excerpt(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }
}
