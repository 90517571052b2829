//! GeoJSON payloads returned by WFS `GetFeature` with a JSON output format.
//!
//! Only the members the resolver needs are deserialized; everything else
//! (properties, ids, paging counters) is ignored.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;

use super::ResolveError;

/// Top-level `FeatureCollection`.
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
    /// Legacy named CRS member (GeoJSON 2008), still emitted by GeoServer
    #[serde(default)]
    pub crs: Option<NamedCrs>,
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<GeometryObject>,
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct NamedCrs {
    #[serde(default)]
    pub properties: Option<NamedCrsProperties>,
}

#[derive(Debug, Deserialize)]
pub struct NamedCrsProperties {
    pub name: String,
}

impl NamedCrs {
    pub fn name(&self) -> Option<&str> {
        self.properties.as_ref().map(|p| p.name.as_str())
    }
}

/// Raw geometry object; coordinates are decoded once the type is known.
#[derive(Debug, Deserialize)]
pub struct GeometryObject {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: serde_json::Value,
}

type Ring = Vec<Vec<f64>>;

impl GeometryObject {
    /// Converts polygonal geometries into a multipolygon.
    pub fn to_multi_polygon(&self) -> Result<MultiPolygon<f64>, ResolveError> {
        match self.kind.as_str() {
            "Polygon" => {
                let rings: Vec<Ring> = self.decode_coordinates()?;
                Ok(MultiPolygon::new(vec![to_polygon(rings)?]))
            }
            "MultiPolygon" => {
                let polygons: Vec<Vec<Ring>> = self.decode_coordinates()?;
                let polygons = polygons
                    .into_iter()
                    .map(to_polygon)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(MultiPolygon::new(polygons))
            }
            other => Err(ResolveError::UnsupportedGeometry(other.to_string())),
        }
    }

    fn decode_coordinates<T: serde::de::DeserializeOwned>(&self) -> Result<T, ResolveError> {
        serde_json::from_value(self.coordinates.clone()).map_err(|e| {
            ResolveError::InvalidResponse(format!("bad {} coordinates: {}", self.kind, e))
        })
    }
}

/// Parses a `GetFeature` response body.
pub fn parse_feature_collection(body: &[u8]) -> Result<FeatureCollection, ResolveError> {
    serde_json::from_slice(body).map_err(|e| ResolveError::InvalidResponse(e.to_string()))
}

fn to_polygon(rings: Vec<Ring>) -> Result<Polygon<f64>, ResolveError> {
    let mut rings = rings.into_iter().map(to_line_string);
    let exterior = rings
        .next()
        .ok_or_else(|| ResolveError::InvalidResponse("polygon without rings".to_string()))??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn to_line_string(ring: Ring) -> Result<LineString<f64>, ResolveError> {
    ring.into_iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(ResolveError::InvalidResponse(format!(
                "position with {} ordinates",
                position.len()
            ))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}
