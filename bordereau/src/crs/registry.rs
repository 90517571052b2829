//! Projection definitions and legacy CRS compatibility shims.
//!
//! Definitions are proj4 strings understood by `proj4rs`. The set is limited
//! to the systems cadastral services in France publish: geographic WGS84 and
//! RGF93, Web Mercator, Lambert-93, Lambert II extended and the nine CC
//! conic zones.

/// Legacy CRS codes that must be swapped before use.
///
/// Some older services advertise `EPSG:3857` while their stack only knows it
/// under the historical `EPSG:900913` alias. Entries are `(legacy, replacement)`.
pub const LEGACY_CRS_SHIMS: &[(&str, &str)] = &[("EPSG:3857", "EPSG:900913")];

const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";
const RGF93_GEOGRAPHIC: &str = "+proj=longlat +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +no_defs";
const WEB_MERCATOR: &str =
    "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs";
const LAMBERT_93: &str = "+proj=lcc +lat_0=46.5 +lon_0=3 +lat_1=49 +lat_2=44 +x_0=700000 \
     +y_0=6600000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs";
const LAMBERT_2_EXTENDED: &str = "+proj=lcc +lat_1=46.8 +lat_0=46.8 +lon_0=0 +k_0=0.99987742 \
     +x_0=600000 +y_0=2200000 +a=6378249.2 +b=6356515 +towgs84=-168,-60,320,0,0,0,0 \
     +pm=paris +units=m +no_defs";

/// First and last EPSG codes of the CC conic zones (CC42 .. CC50).
const CC_ZONES: std::ops::RangeInclusive<u32> = 3942..=3950;

/// Returns the proj4 definition for an EPSG code, if registered.
pub fn proj_definition(code: u32) -> Option<String> {
    match code {
        4326 => Some(WGS84.to_string()),
        4171 => Some(RGF93_GEOGRAPHIC.to_string()),
        3857 | 900913 => Some(WEB_MERCATOR.to_string()),
        2154 => Some(LAMBERT_93.to_string()),
        27572 => Some(LAMBERT_2_EXTENDED.to_string()),
        c if CC_ZONES.contains(&c) => Some(conic_zone(c - 3900)),
        _ => None,
    }
}

/// Returns true for codes whose axes are longitude/latitude in degrees.
pub fn is_geographic(code: u32) -> bool {
    matches!(code, 4326 | 4171)
}

/// Returns the replacement for a legacy CRS code, or the code unchanged.
///
/// Comparison is case-insensitive. Only codes listed in
/// [`LEGACY_CRS_SHIMS`] are rewritten.
pub fn apply_legacy_shim(code: &str) -> &str {
    LEGACY_CRS_SHIMS
        .iter()
        .find(|(legacy, _)| legacy.eq_ignore_ascii_case(code.trim()))
        .map(|(_, replacement)| *replacement)
        .unwrap_or(code)
}

/// CC zone `n` is centred on latitude `n`, standard parallels at `n ± 0.75`.
fn conic_zone(latitude: u32) -> String {
    let lat = latitude as f64;
    let false_northing = (latitude - 41) * 1_000_000 + 200_000;
    format!(
        "+proj=lcc +lat_0={} +lon_0=3 +lat_1={} +lat_2={} +x_0=1700000 +y_0={} \
         +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs",
        lat,
        lat - 0.75,
        lat + 0.75,
        false_northing
    )
}
