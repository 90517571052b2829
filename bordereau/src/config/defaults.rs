//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::geometry::DEFAULT_BUFFER_DISTANCE;
use crate::http::DEFAULT_TIMEOUT_SECS;
use crate::parcel::DEFAULT_MIN_ID_LENGTH;

// =============================================================================
// Services
// =============================================================================

pub const DEFAULT_WFS_URL: &str = "http://localhost:8080/geoserver/wfs";
pub const DEFAULT_WMS_URL: &str = "http://localhost:8080/geoserver/wms";
pub const DEFAULT_PARCEL_LAYER: &str = "qgis:geo_parcelle";
pub const DEFAULT_ID_ATTRIBUTE: &str = "geo_parcelle";
pub const DEFAULT_BASEMAP_LAYER: &str = "osm:google";
pub const DEFAULT_SRS: &str = "EPSG:2154";
pub const DEFAULT_FORMAT: &str = "image/png";

// =============================================================================
// Image
// =============================================================================

pub const DEFAULT_IMAGE_WIDTH: u32 = 595;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 380;
pub const DEFAULT_SCALE_UNIT: &str = "mètres";

/// Largest accepted image side, in pixels.
pub const MAX_IMAGE_SIDE: u32 = 8192;

pub const DEFAULT_LOG_FILE_NAME: &str = "bordereau.log";

/// Default artifact directory: `<system temp>/bordereau`.
pub fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("bordereau")
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            feature: FeatureSettings {
                url: DEFAULT_WFS_URL.to_string(),
                layer: DEFAULT_PARCEL_LAYER.to_string(),
                id_attribute: DEFAULT_ID_ATTRIBUTE.to_string(),
                srs: DEFAULT_SRS.to_string(),
                min_id_length: DEFAULT_MIN_ID_LENGTH,
            },
            cadastre: LayerSettings {
                url: DEFAULT_WMS_URL.to_string(),
                layer: DEFAULT_PARCEL_LAYER.to_string(),
                format: DEFAULT_FORMAT.to_string(),
                srs: DEFAULT_SRS.to_string(),
            },
            basemap: LayerSettings {
                url: DEFAULT_WMS_URL.to_string(),
                layer: DEFAULT_BASEMAP_LAYER.to_string(),
                format: DEFAULT_FORMAT.to_string(),
                srs: DEFAULT_SRS.to_string(),
            },
            image: ImageSettings {
                width: DEFAULT_IMAGE_WIDTH,
                height: DEFAULT_IMAGE_HEIGHT,
                buffer_distance: DEFAULT_BUFFER_DISTANCE,
                scale_unit: DEFAULT_SCALE_UNIT.to_string(),
                font: None,
            },
            output: OutputSettings {
                temp_dir: default_temp_dir(),
            },
            http: HttpSettings {
                timeout: DEFAULT_TIMEOUT_SECS,
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
