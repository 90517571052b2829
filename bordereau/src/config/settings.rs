//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Feature service used to look parcels up
    pub feature: FeatureSettings,
    /// Thematic parcel layer
    pub cadastre: LayerSettings,
    /// Basemap layer drawn under the parcels
    pub basemap: LayerSettings,
    /// Output image settings
    pub image: ImageSettings,
    /// Where artifacts are written
    pub output: OutputSettings,
    /// HTTP client settings
    pub http: HttpSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Feature service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSettings {
    /// WFS endpoint URL
    pub url: String,
    /// Feature type name holding the parcels
    pub layer: String,
    /// Attribute compared against the parcel identifier
    pub id_attribute: String,
    /// Native CRS of the parcel layer (also requested as `SRSNAME`)
    pub srs: String,
    /// Identifiers shorter than this are refused
    pub min_id_length: usize,
}

/// One WMS layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSettings {
    /// WMS endpoint URL
    pub url: String,
    /// Layer name
    pub layer: String,
    /// Requested image format (MIME type)
    pub format: String,
    /// CRS the layer is requested in
    pub srs: String,
}

/// Output image configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSettings {
    pub width: u32,
    pub height: u32,
    /// Buffer around the parcel, in the parcel CRS units
    pub buffer_distance: f64,
    /// Unit label appended to the scale bar value
    pub scale_unit: String,
    /// Font file for labels; system fonts are searched when unset
    pub font: Option<PathBuf>,
}

/// Artifact output configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Directory receiving `BP-<parcel>.png`
    pub temp_dir: PathBuf,
}

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpSettings {
    /// Request timeout in seconds
    pub timeout: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
