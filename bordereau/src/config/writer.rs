//! Commented INI rendering of a [`ConfigFile`].
//!
//! Every key is written, including defaults, so a saved file documents the
//! full set of settings.

use std::path::Path;

use super::settings::ConfigFile;

pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let font = config
        .image
        .font
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[feature]
; WFS endpoint queried for the parcel geometry (WFS 1.0.0, GeoJSON output)
url = {}
; Feature type holding the parcels
layer = {}
; Attribute compared with the requested parcel identifier
id_attribute = {}
; Native CRS of the parcel layer. EPSG:3857 is requested as EPSG:900913.
srs = {}
; Identifiers shorter than this many characters are refused
min_id_length = {}

[cadastre]
; WMS layer drawn over the basemap (requested with TRANSPARENT=TRUE)
url = {}
layer = {}
format = {}
srs = {}

[basemap]
; WMS layer drawn under the parcels. Failures leave the area transparent.
url = {}
layer = {}
format = {}
srs = {}

[image]
; Output size in pixels
width = {}
height = {}
; Buffer around the parcel, in units of the parcel CRS
buffer_distance = {}
; Unit label of the scale bar
scale_unit = {}
; Font file for the compass and scale labels (empty = search system fonts)
font = {}

[output]
; Directory receiving BP-<parcel>.png
temp_dir = {}

[http]
; Request timeout in seconds for feature and map requests
timeout = {}

[logging]
; Log file path
file = {}
"#,
        config.feature.url,
        config.feature.layer,
        config.feature.id_attribute,
        config.feature.srs,
        config.feature.min_id_length,
        config.cadastre.url,
        config.cadastre.layer,
        config.cadastre.format,
        config.cadastre.srs,
        config.basemap.url,
        config.basemap.layer,
        config.basemap.format,
        config.basemap.srs,
        config.image.width,
        config.image.height,
        config.image.buffer_distance,
        config.image.scale_unit,
        font,
        path_to_string(&config.output.temp_dir),
        config.http.timeout,
        path_to_string(&config.logging.file),
    )
}

/// Paths under the home directory are written as `~/...`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::super::settings::ConfigFile;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.feature.url = "https://cadastre.example.org/wfs?map=parcels".to_string();
        config.cadastre.srs = "EPSG:3857".to_string();
        config.basemap.format = "image/jpeg".to_string();
        config.image.width = 1024;
        config.image.buffer_distance = 25.5;
        config.image.font = Some(temp_dir.path().join("font.ttf"));
        config.output.temp_dir = temp_dir.path().join("out");
        config.http.timeout = 12;

        config.save_to(&config_path).unwrap();

        let loaded = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_default_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        ConfigFile::default().save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(loaded.image.font, None::<PathBuf>);
        assert_eq!(loaded.image.scale_unit, "mètres");
        assert_eq!(loaded, ConfigFile::default());
    }
}
