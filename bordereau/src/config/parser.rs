//! Maps INI keys onto [`ConfigFile`] fields, validating each value.
//!
//! Absent keys keep their default. A present but unusable value is an
//! [`ConfigFileError::InvalidValue`] naming the section and key.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::MAX_IMAGE_SIDE;
use super::file::ConfigFileError;
use super::settings::{ConfigFile, LayerSettings};
use crate::crs::SpatialReference;
use crate::feature::AttributeFilter;

/// Overlays the values found in `ini` on the defaults.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [feature] section
    if let Some(section) = ini.section(Some("feature")) {
        if let Some(v) = section.get("url") {
            config.feature.url = parse_url("feature", "url", v)?;
        }
        if let Some(v) = section.get("layer") {
            config.feature.layer = parse_non_empty("feature", "layer", v)?;
        }
        if let Some(v) = section.get("id_attribute") {
            let v = v.trim();
            if AttributeFilter::equals(v, "").is_err() {
                return Err(invalid(
                    "feature",
                    "id_attribute",
                    v,
                    "must be a plain attribute name",
                ));
            }
            config.feature.id_attribute = v.to_string();
        }
        if let Some(v) = section.get("srs") {
            config.feature.srs = parse_srs("feature", "srs", v)?;
        }
        if let Some(v) = section.get("min_id_length") {
            config.feature.min_id_length = parse_number(
                "feature",
                "min_id_length",
                v,
                "must be a non-negative integer",
            )?;
        }
    }

    // [cadastre] and [basemap] sections
    parse_layer(ini, "cadastre", &mut config.cadastre)?;
    parse_layer(ini, "basemap", &mut config.basemap)?;

    // [image] section
    if let Some(section) = ini.section(Some("image")) {
        if let Some(v) = section.get("width") {
            config.image.width = parse_side("width", v)?;
        }
        if let Some(v) = section.get("height") {
            config.image.height = parse_side("height", v)?;
        }
        if let Some(v) = section.get("buffer_distance") {
            let distance: f64 = parse_number(
                "image",
                "buffer_distance",
                v,
                "must be a non-negative number",
            )?;
            if !distance.is_finite() || distance < 0.0 {
                return Err(invalid(
                    "image",
                    "buffer_distance",
                    v,
                    "must be a non-negative number",
                ));
            }
            config.image.buffer_distance = distance;
        }
        if let Some(v) = section.get("scale_unit") {
            config.image.scale_unit = parse_non_empty("image", "scale_unit", v)?;
        }
        if let Some(v) = section.get("font") {
            let v = v.trim();
            config.image.font = if v.is_empty() {
                None
            } else {
                Some(expand_tilde(v))
            };
        }
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = section.get("temp_dir") {
            let v = v.trim();
            if !v.is_empty() {
                config.output.temp_dir = expand_tilde(v);
            }
        }
    }

    // [http] section
    if let Some(section) = ini.section(Some("http")) {
        if let Some(v) = section.get("timeout") {
            let timeout: u64 = parse_number(
                "http",
                "timeout",
                v,
                "must be a positive integer (seconds)",
            )?;
            if timeout == 0 {
                return Err(invalid(
                    "http",
                    "timeout",
                    v,
                    "must be a positive integer (seconds)",
                ));
            }
            config.http.timeout = timeout;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn parse_layer(ini: &Ini, name: &str, layer: &mut LayerSettings) -> Result<(), ConfigFileError> {
    let Some(section) = ini.section(Some(name)) else {
        return Ok(());
    };
    if let Some(v) = section.get("url") {
        layer.url = parse_url(name, "url", v)?;
    }
    if let Some(v) = section.get("layer") {
        layer.layer = parse_non_empty(name, "layer", v)?;
    }
    if let Some(v) = section.get("format") {
        let v = v.trim();
        if !v.starts_with("image/") {
            return Err(invalid(name, "format", v, "must be an image MIME type"));
        }
        layer.format = v.to_string();
    }
    if let Some(v) = section.get("srs") {
        layer.srs = parse_srs(name, "srs", v)?;
    }
    Ok(())
}

fn parse_url(section: &str, key: &str, value: &str) -> Result<String, ConfigFileError> {
    let value = value.trim();
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(value.to_string()),
        _ => Err(invalid(section, key, value, "must be an absolute http(s) URL")),
    }
}

fn parse_srs(section: &str, key: &str, value: &str) -> Result<String, ConfigFileError> {
    let value = value.trim();
    SpatialReference::parse(value)
        .map(|_| value.to_string())
        .map_err(|_| invalid(section, key, value, "expected a CRS code like 'EPSG:2154'"))
}

fn parse_side(key: &str, value: &str) -> Result<u32, ConfigFileError> {
    let reason = format!("must be an integer between 1 and {}", MAX_IMAGE_SIDE);
    let side: u32 = parse_number("image", key, value, &reason)?;
    if side == 0 || side > MAX_IMAGE_SIDE {
        return Err(invalid("image", key, value, &reason));
    }
    Ok(side)
}

fn parse_non_empty(section: &str, key: &str, value: &str) -> Result<String, ConfigFileError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid(section, key, value, "must not be empty"));
    }
    Ok(value.to_string())
}

fn parse_number<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// `~/x` becomes `<home>/x`; other paths are taken as written.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
