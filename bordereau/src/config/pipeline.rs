//! Explicit configuration handed to the bordereau pipeline.
//!
//! [`PipelineConfig`] is built once from the [`ConfigFile`] and shared
//! read-only by every request.

use std::path::PathBuf;

use super::defaults::*;
use super::settings::{ConfigFile, LayerSettings};
use crate::geometry::DEFAULT_BUFFER_DISTANCE;
use crate::parcel::DEFAULT_MIN_ID_LENGTH;

/// Feature service used by the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureServiceConfig {
    pub url: String,
    pub layer: String,
    pub id_attribute: String,
    /// Native CRS of the parcel layer
    pub srs: String,
    pub min_id_length: usize,
}

impl Default for FeatureServiceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WFS_URL.to_string(),
            layer: DEFAULT_PARCEL_LAYER.to_string(),
            id_attribute: DEFAULT_ID_ATTRIBUTE.to_string(),
            srs: DEFAULT_SRS.to_string(),
            min_id_length: DEFAULT_MIN_ID_LENGTH,
        }
    }
}

/// A WMS layer requested with `GetMap`.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayerConfig {
    pub url: String,
    pub layer: String,
    pub format: String,
    pub srs: String,
}

impl MapLayerConfig {
    pub fn new(url: impl Into<String>, layer: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            layer: layer.into(),
            format: DEFAULT_FORMAT.to_string(),
            srs: DEFAULT_SRS.to_string(),
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_srs(mut self, srs: impl Into<String>) -> Self {
        self.srs = srs.into();
        self
    }
}

impl From<&LayerSettings> for MapLayerConfig {
    fn from(settings: &LayerSettings) -> Self {
        Self::new(settings.url.clone(), settings.layer.clone())
            .with_format(settings.format.clone())
            .with_srs(settings.srs.clone())
    }
}

/// Output image parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageConfig {
    pub width: u32,
    pub height: u32,
    pub buffer_distance: f64,
    pub scale_unit: String,
    pub font: Option<PathBuf>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_IMAGE_WIDTH,
            height: DEFAULT_IMAGE_HEIGHT,
            buffer_distance: DEFAULT_BUFFER_DISTANCE,
            scale_unit: DEFAULT_SCALE_UNIT.to_string(),
            font: None,
        }
    }
}

/// Everything a pipeline run needs, with no hidden inherited state.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub feature: FeatureServiceConfig,
    /// Thematic parcel layer; its CRS frames both rasters
    pub cadastre: MapLayerConfig,
    pub basemap: MapLayerConfig,
    pub image: ImageConfig,
    /// Directory receiving the persisted artifacts
    pub temp_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feature: FeatureServiceConfig::default(),
            cadastre: MapLayerConfig::new(DEFAULT_WMS_URL, DEFAULT_PARCEL_LAYER),
            basemap: MapLayerConfig::new(DEFAULT_WMS_URL, DEFAULT_BASEMAP_LAYER),
            image: ImageConfig::default(),
            temp_dir: default_temp_dir(),
        }
    }
}

impl ConfigFile {
    /// Builds the pipeline configuration from the loaded settings.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            feature: FeatureServiceConfig {
                url: self.feature.url.clone(),
                layer: self.feature.layer.clone(),
                id_attribute: self.feature.id_attribute.clone(),
                srs: self.feature.srs.clone(),
                min_id_length: self.feature.min_id_length,
            },
            cadastre: MapLayerConfig::from(&self.cadastre),
            basemap: MapLayerConfig::from(&self.basemap),
            image: ImageConfig {
                width: self.image.width,
                height: self.image.height,
                buffer_distance: self.image.buffer_distance,
                scale_unit: self.image.scale_unit.clone(),
                font: self.image.font.clone(),
            },
            temp_dir: self.output.temp_dir.clone(),
        }
    }
}
