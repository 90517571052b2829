//! Configuration for the bordereau pipeline.
//!
//! - [`ConfigFile`] mirrors `~/.bordereau/config.ini`, one struct per section
//! - [`PipelineConfig`] is the explicit, read-only configuration a pipeline
//!   run consumes, built with [`ConfigFile::pipeline_config`]
//!
//! # Example
//!
//! ```
//! use bordereau::config::ConfigFile;
//!
//! let config = ConfigFile::default().pipeline_config();
//! assert_eq!(config.feature.srs, "EPSG:2154");
//! assert_eq!(config.image.width, 595);
//! ```

mod defaults;
mod file;
mod parser;
mod pipeline;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use pipeline::{FeatureServiceConfig, ImageConfig, MapLayerConfig, PipelineConfig};
pub use settings::*;
