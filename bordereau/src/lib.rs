//! Bordereau - parcel plan images from OGC services
//!
//! Given a cadastral parcel identifier, this library looks the parcel up on a
//! WFS, frames a buffered region around it, fetches the parcel layer and a
//! basemap from WMS services, and composes them into one annotated PNG with
//! the parcel highlighted, a north arrow and a scale bar.
//!
//! # High-Level API
//!
//! ```ignore
//! use std::sync::Arc;
//! use bordereau::compose::FontBook;
//! use bordereau::config::ConfigFile;
//! use bordereau::endpoint::ImageEndpoint;
//! use bordereau::http::ReqwestClient;
//! use bordereau::pipeline::BordereauPipeline;
//!
//! let config = ConfigFile::load()?;
//! let client = Arc::new(ReqwestClient::with_timeout(config.http.timeout)?);
//! let pipeline = BordereauPipeline::new(client, config.pipeline_config(), FontBook::system());
//! let endpoint = ImageEndpoint::new(pipeline);
//!
//! let response = endpoint.handle_query("parcelle=2016220000AB0123");
//! ```

pub mod artifact;
pub mod compose;
pub mod config;
pub mod crs;
pub mod endpoint;
pub mod feature;
pub mod geometry;
pub mod http;
pub mod logging;
pub mod map;
pub mod parcel;
pub mod pipeline;

/// Version of the bordereau library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
