//! Parcel plan image pipeline.
//!
//! # Architecture
//!
//! ```text
//! ValidateInput → ResolveFeature → ComputeRegion → FetchParcelRaster
//!     → FetchBasemapRaster (optional) → Composite → Persist
//! ```
//!
//! Each stage reports a [`StageResult`]. Failures before composition and
//! persistence failures end the run with [`Outcome::Empty`]; degradations
//! (basemap missing, CRS unresolved, no ground distance) are collected on
//! [`Outcome::Image`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bordereau::compose::FontBook;
//! use bordereau::config::ConfigFile;
//! use bordereau::http::ReqwestClient;
//! use bordereau::pipeline::{BordereauPipeline, Outcome};
//!
//! let config = ConfigFile::load()?.pipeline_config();
//! let pipeline = BordereauPipeline::new(Arc::new(ReqwestClient::new()?), config, FontBook::system());
//! if let Outcome::Image { artifact, .. } = pipeline.run(Some("2016220000AB0123")) {
//!     std::fs::write("plan.png", artifact.png())?;
//! }
//! ```

mod error;
mod orchestrator;
mod stage;

pub use error::PipelineError;
pub use orchestrator::{BordereauPipeline, Outcome};
pub use stage::{Degradation, StageResult};
