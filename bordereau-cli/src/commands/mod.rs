//! CLI command implementations.
//!
//! - [`render`] - Render the plan image for one parcel
//! - [`config`] - Configuration file initialization and display

pub mod config;
pub mod render;
