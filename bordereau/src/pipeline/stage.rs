//! Tagged stage results.
//!
//! Every stage of the bordereau pipeline reports through [`StageResult`] so
//! the orchestrator consumes success, degradation and failure the same way.

use std::fmt;

use super::PipelineError;

/// A non-fatal problem recorded on a successful outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// The feature's spatial reference could not be determined
    UnresolvedCrs,
    /// The buffered envelope could not be moved to the layer CRS
    ReprojectionFailed(String),
    /// The highlight geometry could not be prepared
    HighlightUnavailable(String),
    /// No ground distance; the scale bar is omitted
    GroundDistanceUnavailable(String),
    /// The basemap raster could not be fetched; the region stays transparent
    BasemapUnavailable(String),
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::UnresolvedCrs => write!(f, "spatial reference unresolved"),
            Degradation::ReprojectionFailed(reason) => {
                write!(f, "envelope reprojection failed: {}", reason)
            }
            Degradation::HighlightUnavailable(reason) => {
                write!(f, "highlight unavailable: {}", reason)
            }
            Degradation::GroundDistanceUnavailable(reason) => {
                write!(f, "ground distance unavailable: {}", reason)
            }
            Degradation::BasemapUnavailable(reason) => write!(f, "basemap unavailable: {}", reason),
        }
    }
}

/// Outcome of a single pipeline stage.
#[derive(Debug)]
pub enum StageResult<T> {
    /// Stage completed normally
    Ok(T),
    /// Stage produced a usable value with the listed problems
    Degraded(T, Vec<Degradation>),
    /// The input could not be resolved; the request ends without output
    ResolutionFailure(PipelineError),
    /// A required step failed; the request ends without output
    Fatal(PipelineError),
}

impl<T> StageResult<T> {
    /// `Ok` when `degradations` is empty, `Degraded` otherwise.
    pub fn with_degradations(value: T, degradations: Vec<Degradation>) -> Self {
        if degradations.is_empty() {
            StageResult::Ok(value)
        } else {
            StageResult::Degraded(value, degradations)
        }
    }

    /// Extracts the value, appending any degradations to `sink`.
    pub fn collect_into(self, sink: &mut Vec<Degradation>) -> Result<T, PipelineError> {
        match self {
            StageResult::Ok(value) => Ok(value),
            StageResult::Degraded(value, reasons) => {
                sink.extend(reasons);
                Ok(value)
            }
            StageResult::ResolutionFailure(err) | StageResult::Fatal(err) => Err(err),
        }
    }
}
