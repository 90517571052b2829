//! Error types for the bordereau pipeline.
//!
//! Every variant ends the request with the empty result; the error is only
//! logged and never reaches the endpoint response.

use thiserror::Error;

use crate::artifact::ArtifactError;
use crate::feature::ResolveError;
use crate::map::MapError;
use crate::parcel::InvalidParcelId;

/// Reasons a pipeline run produced no image.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or malformed parcel identifier
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidParcelId),

    /// The feature service knows no such parcel
    #[error("no feature found for parcel {0}")]
    NotFound(String),

    /// Feature lookup failed
    #[error("feature resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    /// The thematic parcel raster could not be fetched
    #[error("parcel layer unavailable: {0}")]
    ParcelLayer(#[source] MapError),

    /// The composite could not be written
    #[error("persistence failed: {0}")]
    Persist(#[from] ArtifactError),
}

impl PipelineError {
    /// Short, stable name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InvalidInput(_) => "invalid_input",
            PipelineError::NotFound(_) => "not_found",
            PipelineError::Resolve(_) => "resolution_failure",
            PipelineError::ParcelLayer(_) => "parcel_layer_failure",
            PipelineError::Persist(_) => "persistence_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_kind() {
        let err = PipelineError::from(InvalidParcelId::Missing);
        assert_eq!(err.kind(), "invalid_input");
        assert_eq!(err.to_string(), "invalid input: missing parcel identifier");

        let err = PipelineError::ParcelLayer(MapError::Service("LayerNotDefined".into()));
        assert_eq!(err.kind(), "parcel_layer_failure");
        assert!(err.to_string().contains("LayerNotDefined"));
    }
}
