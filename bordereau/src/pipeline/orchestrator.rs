//! Sequencing of the bordereau stages.

use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, error, info, info_span, warn};

use super::stage::{Degradation, StageResult};
use super::PipelineError;
use crate::artifact::{ArtifactStore, PersistedArtifact};
use crate::compose::{CompositionInput, FontBook, ImageCompositor};
use crate::config::PipelineConfig;
use crate::crs::{apply_legacy_shim, SpatialReference};
use crate::feature::{FeatureResolver, ResolvedFeature};
use crate::geometry::{GeometryCalculator, Region};
use crate::http::HttpClient;
use crate::map::{GetMapRequest, MapTileFetcher};
use crate::parcel::ParcelId;

/// Result of one pipeline run.
#[derive(Debug)]
pub enum Outcome {
    /// A composite was produced and persisted
    Image {
        artifact: PersistedArtifact,
        degradations: Vec<Degradation>,
    },
    /// No image; the reason is for logs only
    Empty(PipelineError),
}

impl Outcome {
    pub fn is_image(&self) -> bool {
        matches!(self, Outcome::Image { .. })
    }
}

/// Parcel plan image pipeline.
///
/// Runs synchronously on the caller's thread. The pipeline holds only
/// read-only state and can be shared between threads.
pub struct BordereauPipeline<C: HttpClient> {
    config: PipelineConfig,
    resolver: FeatureResolver<C>,
    calculator: GeometryCalculator,
    fetcher: MapTileFetcher<C>,
    compositor: ImageCompositor,
    store: ArtifactStore,
}

impl<C: HttpClient> BordereauPipeline<C> {
    pub fn new(client: Arc<C>, config: PipelineConfig, fonts: FontBook) -> Self {
        Self {
            resolver: FeatureResolver::new(Arc::clone(&client), config.feature.clone()),
            calculator: GeometryCalculator::new(config.image.buffer_distance),
            fetcher: MapTileFetcher::new(client),
            compositor: ImageCompositor::new(fonts, config.image.scale_unit.clone()),
            store: ArtifactStore::new(config.temp_dir.clone()),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Produces the image for a raw `parcelle` value.
    pub fn run(&self, parcel: Option<&str>) -> Outcome {
        let span = info_span!("bordereau", parcel = parcel.unwrap_or(""));
        let _enter = span.enter();

        let mut degradations = Vec::new();
        match self.execute(parcel, &mut degradations) {
            Ok(artifact) => {
                if degradations.is_empty() {
                    info!(path = %artifact.path().display(), "Bordereau image produced");
                } else {
                    let reasons: Vec<String> =
                        degradations.iter().map(ToString::to_string).collect();
                    warn!(
                        path = %artifact.path().display(),
                        degradations = ?reasons,
                        "Bordereau image produced with degradations"
                    );
                }
                Outcome::Image {
                    artifact,
                    degradations,
                }
            }
            Err(e) => {
                match &e {
                    PipelineError::InvalidInput(_) | PipelineError::NotFound(_) => {
                        info!(kind = e.kind(), error = %e, "No bordereau image")
                    }
                    _ => error!(kind = e.kind(), error = %e, "Bordereau pipeline failed"),
                }
                Outcome::Empty(e)
            }
        }
    }

    fn execute(
        &self,
        parcel: Option<&str>,
        degradations: &mut Vec<Degradation>,
    ) -> Result<PersistedArtifact, PipelineError> {
        let parcel = self.validate(parcel).collect_into(degradations)?;
        let feature = self.resolve(&parcel).collect_into(degradations)?;
        let region = self
            .calculator
            .compute_region(&feature, self.target_srs())
            .collect_into(degradations)?;
        let parcel_raster = self.fetch_parcel_raster(&region).collect_into(degradations)?;
        let basemap = self.fetch_basemap(&region).collect_into(degradations)?;

        let image = self.compositor.compose(&CompositionInput {
            parcel: &parcel_raster,
            basemap: basemap.as_ref(),
            highlight: region.highlight.as_ref(),
            frame: &region.bbox,
            ground_distance: region.ground_distance,
            width: self.config.image.width,
            height: self.config.image.height,
        });

        self.persist(&parcel, &image).collect_into(degradations)
    }

    fn validate(&self, raw: Option<&str>) -> StageResult<ParcelId> {
        match ParcelId::parse(raw, self.config.feature.min_id_length) {
            Ok(parcel) => StageResult::Ok(parcel),
            Err(e) => StageResult::ResolutionFailure(e.into()),
        }
    }

    fn resolve(&self, parcel: &ParcelId) -> StageResult<ResolvedFeature> {
        match self.resolver.resolve(parcel) {
            Ok(Some(feature)) => StageResult::Ok(feature),
            Ok(None) => {
                StageResult::ResolutionFailure(PipelineError::NotFound(parcel.to_string()))
            }
            Err(e) => StageResult::ResolutionFailure(e.into()),
        }
    }

    /// CRS of the thematic layer after the legacy shim; frames both rasters.
    fn target_srs(&self) -> Option<SpatialReference> {
        let configured = apply_legacy_shim(&self.config.cadastre.srs);
        match SpatialReference::decode(configured) {
            Ok(srs) => Some(srs),
            Err(e) => {
                warn!(srs = configured, error = %e, "Layer CRS not decodable, region stays native");
                None
            }
        }
    }

    fn fetch_parcel_raster(&self, region: &Region) -> StageResult<RgbaImage> {
        let request = GetMapRequest::for_layer(
            &self.config.cadastre,
            region.bbox,
            self.config.image.width,
            self.config.image.height,
        )
        .with_transparent(true);

        match self.fetcher.fetch(&request) {
            Ok(raster) => StageResult::Ok(raster),
            Err(e) => StageResult::Fatal(PipelineError::ParcelLayer(e)),
        }
    }

    fn fetch_basemap(&self, region: &Region) -> StageResult<Option<RgbaImage>> {
        let request = GetMapRequest::for_layer(
            &self.config.basemap,
            region.bbox,
            self.config.image.width,
            self.config.image.height,
        );

        match self.fetcher.fetch(&request) {
            Ok(raster) => StageResult::Ok(Some(raster)),
            Err(e) => {
                error!(layer = %request.layer, error = %e, "Basemap unavailable, drawing without it");
                StageResult::Degraded(None, vec![Degradation::BasemapUnavailable(e.to_string())])
            }
        }
    }

    fn persist(&self, parcel: &ParcelId, image: &RgbaImage) -> StageResult<PersistedArtifact> {
        debug!(dir = %self.store.dir().display(), "Persisting artifact");
        match self.store.persist(parcel, image) {
            Ok(artifact) => StageResult::Ok(artifact),
            Err(e) => StageResult::Fatal(e.into()),
        }
    }
}
