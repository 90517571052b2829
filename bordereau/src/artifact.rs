//! PNG persistence of composite images.
//!
//! Each persist writes a uniquely named staging file in the target directory
//! and renames it over `BP-<parcel>.png`, so concurrent requests for the same
//! parcel never interleave bytes. The returned [`PersistedArtifact`] owns the
//! file: it is removed on drop unless [`PersistedArtifact::keep`] is called.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use thiserror::Error;
use tracing::{debug, trace};

use crate::parcel::ParcelId;

/// Errors raised while persisting an artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArtifactError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Writes artifacts into one directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/BP-<parcel>.png`, with path-unsafe characters replaced by `_`.
    pub fn artifact_path(&self, parcel: &ParcelId) -> PathBuf {
        let name: String = parcel
            .as_str()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("BP-{}.png", name))
    }

    /// Encodes `image` and publishes it under the parcel's artifact name.
    pub fn persist(
        &self,
        parcel: &ParcelId,
        image: &RgbaImage,
    ) -> Result<PersistedArtifact, ArtifactError> {
        let png = encode_png(image)?;
        let path = self.artifact_path(parcel);

        std::fs::create_dir_all(&self.dir).map_err(|e| ArtifactError::io(&self.dir, e))?;

        let mut staging = tempfile::Builder::new()
            .prefix(".BP-")
            .suffix(".png.tmp")
            .tempfile_in(&self.dir)
            .map_err(|e| ArtifactError::io(&self.dir, e))?;
        trace!(staging = %staging.path().display(), "Writing staging file");

        staging
            .write_all(&png)
            .map_err(|e| ArtifactError::io(staging.path(), e))?;
        staging
            .as_file()
            .sync_all()
            .map_err(|e| ArtifactError::io(staging.path(), e))?;
        staging
            .persist(&path)
            .map_err(|e| ArtifactError::io(&path, e.error))?;

        debug!(path = %path.display(), bytes = png.len(), "Artifact persisted");
        Ok(PersistedArtifact {
            path,
            png,
            keep: false,
        })
    }
}

/// Encodes an RGBA image as PNG in memory.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ArtifactError> {
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| ArtifactError::Encode(e.to_string()))?;
    Ok(png)
}

/// A persisted PNG and its file.
///
/// The file is deleted when this value is dropped, unless kept.
#[derive(Debug)]
pub struct PersistedArtifact {
    path: PathBuf,
    png: Vec<u8>,
    keep: bool,
}

impl PersistedArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The encoded bytes, identical to what was written.
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Moves the encoded bytes out, leaving the artifact empty.
    pub fn take_png(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.png)
    }

    /// Keeps the file on disk past this handle and returns its path.
    pub fn keep(mut self) -> PathBuf {
        self.keep = true;
        self.path.clone()
    }
}

impl Drop for PersistedArtifact {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), error = %e, "Artifact cleanup skipped");
        }
    }
}
