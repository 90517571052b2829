//! `render` command: runs the pipeline for one parcel.

use std::path::{Path, PathBuf};

use bordereau::artifact::PersistedArtifact;
use bordereau::pipeline::{Degradation, Outcome};
use clap::Args;
use tracing::warn;

use crate::error::CliError;
use crate::runner::{write_output, CliRunner};

/// Arguments for `bordereau render`.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Parcel identifier, as stored in the feature service
    pub parcelle: String,

    /// Where to write the PNG (default: ./BP-<parcelle>.png)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Keep the persisted artifact in the configured temp directory
    #[arg(long)]
    pub keep: bool,
}

/// Runs the pipeline and writes the image.
pub fn run(args: RenderArgs, config: Option<&Path>, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(config, debug)?;
    runner.log_startup("render");

    let pipeline = runner.create_pipeline()?;
    let outcome = pipeline.run(Some(&args.parcelle));

    let written = deliver(outcome, args.output.as_deref(), args.keep)?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

/// Writes the image of a successful run and returns the paths left on disk.
///
/// Without `--output` the image lands in the working directory under the
/// artifact's own file name.
pub fn deliver(outcome: Outcome, output: Option<&Path>, keep: bool) -> Result<Vec<PathBuf>, CliError> {
    let (artifact, degradations) = match outcome {
        Outcome::Image {
            artifact,
            degradations,
        } => (artifact, degradations),
        Outcome::Empty(reason) => return Err(CliError::NoImage(reason)),
    };

    report_degradations(&degradations);

    let mut paths = Vec::new();
    let target = output
        .map(Path::to_path_buf)
        .or_else(|| (!keep).then(|| default_output(&artifact)));

    if let Some(target) = target {
        write_output(&target, artifact.png())?;
        paths.push(target);
    }

    if keep {
        paths.push(artifact.keep());
    }

    Ok(paths)
}

fn default_output(artifact: &PersistedArtifact) -> PathBuf {
    artifact
        .path()
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("bordereau.png"))
}

fn report_degradations(degradations: &[Degradation]) {
    for degradation in degradations {
        warn!(%degradation, "Image produced with reduced content");
        eprintln!("Warning: {}", degradation);
    }
}
