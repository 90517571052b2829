//! CLI runner for common setup and operations.
//!
//! Encapsulates configuration loading, logging initialization and pipeline
//! construction so command handlers stay small.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bordereau::compose::FontBook;
use bordereau::config::{config_file_path, ConfigFile};
use bordereau::http::ReqwestClient;
use bordereau::logging::{init_logging_to, LoggingGuard};
use bordereau::pipeline::BordereauPipeline;
use tracing::info;

use crate::error::CliError;

/// Resolves the configuration path, falling back to `~/.bordereau/config.ini`.
pub fn resolve_config_path(config: Option<&Path>) -> PathBuf {
    config.map(Path::to_path_buf).unwrap_or_else(config_file_path)
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps the log file writer alive while the runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    /// Loads the configuration and initializes logging.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Explicit configuration file, or `None` for the default
    /// * `debug_mode` - When true, enables debug-level logging unless RUST_LOG is set
    pub fn new(config_path: Option<&Path>, debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load_from(&resolve_config_path(config_path))?;

        let logging_guard = init_logging_to(&config.logging.file, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Bordereau v{}", bordereau::VERSION);
        info!("Bordereau CLI: {} command", command);
    }

    /// Builds a pipeline over a blocking HTTP client using the loaded settings.
    pub fn create_pipeline(&self) -> Result<BordereauPipeline<ReqwestClient>, CliError> {
        let client = ReqwestClient::with_timeout(self.config.http.timeout)?;
        let fonts = FontBook::load(self.config.image.font.as_deref());
        if fonts.is_empty() {
            info!("No font available, scale bar labels and north marker text are skipped");
        }

        Ok(BordereauPipeline::new(
            Arc::new(client),
            self.config.pipeline_config(),
            fonts,
        ))
    }
}

/// Writes `data` to `path`, creating parent directories.
pub fn write_output(path: &Path, data: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CliError::FileWrite {
            path: path.to_path_buf(),
            error: e,
        })?;
    }

    std::fs::write(path, data).map_err(|e| CliError::FileWrite {
        path: path.to_path_buf(),
        error: e,
    })?;

    info!(path = %path.display(), bytes = data.len(), "Image written");
    Ok(())
}
