//! Configuration management CLI commands.
//!
//! `init-config` writes a commented default file and `show-config` prints the
//! effective settings (file values merged over defaults).

use std::path::Path;

use bordereau::config::ConfigFile;

use crate::error::CliError;
use crate::runner::resolve_config_path;

/// Writes the default configuration, refusing to overwrite unless `force`.
pub fn run_init(config: Option<&Path>, force: bool) -> Result<(), CliError> {
    let path = resolve_config_path(config);

    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "'{}' already exists. Use --force to overwrite it.",
            path.display()
        )));
    }

    ConfigFile::default().save_to(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

/// Renders the effective configuration as INI text.
pub fn effective_config(config: Option<&Path>) -> Result<String, CliError> {
    let path = resolve_config_path(config);
    let loaded = ConfigFile::load_from(&path)?;
    Ok(loaded.to_ini_string())
}

/// Prints the effective configuration.
pub fn run_show(config: Option<&Path>) -> Result<(), CliError> {
    let path = resolve_config_path(config);
    println!("# {}", path.display());
    println!("{}", effective_config(Some(&path))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");

        run_init(Some(&path), false).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[image]\nwidth = 800\n").unwrap();

        let result = run_init(Some(&path), false);

        assert!(matches!(result, Err(CliError::Config(_))));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[image]\nwidth = 800\n"
        );
    }

    #[test]
    fn test_init_force_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[image]\nwidth = 800\n").unwrap();

        run_init(Some(&path), true).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_effective_config_merges_file_over_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[image]\nwidth = 800\n").unwrap();

        let text = effective_config(Some(&path)).unwrap();
        let reloaded_path = temp.path().join("effective.ini");
        std::fs::write(&reloaded_path, &text).unwrap();
        let reloaded = ConfigFile::load_from(&reloaded_path).unwrap();

        assert_eq!(reloaded.image.width, 800);
        assert_eq!(reloaded.image.height, ConfigFile::default().image.height);
    }

    #[test]
    fn test_effective_config_rejects_invalid_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[image]\nwidth = wide\n").unwrap();

        let result = effective_config(Some(&path));

        assert!(matches!(result, Err(CliError::ConfigFile(_))));
    }
}
