//! Bordereau CLI - Command-line interface
//!
//! Renders parcel plan images and manages the configuration file.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::render::RenderArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "bordereau")]
#[command(version = bordereau::VERSION)]
#[command(about = "Render cadastral parcel plan images from WFS and WMS services", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.bordereau/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the plan image for a parcel
    Render(RenderArgs),

    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    ShowConfig,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli) {
        e.exit();
    }
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Render(args) => commands::render::run(args, config, cli.debug),
        Commands::InitConfig { force } => commands::config::run_init(config, force),
        Commands::ShowConfig => commands::config::run_show(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_with_options() {
        let cli = Cli::try_parse_from([
            "bordereau",
            "render",
            "2016220000AB0123",
            "--output",
            "plan.png",
            "--keep",
            "--config",
            "alt.ini",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("alt.ini")));
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.parcelle, "2016220000AB0123");
                assert_eq!(args.output, Some(PathBuf::from("plan.png")));
                assert!(args.keep);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_render_requires_parcel() {
        assert!(Cli::try_parse_from(["bordereau", "render"]).is_err());
    }

    #[test]
    fn test_parse_init_config_force() {
        let cli = Cli::try_parse_from(["bordereau", "init-config", "--force"]).unwrap();
        assert!(matches!(cli.command, Commands::InitConfig { force: true }));
    }
}
