//! Tilebound CLI - Command-line interface
//!
//! Bounds georeferenced tile scenes and writes their metadata files.

mod commands;
mod error;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tilebound::config::{config_file_path, ConfigFile};
use tilebound::logging::init_logging;
use tracing::debug;

use commands::config::ConfigCommands;
use commands::export::ExportArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "tilebound", version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.config/tilebound/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Bound a scene and write one metadata file per pass
    Export(ExportArgs),

    /// Create the configuration file with default values
    Init,

    /// View or modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(config_file_path);
    let _log_guard = init_logging(cli.verbose, log_file(&config_path).as_deref())?;
    debug!(version = tilebound::VERSION, config = %config_path.display(), "Starting");

    match cli.command {
        Commands::Export(args) => commands::export::run(args, &config_path),
        Commands::Init => commands::init::run(&config_path),
        Commands::Config { command } => commands::config::run(command, &config_path),
    }
}

/// Log file from the config, if the config can be read at all. Errors are
/// reported later by the command that needs the config.
fn log_file(config_path: &Path) -> Option<PathBuf> {
    ConfigFile::load_from(config_path)
        .ok()
        .and_then(|config| config.logging.file)
}
