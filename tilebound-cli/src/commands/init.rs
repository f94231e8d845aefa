//! Init command - initialize configuration file.

use std::path::Path;

use tilebound::config::ensure_config_exists;

use crate::error::CliError;

/// Run the init command.
pub fn run(config_path: &Path) -> Result<(), CliError> {
    if ensure_config_exists(config_path)? {
        println!("Created configuration file: {}", config_path.display());
    } else {
        println!("Configuration file already exists: {}", config_path.display());
    }
    println!();
    println!("Set output.base_name before exporting, for example:");
    println!("  tilebound config set output.base_name my_site");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
