//! Init command - write a default configuration file.

use std::path::Path;

use shareport::config::ConfigFile;

use crate::error::CliError;

/// Run the init command.
pub fn run(config_path: &Path) -> Result<(), CliError> {
    if config_path.exists() {
        println!("Configuration file already exists:");
        println!("  {}", config_path.display());
        return Ok(());
    }

    ConfigFile::default().save_to(config_path)?;

    println!("Configuration file: {}", config_path.display());
    println!();
    println!("Set device.host, device.username and device.password before fetching,");
    println!("e.g. `shareport config set device.host 192.168.0.1`.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
