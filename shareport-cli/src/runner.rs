//! Shared setup for commands that talk to the device.

use std::path::{Path, PathBuf};

use shareport::config::ConfigFile;
use shareport::logging::{init_logging_with_console, LoggingGuard};
use shareport::{DeviceConfig, ReqwestTransport, TransferSession};

use crate::error::CliError;
use crate::progress::ConsoleWriter;

/// Loads configuration and installs logging for the lifetime of a command.
pub struct CliRunner {
    config: ConfigFile,
    config_path: PathBuf,
    _logging: LoggingGuard,
}

impl CliRunner {
    /// Load the config file at `config_path` and start logging.
    /// `verbose` forces debug level.
    pub fn new(config_path: &Path, verbose: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load_from(config_path)?;

        let mut logging = config.logging_config();
        if verbose {
            logging = logging.with_level("debug");
        }
        let guard = init_logging_with_console(&logging, ConsoleWriter)?;

        Ok(Self {
            config,
            config_path: config_path.to_path_buf(),
            _logging: guard,
        })
    }

    /// Loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Mutable configuration, for applying command-line overrides.
    pub fn config_mut(&mut self) -> &mut ConfigFile {
        &mut self.config
    }

    /// Log the command being run and where its settings came from.
    pub fn log_startup(&self, command: &str) {
        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            command,
            config = %self.config_path.display(),
            "shareport starting"
        );
    }

    /// Build a session from the (overridden) configuration.
    pub fn session(&self) -> Result<TransferSession<ReqwestTransport>, CliError> {
        let device = self.config.device_config()?;
        let transport = build_transport(&device)?;
        Ok(TransferSession::new(transport, &device))
    }
}

fn build_transport(device: &DeviceConfig) -> Result<ReqwestTransport, CliError> {
    let transport = match device.timeout {
        Some(timeout) => ReqwestTransport::with_timeout(timeout)?,
        None => ReqwestTransport::new()?,
    };
    Ok(transport)
}
