//! CLI error type.

use std::fmt;

use shareport::config::ConfigError;
use shareport::logging::LoggingError;
use shareport::TransferError;

/// Errors that end a CLI command with a non-zero exit status.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or incomplete settings.
    Config(String),

    /// Failed to read or write the configuration file.
    ConfigFile(ConfigError),

    /// Failed to set up logging.
    Logging(LoggingError),

    /// Authentication, listing or another fatal transfer failure.
    Transfer(TransferError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Configuration file error: {}", e),
            CliError::Logging(e) => write!(f, "Logging error: {}", e),
            CliError::Transfer(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Transfer(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        match e {
            // Missing or malformed settings are user errors, not file errors
            ConfigError::MissingValue(_)
            | ConfigError::InvalidValue { .. }
            | ConfigError::UnknownKey(_) => CliError::Config(e.to_string()),
            _ => CliError::ConfigFile(e),
        }
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<TransferError> for CliError {
    fn from(e: TransferError) -> Self {
        CliError::Transfer(e)
    }
}
