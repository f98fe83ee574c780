//! Error types for configuration loading and editing.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors that can occur while reading, writing or applying configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or parse the configuration file.
    ReadFailed { path: PathBuf, reason: String },

    /// Failed to write the configuration file.
    WriteFailed { path: PathBuf, source: io::Error },

    /// Unknown `section.key` name.
    UnknownKey(String),

    /// A value that does not parse for its key.
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// A setting required for a run is empty.
    MissingValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed { path, reason } => {
                write!(f, "failed to read {}: {}", path.display(), reason)
            }
            Self::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            Self::UnknownKey(key) => write!(f, "unknown configuration key '{}'", key),
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value '{}' for {}: {}", value, key, reason)
            }
            Self::MissingValue(key) => write!(f, "{} is not set", key),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::WriteFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidValue {
            key: "device.port".to_string(),
            value: "eighty".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value 'eighty' for device.port: invalid digit found in string"
        );
    }

    #[test]
    fn test_missing_value_display() {
        let err = ConfigError::MissingValue("device.host".to_string());
        assert_eq!(err.to_string(), "device.host is not set");
    }
}
