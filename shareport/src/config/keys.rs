//! Addressable configuration keys.
//!
//! Every setting in `config.ini` has a `section.key` name. `ConfigKey` is the
//! single place that knows how to read, validate and write each one; loading
//! and saving the file go through it as well.

use std::path::PathBuf;
use std::str::FromStr;

use super::error::ConfigError;
use super::file::ConfigFile;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A configuration setting addressable as `section.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    DeviceHost,
    DevicePort,
    DeviceUsername,
    DevicePassword,
    TransferRemotePath,
    TransferSaveDir,
    HttpTimeout,
    LoggingLevel,
    LoggingFile,
}

impl ConfigKey {
    /// All keys, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::DeviceHost,
            ConfigKey::DevicePort,
            ConfigKey::DeviceUsername,
            ConfigKey::DevicePassword,
            ConfigKey::TransferRemotePath,
            ConfigKey::TransferSaveDir,
            ConfigKey::HttpTimeout,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingFile,
        ]
    }

    /// INI section this key lives in.
    pub fn section(&self) -> &'static str {
        match self {
            Self::DeviceHost | Self::DevicePort | Self::DeviceUsername | Self::DevicePassword => {
                "device"
            }
            Self::TransferRemotePath | Self::TransferSaveDir => "transfer",
            Self::HttpTimeout => "http",
            Self::LoggingLevel | Self::LoggingFile => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            Self::DeviceHost => "host",
            Self::DevicePort => "port",
            Self::DeviceUsername => "username",
            Self::DevicePassword => "password",
            Self::TransferRemotePath => "remote_path",
            Self::TransferSaveDir => "save_dir",
            Self::HttpTimeout => "timeout",
            Self::LoggingLevel => "level",
            Self::LoggingFile => "file",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Returns true if the value should not be echoed back to the user.
    pub fn is_secret(&self) -> bool {
        matches!(self, Self::DevicePassword)
    }

    /// Current value as it would be written to the file. Empty means unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            Self::DeviceHost => config.device.host.clone(),
            Self::DevicePort => config.device.port.to_string(),
            Self::DeviceUsername => config.device.username.clone(),
            Self::DevicePassword => config.device.password.clone(),
            Self::TransferRemotePath => config.transfer.remote_path.clone(),
            Self::TransferSaveDir => config.transfer.save_dir.display().to_string(),
            Self::HttpTimeout => config
                .http
                .timeout
                .map(|t| t.to_string())
                .unwrap_or_default(),
            Self::LoggingLevel => config.logging.level.clone(),
            Self::LoggingFile => config
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Value for display, with secrets masked.
    pub fn display_value(&self, config: &ConfigFile) -> String {
        let value = self.get(config);
        if self.is_secret() && !value.is_empty() {
            "********".to_string()
        } else {
            value
        }
    }

    /// Validate `value` and store it in `config`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        // Passwords may legitimately start or end with spaces
        let value = if self.is_secret() { value } else { value.trim() };
        match self {
            Self::DeviceHost => config.device.host = value.to_string(),
            Self::DevicePort => config.device.port = self.parse(value)?,
            Self::DeviceUsername => config.device.username = value.to_string(),
            Self::DevicePassword => config.device.password = value.to_string(),
            Self::TransferRemotePath => config.transfer.remote_path = value.to_string(),
            Self::TransferSaveDir => {
                if value.is_empty() {
                    return Err(self.invalid(value, "save directory cannot be empty"));
                }
                config.transfer.save_dir = PathBuf::from(value);
            }
            Self::HttpTimeout => {
                config.http.timeout = if value.is_empty() {
                    None
                } else {
                    let secs: u64 = self.parse(value)?;
                    if secs == 0 {
                        return Err(self.invalid(value, "timeout must be at least 1 second"));
                    }
                    Some(secs)
                }
            }
            Self::LoggingLevel => {
                let level = value.to_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(self.invalid(value, "expected trace, debug, info, warn or error"));
                }
                config.logging.level = level;
            }
            Self::LoggingFile => {
                config.logging.file = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
        }
        Ok(())
    }

    fn parse<V>(&self, value: &str) -> Result<V, ConfigError>
    where
        V: FromStr,
        V::Err: std::fmt::Display,
    {
        value
            .parse()
            .map_err(|e: V::Err| self.invalid(value, &e.to_string()))
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
