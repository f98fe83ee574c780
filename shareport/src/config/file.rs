//! The `config.ini` file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::{EscapePolicy, Ini, ParseOption};

use super::error::ConfigError;
use super::keys::ConfigKey;
use crate::endpoints::DEFAULT_PORT;
use crate::logging::LoggingConfig;
use crate::session::{Credentials, DeviceConfig, TransferJob};

/// Default location: `<config dir>/shareport/config.ini`.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shareport")
        .join("config.ini")
}

/// `[device]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            username: String::new(),
            password: String::new(),
        }
    }
}

/// `[transfer]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSettings {
    /// Directory on the USB volume to fetch from.
    pub remote_path: String,
    /// Local directory to write into.
    pub save_dir: PathBuf,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            remote_path: String::new(),
            save_dir: PathBuf::from("."),
        }
    }
}

/// `[http]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpSettings {
    /// Request timeout in seconds; `None` keeps the client default.
    pub timeout: Option<u64>,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Contents of `config.ini`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub device: DeviceSettings,
    pub transfer: TransferSettings,
    pub http: HttpSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini =
            Ini::load_from_file_opt(path, parse_option()).map_err(|e| ConfigError::ReadFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut config = Self::default();
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating its parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_failed = |source| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), encode_value(&key.get(self)));
        }
        // Values are already encoded for the reader
        ini.write_to_file_policy(path, EscapePolicy::Nothing)
            .map_err(write_failed)
    }

    /// Device connection settings for a run.
    ///
    /// Fails if the host or username is not set.
    pub fn device_config(&self) -> Result<DeviceConfig, ConfigError> {
        if self.device.host.is_empty() {
            return Err(ConfigError::MissingValue(ConfigKey::DeviceHost.name()));
        }
        if self.device.username.is_empty() {
            return Err(ConfigError::MissingValue(ConfigKey::DeviceUsername.name()));
        }

        let credentials = Credentials::new(&self.device.username, &self.device.password);
        let mut device =
            DeviceConfig::new(&self.device.host, credentials).with_port(self.device.port);
        if let Some(secs) = self.http.timeout {
            device = device.with_timeout(Duration::from_secs(secs));
        }
        Ok(device)
    }

    /// What to fetch and where to put it.
    pub fn transfer_job(&self) -> TransferJob {
        TransferJob::new(&self.transfer.remote_path, &self.transfer.save_dir)
    }

    /// Logging settings.
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.logging.level.clone(),
            file: self.logging.file.clone(),
        }
    }
}

/// Quotes and backslash escapes are honoured, so a value written by
/// [`encode_value`] reads back unchanged.
fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: true,
        enabled_escape: true,
        ..ParseOption::default()
    }
}

/// Encode a value so the INI reader returns it byte for byte.
///
/// The reader trims unquoted values and treats `\` and a leading quote as
/// syntax. Such values are written double-quoted with `\` and `"` escaped.
fn encode_value(value: &str) -> String {
    let needs_quotes = value.trim() != value
        || value.starts_with(&['"', '\''][..])
        || value.chars().any(|c| c == '\\' || c.is_control());
    if !needs_quotes {
        return value.to_string();
    }

    let mut encoded = String::with_capacity(value.len() + 2);
    encoded.push('"');
    for c in value.chars() {
        match c {
            '\\' => encoded.push_str("\\\\"),
            '"' => encoded.push_str("\\\""),
            '\n' => encoded.push_str("\\n"),
            '\r' => encoded.push_str("\\r"),
            '\t' => encoded.push_str("\\t"),
            '\0' => encoded.push_str("\\0"),
            c => encoded.push(c),
        }
    }
    encoded.push('"');
    encoded
}
