//! Connection and job settings for a transfer session.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::endpoints::{Endpoints, DEFAULT_PORT};

/// Login credentials for the SharePort web service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account name, sent as the `id` form field.
    pub username: String,
    password: String,
}

impl Credentials {
    /// Create credentials from a username and plaintext password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Plaintext password; only ever used as the HMAC key.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Where the device is and how to log in to it.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Host name or IP address of the device.
    pub host: String,

    /// SharePort web port.
    pub port: u16,

    /// Login credentials.
    pub credentials: Credentials,

    /// HTTP request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl DeviceConfig {
    /// Create a configuration for `host` on the default port.
    pub fn new(host: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            credentials,
            timeout: None,
        }
    }

    /// Set the web port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Endpoint URLs for this device.
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.host, self.port)
    }
}

/// What to fetch and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferJob {
    /// Directory on the USB volume, relative to its root.
    pub remote_path: String,

    /// Local directory the files are written into.
    pub save_dir: PathBuf,
}

impl TransferJob {
    pub fn new(remote_path: impl Into<String>, save_dir: impl Into<PathBuf>) -> Self {
        Self {
            remote_path: remote_path.into(),
            save_dir: save_dir.into(),
        }
    }
}
