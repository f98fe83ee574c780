//! Configuration file support.
//!
//! Settings live in an INI file (default `<config dir>/shareport/config.ini`):
//!
//! ```ini
//! [device]
//! host = 192.168.0.1
//! port = 8181
//! username = admin
//! password = secret
//!
//! [transfer]
//! remote_path = folder/on/usb
//! save_dir = /srv/shareport
//!
//! [http]
//! timeout =
//!
//! [logging]
//! level = info
//! file =
//! ```
//!
//! Values with leading or trailing spaces, backslashes or a leading quote are
//! written double-quoted with `\\` and `\"` escapes, e.g. `password = "secret "`.
//! Unquoted values are trimmed when read.
//!
//! Command-line arguments override file values when specified.

mod error;
mod file;
mod keys;

pub use error::ConfigError;
pub use file::{
    config_file_path, ConfigFile, DeviceSettings, HttpSettings, LoggingSettings, TransferSettings,
};
pub use keys::ConfigKey;
