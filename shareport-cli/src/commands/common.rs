//! Common arguments shared across CLI commands.

use std::path::PathBuf;

use clap::Args;
use shareport::config::{ConfigFile, ConfigKey};

use crate::error::CliError;

/// Device connection overrides.
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Device host name or IP address
    #[arg(long)]
    pub host: Option<String>,

    /// SharePort web port (default 8181)
    #[arg(long)]
    pub port: Option<u16>,

    /// Account name
    #[arg(long, short = 'u')]
    pub user: Option<String>,

    /// Account password
    #[arg(long)]
    pub password: Option<String>,

    /// HTTP timeout in seconds (default: HTTP client default)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Directory on the USB volume
    #[arg(long, short = 'r')]
    pub remote_path: Option<String>,
}

impl ConnectionArgs {
    /// Apply CLI values over the config file. CLI takes precedence.
    pub fn apply(&self, config: &mut ConfigFile) -> Result<(), CliError> {
        let overrides = [
            (ConfigKey::DeviceHost, self.host.clone()),
            (ConfigKey::DevicePort, self.port.map(|p| p.to_string())),
            (ConfigKey::DeviceUsername, self.user.clone()),
            (ConfigKey::DevicePassword, self.password.clone()),
            (ConfigKey::HttpTimeout, self.timeout.map(|t| t.to_string())),
            (ConfigKey::TransferRemotePath, self.remote_path.clone()),
        ];

        for (key, value) in overrides {
            if let Some(value) = value {
                key.set(config, &value)?;
            }
        }
        Ok(())
    }
}

/// Local destination override.
#[derive(Debug, Clone, Default, Args)]
pub struct SaveArgs {
    /// Local directory to save into
    #[arg(long, short = 'o')]
    pub save_dir: Option<PathBuf>,
}

impl SaveArgs {
    pub fn apply(&self, config: &mut ConfigFile) {
        if let Some(ref dir) = self.save_dir {
            config.transfer.save_dir = dir.clone();
        }
    }
}
