//! URL construction for the SharePort web API.
//!
//! The device serves three things on one port:
//!
//! ```text
//! /dws/api/Login              challenge (GET) and login (POST)
//! /dws/api/ListFile?...       directory listing (JSON)
//! /usb_dev/usb_A1/<path>/...  raw file content
//! ```

use reqwest::Url;

use crate::error::{TransferError, TransferResult};

/// Default SharePort web port.
pub const DEFAULT_PORT: u16 = 8181;

/// Path of the login endpoint.
pub const LOGIN_PATH: &str = "/dws/api/Login";

/// Path of the listing endpoint.
pub const LIST_PATH: &str = "/dws/api/ListFile";

/// Mount point of the first USB volume as seen by the web service.
pub const USB_MOUNT: &str = "usb_dev/usb_A1";

/// Volume identifier of the first USB volume.
const VOLUME_ID: &str = "1";

/// Builds endpoint URLs for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    /// Create endpoints for `http://host:port`.
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            base: format!("http://{}:{}", host.trim_end_matches('/'), port),
        }
    }

    /// Base URL of the device, without a trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// URL of the login endpoint.
    pub fn login_url(&self) -> String {
        format!("{}{}", self.base, LOGIN_PATH)
    }

    /// URL listing `remote_path` on the USB volume for `username`.
    pub fn list_url(&self, username: &str, remote_path: &str) -> TransferResult<String> {
        let endpoint = format!("{}{}", self.base, LIST_PATH);
        let path = usb_path(remote_path);
        let url = Url::parse_with_params(
            &endpoint,
            &[
                ("id", username),
                ("tok", ""),
                ("volid", VOLUME_ID),
                ("path", path.as_str()),
            ],
        )
        .map_err(|e| TransferError::InvalidUrl {
            url: endpoint.clone(),
            reason: e.to_string(),
        })?;

        Ok(url.into())
    }

    /// Base URL for raw downloads from `remote_path`.
    ///
    /// File names are appended with [`file_url`].
    pub fn download_base(&self, remote_path: &str) -> TransferResult<String> {
        let mut url = parse(&self.base)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| cannot_be_base(&self.base))?;
            segments.pop_if_empty();
            for segment in usb_path(remote_path).split('/') {
                segments.push(segment);
            }
        }
        Ok(url.into())
    }
}

/// Appends one file name to a download base URL.
///
/// The name is percent-encoded as a single path segment.
pub fn file_url(download_base: &str, file_name: &str) -> TransferResult<String> {
    let mut url = parse(download_base)?;
    url.path_segments_mut()
        .map_err(|_| cannot_be_base(download_base))?
        .pop_if_empty()
        .push(file_name);
    Ok(url.into())
}

/// Path of `remote_path` relative to the web root, e.g. `usb_dev/usb_A1/photos`.
fn usb_path(remote_path: &str) -> String {
    let trimmed = remote_path.trim_matches('/');
    if trimmed.is_empty() {
        USB_MOUNT.to_string()
    } else {
        format!("{}/{}", USB_MOUNT, trimmed)
    }
}

fn parse(url: &str) -> TransferResult<Url> {
    Url::parse(url).map_err(|e| TransferError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn cannot_be_base(url: &str) -> TransferError {
    TransferError::InvalidUrl {
        url: url.to_string(),
        reason: "URL cannot carry a path".to_string(),
    }
}
