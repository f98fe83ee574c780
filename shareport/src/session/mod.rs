//! Transfer session: authenticate, list, fetch, verify.
//!
//! A session runs one linear procedure against a SharePort device:
//!
//! ```text
//! GET  /dws/api/Login            -> {status, uid, challenge}
//! POST /dws/api/Login            id, password=HMAC-MD5(user+challenge)   (cookie uid)
//! GET  /dws/api/ListFile?...     -> {count, files:[{name,size}]}          (cookie uid)
//! GET  /usb_dev/usb_A1/<path>/f  -> raw bytes, one request per file       (cookie uid)
//! ```
//!
//! Authentication and listing failures end the run. A failure while
//! fetching one file is reported and the next file is attempted. Files are
//! fetched one at a time, in the order the device listed them.
//!
//! # Example
//!
//! ```ignore
//! use shareport::session::{Credentials, DeviceConfig, TransferJob, TransferSession};
//! use shareport::transport::ReqwestTransport;
//!
//! let device = DeviceConfig::new("192.168.0.1", Credentials::new("admin", "secret"));
//! let session = TransferSession::new(ReqwestTransport::new()?, &device);
//!
//! let report = session.run(&TransferJob::new("photos", "/srv/photos"), None)?;
//! println!("{}", report);
//! ```

mod device;
mod protocol;
mod report;

pub use device::{Credentials, DeviceConfig, TransferJob};
pub use protocol::FileEntry;
pub use report::{DownloadOutcome, FailedDownload, FileProgressCallback, TransferReport};

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::digest::challenge_digest;
use crate::endpoints::{file_url, Endpoints};
use crate::error::{TransferError, TransferResult};
use crate::filename::sanitize_file_name;
use crate::transport::{HttpResponse, HttpTransport};
use protocol::{ChallengeResponse, ListResponse, StatusResponse};

/// Buffer size for streaming downloads to disk (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Proof of a successful login.
///
/// Only issued after the device answered the login POST with
/// `status: "ok"`. It is sent as the `uid` cookie on every later request and
/// lives as long as the session that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    uid: String,
}

impl SessionToken {
    pub(crate) fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }

    /// The opaque session identifier issued by the device.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Value of the `Cookie` header for this session.
    pub fn cookie(&self) -> String {
        format!("uid={}", self.uid)
    }
}

/// A single-device transfer session.
pub struct TransferSession<T: HttpTransport> {
    transport: T,
    endpoints: Endpoints,
    credentials: Credentials,
}

impl<T: HttpTransport> TransferSession<T> {
    /// Create a session for `device` that talks through `transport`.
    pub fn new(transport: T, device: &DeviceConfig) -> Self {
        Self {
            transport,
            endpoints: device.endpoints(),
            credentials: device.credentials.clone(),
        }
    }

    /// Endpoint URLs this session talks to.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Perform the challenge-response login.
    ///
    /// Issues exactly two requests: an unauthenticated GET for the
    /// challenge and a POST with the digest. No POST is sent if the
    /// challenge request is rejected.
    pub fn authenticate(&self) -> TransferResult<SessionToken> {
        let url = self.endpoints.login_url();
        debug!(url = %url, "Requesting login challenge");

        let response = self.transport.get(&url, None)?;
        let challenge: ChallengeResponse = read_json(response, &url)?;
        if !challenge.is_ok() {
            error!(status = %challenge.status, "Server rejected initial challenge request");
            return Err(TransferError::ChallengeRejected {
                status: challenge.status,
            });
        }

        let uid = challenge
            .uid
            .ok_or_else(|| missing_field(&url, "uid"))?;
        let nonce = challenge
            .challenge
            .ok_or_else(|| missing_field(&url, "challenge"))?;
        info!("Got login challenge");
        debug!(uid = %uid, challenge = %nonce, "Challenge details");

        let digest = challenge_digest(
            &self.credentials.username,
            &nonce,
            self.credentials.password(),
        );
        debug!(digest = %digest, "Computed HMAC-MD5 password digest");

        let pending = SessionToken::new(uid);
        let form = [
            ("id", self.credentials.username.as_str()),
            ("password", digest.as_str()),
        ];
        let response = self.transport.post_form(&url, &form, Some(&pending))?;
        let login: StatusResponse = read_json(response, &url)?;
        if !login.is_ok() {
            error!(user = %self.credentials.username, status = %login.status, "Login failed");
            return Err(TransferError::CredentialRejected {
                status: login.status,
            });
        }

        info!(user = %self.credentials.username, "Login successful");
        Ok(pending)
    }

    /// List the files in `remote_path` on the USB volume.
    ///
    /// A listing with `count: 0` is a normal, empty result.
    pub fn list_files(
        &self,
        token: &SessionToken,
        remote_path: &str,
    ) -> TransferResult<Vec<FileEntry>> {
        let url = self
            .endpoints
            .list_url(&self.credentials.username, remote_path)?;
        debug!(url = %url, "Requesting file list");

        let response = self.transport.get(&url, Some(token))?;
        let listing: ListResponse = read_json(response, &url)?;
        if listing.count == 0 {
            return Ok(Vec::new());
        }

        let files = listing
            .files
            .ok_or_else(|| missing_field(&url, "files"))?;
        info!(count = files.len(), path = %remote_path, "Received file list");
        Ok(files)
    }

    /// Download one file into `save_dir`.
    ///
    /// The remote name is sanitised before use; an existing local file of
    /// the same name is overwritten. A size different from the listing is
    /// reported as `SizeMismatch`, not as an error. Any status other than
    /// 200 is `HttpStatus` and nothing is written.
    pub fn download_file(
        &self,
        token: &SessionToken,
        remote_base_url: &str,
        entry: &FileEntry,
        save_dir: &Path,
    ) -> TransferResult<DownloadOutcome> {
        let name = sanitize_file_name(&entry.name)?;
        let url = file_url(remote_base_url, &name)?;
        info!(file = %name, size = entry.size, "Downloading file");

        let mut response = self.transport.get(&url, Some(token))?;
        if !response.is_ok() {
            let status = response.status;
            let body = response.into_error_text();
            return Err(TransferError::HttpStatus { status, body });
        }

        let dest = save_dir.join(&name);
        let streamed = stream_to_file(&mut response, &url, &dest)?;

        let actual = fs::metadata(&dest)
            .map(|m| m.len())
            .map_err(|e| TransferError::WriteFailed {
                path: dest.clone(),
                source: e,
            })?;

        debug!(file = %name, streamed, on_disk = actual, "Saved file");

        if actual != entry.size {
            warn!(
                file = %name,
                "Expected {} bytes, but got {} bytes",
                entry.size,
                actual
            );
            return Ok(DownloadOutcome::SizeMismatch {
                path: dest,
                expected: entry.size,
                actual,
            });
        }

        Ok(DownloadOutcome::Saved {
            path: dest,
            bytes: actual,
        })
    }

    /// Run the whole batch: authenticate, list, then fetch every file.
    ///
    /// Returns an error only for failures that end the run (login,
    /// listing, creating the save directory). Per-file failures are
    /// collected in the report.
    pub fn run(
        &self,
        job: &TransferJob,
        progress: Option<FileProgressCallback>,
    ) -> TransferResult<TransferReport> {
        let token = self.authenticate()?;
        let files = self.list_files(&token, &job.remote_path)?;

        let mut report = TransferReport::new(files.len());
        if files.is_empty() {
            info!("No files for transfer");
            return Ok(report);
        }

        fs::create_dir_all(&job.save_dir).map_err(|e| TransferError::CreateDirFailed {
            path: job.save_dir.clone(),
            source: e,
        })?;
        let base = self.endpoints.download_base(&job.remote_path)?;

        let total = files.len();
        for (index, entry) in files.iter().enumerate() {
            match self.download_file(&token, &base, entry, &job.save_dir) {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    error!(file = %entry.name, "{}", e);
                    report.record_failure(&entry.name, e);
                }
            }

            if let Some(ref cb) = progress {
                cb(index + 1, total, report.bytes_written());
            }
        }

        info!("All done: {}", report);
        Ok(report)
    }
}

/// Parse a JSON response body.
fn read_json<R: DeserializeOwned>(response: HttpResponse, url: &str) -> TransferResult<R> {
    if !response.is_ok() {
        let status = response.status;
        return Err(TransferError::HttpStatus {
            status,
            body: response.into_error_text(),
        });
    }
    let bytes = response.into_bytes(url)?;
    serde_json::from_slice(&bytes).map_err(|e| TransferError::MalformedResponse {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn missing_field(url: &str, field: &str) -> TransferError {
    TransferError::MalformedResponse {
        url: url.to_string(),
        reason: format!("missing field `{}`", field),
    }
}

/// Stream a response body to `dest`, truncating any existing file.
///
/// The file is flushed and closed before this returns. If the body breaks
/// off or the write fails, the partial file is removed.
fn stream_to_file(response: &mut HttpResponse, url: &str, dest: &Path) -> TransferResult<u64> {
    let file = File::create(dest).map_err(|e| TransferError::WriteFailed {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let result = copy_body(response, url, dest, BufWriter::new(file));
    if result.is_err() {
        if let Err(e) = fs::remove_file(dest) {
            warn!(path = %dest.display(), "Failed to remove partial file: {}", e);
        }
    }
    result
}

fn copy_body(
    response: &mut HttpResponse,
    url: &str,
    dest: &Path,
    mut writer: BufWriter<File>,
) -> TransferResult<u64> {
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut written = 0u64;

    loop {
        let bytes_read =
            response
                .body_mut()
                .read(&mut buffer)
                .map_err(|e| TransferError::Transport {
                    url: url.to_string(),
                    reason: format!("Read error: {}", e),
                })?;

        if bytes_read == 0 {
            break;
        }

        writer
            .write_all(&buffer[..bytes_read])
            .map_err(|e| TransferError::WriteFailed {
                path: dest.to_path_buf(),
                source: e,
            })?;

        written += bytes_read as u64;
    }

    writer.flush().map_err(|e| TransferError::WriteFailed {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(written)
}
