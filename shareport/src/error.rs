//! Error types for SharePort transfers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for transfer operations.
pub type TransferResult<T> = Result<T, TransferError>;

/// Errors that can occur while talking to a SharePort device.
///
/// Authentication failures (`ChallengeRejected`, `CredentialRejected`) end the
/// run. Everything raised while fetching a single file is isolated to that
/// file by the session orchestrator.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The initial login GET did not answer `status: "ok"`.
    #[error("authentication failed: server rejected initial challenge request (status {status:?})")]
    ChallengeRejected { status: String },

    /// The login POST did not answer `status: "ok"`.
    #[error("authentication failed: credential rejected (status {status:?})")]
    CredentialRejected { status: String },

    /// Network-level failure (connection refused, timeout, broken body).
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The device answered with something that is not the expected JSON.
    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    /// A file request answered with a status other than 200.
    #[error("received HTTP error {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// A remote file name that cannot be stored inside the save directory.
    #[error("invalid remote file name {0:?}")]
    InvalidFileName(String),

    /// A URL could not be built from the configured host or path.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Failed to write a downloaded file.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create the save directory.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirFailed { path: PathBuf, source: io::Error },
}

impl TransferError {
    /// Returns true if the device refused to authenticate this session.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::ChallengeRejected { .. } | Self::CredentialRejected { .. }
        )
    }
}
