//! SharePort - batch downloads from a D-Link SharePort USB share
//!
//! This library talks to the file-sharing web service built into D-Link
//! travel routers (DIR-505 and relatives). It performs the challenge-response
//! login, lists one directory on the attached USB volume and downloads every
//! file in it, checking each against the size the device reported.
//!
//! The pieces:
//!
//! - [`session`] - the transfer session (authenticate, list, fetch, verify)
//! - [`transport`] - the blocking HTTP seam and its reqwest implementation
//! - [`digest`] - the HMAC-MD5 challenge digest
//! - [`endpoints`] - URL construction for the device's web API
//! - [`filename`] - sanitisation of untrusted remote file names
//! - [`config`] - the `config.ini` file
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod digest;
pub mod endpoints;
pub mod error;
pub mod filename;
pub mod logging;
pub mod session;
pub mod transport;

pub use error::{TransferError, TransferResult};
pub use session::{
    Credentials, DeviceConfig, DownloadOutcome, FileEntry, SessionToken, TransferJob,
    TransferReport, TransferSession,
};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
