//! Integration tests for a complete transfer run.
//!
//! These tests drive `TransferSession::run` through the public API against a
//! scripted device:
//! - challenge-response login and the cookie carried afterwards
//! - listing order preserved on disk
//! - per-file failures isolated from the rest of the batch
//!
//! Run with: `cargo test --test transfer_flow`

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::sync::Mutex;

use tempfile::TempDir;

use shareport::digest::challenge_digest;
use shareport::{
    Credentials, DeviceConfig, DownloadOutcome, HttpResponse, HttpTransport, SessionToken,
    TransferError, TransferJob, TransferResult, TransferSession,
};

// ============================================================================
// Scripted device
// ============================================================================

/// A request as the device saw it.
#[derive(Debug, Clone)]
struct Seen {
    method: &'static str,
    path: String,
    form: Vec<(String, String)>,
    cookie: Option<String>,
}

/// Answers by URL path, like the real device would.
struct FakeDevice {
    challenge: String,
    login: String,
    listing: String,
    files: HashMap<String, (u16, Vec<u8>)>,
    seen: Mutex<Vec<Seen>>,
}

impl FakeDevice {
    fn new(listing: &str) -> Self {
        Self {
            challenge: r#"{"status":"ok","uid":"abc123","challenge":"xyz"}"#.to_string(),
            login: r#"{"status":"ok"}"#.to_string(),
            listing: listing.to_string(),
            files: HashMap::new(),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn with_challenge(mut self, body: &str) -> Self {
        self.challenge = body.to_string();
        self
    }

    fn with_login(mut self, body: &str) -> Self {
        self.login = body.to_string();
        self
    }

    fn with_file(mut self, path: &str, status: u16, body: &[u8]) -> Self {
        self.files
            .insert(path.to_string(), (status, body.to_vec()));
        self
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    fn paths(&self) -> Vec<String> {
        self.seen().into_iter().map(|s| s.path).collect()
    }

    fn record(
        &self,
        method: &'static str,
        url: &str,
        form: &[(&str, &str)],
        token: Option<&SessionToken>,
    ) -> String {
        // Strip scheme and authority, keep the path (and query)
        let path = url
            .splitn(4, '/')
            .nth(3)
            .map(|rest| format!("/{}", rest))
            .unwrap_or_default();
        self.seen.lock().unwrap().push(Seen {
            method,
            path: path.clone(),
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            cookie: token.map(SessionToken::cookie),
        });
        path
    }

    fn reply(status: u16, body: impl Into<Vec<u8>>) -> TransferResult<HttpResponse> {
        Ok(HttpResponse::new(status, Cursor::new(body.into())))
    }
}

impl HttpTransport for FakeDevice {
    fn get(&self, url: &str, token: Option<&SessionToken>) -> TransferResult<HttpResponse> {
        let path = self.record("GET", url, &[], token);

        if path == "/dws/api/Login" {
            return Self::reply(200, self.challenge.clone());
        }
        if path.starts_with("/dws/api/ListFile?") {
            return Self::reply(200, self.listing.clone());
        }
        match self.files.get(&path) {
            Some((status, body)) => Self::reply(*status, body.clone()),
            None => Self::reply(404, "Not Found"),
        }
    }

    fn post_form(
        &self,
        url: &str,
        fields: &[(&str, &str)],
        token: Option<&SessionToken>,
    ) -> TransferResult<HttpResponse> {
        let path = self.record("POST", url, fields, token);
        assert_eq!(path, "/dws/api/Login");
        Self::reply(200, self.login.clone())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn device() -> DeviceConfig {
    DeviceConfig::new("dir505.lan", Credentials::new("admin", "secret"))
}

fn run(fake: &FakeDevice, save_dir: &std::path::Path) -> TransferResult<shareport::TransferReport> {
    TransferSession::new(fake, &device()).run(&TransferJob::new("shared/docs", save_dir), None)
}

const TWO_FILES: &str =
    r#"{"count":2,"files":[{"name":"a.txt","size":10},{"name":"b.txt","size":20}]}"#;

// ============================================================================
// Integration Tests
// ============================================================================

/// Login sends the HMAC-MD5 digest with the uid cookie from the challenge.
#[test]
fn test_login_sends_digest_and_uid_cookie() {
    let temp = TempDir::new().unwrap();
    let fake = FakeDevice::new(r#"{"count":0}"#);

    run(&fake, temp.path()).unwrap();

    let seen = fake.seen();
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].path, "/dws/api/Login");
    assert!(seen[0].cookie.is_none());

    assert_eq!(seen[1].method, "POST");
    assert_eq!(seen[1].cookie.as_deref(), Some("uid=abc123"));
    assert_eq!(
        seen[1].form,
        vec![
            ("id".to_string(), "admin".to_string()),
            (
                "password".to_string(),
                challenge_digest("admin", "xyz", "secret")
            ),
        ]
    );
}

/// Both listed files are fetched in listing order and written by name.
#[test]
fn test_two_files_fetched_in_order() {
    let temp = TempDir::new().unwrap();
    let fake = FakeDevice::new(TWO_FILES)
        .with_file("/usb_dev/usb_A1/shared/docs/a.txt", 200, b"aaaaaaaaaa")
        .with_file(
            "/usb_dev/usb_A1/shared/docs/b.txt",
            200,
            b"bbbbbbbbbbbbbbbbbbbb",
        );

    let report = run(&fake, temp.path()).unwrap();

    assert!(report.is_clean());
    assert_eq!(report.listed, 2);
    assert_eq!(
        report.downloads,
        vec![
            DownloadOutcome::Saved {
                path: temp.path().join("a.txt"),
                bytes: 10
            },
            DownloadOutcome::Saved {
                path: temp.path().join("b.txt"),
                bytes: 20
            },
        ]
    );
    assert_eq!(fs::read(temp.path().join("a.txt")).unwrap(), b"aaaaaaaaaa");
    assert_eq!(
        fs::read(temp.path().join("b.txt")).unwrap(),
        b"bbbbbbbbbbbbbbbbbbbb"
    );

    let paths = fake.paths();
    assert_eq!(paths.len(), 5);
    assert!(paths[2].starts_with("/dws/api/ListFile?id=admin&tok=&volid=1&path="));
    assert_eq!(paths[3], "/usb_dev/usb_A1/shared/docs/a.txt");
    assert_eq!(paths[4], "/usb_dev/usb_A1/shared/docs/b.txt");

    // Every request after the login GET carries the session cookie
    assert!(fake
        .seen()
        .iter()
        .skip(1)
        .all(|s| s.cookie.as_deref() == Some("uid=abc123")));
}

/// A rejected challenge stops the run before any POST, list or download.
#[test]
fn test_rejected_challenge_contacts_nothing_else() {
    let temp = TempDir::new().unwrap();
    let fake = FakeDevice::new(TWO_FILES).with_challenge(r#"{"status":"fail"}"#);

    let err = run(&fake, temp.path()).unwrap_err();

    assert!(matches!(err, TransferError::ChallengeRejected { .. }));
    assert_eq!(fake.paths(), vec!["/dws/api/Login".to_string()]);
}

/// Rejected credentials stop the run before listing.
#[test]
fn test_rejected_credentials_contact_nothing_else() {
    let temp = TempDir::new().unwrap();
    let fake = FakeDevice::new(TWO_FILES).with_login(r#"{"status":"error"}"#);

    let err = run(&fake, temp.path()).unwrap_err();

    assert!(matches!(err, TransferError::CredentialRejected { .. }));
    assert_eq!(fake.seen().len(), 2);
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

/// An empty listing completes successfully without downloads.
#[test]
fn test_empty_listing_completes() {
    let temp = TempDir::new().unwrap();
    let fake = FakeDevice::new(r#"{"count":0,"files":[]}"#);

    let report = run(&fake, temp.path()).unwrap();

    assert_eq!(report.listed, 0);
    assert!(report.downloads.is_empty());
    assert!(report.is_clean());
    assert_eq!(fake.seen().len(), 3);
}

/// A short body is kept on disk and flagged, and the next file still runs.
#[test]
fn test_size_mismatch_is_kept_and_run_continues() {
    let temp = TempDir::new().unwrap();
    let fake = FakeDevice::new(TWO_FILES)
        .with_file("/usb_dev/usb_A1/shared/docs/a.txt", 200, b"aaaa")
        .with_file(
            "/usb_dev/usb_A1/shared/docs/b.txt",
            200,
            b"bbbbbbbbbbbbbbbbbbbb",
        );

    let report = run(&fake, temp.path()).unwrap();

    assert_eq!(report.mismatched(), 1);
    assert_eq!(
        report.downloads[0],
        DownloadOutcome::SizeMismatch {
            path: temp.path().join("a.txt"),
            expected: 10,
            actual: 4,
        }
    );
    assert_eq!(fs::read(temp.path().join("a.txt")).unwrap(), b"aaaa");
    assert!(temp.path().join("b.txt").exists());
}

/// A missing file is reported and skipped.
#[test]
fn test_http_error_skips_only_that_file() {
    let temp = TempDir::new().unwrap();
    let fake = FakeDevice::new(TWO_FILES).with_file(
        "/usb_dev/usb_A1/shared/docs/b.txt",
        200,
        b"bbbbbbbbbbbbbbbbbbbb",
    );

    let report = run(&fake, temp.path()).unwrap();

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "a.txt");
    assert!(report.failed[0].reason.contains("404"));
    assert!(!temp.path().join("a.txt").exists());
    assert!(temp.path().join("b.txt").exists());
}

/// A hostile listing cannot write outside the save directory.
#[test]
fn test_traversal_names_stay_in_save_dir() {
    let temp = TempDir::new().unwrap();
    let save_dir = temp.path().join("save");
    let fake = FakeDevice::new(
        r#"{"count":1,"files":[{"name":"../../etc/passwd","size":4}]}"#,
    )
    .with_file("/usb_dev/usb_A1/shared/docs/....etcpasswd", 200, b"root");

    let report = run(&fake, &save_dir).unwrap();

    assert!(report.is_clean());
    assert_eq!(report.downloads[0].path(), save_dir.join("....etcpasswd"));
    let entries: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("save")]);
}
