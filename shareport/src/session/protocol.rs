//! JSON bodies exchanged with the SharePort web API.

use serde::{Deserialize, Deserializer};

/// Value of `status` on every successful API response.
pub const STATUS_OK: &str = "ok";

/// Body of the unauthenticated login GET.
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeResponse {
    pub status: String,

    /// Session identifier to present as the `uid` cookie.
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub uid: Option<String>,

    /// Nonce appended to the username before hashing.
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub challenge: Option<String>,
}

impl ChallengeResponse {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Body of the login POST.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Body of a directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    pub count: u64,

    #[serde(default)]
    pub files: Option<Vec<FileEntry>>,
}

/// One remote file as reported by the listing endpoint.
///
/// `name` is untrusted; see [`crate::filename::sanitize_file_name`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEntry {
    pub name: String,

    /// Size in bytes as reported by the device.
    pub size: u64,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

// Some firmware revisions send the uid as a bare number.
fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}
