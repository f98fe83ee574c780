//! Per-file outcomes and the end-of-run report.

use std::fmt;
use std::path::{Path, PathBuf};

/// Progress callback for a batch run.
/// Arguments: (files_completed, total_files, total_bytes_written)
pub type FileProgressCallback = Box<dyn Fn(usize, usize, u64) + Send + Sync>;

/// Result of one successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Written to disk with the size the device reported.
    Saved { path: PathBuf, bytes: u64 },

    /// Written to disk, but the size differs from the listing. The file is
    /// kept as-is.
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },
}

impl DownloadOutcome {
    /// Local path of the written file.
    pub fn path(&self) -> &Path {
        match self {
            Self::Saved { path, .. } | Self::SizeMismatch { path, .. } => path,
        }
    }

    /// Bytes on disk after the download.
    pub fn bytes_written(&self) -> u64 {
        match self {
            Self::Saved { bytes, .. } => *bytes,
            Self::SizeMismatch { actual, .. } => *actual,
        }
    }

    pub fn is_size_mismatch(&self) -> bool {
        matches!(self, Self::SizeMismatch { .. })
    }
}

/// A file that could not be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDownload {
    /// Name as reported by the device (before sanitisation).
    pub name: String,
    /// Human-readable reason.
    pub reason: String,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// Number of entries in the remote listing.
    pub listed: usize,
    /// Files written to disk, in listing order.
    pub downloads: Vec<DownloadOutcome>,
    /// Files that were skipped because of an error, in listing order.
    pub failed: Vec<FailedDownload>,
}

impl TransferReport {
    /// Create an empty report for a listing of `listed` entries.
    pub fn new(listed: usize) -> Self {
        Self {
            listed,
            ..Default::default()
        }
    }

    pub(crate) fn record(&mut self, outcome: DownloadOutcome) {
        self.downloads.push(outcome);
    }

    pub(crate) fn record_failure(&mut self, name: &str, reason: impl fmt::Display) {
        self.failed.push(FailedDownload {
            name: name.to_string(),
            reason: reason.to_string(),
        });
    }

    /// Number of files with a size mismatch.
    pub fn mismatched(&self) -> usize {
        self.downloads
            .iter()
            .filter(|d| d.is_size_mismatch())
            .count()
    }

    /// Total bytes written across all downloads.
    pub fn bytes_written(&self) -> u64 {
        self.downloads.iter().map(DownloadOutcome::bytes_written).sum()
    }

    /// Returns true if every listed file was saved with the expected size.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.mismatched() == 0
    }
}

impl fmt::Display for TransferReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} listed, {} downloaded ({} bytes), {} size mismatch, {} failed",
            self.listed,
            self.downloads.len(),
            self.bytes_written(),
            self.mismatched(),
            self.failed.len()
        )
    }
}
