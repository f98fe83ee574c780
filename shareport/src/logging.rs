//! Logging bootstrap.
//!
//! Console output goes to stderr with local timestamps. When a log file is
//! configured, the same events are also written there through a
//! non-blocking appender. `RUST_LOG` overrides the configured level.

use std::fmt;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive, usually a bare level such as `info`.
    pub level: String,
    /// Optional log file, appended to.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Replace the level, e.g. for a `--verbose` flag.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

/// Keeps the file writer alive; pending lines are flushed on drop.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Errors that can occur while installing the subscriber.
#[derive(Debug)]
pub enum LoggingError {
    /// The level is not a valid filter directive.
    InvalidFilter(String),
    /// The log file could not be opened.
    FileAppender { path: PathBuf, reason: String },
    /// A global subscriber is already installed.
    AlreadyInitialized(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFilter(msg) => write!(f, "invalid log filter: {}", msg),
            Self::FileAppender { path, reason } => {
                write!(f, "failed to open log file {}: {}", path.display(), reason)
            }
            Self::AlreadyInitialized(msg) => write!(f, "logging already initialized: {}", msg),
        }
    }
}

impl std::error::Error for LoggingError {}

/// Build the level filter, letting `RUST_LOG` win when set.
fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidFilter(e.to_string())),
    }
}

/// Install the global tracing subscriber, with console output on stderr.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError> {
    init_logging_with_console(config, std::io::stderr)
}

/// Install the global tracing subscriber, with console output going to
/// `console` instead of stderr.
///
/// Each event is formatted in full and then written with a single
/// `write_all` on a fresh writer, so a writer may buffer until it is dropped.
pub fn init_logging_with_console<W>(
    config: &LoggingConfig,
    console: W,
) -> Result<LoggingGuard, LoggingError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = build_filter(&config.level)?;

    let console = tracing_subscriber::fmt::layer()
        .with_writer(console)
        .with_target(false)
        .with_timer(LocalTime::rfc_3339());

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| LoggingError::FileAppender {
                    path: path.clone(),
                    reason: "path has no file name".to_string(),
                })?
                .to_string_lossy()
                .to_string();

            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(file_name)
                .build(&directory)
                .map_err(|e| LoggingError::FileAppender {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(LocalTime::rfc_3339());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(LoggingGuard { _file: guard })
}
