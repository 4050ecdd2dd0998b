//! File logging for the CLI.
//!
//! Events from the `chromawise` target go to a single non-rolling file. The
//! level comes from config, and `CHROMAWISE_LOG` replaces the whole filter
//! when set (same directive syntax as `RUST_LOG`).

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt as layer_fmt};

/// Environment variable holding a full filter directive.
pub const LOG_ENV: &str = "CHROMAWISE_LOG";

const DEFAULT_FILE_NAME: &str = "chromawise.log";

#[derive(Debug)]
pub enum LoggingError {
    /// Level is not one of off, error, warn, info, debug, trace
    InvalidLevel(String),
    /// `CHROMAWISE_LOG` could not be parsed
    InvalidDirective(String),
    /// Log directory could not be created
    Io(std::io::Error),
    /// A global subscriber is already installed
    AlreadyInitialized,
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLevel(level) => write!(f, "Invalid log level '{}'", level),
            Self::InvalidDirective(d) => write!(f, "Invalid {} directive: {}", LOG_ENV, d),
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::AlreadyInitialized => write!(f, "Logging already initialized"),
        }
    }
}

impl std::error::Error for LoggingError {}

impl From<std::io::Error> for LoggingError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Directory and file name the appender writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDestination {
    pub directory: PathBuf,
    pub file_name: OsString,
}

impl LogDestination {
    /// A bare file name logs into the working directory. A path with no file
    /// name, such as `..`, gets the default name inside it.
    pub fn from_path(path: &Path) -> Self {
        match path.file_name() {
            Some(name) => Self {
                directory: match path.parent() {
                    Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                    _ => PathBuf::from("."),
                },
                file_name: name.to_os_string(),
            },
            None => Self {
                directory: if path.as_os_str().is_empty() {
                    PathBuf::from(".")
                } else {
                    path.to_path_buf()
                },
                file_name: OsString::from(DEFAULT_FILE_NAME),
            },
        }
    }
}

/// Filter directive for `level`, or the override verbatim when one is given.
pub fn filter_directive(level: &str, env_override: Option<&str>) -> Result<String, LoggingError> {
    if let Some(directive) = env_override.map(str::trim).filter(|d| !d.is_empty()) {
        return Ok(directive.to_string());
    }
    let level = level.trim().to_ascii_lowercase();
    LevelFilter::from_str(&level).map_err(|_| LoggingError::InvalidLevel(level.clone()))?;
    Ok(format!("chromawise={level}"))
}

fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    let env_override = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(level, env_override.as_deref())?;
    EnvFilter::try_new(&directive).map_err(|e| LoggingError::InvalidDirective(e.to_string()))
}

/// Install the global file subscriber.
///
/// Hold the returned guard until exit; dropping it flushes buffered lines.
/// Debug builds also record span enter and close.
pub fn init_logging(log_path: &Path, level: &str) -> Result<WorkerGuard, LoggingError> {
    let filter = build_filter(level)?;

    let destination = LogDestination::from_path(log_path);
    std::fs::create_dir_all(&destination.directory)?;

    let appender = tracing_appender::rolling::never(&destination.directory, &destination.file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = layer_fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    #[cfg(debug_assertions)]
    let file_layer = {
        use tracing_subscriber::fmt::format::FmtSpan;
        file_layer.with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    Ok(guard)
}
