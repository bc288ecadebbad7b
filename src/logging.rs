//! File logging.
//!
//! The terminal belongs to the TUI, so log output goes to a file through a
//! non-blocking writer. The filter is read from `KEYSPRINT_LOG` using the
//! usual `tracing-subscriber` directive syntax.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "KEYSPRINT_LOG";
pub const DEFAULT_DIRECTIVE: &str = "info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("log path {0} has no file name")]
    NoFileName(PathBuf),
    #[error("could not create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not open log file: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),
    #[error("could not install the global subscriber: {0}")]
    Install(String),
}

/// `<state dir>/keysprint.log`, falling back to the local data dir on
/// platforms without a state dir.
pub fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "keysprint").map(|pd| {
        pd.state_dir()
            .unwrap_or_else(|| pd.data_local_dir())
            .join("keysprint.log")
    })
}

pub fn filter_from(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber. Keep the guard alive for as long as
/// logging should be flushed.
pub fn init(path: &Path) -> Result<WorkerGuard, LoggingError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::NoFileName(path.to_path_buf()))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let directive = std::env::var(LOG_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(filter_from(directive.as_deref()))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| LoggingError::Install(err.to_string()))?;

    tracing::info!(path = %path.display(), "logging initialised");
    Ok(guard)
}
