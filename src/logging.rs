//! Tracing subscriber setup.
//!
//! `pretty` logs to stdout. `json` writes one JSON object per event to
//! `<LOG_DIR>/app.log`, which is truncated on every start. `RUST_LOG`
//! overrides the default `info` filter in both modes.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::config::{LogConfig, LogFormat};

pub const LOG_FILE_NAME: &str = "app.log";
const DEFAULT_FILTER: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("log file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("tracing subscriber init failed: {0}")]
    Init(String),
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be created or a global
/// subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init(),
        LogFormat::Json => {
            let file = open_log_file(&config.dir)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(Mutex::new(file)))
                .try_init()
        }
    };
    result.map_err(|e| LoggingError::Init(e.to_string()))
}

/// Create `dir` if needed and open a fresh, empty `app.log` inside it.
pub(crate) fn open_log_file(dir: &Path) -> Result<File, LoggingError> {
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::Io { path: dir.to_path_buf(), source })?;
    let path = dir.join(LOG_FILE_NAME);
    File::create(&path).map_err(|source| LoggingError::Io { path, source })
}

#[cfg(test)]
#[path = "logging_test.rs"]
mod tests;
