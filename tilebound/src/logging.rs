//! Tracing subscriber setup.
//!
//! Logs always go to stderr. When a log file is configured a second,
//! non-blocking writer mirrors them there without ANSI colors; the
//! returned [`WorkerGuard`] must be held until the process exits so the
//! file writer is flushed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";
const VERBOSE_FILTER: &str = "debug";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to prepare log directory {}: {source}", path.display())]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Log file path has no file name: {}", .0.display())]
    InvalidLogPath(PathBuf),

    #[error("Failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Filter used when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)))
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `verbose`. Fails if a subscriber is
/// already installed.
pub fn init_logging(
    verbose: bool,
    log_file: Option<&Path>,
) -> Result<Option<WorkerGuard>, LoggingError> {
    let stderr_layer = fmt::layer().with_writer(io::stderr).with_target(false);

    match log_file {
        None => {
            tracing_subscriber::registry()
                .with(env_filter(verbose))
                .with(stderr_layer)
                .try_init()
                .map_err(|e| LoggingError::Install(e.to_string()))?;
            Ok(None)
        }
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| LoggingError::InvalidLogPath(path.to_path_buf()))?;
            let directory = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            fs::create_dir_all(&directory).map_err(|source| LoggingError::LogDirectory {
                path: directory.clone(),
                source,
            })?;

            let appender = tracing_appender::rolling::never(&directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false);

            tracing_subscriber::registry()
                .with(env_filter(verbose))
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| LoggingError::Install(e.to_string()))?;
            Ok(Some(guard))
        }
    }
}
