//! Logging setup.
//!
//! The TUI owns stdout, so logs go to a daily rolling file under
//! `~/.tracklog/logs/`. The filter comes from `TRACKLOG_LOG` (default `info`).

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::error::TrackerError;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "TRACKLOG_LOG";

/// Base name of the rolling log file.
pub const LOG_FILE_NAME: &str = "tracklog.log";

/// Install the global tracing subscriber.
///
/// The returned guard flushes buffered log lines when dropped; keep it alive
/// for the life of the process.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or a subscriber
/// is already installed.
pub fn init(logs_dir: &Path) -> Result<WorkerGuard, TrackerError> {
    std::fs::create_dir_all(logs_dir).map_err(|e| {
        TrackerError::Config(format!(
            "Failed to create log directory {}: {e}",
            logs_dir.display()
        ))
    })?;

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| TrackerError::Config(format!("Failed to initialize logging: {e}")))?;

    Ok(guard)
}
