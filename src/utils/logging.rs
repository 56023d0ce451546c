//! File logging for dirnav.
//!
//! The terminal belongs to the UI, so log records go to `dirnav.log` in the user cache
//! directory through a non-blocking writer.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

/// Env var holding a filter directive that overrides the configured level.
pub const LOG_ENV: &str = "DIRNAV_LOG";
pub const LOG_FILE: &str = "dirnav.log";

/// Directory the log file is written to.
pub fn log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("dirnav"))
}

/// Installs the global subscriber. Keep the returned guard alive until exit so buffered
/// records are flushed.
///
/// Returns `None` when logging could not be set up; the app runs without it.
pub fn init_logging(level: &str) -> Option<WorkerGuard> {
    let dir = log_dir()?;
    std::fs::create_dir_all(&dir).ok()?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .try_init()
        .ok()?;

    Some(guard)
}
