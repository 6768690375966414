use std::fs;
use std::io;
use std::path::Path;

use time::UtcOffset;
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{self, EnvFilter, fmt, prelude::*};

/// Initialize logger with stderr output and, optionally, a log file.
/// Returns a WorkerGuard that must be kept alive while file output is wanted.
///
/// # Arguments
/// * `no_color` - Disable ANSI colors in stderr output
/// * `log_level` - Override log level (otherwise uses RUST_LOG or defaults to "info")
/// * `log_file` - Also append logs, at DEBUG level, to this file
///
/// Calling it again once a global subscriber is installed is not an error,
/// so tests may call it freely.
pub fn init_logger(no_color: bool, log_level: Option<&str>, log_file: Option<&Path>) -> io::Result<WorkerGuard> {
    let timer = fmt::time::OffsetTime::new(
        UtcOffset::UTC,
        format_description!("[[[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z]"),
    );

    let stderr_filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(timer.clone())
        .with_ansi(!no_color)
        .with_filter(stderr_filter);

    let result = match log_file {
        Some(path) => {
            let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let file_layer = fmt::layer()
                .with_writer(non_blocking)
                .with_timer(timer)
                .with_ansi(false)
                .with_filter(EnvFilter::new("debug"));
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .map(|()| guard)
        }
        None => {
            let (_, guard) = tracing_appender::non_blocking(io::sink());
            tracing_subscriber::registry()
                .with(stderr_layer)
                .try_init()
                .map(|()| guard)
        }
    };

    match result {
        Ok(guard) => Ok(guard),
        // Ignore errors due to the subscriber or logger already being set
        Err(e) if e.to_string().contains("already been set") || e.to_string().contains("SetLoggerError") => {
            let (_, guard) = tracing_appender::non_blocking(io::sink());
            Ok(guard)
        }
        Err(e) => Err(io::Error::other(e)),
    }
}
