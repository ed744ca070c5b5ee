//! File-based `tracing` setup. Stdout belongs to the TUI, so all log
//! output goes to `campus-sphere.log` in the data directory.

use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

use crate::config::Config;

/// Name of the log file inside the data directory.
pub const LOG_FILE: &str = "campus-sphere.log";

/// Filter used when neither `RUST_LOG` nor the config file sets one.
pub const DEFAULT_FILTER: &str = "campus_sphere=info";

/// Errors that can occur while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The data directory could not be created.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A global subscriber was already installed.
    #[error("failed to install log subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Picks the filter directive: `RUST_LOG`, then the config file, then the default.
pub fn filter_directive(env: Option<String>, configured: Option<&str>) -> String {
    env.filter(|v| !v.trim().is_empty())
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Installs the global subscriber. Keep the returned guard alive until exit
/// so buffered lines are flushed.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn init(config: &Config) -> Result<WorkerGuard, LoggingError> {
    std::fs::create_dir_all(&config.data_dir)?;

    let appender = tracing_appender::rolling::never(&config.data_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let directive = filter_directive(
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        config.log_filter.as_deref(),
    );
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("Warning: invalid log filter {directive:?}: {e}");
        EnvFilter::new(DEFAULT_FILTER)
    });

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
