//! Logging initialization for the daemon.
//!
//! All daemon services log through `tracing`. Foreground runs get compact
//! output on stderr; detached runs append structured JSONL to the daemon
//! log file under `~/.tracker/logs/`. The `RUST_LOG` env var overrides
//! the configured default level.

use crate::ConfigResult;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize logging with compact output on stderr.
///
/// # Arguments
///
/// * `level` - Default log level (trace, debug, info, warn, error)
///
/// # Example
///
/// ```ignore
/// init_logging("info");
/// tracing::info!("Daemon started");
/// ```
pub fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .compact()
                .with_writer(io::stderr),
        )
        .init();
}

/// Initialize logging with structured JSONL output appended to a file.
///
/// Used when the daemon runs detached from a terminal.
pub fn init_file_logging(level: &str, path: &Path) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Open in append mode so restarts don't truncate earlier lines
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(file)
                .with_ansi(false),
        )
        .init();

    Ok(())
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
