//! File system paths for the daemon.

use crate::{ConfigError, ConfigResult};
use std::path::PathBuf;

/// Manages file system paths for the daemon.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for daemon runtime files (~/.tracker)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.tracker`.
    pub fn new() -> ConfigResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| ConfigError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(".tracker"),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.tracker).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.tracker/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the audit database file path (~/.tracker/audit.sqlite3).
    pub fn database_file(&self) -> PathBuf {
        self.base_dir.join("audit.sqlite3")
    }

    /// Get the IPC socket path (~/.tracker/tracker.sock).
    pub fn socket_file(&self) -> PathBuf {
        self.base_dir.join("tracker.sock")
    }

    /// Get the PID file path (~/.tracker/tracker.pid).
    pub fn pid_file(&self) -> PathBuf {
        self.base_dir.join("tracker.pid")
    }

    /// Get the logs directory (~/.tracker/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the daemon log file path (~/.tracker/logs/daemon.jsonl).
    pub fn daemon_log_file(&self) -> PathBuf {
        self.logs_dir().join("daemon.jsonl")
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> ConfigResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().expect("Failed to determine home directory")
    }
}
