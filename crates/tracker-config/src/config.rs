//! Configuration management for the daemon.

use crate::{ConfigResult, Paths};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default bind address for the realtime gateway.
pub const DEFAULT_GATEWAY_ADDR: &str = "127.0.0.1:8080";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Main daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Bind address for the realtime WebSocket gateway.
    #[serde(default = "default_gateway_addr")]
    pub gateway_addr: String,
    /// Audit database location. Overrides the default under the base directory.
    #[serde(default)]
    pub database_file: Option<PathBuf>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_gateway_addr() -> String {
    DEFAULT_GATEWAY_ADDR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            gateway_addr: DEFAULT_GATEWAY_ADDR.to_string(),
            database_file: None,
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from the config file, falling back to defaults.
    /// Environment variables override values from the file.
    pub fn load(paths: &Paths) -> ConfigResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the config file.
    pub fn save(&self, paths: &Paths) -> ConfigResult<()> {
        paths.ensure_dirs()?;
        let config_path = paths.config_file();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("TRACKER_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Ok(addr) = std::env::var("TRACKER_GATEWAY_ADDR") {
            self.gateway_addr = addr;
        }
    }

    /// Get the gateway bind address as a parsed socket address.
    pub fn gateway_addr(&self) -> ConfigResult<SocketAddr> {
        Ok(self.gateway_addr.parse()?)
    }

    /// Get the audit database path, honoring the config override.
    pub fn database_file(&self, paths: &Paths) -> PathBuf {
        self.database_file
            .clone()
            .unwrap_or_else(|| paths.database_file())
    }
}
