//! Configuration, filesystem paths, and logging setup for the tracker daemon.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{Config, DEFAULT_GATEWAY_ADDR, DEFAULT_LOG_LEVEL};
pub use error::{ConfigError, ConfigResult};
pub use logging::{init_file_logging, init_logging};
pub use paths::Paths;
