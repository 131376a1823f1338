//! Tracker Daemon - Background service for realtime presence and event broadcast.

mod app;
mod ipc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracker_config::{init_file_logging, init_logging, Config, Paths};

/// Tracker daemon command-line interface.
#[derive(Parser)]
#[command(name = "tracker-daemon")]
#[command(about = "Tracker daemon for realtime presence and event broadcast")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Base directory for runtime files (socket, logs, config). Defaults to ~/.tracker
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon
    Start {
        /// Run in foreground (log to stderr instead of the log file)
        #[arg(short, long)]
        foreground: bool,
    },
    /// Stop the daemon
    Stop,
    /// Check daemon status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    let config = Config::load(&paths)?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);

    match cli.command {
        Some(Commands::Start { foreground }) => {
            if foreground {
                init_logging(level);
            } else {
                init_file_logging(level, &paths.daemon_log_file())?;
            }
            app::run_daemon(config, paths).await?;
        }
        None => {
            // Default to start in foreground if no command given
            init_logging(level);
            app::run_daemon(config, paths).await?;
        }
        Some(Commands::Stop) => {
            init_logging(level);
            app::stop_daemon(&paths).await?;
        }
        Some(Commands::Status) => {
            init_logging(level);
            app::check_status(&paths).await?;
        }
    }

    Ok(())
}
