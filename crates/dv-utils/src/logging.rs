//! Logger installation shared by the CLI and the terminal UI.
//!
//! The TUI owns the terminal, so it logs to a file; CLI subcommands log to
//! stderr. `RUST_LOG` takes precedence over the default level.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{UtilsError, UtilsResult};

const LOG_DIR_NAME: &str = "devvault";
const LOG_FILE_NAME: &str = "devvault.log";

/// Where log records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error, used by one-shot CLI commands.
    Stderr,
    /// Append to a file, used while the terminal UI is active.
    File(PathBuf),
}

/// Platform log location, e.g. `~/.local/share/devvault/devvault.log` on Linux.
pub fn default_log_path() -> PathBuf {
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir);
    base.join(LOG_DIR_NAME).join(LOG_FILE_NAME)
}

/// Install the global subscriber.
pub fn init_logging(default_level: Level, target: LogTarget) -> UtilsResult<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(default_level).into())
        .from_env_lossy();

    match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| UtilsError::Logging(err.to_string())),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| UtilsError::Logging(err.to_string()))
        }
    }
}
