use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::cli::Command;

pub const LOG_ENV: &str = "STEPTRACK_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// The TUI owns the terminal while it runs, so its logs are appended to a
    /// file. Plain commands log to stderr, away from their stdout output.
    pub fn for_command(
        command: Option<&Command>,
        log_file: impl FnOnce() -> Result<PathBuf>,
    ) -> Result<Self> {
        match command {
            Some(Command::Tui) | None => Ok(Self::File(log_file()?)),
            Some(_) => Ok(Self::Stderr),
        }
    }
}

/// `STEPTRACK_LOG` wins over `RUST_LOG`; the default level is `warn`.
pub fn init(target: LogTarget) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => builder
            .with_writer(Mutex::new(open_log_file(&path)?))
            .with_ansi(false)
            .try_init(),
    };
    result.map_err(|err| anyhow!("failed to initialize logging: {err}"))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}
