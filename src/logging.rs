use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub const LOG_FILE_ENV: &str = "SUNBEAM_LOG_FILE";
pub const LOG_FILTER_ENV: &str = "SUNBEAM_LOG";

fn log_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(LOG_FILE_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|d| d.join("sunbeam").join("sunbeam.log"))
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("sunbeam=info"))
}

/// Routes tracing output to the log file; the terminal belongs to the UI.
pub fn init_file_logging() -> Result<Option<PathBuf>> {
    let Some(path) = log_path() else {
        return Ok(None);
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create log dir {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);
    tracing_subscriber::registry()
        .with(filter())
        .with(file_layer)
        .try_init()
        .context("install tracing subscriber")?;
    Ok(Some(path))
}

/// Logs to stderr, for processes that do not own a terminal UI.
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .try_init();
}
