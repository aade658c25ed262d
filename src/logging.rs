//! Diagnostic logging to a file
//!
//! The terminal belongs to the TUI, so `tracing` output goes to
//! `<data dir>/logs/<app>.log` instead. Filter with `RUST_LOG`
//! (default `info`).

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::project_dirs;

/// Directory holding per-app diagnostic logs
pub fn log_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join("logs"))
}

/// Build a subscriber appending to `<dir>/<app>.log`. Returns it with the file path.
pub fn file_subscriber(
    dir: &Path,
    app: &str,
) -> Result<(impl Subscriber + Send + Sync + 'static, PathBuf)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let path = dir.join(format!("{}.log", app));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        );
    Ok((subscriber, path))
}

/// Install the global subscriber. Returns the log file path.
pub fn init(app: &str) -> Result<PathBuf> {
    let (subscriber, path) = file_subscriber(&log_dir()?, app)?;
    subscriber
        .try_init()
        .context("Logging was already initialised")?;

    tracing::info!(app, version = env!("CARGO_PKG_VERSION"), "starting");
    Ok(path)
}
