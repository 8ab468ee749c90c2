//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` with
//! `--verbose`. The terminal UI owns the screen, so it logs to a file.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter(verbose: bool) -> EnvFilter {
    let filter = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into())
}

/// Logs to stderr. Used by the one-shot subcommands.
pub fn init_stderr_logging(verbose: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to install log subscriber")
}

/// Appends log lines to `path`, creating its directory when needed.
pub fn init_file_logging(path: &Path, verbose: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("Failed to install log subscriber")
}
