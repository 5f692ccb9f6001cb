//! Diagnostic logging setup.
//!
//! The terminal belongs to the UI, so tracing output goes to a file.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use mcphub_core::paths::ensure_directory;
use tracing_subscriber::EnvFilter;

fn filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install a subscriber appending to `path`. `RUST_LOG` overrides the level.
pub fn init_file_logging(path: &Path, verbose: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

/// Discard diagnostics; used when no log location can be resolved.
pub fn init_sink_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(false))
        .with_writer(io::sink)
        .try_init();
}

/// Log to `path` when possible, otherwise discard diagnostics.
///
/// Returns why file logging could not be installed. Startup continues
/// either way.
pub fn init_logging(path: Option<&Path>, verbose: bool) -> Option<anyhow::Error> {
    let Some(path) = path else {
        init_sink_logging();
        return None;
    };
    match init_file_logging(path, verbose) {
        Ok(()) => None,
        Err(err) => {
            init_sink_logging();
            Some(err)
        }
    }
}
