//! Opening the hub's config and log files.
//!
//! Failures become log entries for the view; none of them are fatal.

use std::path::{Path, PathBuf};

use mcphub_core::LogEntry;
use mcphub_runtime::{OpenError, open_path};

pub(crate) fn open_config(path: &Path) -> Result<(), LogEntry> {
    open_path(path).map_err(|err| match err {
        OpenError::NotFound(path) => {
            LogEntry::warn(format!("Config file not found: {}", path.display()))
        }
        OpenError::Launch { source, .. } => {
            LogEntry::error(format!("Could not open config: {source}"))
        }
    })
}

/// Open the hub's log file, as located by `find_hub_log_file`.
pub(crate) fn open_hub_log(found: Option<PathBuf>) -> Result<PathBuf, LogEntry> {
    let Some(path) = found else {
        return Err(LogEntry::warn("Log file not found at expected paths"));
    };
    match open_path(&path) {
        Ok(()) => Ok(path),
        Err(OpenError::NotFound(_)) => Err(LogEntry::warn("Log file not found at expected paths")),
        Err(OpenError::Launch { source, .. }) => Err(LogEntry::error(format!(
            "Could not open log file: {source}"
        ))),
    }
}
