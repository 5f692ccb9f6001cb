//! Platform-specific locations for the manager's own files.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::PathError;

const APP_DIR_NAME: &str = "mcphub-manager";

/// Directory for the manager's diagnostic log and other state.
///
/// Resolution order:
/// 1. `MCPHUB_STATE_DIR` environment variable
/// 2. Platform state directory (`~/.local/state/mcphub-manager` on Linux)
/// 3. Platform local data directory
pub fn manager_state_dir() -> Result<PathBuf, PathError> {
    if let Some(path) = std::env::var_os("MCPHUB_STATE_DIR") {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(PathError::NoStateDir)
}

/// Path of the manager's diagnostic (tracing) log.
pub fn manager_log_path() -> Result<PathBuf, PathError> {
    Ok(manager_state_dir()?.join("manager.log"))
}

/// Create `path` (and parents) when missing.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.as_os_str().is_empty() {
        return Err(PathError::EmptyPath);
    }
    if path.exists() {
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path.to_path_buf()));
        }
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
