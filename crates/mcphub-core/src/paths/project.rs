//! Project layout: where the hub's sources and configuration live.
//!
//! The manager is shipped inside the hub's repository. The project root is
//! the nearest ancestor directory holding a `package.json`.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::PathError;

/// File whose presence marks the project root.
pub const PROJECT_MARKER: &str = "package.json";

/// Hub configuration file name, relative to the project root.
pub const CONFIG_FILENAME: &str = "mcp-servers.json";

/// Walk up from `start` to the first directory containing [`PROJECT_MARKER`].
///
/// Falls back to `start` itself when no ancestor qualifies.
pub fn find_project_root(start: &Path) -> PathBuf {
    for dir in start.ancestors() {
        if dir.join(PROJECT_MARKER).is_file() {
            debug!(root = %dir.display(), "Found project root");
            return dir.to_path_buf();
        }
    }
    debug!(start = %start.display(), "No project marker found, using start directory");
    start.to_path_buf()
}

/// Project root resolved from the current working directory.
pub fn current_project_root() -> Result<PathBuf, PathError> {
    let cwd = env::current_dir().map_err(|e| PathError::CurrentDirError(e.to_string()))?;
    Ok(find_project_root(&cwd))
}

/// Path of the hub's CLI entry script.
pub fn hub_entry_path(root: &Path) -> PathBuf {
    root.join("src").join("utils").join("cli.js")
}

/// Path of the hub configuration file.
///
/// Relative `filename`s resolve against `root`; absolute ones are kept.
pub fn config_path(root: &Path, filename: &str) -> PathBuf {
    let candidate = Path::new(filename);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    }
}
