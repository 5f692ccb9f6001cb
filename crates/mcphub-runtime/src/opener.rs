//! Open files with the platform's default application.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Error from [`open_path`].
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to open {}: {source}", path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Launcher program and leading arguments for this platform.
fn launcher() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(windows) {
        ("cmd", &["/C", "start", ""])
    } else {
        ("xdg-open", &[])
    }
}

/// Hand `path` to the default application without waiting for it.
///
/// The launcher is reaped on a background task.
///
/// # Errors
///
/// Returns [`OpenError::NotFound`] if `path` does not exist and
/// [`OpenError::Launch`] if the launcher cannot be spawned.
pub fn open_path(path: &Path) -> Result<(), OpenError> {
    if !path.exists() {
        return Err(OpenError::NotFound(path.to_path_buf()));
    }

    let (program, leading) = launcher();
    let mut child = Command::new(program)
        .args(leading)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| OpenError::Launch {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(%program, path = %path.display(), "opened with default application");
    tokio::spawn(async move {
        if let Err(e) = child.wait().await {
            warn!(error = %e, "failed to reap launcher");
        }
    });
    Ok(())
}
