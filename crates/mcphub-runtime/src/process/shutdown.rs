//! Terminate-then-kill shutdown for the hub process.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;
#[cfg(unix)]
use tokio::time::timeout;

/// Result of [`shutdown_child`].
#[derive(Debug, Clone, Copy)]
pub struct ShutdownReport {
    pub status: ExitStatus,
    /// True when the grace period elapsed and the process was killed.
    pub forced: bool,
}

/// Ask `child` to terminate, killing it if it is still alive after `grace`.
///
/// Always reaps the process before returning. On Windows there is no polite
/// terminate, so the process is killed immediately and `forced` is false.
pub async fn shutdown_child(child: &mut Child, grace: Duration) -> io::Result<ShutdownReport> {
    #[cfg(unix)]
    {
        terminate_unix(child, grace).await
    }

    #[cfg(not(unix))]
    {
        let _ = grace;
        child.kill().await?;
        let status = child.wait().await?;
        Ok(ShutdownReport {
            status,
            forced: false,
        })
    }
}

#[cfg(unix)]
async fn terminate_unix(child: &mut Child, grace: Duration) -> io::Result<ShutdownReport> {
    let Some(pid) = child.id() else {
        // Already reaped.
        let status = child.wait().await?;
        return Ok(ShutdownReport {
            status,
            forced: false,
        });
    };
    let pid = i32::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;

    if let Err(e) = signal::kill(Pid::from_raw(pid), Signal::SIGTERM) {
        if e == nix::errno::Errno::ESRCH {
            let status = child.wait().await?;
            return Ok(ShutdownReport {
                status,
                forced: false,
            });
        }
        return Err(io::Error::other(e));
    }

    if let Ok(status) = timeout(grace, child.wait()).await {
        return Ok(ShutdownReport {
            status: status?,
            forced: false,
        });
    }

    child.kill().await?;
    let status = child.wait().await?;
    Ok(ShutdownReport {
        status,
        forced: true,
    })
}
