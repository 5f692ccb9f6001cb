//! Hub command line construction.

use std::ffi::OsString;
use std::io::{self, PipeReader};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use mcphub_core::{Settings, config_path, hub_entry_path};
use tokio::io::AsyncRead;
use tokio::process::{Child, Command};

/// Everything needed to spawn one hub process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubLaunchSpec {
    /// Interpreter executable, e.g. `node`.
    pub interpreter: String,
    /// Hub entry script.
    pub entry: PathBuf,
    pub port: u16,
    pub config_path: PathBuf,
    /// Working directory for the process (the hub project root).
    pub working_dir: PathBuf,
    /// Pass `--watch` so the hub reloads its config on change.
    pub watch: bool,
}

impl HubLaunchSpec {
    /// Launch spec for the hub at `project_root`, honoring `settings`.
    pub fn from_settings(settings: &Settings, project_root: &Path) -> Self {
        Self {
            interpreter: settings.effective_interpreter().to_string(),
            entry: hub_entry_path(project_root),
            port: settings.effective_port(),
            config_path: config_path(project_root, settings.effective_config_file()),
            working_dir: project_root.to_path_buf(),
            watch: true,
        }
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Arguments after the interpreter.
    pub fn args(&self) -> Vec<OsString> {
        let mut args = vec![
            self.entry.clone().into_os_string(),
            OsString::from("--port"),
            OsString::from(self.port.to_string()),
            OsString::from("--config"),
            self.config_path.clone().into_os_string(),
        ];
        if self.watch {
            args.push(OsString::from("--watch"));
        }
        args
    }

    /// Human-readable command line for logging.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.interpreter.clone()];
        parts.extend(
            self.args()
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }

    /// Spawn the hub with stdout and stderr sharing one pipe, so output
    /// arrives in the order the process wrote it.
    pub(crate) fn spawn(&self) -> io::Result<(Child, impl AsyncRead + Unpin + Send + 'static)> {
        let (reader, writer) = io::pipe()?;
        let mut cmd = self.command();
        cmd.stdout(writer.try_clone()?).stderr(writer);
        let child = cmd.spawn()?;
        // Close our copies of the write end; EOF then follows the last writer.
        drop(cmd);
        Ok((child, merged_output(reader)?))
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.interpreter);
        cmd.args(self.args())
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        cmd
    }
}

#[cfg(unix)]
fn merged_output(reader: PipeReader) -> io::Result<tokio::net::unix::pipe::Receiver> {
    tokio::net::unix::pipe::Receiver::from_owned_fd(reader.into())
}

/// Bridge the blocking pipe into the runtime on a blocking thread.
#[cfg(not(unix))]
fn merged_output(mut reader: PipeReader) -> io::Result<tokio::io::DuplexStream> {
    use std::io::Read;
    use tokio::io::AsyncWriteExt;

    let (mut tx, rx) = tokio::io::duplex(8 * 1024);
    let handle = tokio::runtime::Handle::current();
    tokio::task::spawn_blocking(move || {
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if handle.block_on(tx.write_all(&buf[..n])).is_err() {
                        break;
                    }
                }
            }
        }
    });
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> HubLaunchSpec {
        HubLaunchSpec {
            interpreter: "node".to_string(),
            entry: PathBuf::from("/srv/hub/src/utils/cli.js"),
            port: 3000,
            config_path: PathBuf::from("/srv/hub/mcp-servers.json"),
            working_dir: PathBuf::from("/srv/hub"),
            watch: true,
        }
    }

    #[test]
    fn args_follow_hub_cli_order() {
        let args: Vec<String> = spec()
            .args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            [
                "/srv/hub/src/utils/cli.js",
                "--port",
                "3000",
                "--config",
                "/srv/hub/mcp-servers.json",
                "--watch"
            ]
        );
    }

    #[test]
    fn watch_flag_is_optional() {
        let mut spec = spec();
        spec.watch = false;
        assert!(!spec.display_command().contains("--watch"));
    }

    #[test]
    fn from_settings_resolves_paths_under_root() {
        let root = Path::new("/srv/hub");
        let settings = Settings {
            port: Some(4500),
            ..Settings::default()
        };
        let spec = HubLaunchSpec::from_settings(&settings, root);
        assert_eq!(spec.entry, root.join("src").join("utils").join("cli.js"));
        assert_eq!(spec.config_path, root.join("mcp-servers.json"));
        assert_eq!(spec.working_dir, root);
        assert_eq!(spec.with_port(4600).port, 4600);
    }
}
