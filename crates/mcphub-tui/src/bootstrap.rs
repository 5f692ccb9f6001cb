//! Composition root helpers.
//!
//! This is the only place where concrete adapters are wired together:
//! - `HubClient` (the `HubApiPort` implementation)
//! - `HubSupervisor` (owner of the hub process)
//! - `HealthPoller` (background roster refresh)
//! - `HubShell` (presentation state)
//!
//! All background work reports into a single channel drained by the UI task.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use mcphub_core::{Settings, current_project_root, validate_settings};
use mcphub_gui::{HubShell, ShellDeps, ShellEvent, shell_channel};
use mcphub_runtime::{HealthPoller, HubClient, HubClientConfig, HubSupervisor, SupervisorConfig};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::parser::Cli;

/// Fully wired application, ready to hand to the UI loop.
pub struct AppContext {
    pub shell: HubShell,
    pub events: UnboundedReceiver<ShellEvent>,
    pub poller: HealthPoller,
    pub settings: Settings,
    pub project_root: PathBuf,
}

/// Layer defaults, `MCPHUB_*` variables from `env`, then flags.
///
/// `.env` is expected to have been loaded into the process environment
/// before `env` is collected.
pub fn resolve_settings<I, K, V>(cli: &Cli, env: I) -> Result<Settings>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut settings = Settings::with_defaults();
    settings.overlay(&Settings::from_env_vars(env).context("invalid MCPHUB_* environment")?);
    settings.overlay(&cli.settings_layer());
    validate_settings(&settings)?;
    Ok(settings)
}

/// Explicit project root if configured, otherwise discovered from the
/// working directory.
pub fn resolve_project_root(settings: &Settings) -> Result<PathBuf> {
    match &settings.project_root {
        Some(root) => Ok(root.clone()),
        None => Ok(current_project_root()?),
    }
}

/// Wire the application together.
pub fn bootstrap(settings: Settings, project_root: PathBuf) -> Result<AppContext> {
    let (sink, events) = shell_channel();

    let api = Arc::new(
        HubClient::new(HubClientConfig::from_settings(&settings))
            .context("failed to build HTTP client")?,
    );
    let supervisor = HubSupervisor::new(
        SupervisorConfig::from_settings(&settings),
        Arc::new(sink.clone()),
    );
    let poller = HealthPoller::new(
        api.clone(),
        Arc::new(sink.clone()),
        supervisor.subscribe_state(),
        settings.poll_interval(),
    );

    debug!(root = %project_root.display(), port = settings.effective_port(), "bootstrapped");
    let shell = HubShell::new(
        ShellDeps::new(api, supervisor, settings.clone(), project_root.clone()),
        sink,
    );

    Ok(AppContext {
        shell,
        events,
        poller,
        settings,
        project_root,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use mcphub_core::settings::env_keys;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("mcphub-manager").chain(args.iter().copied()))
    }

    #[test]
    fn flags_override_environment_which_overrides_defaults() {
        let env = [
            (env_keys::PORT, "4000"),
            (env_keys::POLL_SECS, "7"),
            ("UNRELATED", "x"),
        ];
        let settings = resolve_settings(&cli(&["--port", "4500"]), env).unwrap();

        assert_eq!(settings.effective_port(), 4500);
        assert_eq!(settings.poll_interval_secs, Some(7));
        assert_eq!(settings.effective_interpreter(), "node");
    }

    #[test]
    fn malformed_environment_is_an_error() {
        let env = [(env_keys::PORT, "seventy")];
        assert!(resolve_settings(&cli(&[]), env).is_err());
    }

    #[test]
    fn explicit_project_root_wins() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            project_root: Some(dir.path().to_path_buf()),
            ..Settings::with_defaults()
        };
        assert_eq!(resolve_project_root(&settings).unwrap(), dir.path());
    }

    #[test]
    fn bootstrap_starts_idle() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = bootstrap(Settings::with_defaults(), dir.path().to_path_buf()).unwrap();
        assert_eq!(ctx.shell.hub_state(), mcphub_core::HubState::Idle);
        assert_eq!(ctx.shell.port_input(), "3000");
        assert_eq!(ctx.project_root, dir.path());
    }
}
