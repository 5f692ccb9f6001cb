//! `HubShell`: presentation state plus the intents a front-end can issue.
//!
//! Intents that need the network or the process run on spawned tasks and
//! report back through the shell's channel; the front-end applies those
//! events with [`HubShell::apply`] on its own task.

use std::sync::Arc;

use mcphub_core::{
    ExitOutcome, HubApiPort, HubEvent, HubState, LogEntry, config_path, find_hub_log_file,
    parse_port_input,
};
use mcphub_runtime::HubLaunchSpec;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::deps::ShellDeps;
use crate::error::GuiError;
use crate::events::{ChannelSink, ShellEvent};
use crate::files;
use crate::logs::LogView;
use crate::roster::{RosterView, ServerCard};
use crate::types::HubStatus;

/// Longest accepted port text.
const PORT_INPUT_MAX: usize = 5;

/// Presentation state for the hub manager.
pub struct HubShell {
    deps: ShellDeps,
    events: ChannelSink,
    roster: RosterView,
    logs: LogView,
    hub_state: HubState,
    status: HubStatus,
    port_input: String,
    selected: usize,
}

impl HubShell {
    pub fn new(deps: ShellDeps, events: ChannelSink) -> Self {
        let logs = LogView::new(deps.settings.effective_log_capacity());
        let port_input = deps.settings.effective_port().to_string();
        Self {
            deps,
            events,
            roster: RosterView::new(),
            logs,
            hub_state: HubState::Idle,
            status: HubStatus::Stopped,
            port_input,
            selected: 0,
        }
    }

    // =========================================================================
    // View state
    // =========================================================================

    pub const fn roster(&self) -> &RosterView {
        &self.roster
    }

    pub const fn logs(&self) -> &LogView {
        &self.logs
    }

    pub const fn logs_mut(&mut self) -> &mut LogView {
        &mut self.logs
    }

    pub const fn status(&self) -> HubStatus {
        self.status
    }

    pub const fn hub_state(&self) -> HubState {
        self.hub_state
    }

    pub fn port_input(&self) -> &str {
        &self.port_input
    }

    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_card(&self) -> Option<&ServerCard> {
        self.roster.nth(self.selected)
    }

    /// Whether the port field accepts edits (only while no process exists).
    pub const fn port_editable(&self) -> bool {
        !self.hub_state.has_process() && !matches!(self.status, HubStatus::Starting)
    }

    pub fn push_port_char(&mut self, c: char) {
        if self.port_editable() && c.is_ascii_digit() && self.port_input.len() < PORT_INPUT_MAX {
            self.port_input.push(c);
        }
    }

    pub fn pop_port_char(&mut self) {
        if self.port_editable() {
            self.port_input.pop();
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.roster.len() {
            self.selected += 1;
        }
    }

    pub const fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Record a rejected intent in the log view.
    pub fn report(&mut self, err: &GuiError) {
        self.logs.push(LogEntry::warn(err.to_string()));
    }

    // =========================================================================
    // Background events
    // =========================================================================

    /// Apply one event from the channel.
    pub fn apply(&mut self, event: ShellEvent) {
        match event {
            ShellEvent::Hub(HubEvent::StateChanged(state)) => self.on_state(state),
            ShellEvent::Hub(HubEvent::Log(entry)) | ShellEvent::Log(entry) => {
                self.logs.push(entry);
            }
            ShellEvent::Hub(HubEvent::Exited(outcome)) => self.on_exit(&outcome),
            ShellEvent::Roster(servers) => {
                if self.hub_state.is_running() {
                    let report = self.roster.reconcile(servers);
                    if !report.is_structurally_unchanged() {
                        debug!(
                            created = report.created.len(),
                            removed = report.removed.len(),
                            "roster changed"
                        );
                    }
                    self.clamp_selection();
                }
            }
            ShellEvent::StartFailed(reason) => {
                debug!(%reason, "hub start failed");
                self.status = HubStatus::Error;
            }
        }
    }

    fn on_state(&mut self, state: HubState) {
        self.hub_state = state;
        self.status = HubStatus::from_state(state);
        if state == HubState::Idle {
            self.roster.reconcile(Vec::new());
            self.clamp_selection();
        }
    }

    fn on_exit(&mut self, outcome: &ExitOutcome) {
        self.status = HubStatus::after_exit(outcome);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.roster.len().saturating_sub(1));
    }

    // =========================================================================
    // Hub lifecycle
    // =========================================================================

    /// Start the hub if no process exists, otherwise stop it.
    ///
    /// # Errors
    ///
    /// See [`HubShell::start_hub`] and [`HubShell::stop_hub`].
    pub fn toggle_hub(&mut self) -> Result<(), GuiError> {
        if self.hub_state.has_process() {
            self.stop_hub().map(drop)
        } else {
            self.start_hub().map(drop)
        }
    }

    /// Start the hub on the port in the port field.
    ///
    /// Invalid port text falls back to the default port, and the field is
    /// rewritten to the port actually used.
    ///
    /// # Errors
    ///
    /// Returns [`GuiError::Conflict`] if a process exists or a start is pending.
    pub fn start_hub(&mut self) -> Result<u16, GuiError> {
        if self.hub_state.has_process() {
            return Err(GuiError::Conflict(format!(
                "hub is already {}",
                self.hub_state
            )));
        }
        if self.status == HubStatus::Starting {
            return Err(GuiError::Conflict("hub is already starting".to_string()));
        }

        let port = parse_port_input(&self.port_input);
        self.port_input = port.to_string();
        self.deps.api.set_port(port);
        self.status = HubStatus::Starting;
        self.logs.push(LogEntry::info(format!(
            "Starting MCP Hub on port {port}..."
        )));

        let spec = HubLaunchSpec::from_settings(&self.deps.settings, &self.deps.project_root)
            .with_port(port);
        info!(command = %spec.display_command(), "starting hub");

        let supervisor = self.deps.supervisor.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            if let Err(err) = supervisor.start(&spec).await {
                let err = GuiError::from(err);
                // Spawn failures are already logged by the supervisor.
                if !matches!(err, GuiError::Launch(_)) {
                    events.log(LogEntry::warn(err.to_string()));
                }
                events.send(ShellEvent::StartFailed(err.to_string()));
            }
        });

        Ok(port)
    }

    /// Stop the hub with the configured stop grace.
    ///
    /// # Errors
    ///
    /// Returns [`GuiError::Conflict`] while a start is still pending and
    /// [`GuiError::Unavailable`] when there is nothing to stop.
    pub fn stop_hub(&mut self) -> Result<JoinHandle<()>, GuiError> {
        if !self.hub_state.has_process() {
            return Err(if self.status == HubStatus::Starting {
                GuiError::Conflict("hub is still starting".to_string())
            } else {
                GuiError::Unavailable("hub is not running".to_string())
            });
        }

        self.logs.push(LogEntry::info("Stopping MCP Hub..."));
        let supervisor = self.deps.supervisor.clone();
        let events = self.events.clone();
        Ok(tokio::spawn(async move {
            if let Err(err) = supervisor.stop().await {
                events.log(LogEntry::warn(err.to_string()));
            }
        }))
    }

    /// Ask the hub to soft-restart all sub-servers.
    ///
    /// # Errors
    ///
    /// Returns [`GuiError::Unavailable`] unless the hub is running.
    pub fn restart_hub(&mut self) -> Result<JoinHandle<()>, GuiError> {
        self.require_running()?;
        let api = Arc::clone(&self.deps.api);
        let events = self.events.clone();
        Ok(tokio::spawn(async move {
            if api.restart_hub().await.is_some() {
                events.log(LogEntry::info("Hub restart requested"));
            } else {
                events.log(LogEntry::error("Failed to restart hub"));
            }
        }))
    }

    /// Stop the hub with the quit grace. Call before the front-end exits.
    pub async fn shutdown(&self) -> Option<ExitOutcome> {
        self.deps.supervisor.shutdown().await
    }

    fn require_running(&self) -> Result<(), GuiError> {
        if self.hub_state.is_running() {
            Ok(())
        } else {
            Err(GuiError::Unavailable("start the hub first".to_string()))
        }
    }

    // =========================================================================
    // Sub-server commands
    // =========================================================================

    fn card(&self, name: &str) -> Result<&ServerCard, GuiError> {
        self.roster.get(name).ok_or_else(|| GuiError::NotFound {
            entity: "server",
            id: name.to_string(),
        })
    }

    /// Flip a sub-server's enable switch.
    ///
    /// Enabling starts the server; disabling stops it and persists the
    /// disabled flag. On success the roster is re-fetched immediately.
    ///
    /// # Errors
    ///
    /// Returns [`GuiError::NotFound`] for an unknown card and
    /// [`GuiError::Unavailable`] unless the hub is running.
    pub fn toggle_server(&mut self, name: &str) -> Result<JoinHandle<()>, GuiError> {
        let enable = !self.card(name)?.is_enabled();
        self.require_running()?;

        let api = Arc::clone(&self.deps.api);
        let events = self.events.clone();
        let name = name.to_string();
        Ok(tokio::spawn(async move {
            let (done, verb) = if enable {
                (api.start_server(&name).await, "enable")
            } else {
                (api.stop_server(&name, true).await, "disable")
            };
            if done.is_some() {
                events.log(LogEntry::info(format!("Server '{name}': {verb}d")));
                refetch_roster(api.as_ref(), &events).await;
            } else {
                events.log(LogEntry::error(format!("Failed to {verb} server '{name}'")));
            }
        }))
    }

    /// Re-read a sub-server's capabilities.
    ///
    /// # Errors
    ///
    /// Same as [`HubShell::toggle_server`].
    pub fn refresh_server(&mut self, name: &str) -> Result<JoinHandle<()>, GuiError> {
        self.card(name)?;
        self.require_running()?;

        let api = Arc::clone(&self.deps.api);
        let events = self.events.clone();
        let name = name.to_string();
        Ok(tokio::spawn(async move {
            if api.refresh_server(&name).await.is_some() {
                events.log(LogEntry::info(format!("Server '{name}': refreshed")));
                refetch_roster(api.as_ref(), &events).await;
            } else {
                events.log(LogEntry::error(format!("Failed to refresh server '{name}'")));
            }
        }))
    }

    fn selected_name(&self) -> Result<String, GuiError> {
        self.selected_card()
            .map(|card| card.name().to_string())
            .ok_or_else(|| GuiError::NotFound {
                entity: "server",
                id: format!("#{}", self.selected + 1),
            })
    }

    /// [`HubShell::toggle_server`] on the selected card.
    ///
    /// # Errors
    ///
    /// Same as [`HubShell::toggle_server`].
    pub fn toggle_selected_server(&mut self) -> Result<JoinHandle<()>, GuiError> {
        let name = self.selected_name()?;
        self.toggle_server(&name)
    }

    /// [`HubShell::refresh_server`] on the selected card.
    ///
    /// # Errors
    ///
    /// Same as [`HubShell::refresh_server`].
    pub fn refresh_selected_server(&mut self) -> Result<JoinHandle<()>, GuiError> {
        let name = self.selected_name()?;
        self.refresh_server(&name)
    }

    /// Expand or collapse the selected card's tool list.
    pub fn toggle_selected_tools(&mut self) -> Option<bool> {
        let name = self.selected_card()?.name().to_string();
        self.roster.toggle_tools(&name)
    }

    // =========================================================================
    // Files
    // =========================================================================

    /// Open the hub config with the default application.
    pub fn open_config(&mut self) {
        let path = config_path(
            &self.deps.project_root,
            self.deps.settings.effective_config_file(),
        );
        match files::open_config(&path) {
            Ok(()) => debug!(path = %path.display(), "opened hub config"),
            Err(entry) => self.logs.push(entry),
        }
    }

    /// Open the hub's own log file with the default application.
    pub fn open_log_file(&mut self) {
        match files::open_hub_log(find_hub_log_file()) {
            Ok(path) => debug!(path = %path.display(), "opened hub log"),
            Err(entry) => self.logs.push(entry),
        }
    }
}

async fn refetch_roster(api: &dyn HubApiPort, events: &ChannelSink) {
    if let Some(snapshot) = api.health().await {
        events.send(ShellEvent::Roster(snapshot.servers));
    }
}
