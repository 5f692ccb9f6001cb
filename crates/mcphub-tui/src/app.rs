//! Terminal front-end: owns the shell and runs the UI loop.

use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use mcphub_gui::{GuiError, HubShell, ShellEvent};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bootstrap::AppContext;
use crate::input::{Action, map_key};
use crate::ui;

/// Channel events applied per frame before redrawing.
const MAX_EVENTS_PER_FRAME: usize = 256;

/// Which view fills the main area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Servers,
    Logs,
}

impl Tab {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Servers => Self::Logs,
            Self::Logs => Self::Servers,
        }
    }
}

/// Shell plus the terminal-only view state.
pub struct App {
    shell: HubShell,
    tab: Tab,
    editing_port: bool,
}

impl App {
    pub fn new(shell: HubShell) -> Self {
        Self {
            shell,
            tab: Tab::Servers,
            editing_port: false,
        }
    }

    pub const fn shell(&self) -> &HubShell {
        &self.shell
    }

    pub const fn tab(&self) -> Tab {
        self.tab
    }

    pub const fn editing_port(&self) -> bool {
        self.editing_port
    }

    /// Apply a terminal event. Returns `true` when the user asked to quit.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) => {
                map_key(*key, self.editing_port).is_some_and(|action| self.perform(action))
            }
            _ => false,
        }
    }

    /// Carry out an action. Rejected intents are written to the log view.
    /// Returns `true` for [`Action::Quit`].
    pub fn perform(&mut self, action: Action) -> bool {
        let outcome: Result<(), GuiError> = match action {
            Action::Quit => return true,
            Action::ToggleHub => self.shell.toggle_hub(),
            Action::RestartHub => self.shell.restart_hub().map(drop),
            Action::NextTab => {
                self.tab = self.tab.next();
                Ok(())
            }
            Action::ShowServers => {
                self.tab = Tab::Servers;
                Ok(())
            }
            Action::ShowLogs => {
                self.tab = Tab::Logs;
                Ok(())
            }
            Action::SelectNext => {
                self.shell.select_next();
                Ok(())
            }
            Action::SelectPrevious => {
                self.shell.select_previous();
                Ok(())
            }
            Action::ToggleServer => self.shell.toggle_selected_server().map(drop),
            Action::RefreshServer => self.shell.refresh_selected_server().map(drop),
            Action::ToggleTools => {
                self.shell.toggle_selected_tools();
                Ok(())
            }
            Action::OpenConfig => {
                self.shell.open_config();
                Ok(())
            }
            Action::OpenLogFile => {
                self.shell.open_log_file();
                Ok(())
            }
            Action::CycleFilter => {
                let filter = self.shell.logs_mut().cycle_filter();
                debug!(%filter, "log filter changed");
                Ok(())
            }
            Action::ToggleDebug => {
                self.shell.logs_mut().toggle_debug();
                Ok(())
            }
            Action::ClearLogs => {
                self.shell.logs_mut().clear();
                Ok(())
            }
            Action::EditPort => {
                if self.shell.port_editable() {
                    self.editing_port = true;
                    Ok(())
                } else {
                    Err(GuiError::Conflict(
                        "stop the hub before changing the port".to_string(),
                    ))
                }
            }
            Action::PortChar(c) => {
                self.shell.push_port_char(c);
                Ok(())
            }
            Action::PortBackspace => {
                self.shell.pop_port_char();
                Ok(())
            }
            Action::FinishPortEdit => {
                self.editing_port = false;
                Ok(())
            }
        };

        if let Err(err) = outcome {
            debug!(?action, error = %err, "action rejected");
            self.shell.report(&err);
        }
        false
    }

    /// Apply a background event.
    pub fn apply(&mut self, event: ShellEvent) {
        self.shell.apply(event);
        // The field may have been rewritten, or locked by a start.
        if !self.shell.port_editable() {
            self.editing_port = false;
        }
    }
}

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn enter_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn leave_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the terminal UI until the user quits, then stop the hub.
pub async fn run(ctx: AppContext) -> Result<()> {
    let AppContext {
        shell,
        mut events,
        poller,
        ..
    } = ctx;

    let cancel = CancellationToken::new();
    let poll_task = poller.spawn(cancel.clone());
    let mut app = App::new(shell);

    let mut terminal = enter_terminal()?;
    let result = event_loop(&mut terminal, &mut app, &mut events).await;
    if let Err(err) = leave_terminal(&mut terminal) {
        warn!(error = %err, "failed to restore terminal");
    }

    cancel.cancel();
    if let Err(err) = poll_task.await {
        warn!(error = %err, "health poller task failed");
    }

    info!("stopping hub before exit");
    if let Some(outcome) = app.shell().shutdown().await {
        info!(%outcome, "hub stopped");
    }
    result
}

async fn event_loop(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut UnboundedReceiver<ShellEvent>,
) -> Result<()> {
    let mut input = EventStream::new();

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        tokio::select! {
            Some(event) = events.recv() => {
                app.apply(event);
                for _ in 0..MAX_EVENTS_PER_FRAME {
                    match events.try_recv() {
                        Ok(event) => app.apply(event),
                        Err(_) => break,
                    }
                }
            }
            maybe_event = input.next() => {
                match maybe_event {
                    Some(Ok(event)) => {
                        if app.handle_event(&event) {
                            return Ok(());
                        }
                    }
                    Some(Err(err)) => return Err(err.into()),
                    None => return Ok(()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::bootstrap;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use mcphub_core::{HubEvent, HubState, LogEntry, LogLevel, Settings};
    use tempfile::TempDir;

    fn app() -> (App, TempDir) {
        let root = TempDir::new().unwrap();
        let ctx = bootstrap(Settings::with_defaults(), root.path().to_path_buf()).unwrap();
        (App::new(ctx.shell), root)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn last_log(app: &App) -> Option<LogEntry> {
        app.shell().logs().visible().last().cloned()
    }

    #[tokio::test]
    async fn test_tab_cycles_views() {
        let (mut app, _root) = app();
        assert_eq!(app.tab(), Tab::Servers);
        app.handle_event(&key(KeyCode::Tab));
        assert_eq!(app.tab(), Tab::Logs);
        app.handle_event(&key(KeyCode::Char('1')));
        assert_eq!(app.tab(), Tab::Servers);
    }

    #[tokio::test]
    async fn test_port_edit_session() {
        let (mut app, _root) = app();
        app.handle_event(&key(KeyCode::Char('p')));
        assert!(app.editing_port());

        for _ in 0..4 {
            app.handle_event(&key(KeyCode::Backspace));
        }
        app.handle_event(&key(KeyCode::Char('4')));
        // Not a quit while editing.
        assert!(!app.handle_event(&key(KeyCode::Char('q'))));
        app.handle_event(&key(KeyCode::Enter));

        assert!(!app.editing_port());
        assert_eq!(app.shell().port_input(), "4");
    }

    #[tokio::test]
    async fn test_rejected_action_is_logged() {
        let (mut app, _root) = app();
        app.handle_event(&key(KeyCode::Char(' ')));
        let entry = last_log(&app).unwrap();
        assert_eq!(entry.level, LogLevel::Warn);
    }

    #[tokio::test]
    async fn test_port_edit_ends_when_hub_starts() {
        let (mut app, _root) = app();
        app.perform(Action::EditPort);
        app.apply(ShellEvent::Hub(HubEvent::StateChanged(HubState::Running)));
        assert!(!app.editing_port());

        app.perform(Action::EditPort);
        assert!(!app.editing_port());
        assert_eq!(last_log(&app).unwrap().level, LogLevel::Warn);
    }

    #[tokio::test]
    async fn test_quit_and_log_controls() {
        let (mut app, _root) = app();
        app.perform(Action::ShowLogs);
        app.shell.logs_mut().push(LogEntry::info("hello"));
        app.perform(Action::ClearLogs);
        assert!(app.shell().logs().is_empty());
        assert!(app.handle_event(&key(KeyCode::Char('q'))));
    }
}
