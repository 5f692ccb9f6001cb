//! Hub process supervisor.
//!
//! Owns the single hub process slot. At most one process exists at a time:
//! `start` claims the slot under an async mutex and refuses while anything
//! other than `Idle` is recorded. A waiter task owns the `Child`; it either
//! observes a natural exit or performs the terminate/kill sequence when
//! `stop` asks it to. Each process gets a generation number so a waiter can
//! only clear the slot it was spawned into.

use std::fmt;
use std::process::ExitStatus;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use mcphub_core::settings::{DEFAULT_QUIT_GRACE_SECS, DEFAULT_STOP_GRACE_SECS};
use mcphub_core::{ExitOutcome, HubEvent, HubEventSink, HubState, LogEntry, Settings};
use tokio::process::Child;
use tokio::sync::{Mutex, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::launch::HubLaunchSpec;
use super::shutdown::shutdown_child;
use super::stream::spawn_line_reader;

/// Error from supervisor operations.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    /// A process is already recorded in the slot.
    #[error("Hub is already {0}")]
    AlreadyRunning(HubState),

    /// The interpreter could not be spawned.
    #[error("Failed to spawn {command}: {reason}")]
    SpawnFailed { command: String, reason: String },

    /// There is no process to stop.
    #[error("Hub is not running")]
    NotRunning,

    /// A stop is already in progress.
    #[error("Hub is already stopping")]
    AlreadyStopping,
}

/// Timing knobs for the supervisor.
#[derive(Debug, Clone, Copy)]
pub struct SupervisorConfig {
    /// Grace between terminate and kill for an interactive stop.
    pub stop_grace: Duration,
    /// Grace between terminate and kill when the application quits.
    pub quit_grace: Duration,
    /// How long to let the output reader drain after the process exits.
    pub drain_timeout: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            stop_grace: Duration::from_secs(DEFAULT_STOP_GRACE_SECS),
            quit_grace: Duration::from_secs(DEFAULT_QUIT_GRACE_SECS),
            drain_timeout: Duration::from_millis(500),
        }
    }
}

impl SupervisorConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            stop_grace: settings.stop_grace(),
            quit_grace: settings.quit_grace(),
            ..Self::default()
        }
    }
}

/// The live process recorded in the slot.
struct RunningHub {
    generation: u64,
    pid: Option<u32>,
    /// Delivers the grace period to the waiter when a stop is requested.
    stop_tx: oneshot::Sender<Duration>,
    waiter: JoinHandle<ExitOutcome>,
}

enum Slot {
    Idle,
    Running(RunningHub),
    Stopping,
}

impl Slot {
    const fn state(&self) -> HubState {
        match self {
            Self::Idle => HubState::Idle,
            Self::Running(_) => HubState::Running,
            Self::Stopping => HubState::Stopping,
        }
    }
}

struct Shared {
    slot: Mutex<Slot>,
    state_tx: watch::Sender<HubState>,
    sink: Arc<dyn HubEventSink>,
    config: SupervisorConfig,
    next_generation: AtomicU64,
}

impl Shared {
    fn publish(&self, state: HubState) {
        self.state_tx.send_replace(state);
        self.sink.emit(HubEvent::StateChanged(state));
    }

    fn log(&self, entry: LogEntry) {
        self.sink.emit(HubEvent::Log(entry));
    }

    fn report_exit(&self, outcome: &ExitOutcome) {
        if outcome.is_failure() {
            error!(%outcome, "hub process exited");
            self.log(LogEntry::error(format!("Hub process exited with {outcome}")));
        } else {
            info!(%outcome, "hub process exited");
            self.log(LogEntry::info("Hub process exited"));
        }
        self.sink.emit(HubEvent::Exited(outcome.clone()));
    }
}

/// Supervisor for the hub process.
///
/// Cheap to clone; clones share the same slot.
#[derive(Clone)]
pub struct HubSupervisor {
    shared: Arc<Shared>,
}

impl HubSupervisor {
    pub fn new(config: SupervisorConfig, sink: Arc<dyn HubEventSink>) -> Self {
        let (state_tx, _) = watch::channel(HubState::Idle);
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot::Idle),
                state_tx,
                sink,
                config,
                next_generation: AtomicU64::new(1),
            }),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HubState {
        *self.shared.state_tx.borrow()
    }

    /// Receiver that observes every state change.
    pub fn subscribe_state(&self) -> watch::Receiver<HubState> {
        self.shared.state_tx.subscribe()
    }

    /// Spawn the hub.
    ///
    /// Publishes `Starting`, then `Running` once the OS hands back a process
    /// handle. On spawn failure the slot returns to `Idle` and the error is
    /// both logged to the sink and returned.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::AlreadyRunning`] if the slot is not idle.
    pub async fn start(&self, spec: &HubLaunchSpec) -> Result<Option<u32>, SupervisorError> {
        let shared = &self.shared;
        let mut slot = shared.slot.lock().await;
        if !matches!(*slot, Slot::Idle) {
            return Err(SupervisorError::AlreadyRunning(slot.state()));
        }

        shared.publish(HubState::Starting);
        let command_line = spec.display_command();
        debug!(command = %command_line, cwd = %spec.working_dir.display(), "spawning hub");

        let (child, output) = match spec.spawn() {
            Ok(spawned) => spawned,
            Err(e) => {
                error!(command = %command_line, error = %e, "failed to spawn hub");
                let err = SupervisorError::SpawnFailed {
                    command: spec.interpreter.clone(),
                    reason: e.to_string(),
                };
                shared.log(LogEntry::error(err.to_string()));
                shared.publish(HubState::Idle);
                return Err(err);
            }
        };

        let pid = child.id();
        let generation = shared.next_generation.fetch_add(1, Ordering::Relaxed);
        let reader_cancel = CancellationToken::new();
        let reader = spawn_line_reader(
            output,
            "output",
            Arc::clone(&shared.sink),
            reader_cancel.clone(),
        );

        let (stop_tx, stop_rx) = oneshot::channel();
        let waiter = tokio::spawn(supervise(
            Arc::clone(shared),
            generation,
            child,
            reader,
            reader_cancel,
            stop_rx,
        ));

        *slot = Slot::Running(RunningHub {
            generation,
            pid,
            stop_tx,
            waiter,
        });
        shared.publish(HubState::Running);
        info!(?pid, port = spec.port, "hub process started");
        shared.log(LogEntry::info("Hub process started"));

        Ok(pid)
    }

    /// Stop the hub using the configured stop grace.
    ///
    /// # Errors
    ///
    /// See [`HubSupervisor::stop_within`].
    pub async fn stop(&self) -> Result<ExitOutcome, SupervisorError> {
        self.stop_within(self.shared.config.stop_grace).await
    }

    /// Stop the hub, killing it if it has not exited after `grace`.
    ///
    /// Always leaves the slot `Idle` once it returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::NotRunning`] if there is no process and
    /// [`SupervisorError::AlreadyStopping`] if another stop is in flight.
    pub async fn stop_within(&self, grace: Duration) -> Result<ExitOutcome, SupervisorError> {
        let shared = &self.shared;
        let hub = {
            let mut slot = shared.slot.lock().await;
            let hub = match std::mem::replace(&mut *slot, Slot::Stopping) {
                Slot::Running(hub) => hub,
                other => {
                    let err = if matches!(other, Slot::Stopping) {
                        SupervisorError::AlreadyStopping
                    } else {
                        SupervisorError::NotRunning
                    };
                    *slot = other;
                    return Err(err);
                }
            };
            shared.publish(HubState::Stopping);
            hub
        };

        info!(pid = ?hub.pid, ?grace, "stopping hub process");
        // The waiter may already have seen a natural exit; that is fine.
        let _ = hub.stop_tx.send(grace);

        let mut waiter = hub.waiter;
        let deadline = grace + shared.config.drain_timeout + Duration::from_secs(1);
        let outcome = match timeout(deadline, &mut waiter).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_err)) => {
                error!("hub waiter task failed: {join_err}");
                ExitOutcome::Stopped { forced: true }
            }
            Err(_) => {
                // Dropping the aborted task drops the child, which kills it.
                warn!("hub stop timed out; aborting waiter");
                waiter.abort();
                ExitOutcome::Stopped { forced: true }
            }
        };

        if outcome == (ExitOutcome::Stopped { forced: true }) {
            shared.log(LogEntry::warn(format!(
                "Hub did not exit within {}s, killed",
                grace.as_secs_f32()
            )));
        }

        let mut slot = shared.slot.lock().await;
        *slot = Slot::Idle;
        shared.publish(HubState::Idle);
        shared.report_exit(&outcome);

        Ok(outcome)
    }

    /// Stop the hub with the quit grace, if one is running.
    pub async fn shutdown(&self) -> Option<ExitOutcome> {
        match self.stop_within(self.shared.config.quit_grace).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                debug!("nothing to shut down: {e}");
                None
            }
        }
    }
}

impl fmt::Debug for HubSupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubSupervisor")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Waiter task: owns the child until it exits or a stop arrives.
async fn supervise(
    shared: Arc<Shared>,
    generation: u64,
    mut child: Child,
    reader: JoinHandle<()>,
    reader_cancel: CancellationToken,
    stop_rx: oneshot::Receiver<Duration>,
) -> ExitOutcome {
    let outcome = tokio::select! {
        status = child.wait() => match status {
            Ok(status) => outcome_from_status(status),
            Err(e) => {
                warn!(error = %e, "failed to wait on hub process");
                ExitOutcome::Signalled { signal: None }
            }
        },
        Ok(grace) = stop_rx => match shutdown_child(&mut child, grace).await {
            Ok(report) => ExitOutcome::Stopped { forced: report.forced },
            Err(e) => {
                warn!(error = %e, "graceful shutdown failed; killing hub");
                let _ = child.kill().await;
                ExitOutcome::Stopped { forced: true }
            }
        },
    };

    // Let trailing output through, then stop a reader held open by grandchildren.
    if timeout(shared.config.drain_timeout, reader).await.is_err() {
        debug!("hub output still open after exit; cancelling reader");
    }
    reader_cancel.cancel();

    let mut slot = shared.slot.lock().await;
    if matches!(&*slot, Slot::Running(hub) if hub.generation == generation) {
        *slot = Slot::Idle;
        shared.publish(HubState::Idle);
        shared.report_exit(&outcome);
    }

    outcome
}

fn outcome_from_status(status: ExitStatus) -> ExitOutcome {
    match status.code() {
        Some(0) => ExitOutcome::Clean,
        Some(code) => ExitOutcome::Failed { code },
        None => ExitOutcome::Signalled {
            signal: exit_signal(status),
        },
    }
}

#[cfg(unix)]
fn exit_signal(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: ExitStatus) -> Option<i32> {
    None
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use mcphub_core::{LogLevel, RecordingEventSink};
    use tempfile::TempDir;

    /// Launch spec that runs `body` under `sh` in place of the hub entry.
    /// The hub arguments (`--port`, `--config`) become ignored positionals.
    fn script(body: &str) -> (TempDir, HubLaunchSpec) {
        let dir = tempfile::tempdir().unwrap();
        let entry = dir.path().join("hub.sh");
        std::fs::write(&entry, body).unwrap();
        let spec = HubLaunchSpec {
            interpreter: "sh".to_string(),
            entry,
            port: 3000,
            config_path: dir.path().join("mcp-servers.json"),
            working_dir: dir.path().to_path_buf(),
            watch: true,
        };
        (dir, spec)
    }

    fn sleeper() -> (TempDir, HubLaunchSpec) {
        script("exec sleep 30")
    }

    fn supervisor(sink: Arc<RecordingEventSink>) -> HubSupervisor {
        HubSupervisor::new(
            SupervisorConfig {
                stop_grace: Duration::from_secs(5),
                quit_grace: Duration::from_secs(1),
                drain_timeout: Duration::from_millis(200),
            },
            sink,
        )
    }

    fn states(sink: &RecordingEventSink) -> Vec<HubState> {
        sink.events()
            .into_iter()
            .filter_map(|event| match event {
                HubEvent::StateChanged(state) => Some(state),
                _ => None,
            })
            .collect()
    }

    fn exits(sink: &RecordingEventSink) -> Vec<ExitOutcome> {
        sink.events()
            .into_iter()
            .filter_map(|event| match event {
                HubEvent::Exited(outcome) => Some(outcome),
                _ => None,
            })
            .collect()
    }

    async fn wait_for_idle(supervisor: &HubSupervisor) {
        let mut rx = supervisor.subscribe_state();
        timeout(Duration::from_secs(5), rx.wait_for(|s| *s == HubState::Idle))
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn second_start_is_rejected_while_running() {
        let sink = Arc::new(RecordingEventSink::new());
        let supervisor = supervisor(sink.clone());
        let (_dir, spec) = sleeper();

        let (first, second) = tokio::join!(supervisor.start(&spec), supervisor.start(&spec));
        assert!(first.is_ok() != second.is_ok(), "exactly one start wins");
        assert!(matches!(
            supervisor.start(&spec).await,
            Err(SupervisorError::AlreadyRunning(HubState::Running))
        ));

        supervisor.stop().await.unwrap();
        assert_eq!(supervisor.state(), HubState::Idle);
    }

    #[tokio::test]
    async fn stop_publishes_full_lifecycle() {
        let sink = Arc::new(RecordingEventSink::new());
        let supervisor = supervisor(sink.clone());

        let (_dir, spec) = sleeper();
        supervisor.start(&spec).await.unwrap();
        let outcome = supervisor.stop().await.unwrap();

        assert_eq!(outcome, ExitOutcome::Stopped { forced: false });
        assert_eq!(
            states(&sink),
            [
                HubState::Starting,
                HubState::Running,
                HubState::Stopping,
                HubState::Idle
            ]
        );
        assert_eq!(exits(&sink), [ExitOutcome::Stopped { forced: false }]);
    }

    #[tokio::test]
    async fn stubborn_process_is_killed_and_slot_is_reusable() {
        let sink = Arc::new(RecordingEventSink::new());
        let supervisor = supervisor(sink.clone());

        let (_dir, stubborn) = script("trap '' TERM; while :; do sleep 1; done");
        supervisor.start(&stubborn).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        let outcome = supervisor
            .stop_within(Duration::from_millis(300))
            .await
            .unwrap();
        assert_eq!(outcome, ExitOutcome::Stopped { forced: true });
        assert_eq!(supervisor.state(), HubState::Idle);
        assert!(sink.events().iter().any(|event| matches!(
            event,
            HubEvent::Log(entry) if entry.level == LogLevel::Warn
        )));

        let (_dir, spec) = sleeper();
        supervisor.start(&spec).await.unwrap();
        supervisor.stop().await.unwrap();
    }

    #[tokio::test]
    async fn natural_exit_returns_to_idle_and_surfaces_code() {
        let sink = Arc::new(RecordingEventSink::new());
        let supervisor = supervisor(sink.clone());

        let (_dir, failing) = script("echo booting; exit 3");
        supervisor.start(&failing).await.unwrap();
        wait_for_idle(&supervisor).await;

        assert_eq!(exits(&sink), [ExitOutcome::Failed { code: 3 }]);
        let logs: Vec<LogEntry> = sink
            .events()
            .into_iter()
            .filter_map(|event| match event {
                HubEvent::Log(entry) => Some(entry),
                _ => None,
            })
            .collect();
        assert!(logs
            .iter()
            .any(|e| e.level == LogLevel::Hub && e.message == "booting"));
        assert!(logs
            .iter()
            .any(|e| e.level == LogLevel::Error && e.message.contains("exit code 3")));
        assert!(matches!(
            supervisor.stop().await,
            Err(SupervisorError::NotRunning)
        ));
    }

    #[tokio::test]
    async fn stdout_and_stderr_keep_write_order() {
        let sink = Arc::new(RecordingEventSink::new());
        let supervisor = supervisor(sink.clone());

        let (_dir, chatty) =
            script("echo out1; echo err1 >&2; echo out2; echo err2 >&2; echo out3");
        supervisor.start(&chatty).await.unwrap();
        wait_for_idle(&supervisor).await;

        let hub_lines: Vec<String> = sink
            .events()
            .into_iter()
            .filter_map(|event| match event {
                HubEvent::Log(entry) if entry.level == LogLevel::Hub => Some(entry.message),
                _ => None,
            })
            .collect();
        assert_eq!(hub_lines, ["out1", "err1", "out2", "err2", "out3"]);
    }

    #[tokio::test]
    async fn clean_exit_is_not_an_error() {
        let sink = Arc::new(RecordingEventSink::new());
        let supervisor = supervisor(sink.clone());

        let (_dir, clean) = script("exit 0");
        supervisor.start(&clean).await.unwrap();
        wait_for_idle(&supervisor).await;

        assert_eq!(exits(&sink), [ExitOutcome::Clean]);
    }

    #[tokio::test]
    async fn spawn_failure_returns_to_idle() {
        let sink = Arc::new(RecordingEventSink::new());
        let supervisor = supervisor(sink.clone());
        let (_dir, mut spec) = sleeper();
        spec.interpreter = "/nonexistent/mcphub-interpreter".to_string();

        let err = supervisor.start(&spec).await.unwrap_err();
        assert!(matches!(err, SupervisorError::SpawnFailed { .. }));
        assert_eq!(supervisor.state(), HubState::Idle);
        assert_eq!(states(&sink), [HubState::Starting, HubState::Idle]);

        // The slot is free again.
        let (_dir2, spec) = sleeper();
        supervisor.start(&spec).await.unwrap();
        supervisor.stop().await.unwrap();
    }

    #[tokio::test]
    async fn shutdown_without_process_is_a_no_op() {
        let supervisor = supervisor(Arc::new(RecordingEventSink::new()));
        assert!(supervisor.shutdown().await.is_none());
    }
}
