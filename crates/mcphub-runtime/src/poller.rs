//! Periodic health polling of the hub API.
//!
//! The poller is policy-free: it asks the hub for its roster while the
//! supervisor reports `Running` and hands whatever it gets to the event
//! sink. Reconciling the roster is the presentation layer's job.

use std::sync::Arc;
use std::time::Duration;

use mcphub_core::{HubApiPort, HubEventSink, HubState};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Shortest interval accepted; `tokio::time::interval` panics on zero.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What a single poll did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The hub was not running; no request was made.
    Skipped,
    /// The request failed; nothing was published.
    Unavailable,
    /// The hub stopped while the request was in flight; result dropped.
    Discarded,
    /// A roster with this many servers was published.
    Published(usize),
}

/// Polls `GET /api/health` on a fixed interval while the hub is running.
pub struct HealthPoller {
    api: Arc<dyn HubApiPort>,
    sink: Arc<dyn HubEventSink>,
    state: watch::Receiver<HubState>,
    period: Duration,
}

impl HealthPoller {
    pub fn new(
        api: Arc<dyn HubApiPort>,
        sink: Arc<dyn HubEventSink>,
        state: watch::Receiver<HubState>,
        period: Duration,
    ) -> Self {
        Self {
            api,
            sink,
            state,
            period: period.max(MIN_POLL_INTERVAL),
        }
    }

    fn is_running(&self) -> bool {
        self.state.borrow().is_running()
    }

    /// Perform one poll.
    pub async fn poll_once(&self) -> PollOutcome {
        if !self.is_running() {
            return PollOutcome::Skipped;
        }

        let Some(snapshot) = self.api.health().await else {
            return PollOutcome::Unavailable;
        };

        if !self.is_running() {
            return PollOutcome::Discarded;
        }

        let count = snapshot.servers.len();
        self.sink.roster(snapshot.servers);
        PollOutcome::Published(count)
    }

    /// Run on a background task until `cancel` fires.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    /// Poll loop. Each poll is awaited before the next tick; ticks missed
    /// while a slow request is in flight are skipped rather than bunched.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        debug!(period = ?self.period, "health poller starting");
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                () = cancel.cancelled() => break,
                outcome = self.poll_once() => {
                    if outcome != PollOutcome::Skipped {
                        debug!(?outcome, "health poll");
                    }
                }
            }
        }
        debug!("health poller stopped");
    }
}
