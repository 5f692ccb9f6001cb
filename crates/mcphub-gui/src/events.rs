//! Events delivered to the UI task.

use mcphub_core::{HubEvent, HubEventSink, LogEntry, ServerSummary};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

/// Everything background work reports back to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// Supervisor lifecycle, output and exit.
    Hub(HubEvent),
    /// Fresh roster from a health poll or a post-action refresh.
    Roster(Vec<ServerSummary>),
    /// Result of a user-initiated action.
    Log(LogEntry),
    /// The supervisor refused or failed a start.
    StartFailed(String),
}

/// [`HubEventSink`] that forwards into the UI task's channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<ShellEvent>,
}

impl ChannelSink {
    pub const fn new(tx: UnboundedSender<ShellEvent>) -> Self {
        Self { tx }
    }

    pub fn send(&self, event: ShellEvent) {
        if self.tx.send(event).is_err() {
            debug!("UI task gone; dropping shell event");
        }
    }

    pub fn log(&self, entry: LogEntry) {
        self.send(ShellEvent::Log(entry));
    }
}

impl HubEventSink for ChannelSink {
    fn emit(&self, event: HubEvent) {
        self.send(ShellEvent::Hub(event));
    }

    fn roster(&self, servers: Vec<ServerSummary>) {
        self.send(ShellEvent::Roster(servers));
    }
}

/// Channel between background work and the UI task.
pub fn shell_channel() -> (ChannelSink, UnboundedReceiver<ShellEvent>) {
    let (tx, rx) = unbounded_channel();
    (ChannelSink::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcphub_core::HubState;

    #[tokio::test]
    async fn sink_preserves_order() {
        let (sink, mut rx) = shell_channel();
        sink.emit(HubEvent::StateChanged(HubState::Starting));
        sink.roster(Vec::new());
        sink.log(LogEntry::info("done"));

        assert!(matches!(
            rx.recv().await,
            Some(ShellEvent::Hub(HubEvent::StateChanged(HubState::Starting)))
        ));
        assert!(matches!(rx.recv().await, Some(ShellEvent::Roster(r)) if r.is_empty()));
        assert!(matches!(rx.recv().await, Some(ShellEvent::Log(_))));
    }

    #[test]
    fn send_after_receiver_dropped_is_silent() {
        let (sink, rx) = shell_channel();
        drop(rx);
        sink.log(LogEntry::info("nobody listening"));
    }
}
