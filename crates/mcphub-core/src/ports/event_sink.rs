//! Event sink port for hub lifecycle events.
//!
//! The supervisor and poller run on background tasks; they hand everything
//! they observe to a sink. The presentation layer's sink forwards events to
//! its own task, so no background task touches view state directly.

use std::sync::Mutex;

use crate::domain::ServerSummary;
use crate::events::HubEvent;

/// Destination for events produced by background work.
///
/// Implementations must be thread-safe and must not block.
pub trait HubEventSink: Send + Sync {
    /// Publish a supervisor event.
    fn emit(&self, event: HubEvent);

    /// Publish a roster fetched by the health poller.
    fn roster(&self, servers: Vec<ServerSummary>);
}

/// Sink that records everything it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<HubEvent>>,
    rosters: Mutex<Vec<Vec<ServerSummary>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far.
    pub fn events(&self) -> Vec<HubEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Every roster published so far.
    pub fn rosters(&self) -> Vec<Vec<ServerSummary>> {
        self.rosters
            .lock()
            .map(|rosters| rosters.clone())
            .unwrap_or_default()
    }
}

impl HubEventSink for RecordingEventSink {
    fn emit(&self, event: HubEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn roster(&self, servers: Vec<ServerSummary>) {
        if let Ok(mut rosters) = self.rosters.lock() {
            rosters.push(servers);
        }
    }
}
