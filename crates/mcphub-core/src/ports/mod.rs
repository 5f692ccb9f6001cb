//! Port definitions (traits) for the hub manager.
//!
//! Ports keep the presentation layer independent of the concrete HTTP client
//! and of how events travel between tasks.

mod event_sink;
mod hub_api;

pub use event_sink::{HubEventSink, RecordingEventSink};
pub use hub_api::{ActionResponse, HubApiPort};
