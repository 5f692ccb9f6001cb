//! Hub API port.
//!
//! Abstracts the hub's HTTP API so the poller and the presentation layer can
//! be exercised without a live hub.

use async_trait::async_trait;

use crate::domain::{HealthSnapshot, ServerSummary};

/// Decoded body of a mutating call (start, stop, refresh, restart).
pub type ActionResponse = serde_json::Value;

/// Client for the hub's HTTP API.
///
/// Every method makes a single attempt. Any failure (transport error,
/// timeout, non-2xx status, undecodable body) yields `None`. Callers must
/// read `None` as "unknown", not as "empty".
#[async_trait]
pub trait HubApiPort: Send + Sync {
    /// `GET /api/health`: full status payload including the roster.
    async fn health(&self) -> Option<HealthSnapshot>;

    /// `GET /api/servers`: roster only.
    async fn list_servers(&self) -> Option<Vec<ServerSummary>>;

    /// `POST /api/servers/start`: start and enable a sub-server.
    async fn start_server(&self, name: &str) -> Option<ActionResponse>;

    /// `POST /api/servers/stop`: stop a sub-server, optionally persisting `disabled`.
    async fn stop_server(&self, name: &str, disable: bool) -> Option<ActionResponse>;

    /// `POST /api/servers/refresh`: re-read a sub-server's capabilities.
    async fn refresh_server(&self, name: &str) -> Option<ActionResponse>;

    /// `POST /api/restart`: soft-restart the whole hub.
    async fn restart_hub(&self) -> Option<ActionResponse>;

    /// Point the client at a different hub port.
    fn set_port(&self, port: u16);

    /// Port currently targeted.
    fn port(&self) -> u16;
}
