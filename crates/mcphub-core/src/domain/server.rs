//! Sub-server summaries as reported by the hub's HTTP API.
//!
//! These are read-only views. Local code never mutates a summary; any state
//! change round-trips through the hub and is observed on the next poll.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Connection status of a sub-server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Connected,
    Connecting,
    Disconnected,
    Disabled,
    Error,
    /// Any status string this build does not recognise.
    #[default]
    #[serde(other)]
    Unknown,
}

impl ServerStatus {
    /// Lowercase wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Connecting => "connecting",
            Self::Disconnected => "disconnected",
            Self::Disabled => "disabled",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the hub talks to a sub-server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportKind {
    /// Process spawned by the hub, spoken to over stdin/stdout.
    Stdio,
    /// Reached over the network (the summary carries a `url`).
    Remote,
    /// Explicit transport name reported by the hub (e.g. `sse`, `streamable-http`).
    Named(String),
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdio => f.write_str("stdio"),
            Self::Remote => f.write_str("remote"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

fn unknown_name() -> String {
    "unknown".to_string()
}

/// A named capability (tool, resource or prompt) exposed by a sub-server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    #[serde(default = "unknown_name", deserialize_with = "null_as_unknown")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

impl Capability {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Hubs report `null` for absent values (`"description": null`,
/// `"tools": null`); read those as the type's default.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown_name))
}

/// Snapshot of one sub-server's status and capabilities.
///
/// `name` is the unique key used by the roster view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSummary {
    #[serde(default = "unknown_name", deserialize_with = "null_as_unknown")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: ServerStatus,

    /// Persisted disabled flag; independent of `status`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub disabled: bool,

    /// Transport name as reported by the hub (`type` on the wire).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub transport_type: Option<String>,

    /// Endpoint for remote sub-servers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub tools: Vec<Capability>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub resources: Vec<Capability>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub prompts: Vec<Capability>,
}

impl ServerSummary {
    /// Minimal summary, mostly useful for tests and fixtures.
    pub fn new(name: impl Into<String>, status: ServerStatus) -> Self {
        Self {
            name: name.into(),
            status,
            disabled: false,
            transport_type: None,
            url: None,
            tools: Vec::new(),
            resources: Vec::new(),
            prompts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tools(mut self, tools: Vec<Capability>) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub const fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Effective transport: explicit `type`, else remote when a URL is set, else stdio.
    pub fn transport(&self) -> TransportKind {
        match self.transport_type.as_deref() {
            Some(name) if !name.is_empty() => TransportKind::Named(name.to_string()),
            _ if self.url.as_deref().is_some_and(|u| !u.is_empty()) => TransportKind::Remote,
            _ => TransportKind::Stdio,
        }
    }

    /// Status shown to the user: the disabled flag wins over the reported status.
    pub const fn display_status(&self) -> ServerStatus {
        if self.disabled {
            ServerStatus::Disabled
        } else {
            self.status
        }
    }

    pub const fn is_enabled(&self) -> bool {
        !self.disabled
    }
}

/// Payload of `GET /api/health`.
///
/// Only the roster is interpreted; other hub fields are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub servers: Vec<ServerSummary>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HealthSnapshot {
    /// Hub-level status string (e.g. `"ok"`), when the hub reports one.
    pub fn hub_status(&self) -> Option<&str> {
        self.extra.get("status").and_then(serde_json::Value::as_str)
    }
}

/// Payload of `GET /api/servers`.
///
/// Hubs have shipped both a bare array and an object wrapping `servers`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ServerList {
    Bare(Vec<ServerSummary>),
    Wrapped { servers: Vec<ServerSummary> },
}

impl ServerList {
    pub fn into_vec(self) -> Vec<ServerSummary> {
        match self {
            Self::Bare(servers) | Self::Wrapped { servers } => servers,
        }
    }
}
