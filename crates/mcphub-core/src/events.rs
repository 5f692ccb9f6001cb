//! Hub lifecycle events.
//!
//! Emitted by the process supervisor from background tasks and consumed by
//! the presentation layer on its own task. The presentation layer treats
//! these events as the sole source of truth for the hub's lifecycle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::logs::LogEntry;

/// Lifecycle state of the supervised hub process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HubState {
    /// No process.
    #[default]
    Idle,
    /// Spawn issued, handle not yet confirmed alive.
    Starting,
    /// Process alive, output being streamed.
    Running,
    /// Termination issued, awaiting exit or forced kill.
    Stopping,
}

impl HubState {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Whether a process handle exists in this state.
    pub const fn has_process(self) -> bool {
        matches!(self, Self::Starting | Self::Running | Self::Stopping)
    }
}

impl fmt::Display for HubState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
        };
        f.write_str(label)
    }
}

/// How a hub process ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExitOutcome {
    /// Exited on its own with status 0.
    Clean,
    /// Terminated because stop was requested.
    Stopped {
        /// True when the grace period elapsed and the process was killed.
        forced: bool,
    },
    /// Exited on its own with a non-zero code.
    Failed { code: i32 },
    /// Killed by a signal nobody here sent.
    Signalled { signal: Option<i32> },
}

impl ExitOutcome {
    /// Whether this exit should be surfaced as an error.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::Signalled { .. })
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => f.write_str("exit code 0"),
            Self::Stopped { forced: false } => f.write_str("graceful stop"),
            Self::Stopped { forced: true } => f.write_str("forced kill"),
            Self::Failed { code } => write!(f, "exit code {code}"),
            Self::Signalled { signal: Some(sig) } => write!(f, "signal {sig}"),
            Self::Signalled { signal: None } => f.write_str("unknown signal"),
        }
    }
}

/// Event published by the hub supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubEvent {
    /// The supervisor moved to a new state.
    StateChanged(HubState),
    /// A log entry: hub output (level `HUB`) or a supervisor message.
    Log(LogEntry),
    /// The process exited (naturally or after stop) and the slot is Idle again.
    Exited(ExitOutcome),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unexpected_exits_are_failures() {
        assert!(!ExitOutcome::Clean.is_failure());
        assert!(!ExitOutcome::Stopped { forced: true }.is_failure());
        assert!(ExitOutcome::Failed { code: 1 }.is_failure());
        assert!(ExitOutcome::Signalled { signal: Some(9) }.is_failure());
    }

    #[test]
    fn process_exists_outside_idle() {
        assert!(!HubState::Idle.has_process());
        assert!(HubState::Starting.has_process());
        assert!(HubState::Stopping.has_process());
        assert!(HubState::Running.is_running());
        assert!(!HubState::Stopping.is_running());
    }

    #[test]
    fn exit_outcome_serializes_with_kind_tag() {
        let json = serde_json::to_string(&ExitOutcome::Failed { code: 3 }).unwrap();
        assert_eq!(json, r#"{"kind":"failed","code":3}"#);
    }
}
