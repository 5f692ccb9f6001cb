//! Small view types shared by front-ends.

use std::fmt;

use mcphub_core::{ExitOutcome, HubState};

/// Toolbar status label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HubStatus {
    #[default]
    Stopped,
    Starting,
    Running,
    Stopping,
    /// The last start failed or the hub exited unexpectedly.
    Error,
}

impl HubStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Starting => "Starting...",
            Self::Running => "Running",
            Self::Stopping => "Stopping...",
            Self::Error => "Error",
        }
    }

    /// Status implied by a supervisor state change.
    pub const fn from_state(state: HubState) -> Self {
        match state {
            HubState::Idle => Self::Stopped,
            HubState::Starting => Self::Starting,
            HubState::Running => Self::Running,
            HubState::Stopping => Self::Stopping,
        }
    }

    /// Status after the process exits with `outcome`.
    pub const fn after_exit(outcome: &ExitOutcome) -> Self {
        if outcome.is_failure() {
            Self::Error
        } else {
            Self::Stopped
        }
    }
}

impl fmt::Display for HubStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_outcome_decides_between_stopped_and_error() {
        assert_eq!(HubStatus::after_exit(&ExitOutcome::Clean), HubStatus::Stopped);
        assert_eq!(
            HubStatus::after_exit(&ExitOutcome::Stopped { forced: true }),
            HubStatus::Stopped
        );
        assert_eq!(
            HubStatus::after_exit(&ExitOutcome::Failed { code: 1 }),
            HubStatus::Error
        );
    }

    #[test]
    fn labels_match_toolbar_text() {
        assert_eq!(HubStatus::from_state(HubState::Starting).to_string(), "Starting...");
        assert_eq!(HubStatus::from_state(HubState::Idle).label(), "Stopped");
    }
}
