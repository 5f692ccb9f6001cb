//! Semantic error types for shell intents.
//!
//! Front-ends decide how to surface these (the terminal front-end writes
//! them to the log view).

use mcphub_runtime::SupervisorError;
use thiserror::Error;

/// Reason a user intent was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuiError {
    /// Entity not found, e.g. a server card that vanished.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Type of entity (e.g. "server").
        entity: &'static str,
        /// Identifier that was not found.
        id: String,
    },

    /// Intent conflicts with the current hub state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The hub is not running, so its API cannot be reached.
    #[error("hub unavailable: {0}")]
    Unavailable(String),

    /// The hub process could not be launched.
    #[error("{0}")]
    Launch(String),
}

impl From<SupervisorError> for GuiError {
    fn from(err: SupervisorError) -> Self {
        match err {
            SupervisorError::AlreadyRunning(_) | SupervisorError::AlreadyStopping => {
                Self::Conflict(err.to_string())
            }
            SupervisorError::NotRunning => Self::Unavailable(err.to_string()),
            SupervisorError::SpawnFailed { .. } => Self::Launch(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcphub_core::HubState;

    #[test]
    fn supervisor_errors_map_to_semantic_kinds() {
        assert!(matches!(
            GuiError::from(SupervisorError::AlreadyRunning(HubState::Running)),
            GuiError::Conflict(msg) if msg.contains("running")
        ));
        assert!(matches!(
            GuiError::from(SupervisorError::NotRunning),
            GuiError::Unavailable(_)
        ));
        let launch = GuiError::from(SupervisorError::SpawnFailed {
            command: "node".to_string(),
            reason: "No such file or directory".to_string(),
        });
        assert_eq!(
            launch.to_string(),
            "Failed to spawn node: No such file or directory"
        );
    }
}
