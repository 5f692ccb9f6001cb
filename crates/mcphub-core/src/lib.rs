//! Core domain types and ports for the MCP hub manager.
//!
//! Nothing in this crate spawns processes or opens sockets; the runtime
//! crate implements the ports defined here and the GUI crate consumes them.
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod logs;
pub mod paths;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    Capability, HealthSnapshot, ServerList, ServerStatus, ServerSummary, TransportKind,
};
pub use events::{ExitOutcome, HubEvent, HubState};
pub use logs::{DEFAULT_LOG_CAPACITY, LogBuffer, LogEntry, LogLevel};
pub use ports::{ActionResponse, HubApiPort, HubEventSink, RecordingEventSink};
pub use settings::{
    DEFAULT_HUB_PORT, DEFAULT_INTERPRETER, Settings, SettingsError, parse_port_input,
    validate_settings,
};

// Re-export path utilities
pub use paths::{
    CONFIG_FILENAME, PathError, config_path, current_project_root, find_hub_log_file,
    find_project_root, hub_entry_path, manager_log_path, manager_state_dir,
};

#[cfg(test)]
use tempfile as _;
