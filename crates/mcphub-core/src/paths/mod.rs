//! Path utilities for the hub project and the manager's own state.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - Pure helpers take their inputs explicitly; thin wrappers read the
//!   process environment
//! - OS-specific logic is kept in `platform`

mod error;
mod hub_logs;
mod platform;
mod project;

pub use error::PathError;

// Project layout
pub use project::{
    CONFIG_FILENAME, PROJECT_MARKER, config_path, current_project_root, find_project_root,
    hub_entry_path,
};

// Hub log discovery
pub use hub_logs::{find_hub_log_file, first_existing, hub_log_candidates};

// Manager state
pub use platform::{ensure_directory, manager_log_path, manager_state_dir};
