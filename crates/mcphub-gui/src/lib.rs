//! Presentation state for the MCP hub manager.
//!
//! `HubShell` owns everything a front-end draws: the server roster, the log
//! view and the toolbar status. It is driven from a single UI task: the
//! front-end forwards user intents to it and feeds it every [`ShellEvent`]
//! that background work sends back. Nothing here touches a terminal, so the
//! same shell can back any front-end.
//!
//! # Rules
//!
//! 1. **Single owner**: only the UI task mutates the shell
//! 2. **Background work reports through the channel**: spawned tasks never
//!    hold a reference to view state
//! 3. **Semantic errors**: rejected intents return `GuiError`

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod deps;
mod error;
mod events;
mod files;
mod logs;
mod roster;
mod shell;
pub mod types;

// Primary exports
pub use deps::ShellDeps;
pub use error::GuiError;
pub use events::{ChannelSink, ShellEvent, shell_channel};
pub use shell::HubShell;

// View models, for front-ends
pub use logs::{LevelFilter, LogView};
pub use roster::{
    DESCRIPTION_LIMIT, EMPTY_ROSTER_MESSAGE, ReconcileReport, RosterView, ServerCard,
    truncate_description,
};
pub use types::HubStatus;

// Used by integration tests only.
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use serde_json as _;
