//! Terminal front-end for the MCP hub manager.
//!
//! `main.rs` is the composition root; everything it needs lives here so the
//! wiring, key bindings and rendering can be tested without a terminal.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs only.
use dotenvy as _;

pub mod app;
pub mod bootstrap;
pub mod input;
pub mod logging;
pub mod parser;
pub mod ui;

pub use app::{App, Tab, run};
pub use bootstrap::{AppContext, bootstrap, resolve_project_root, resolve_settings};
pub use input::{Action, map_key};
pub use parser::Cli;
