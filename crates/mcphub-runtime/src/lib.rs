//! Runtime adapters for the MCP hub manager.
//!
//! Owns everything that touches the OS or the network: the HTTP client for
//! the hub API, the hub process supervisor, the health poller and the
//! default-application launcher.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod client;
pub mod opener;
pub mod poller;
pub mod process;

// Re-export the HubApiPort implementation
pub use client::{HubClient, HubClientConfig};

// Re-export polling primitives
pub use poller::{HealthPoller, PollOutcome};

// Re-export process supervision types
pub use process::{HubLaunchSpec, HubSupervisor, SupervisorConfig, SupervisorError};

pub use opener::{OpenError, open_path};

// Only used by the fake hub in integration tests.
#[cfg(test)]
use axum as _;
#[cfg(all(test, not(unix)))]
use tempfile as _;
