//! Hub process management.
//!
//! - `launch`: command line for the hub process
//! - `stream`: lossy line reader for the hub's merged output
//! - `shutdown`: terminate-then-kill escalation
//! - `supervisor`: single-slot lifecycle state machine

mod launch;
mod shutdown;
mod stream;
mod supervisor;

pub use launch::HubLaunchSpec;
pub use shutdown::{ShutdownReport, shutdown_child};
pub use stream::spawn_line_reader;
pub use supervisor::{HubSupervisor, SupervisorConfig, SupervisorError};
