//! Domain types shared by the runtime and presentation crates.

mod server;

pub use server::{
    Capability, HealthSnapshot, ServerList, ServerStatus, ServerSummary, TransportKind,
};
