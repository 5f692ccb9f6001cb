//! Dependency injection for `HubShell`.

use std::path::PathBuf;
use std::sync::Arc;

use mcphub_core::{HubApiPort, Settings};
use mcphub_runtime::HubSupervisor;

/// Dependencies required to construct a `HubShell`.
///
/// The supervisor must have been created with a sink that feeds the same
/// channel the shell's events come from.
pub struct ShellDeps {
    /// Hub HTTP API.
    pub(crate) api: Arc<dyn HubApiPort>,
    /// Owner of the hub process.
    pub(crate) supervisor: HubSupervisor,
    /// Effective settings (port default, interpreter, graces, log capacity).
    pub(crate) settings: Settings,
    /// Hub project root; the process runs here and the config lives here.
    pub(crate) project_root: PathBuf,
}

impl ShellDeps {
    pub fn new(
        api: Arc<dyn HubApiPort>,
        supervisor: HubSupervisor,
        settings: Settings,
        project_root: PathBuf,
    ) -> Self {
        Self {
            api,
            supervisor,
            settings,
            project_root,
        }
    }
}
