//! Terminal entry point - the composition root.
//!
//! Startup order: `.env`, flags, diagnostic logging, settings, wiring, UI.

use anyhow::Context;
use clap::Parser;

use mcphub_core::manager_log_path;
use mcphub_tui::logging::init_logging;
use mcphub_tui::{Cli, bootstrap, resolve_project_root, resolve_settings, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_path = cli.log_file.clone().or_else(|| manager_log_path().ok());
    if let Some(err) = init_logging(log_path.as_deref(), cli.verbose) {
        eprintln!("warning: diagnostic logging disabled: {err:#}");
    }

    let env = std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
    let settings = resolve_settings(&cli, env)?;
    let project_root = resolve_project_root(&settings).context("could not locate hub project")?;
    tracing::info!(root = %project_root.display(), "starting mcphub-manager");

    let ctx = bootstrap(settings, project_root)?;
    run(ctx).await
}
