//! Command-line flags.
//!
//! Every flag is optional; a bare launch uses defaults, `.env` and `MCPHUB_*`
//! variables. Flags win over both.

use std::path::PathBuf;

use clap::Parser;
use mcphub_core::Settings;

#[derive(Debug, Parser)]
#[command(name = "mcphub-manager")]
#[command(about = "Launch, monitor and stop a local MCP hub")]
#[command(version)]
pub struct Cli {
    /// Port the hub listens on (and the API is reached on)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Hub configuration file, relative to the project root or absolute
    #[arg(long)]
    pub config: Option<String>,

    /// Hub project root (defaults to the nearest ancestor with package.json)
    #[arg(long = "project-root")]
    pub project_root: Option<PathBuf>,

    /// Interpreter used to run the hub
    #[arg(long)]
    pub node: Option<String>,

    /// Write diagnostic logs here instead of the state directory
    #[arg(long = "log-file", env = "MCPHUB_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable debug-level diagnostic logs
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// The settings layer contributed by flags.
    pub fn settings_layer(&self) -> Settings {
        Settings {
            port: self.port,
            interpreter: self.node.clone(),
            project_root: self.project_root.clone(),
            config_file: self.config.clone(),
            ..Settings::default()
        }
    }
}
