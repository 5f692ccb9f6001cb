//! Manager settings and validation.
//!
//! All fields are optional so layers (defaults, `.env`/environment, command
//! line) can be overlaid; `effective_*` accessors apply the defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logs::DEFAULT_LOG_CAPACITY;
use crate::paths::CONFIG_FILENAME;

/// Default port the hub listens on.
pub const DEFAULT_HUB_PORT: u16 = 3000;

/// Default interpreter used to run the hub entry script.
pub const DEFAULT_INTERPRETER: &str = "node";

/// Default health polling interval.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;

/// Timeout for read-only API calls.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 5;

/// Timeout for mutating API calls.
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 10;

/// Grace period between terminate and kill on a user stop.
pub const DEFAULT_STOP_GRACE_SECS: u64 = 5;

/// Grace period between terminate and kill when the manager quits.
pub const DEFAULT_QUIT_GRACE_SECS: u64 = 3;

/// Environment variable names read by [`Settings::from_env_vars`].
pub mod env_keys {
    pub const PORT: &str = "MCPHUB_PORT";
    pub const INTERPRETER: &str = "MCPHUB_NODE";
    pub const PROJECT_ROOT: &str = "MCPHUB_PROJECT_ROOT";
    pub const CONFIG: &str = "MCPHUB_CONFIG";
    pub const POLL_SECS: &str = "MCPHUB_POLL_SECS";
    pub const LOG_CAPACITY: &str = "MCPHUB_LOG_CAPACITY";
}

/// Manager settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Port passed to the hub and used for API calls.
    pub port: Option<u16>,

    /// Interpreter executable (e.g. `node` or an absolute path).
    pub interpreter: Option<String>,

    /// Hub project root; discovered from the working directory when unset.
    pub project_root: Option<PathBuf>,

    /// Hub configuration file (relative to the project root, or absolute).
    pub config_file: Option<String>,

    /// Seconds between health polls.
    pub poll_interval_secs: Option<u64>,

    /// Timeout for GET calls, in seconds.
    pub read_timeout_secs: Option<u64>,

    /// Timeout for POST calls, in seconds.
    pub write_timeout_secs: Option<u64>,

    /// Grace between terminate and kill on stop, in seconds.
    pub stop_grace_secs: Option<u64>,

    /// Grace between terminate and kill on quit, in seconds.
    pub quit_grace_secs: Option<u64>,

    /// Maximum retained log entries.
    pub log_capacity: Option<usize>,
}

impl Settings {
    /// Create settings with every default filled in.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            port: Some(DEFAULT_HUB_PORT),
            interpreter: Some(DEFAULT_INTERPRETER.to_string()),
            project_root: None,
            config_file: Some(CONFIG_FILENAME.to_string()),
            poll_interval_secs: Some(DEFAULT_POLL_INTERVAL_SECS),
            read_timeout_secs: Some(DEFAULT_READ_TIMEOUT_SECS),
            write_timeout_secs: Some(DEFAULT_WRITE_TIMEOUT_SECS),
            stop_grace_secs: Some(DEFAULT_STOP_GRACE_SECS),
            quit_grace_secs: Some(DEFAULT_QUIT_GRACE_SECS),
            log_capacity: Some(DEFAULT_LOG_CAPACITY),
        }
    }

    #[must_use]
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_HUB_PORT)
    }

    #[must_use]
    pub fn effective_interpreter(&self) -> &str {
        self.interpreter.as_deref().unwrap_or(DEFAULT_INTERPRETER)
    }

    #[must_use]
    pub fn effective_config_file(&self) -> &str {
        self.config_file.as_deref().unwrap_or(CONFIG_FILENAME)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS))
    }

    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs.unwrap_or(DEFAULT_READ_TIMEOUT_SECS))
    }

    #[must_use]
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs.unwrap_or(DEFAULT_WRITE_TIMEOUT_SECS))
    }

    #[must_use]
    pub fn stop_grace(&self) -> Duration {
        Duration::from_secs(self.stop_grace_secs.unwrap_or(DEFAULT_STOP_GRACE_SECS))
    }

    #[must_use]
    pub fn quit_grace(&self) -> Duration {
        Duration::from_secs(self.quit_grace_secs.unwrap_or(DEFAULT_QUIT_GRACE_SECS))
    }

    #[must_use]
    pub fn effective_log_capacity(&self) -> usize {
        self.log_capacity.unwrap_or(DEFAULT_LOG_CAPACITY)
    }

    /// Overlay `other` onto `self`: every field set in `other` wins.
    pub fn overlay(&mut self, other: &Self) {
        if other.port.is_some() {
            self.port = other.port;
        }
        if other.interpreter.is_some() {
            self.interpreter.clone_from(&other.interpreter);
        }
        if other.project_root.is_some() {
            self.project_root.clone_from(&other.project_root);
        }
        if other.config_file.is_some() {
            self.config_file.clone_from(&other.config_file);
        }
        if other.poll_interval_secs.is_some() {
            self.poll_interval_secs = other.poll_interval_secs;
        }
        if other.read_timeout_secs.is_some() {
            self.read_timeout_secs = other.read_timeout_secs;
        }
        if other.write_timeout_secs.is_some() {
            self.write_timeout_secs = other.write_timeout_secs;
        }
        if other.stop_grace_secs.is_some() {
            self.stop_grace_secs = other.stop_grace_secs;
        }
        if other.quit_grace_secs.is_some() {
            self.quit_grace_secs = other.quit_grace_secs;
        }
        if other.log_capacity.is_some() {
            self.log_capacity = other.log_capacity;
        }
    }

    /// Build a settings layer from `MCPHUB_*` variables.
    ///
    /// Unknown keys are ignored; malformed values are errors.
    pub fn from_env_vars<I, K, V>(vars: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut layer = Self::default();
        for (key, value) in vars {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                env_keys::PORT => layer.port = Some(parse_port_strict(value)?),
                env_keys::INTERPRETER => layer.interpreter = Some(value.to_string()),
                env_keys::PROJECT_ROOT => layer.project_root = Some(PathBuf::from(value)),
                env_keys::CONFIG => layer.config_file = Some(value.to_string()),
                env_keys::POLL_SECS => {
                    layer.poll_interval_secs = Some(parse_number(env_keys::POLL_SECS, value)?);
                }
                env_keys::LOG_CAPACITY => {
                    layer.log_capacity = Some(parse_number(env_keys::LOG_CAPACITY, value)?);
                }
                _ => {}
            }
        }
        Ok(layer)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, SettingsError> {
    value.parse().map_err(|_| SettingsError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_port_strict(value: &str) -> Result<u16, SettingsError> {
    match value.parse::<u32>() {
        Ok(port) => u16::try_from(port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or(SettingsError::InvalidPort(port)),
        Err(_) => Err(SettingsError::InvalidValue {
            key: env_keys::PORT,
            value: value.to_string(),
        }),
    }
}

/// Interpret text typed into the port field.
///
/// An integer in `1..=65535` is used as-is; anything else falls back to
/// [`DEFAULT_HUB_PORT`].
pub fn parse_port_input(input: &str) -> u16 {
    input
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|port| *port != 0)
        .unwrap_or(DEFAULT_HUB_PORT)
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Port must be between 1 and 65535, got {0}")]
    InvalidPort(u32),

    #[error("Poll interval must be at least 1 second")]
    InvalidPollInterval,

    #[error("Timeouts must be at least 1 second")]
    InvalidTimeout,

    #[error("Log capacity must be between 100 and 1,000,000, got {0}")]
    InvalidLogCapacity(usize),

    #[error("Interpreter cannot be empty")]
    EmptyInterpreter,

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if settings.port == Some(0) {
        return Err(SettingsError::InvalidPort(0));
    }
    if settings.poll_interval_secs == Some(0) {
        return Err(SettingsError::InvalidPollInterval);
    }
    if [
        settings.read_timeout_secs,
        settings.write_timeout_secs,
        settings.stop_grace_secs,
        settings.quit_grace_secs,
    ]
    .contains(&Some(0))
    {
        return Err(SettingsError::InvalidTimeout);
    }
    if let Some(capacity) = settings.log_capacity {
        if !(100..=1_000_000).contains(&capacity) {
            return Err(SettingsError::InvalidLogCapacity(capacity));
        }
    }
    if settings
        .interpreter
        .as_deref()
        .is_some_and(|i| i.trim().is_empty())
    {
        return Err(SettingsError::EmptyInterpreter);
    }
    Ok(())
}
