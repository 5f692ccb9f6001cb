//! Discovery of the hub's own log file.
//!
//! The hub writes to an XDG state location, with a dot-directory fallback
//! used by older releases. Format and rotation are owned by the hub.

use std::env;
use std::path::{Path, PathBuf};

/// Candidate log file locations, in probe order.
///
/// `state_home` is `$XDG_STATE_HOME` when set; otherwise `~/.local/state`.
pub fn hub_log_candidates(state_home: Option<PathBuf>, home: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(2);

    let state_home = state_home
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| home.map(|h| h.join(".local").join("state")));
    if let Some(state) = state_home {
        candidates.push(state.join("mcp-hub").join("logs").join("mcp-hub.log"));
    }
    if let Some(home) = home {
        candidates.push(home.join(".mcp-hub").join("logs").join("mcp-hub.log"));
    }

    candidates
}

/// First candidate that exists as a file.
pub fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

/// Locate the hub log file using the process environment.
pub fn find_hub_log_file() -> Option<PathBuf> {
    let state_home = env::var_os("XDG_STATE_HOME").map(PathBuf::from);
    let home = dirs::home_dir();
    first_existing(&hub_log_candidates(state_home, home.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn xdg_state_home_takes_priority() {
        let candidates = hub_log_candidates(
            Some(PathBuf::from("/state")),
            Some(Path::new("/home/ada")),
        );
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/state/mcp-hub/logs/mcp-hub.log"),
                PathBuf::from("/home/ada/.mcp-hub/logs/mcp-hub.log"),
            ]
        );
    }

    #[test]
    fn state_home_defaults_under_home() {
        let candidates = hub_log_candidates(None, Some(Path::new("/home/ada")));
        assert_eq!(
            candidates[0],
            PathBuf::from("/home/ada/.local/state/mcp-hub/logs/mcp-hub.log")
        );
    }

    #[test]
    fn no_home_and_no_state_yields_nothing() {
        assert!(hub_log_candidates(None, None).is_empty());
    }

    #[test]
    fn probe_falls_through_to_second_location() {
        let temp = tempfile::tempdir().unwrap();
        let home = temp.path();
        let fallback = home.join(".mcp-hub").join("logs");
        fs::create_dir_all(&fallback).unwrap();
        fs::write(fallback.join("mcp-hub.log"), "hello").unwrap();

        let candidates = hub_log_candidates(None, Some(home));
        assert_eq!(
            first_existing(&candidates),
            Some(fallback.join("mcp-hub.log"))
        );
    }

    #[test]
    fn probe_returns_none_when_missing() {
        let temp = tempfile::tempdir().unwrap();
        let candidates = hub_log_candidates(None, Some(temp.path()));
        assert_eq!(first_existing(&candidates), None);
    }
}
