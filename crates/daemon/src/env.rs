// SPDX-License-Identifier: MIT

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

use crate::config::ConfigError;

/// Resolve state directory: SESSIONFS_STATE_DIR > XDG_STATE_HOME/sessionfs > ~/.local/state/sessionfs
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("SESSIONFS_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("sessionfs"));
    }
    dirs::state_dir()
        .map(|dir| dir.join("sessionfs"))
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/state/sessionfs")))
        .ok_or(ConfigError::NoStateDir)
}

/// Path to the TOML config file, if the caller wants to override one.
pub fn config_path_override() -> Option<PathBuf> {
    std::env::var("SESSIONFS_CONFIG").ok().map(PathBuf::from)
}
