// SPDX-License-Identifier: MIT

//! Daemon configuration: defaults overlaid with an optional TOML file
//! (spec §4.9 of the ambient stack).

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_SOCKET_NAME: &str = "sessionfsd.sock";
const DEFAULT_CONFIG_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine state directory")]
    NoStateDir,

    #[error("failed to read config file {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
}

/// Resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Session root: only paths under this directory are admitted (spec §4.1).
    pub session_root: PathBuf,
    /// Unix socket path the listener binds to.
    pub socket_path: PathBuf,
    /// Chunk size used by the snapshot/commit copy loop (spec §4.4/§4.6).
    pub chunk_size: usize,
    /// `tracing-subscriber` env-filter directive, e.g. "info" or "sessionfsd=debug".
    pub log_level: String,
    /// "plain" or "json", selects the tracing-subscriber formatter.
    pub log_format: LogFormat,
    /// How often the daemon's background task invokes the reaper.
    pub reaper_interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Plain,
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Plain
    }
}

/// TOML overlay; every field optional so a partial config file only
/// overrides what it mentions.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    session_root: Option<PathBuf>,
    socket_path: Option<PathBuf>,
    chunk_size: Option<usize>,
    log_level: Option<String>,
    log_format: Option<LogFormat>,
    reaper_interval_secs: Option<u64>,
}

impl Config {
    /// Load configuration for the user-level daemon: fixed XDG-style
    /// state dir, overridable via `SESSIONFS_CONFIG`/`SESSIONFS_STATE_DIR`,
    /// falling back to defaults if no config file is present.
    pub fn load() -> Result<Self, ConfigError> {
        let state_dir = crate::env::state_dir()?;
        let config_path = crate::env::config_path_override().unwrap_or_else(|| state_dir.join(DEFAULT_CONFIG_NAME));

        let raw = match std::fs::read_to_string(&config_path) {
            Ok(contents) => toml::from_str(&contents).map_err(|e| ConfigError::Parse(config_path.clone(), e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => RawConfig::default(),
            Err(e) => return Err(ConfigError::Read(config_path, e)),
        };

        Ok(Self {
            session_root: raw.session_root.unwrap_or_else(|| PathBuf::from(sessionfs_core::pathgate::DEFAULT_ROOT)),
            socket_path: raw.socket_path.unwrap_or_else(|| state_dir.join(DEFAULT_SOCKET_NAME)),
            chunk_size: raw.chunk_size.unwrap_or(sessionfs_engine::copy::DEFAULT_CHUNK_SIZE),
            log_level: raw.log_level.unwrap_or_else(|| "info".to_string()),
            log_format: raw.log_format.unwrap_or_default(),
            reaper_interval: raw.reaper_interval_secs.map(Duration::from_secs).unwrap_or(Duration::from_secs(60)),
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
