// SPDX-License-Identifier: MIT

use super::*;
use serial_test::serial;
use std::sync::Mutex;

// SESSIONFS_STATE_DIR/SESSIONFS_CONFIG are process-wide, so these tests
// are serialized against each other.
static ENV_GUARD: Mutex<()> = Mutex::new(());

fn with_state_dir<R>(dir: &std::path::Path, f: impl FnOnce() -> R) -> R {
    let _lock = ENV_GUARD.lock().unwrap();
    std::env::set_var("SESSIONFS_STATE_DIR", dir);
    std::env::remove_var("SESSIONFS_CONFIG");
    let result = f();
    std::env::remove_var("SESSIONFS_STATE_DIR");
    result
}

#[test]
#[serial]
fn load_without_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = with_state_dir(dir.path(), Config::load).unwrap();

    assert_eq!(config.session_root, std::path::PathBuf::from("/mnt"));
    assert_eq!(config.socket_path, dir.path().join(DEFAULT_SOCKET_NAME));
    assert_eq!(config.chunk_size, sessionfs_engine::copy::DEFAULT_CHUNK_SIZE);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.log_format, LogFormat::Plain);
    assert_eq!(config.reaper_interval, Duration::from_secs(60));
}

#[test]
#[serial]
fn load_with_partial_config_file_overlays_only_named_fields() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "session_root = \"/export\"\nlog_level = \"debug\"\n").unwrap();

    let config = with_state_dir(dir.path(), Config::load).unwrap();

    assert_eq!(config.session_root, std::path::PathBuf::from("/export"));
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.chunk_size, sessionfs_engine::copy::DEFAULT_CHUNK_SIZE);
}

#[test]
#[serial]
fn load_with_malformed_config_file_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "not valid toml === ").unwrap();

    let result = with_state_dir(dir.path(), Config::load);
    assert!(matches!(result, Err(ConfigError::Parse(_, _))));
}

#[test]
#[serial]
fn load_reads_reaper_interval_and_log_format() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "reaper_interval_secs = 5\nlog_format = \"json\"\n").unwrap();

    let config = with_state_dir(dir.path(), Config::load).unwrap();

    assert_eq!(config.reaper_interval, Duration::from_secs(5));
    assert_eq!(config.log_format, LogFormat::Json);
}
