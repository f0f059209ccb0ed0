// SPDX-License-Identifier: MIT

//! `sessionfsd`: the reference userspace session manager daemon. Binds a
//! Unix socket, serves `Request`/`Response` (spec §6) backed by the real
//! disk and `/proc` adapters, and periodically reaps incarnations of
//! dead owner processes (spec §4.7).

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod env;
mod listener;

use config::{Config, LogFormat};
use listener::Daemon;
use sessionfs_adapters::{DiskFileIo, ProcfsLiveness};
use sessionfs_core::{PathGate, SystemClock};
use sessionfs_engine::{reap, Engine};
use sessionfs_registry::Registry;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    info!(session_root = %config.session_root.display(), socket_path = %config.socket_path.display(), "starting sessionfsd");

    let registry = Arc::new(Registry::new());
    let gate = PathGate::new(config.session_root.to_string_lossy().into_owned());
    let engine = Arc::new(
        Engine::new(Arc::clone(&registry), Arc::new(DiskFileIo), Arc::new(ProcfsLiveness), gate, SystemClock)
            .with_chunk_size(config.chunk_size),
    );
    let liveness: Arc<dyn sessionfs_core::ProcessLiveness> = Arc::new(ProcfsLiveness);
    let file_io: Arc<dyn sessionfs_core::FileIo> = Arc::new(DiskFileIo);
    let daemon = Arc::new(Daemon::new(Arc::clone(&engine), Arc::clone(&registry), liveness, file_io));

    spawn_reaper(Arc::clone(&registry), config.reaper_interval);

    if let Err(e) = daemon.serve(&config.socket_path).await {
        error!(%e, "listener stopped");
        std::process::exit(1);
    }
}

fn spawn_reaper(registry: Arc<Registry>, interval: std::time::Duration) {
    tokio::spawn(async move {
        let liveness = ProcfsLiveness;
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let live = reap(&registry, &liveness);
            info!(live, "reaper pass complete");
        }
    });
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        LogFormat::Plain => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }
}
