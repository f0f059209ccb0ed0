// SPDX-License-Identifier: MIT

//! Unix-socket transport for the session manager's request surface
//! (spec §6), framed with `sessionfs_wire`'s length-prefixed JSON.

use sessionfs_core::{Clock, CoreError, FileIo, OpenFlags, OwnerId, ProcessLiveness};
use sessionfs_engine::{reap, Engine};
use sessionfs_registry::Registry;
use sessionfs_wire::{read_message, write_message, Request, Response, SESSION_FLAG};
use std::sync::Arc;
use tokio::net::{UnixListener, UnixStream};
use tracing::{info, warn};

const O_CREAT: u32 = 0o100;
const O_TRUNC: u32 = 0o1000;

/// Shared daemon state handed to every connection handler.
pub struct Daemon<C: Clock> {
    pub engine: Arc<Engine<C>>,
    pub registry: Arc<Registry>,
    pub liveness: Arc<dyn ProcessLiveness>,
    /// The same `FileIo` capability the engine uses. The core hands
    /// snapshot paths back on close rather than unlinking them itself
    /// (spec §6 "Persisted state"); the daemon, as the external
    /// collaborator of record for the one transport this repo ships,
    /// removes the file here.
    pub file_io: Arc<dyn FileIo>,
}

impl<C: Clock + 'static> Daemon<C> {
    pub fn new(
        engine: Arc<Engine<C>>,
        registry: Arc<Registry>,
        liveness: Arc<dyn ProcessLiveness>,
        file_io: Arc<dyn FileIo>,
    ) -> Self {
        Self { engine, registry, liveness, file_io }
    }

    /// Binds `socket_path`, removing a stale socket left by a prior run,
    /// and serves connections until the listener errors out.
    pub async fn serve(self: Arc<Self>, socket_path: &std::path::Path) -> std::io::Result<()> {
        if socket_path.exists() {
            std::fs::remove_file(socket_path)?;
        }
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let listener = UnixListener::bind(socket_path)?;
        info!(path = %socket_path.display(), "listening");

        loop {
            let (stream, _addr) = listener.accept().await?;
            let daemon = Arc::clone(&self);
            tokio::spawn(async move {
                if let Err(e) = daemon.handle_connection(stream).await {
                    warn!(%e, "connection ended with an error");
                }
            });
        }
    }

    async fn handle_connection(&self, mut stream: UnixStream) -> Result<(), sessionfs_wire::ProtocolError> {
        loop {
            let request: Request = match read_message(&mut stream).await {
                Ok(request) => request,
                Err(sessionfs_wire::ProtocolError::Eof) => return Ok(()),
                Err(e) => return Err(e),
            };
            let response = self.dispatch(request);
            write_message(&mut stream, &response).await?;
        }
    }

    fn dispatch(&self, request: Request) -> Response {
        match request {
            Request::Open { original_path, flags, mode, owner_id } => self.handle_open(original_path, flags, mode, owner_id),
            Request::Close { original_path: _, handle_id, owner_id } => self.handle_close(handle_id, owner_id),
            Request::Shutdown => self.handle_shutdown(),
            Request::Status => Response::Status { active_sessions_num: self.registry.telemetry().active_sessions_num() },
        }
    }

    fn handle_open(&self, original_path: String, flags: u32, mode: u32, owner_id: u32) -> Response {
        let open_flags = match parse_open_flags(flags, mode) {
            Ok(flags) => flags,
            Err(message) => return error_response(&CoreError::InvalidArgument(message)),
        };
        match self.engine.open_with_session(std::path::Path::new(&original_path), open_flags, OwnerId::new(owner_id)) {
            Ok(result) => Response::Opened { handle_id: result.handle_id.as_u64(), status: result.status },
            Err(e) => error_response(&e),
        }
    }

    fn handle_close(&self, handle_id: u64, owner_id: u32) -> Response {
        match self.engine.close_incarnation(handle_id.into(), OwnerId::new(owner_id)) {
            Ok(result) => {
                if let Err(e) = self.file_io.unlink(&result.snapshot_path) {
                    warn!(owner_id, handle_id, %e, path = %result.snapshot_path.display(), "failed to unlink snapshot file after close");
                }
                Response::Closed { snapshot_path: result.snapshot_path.display().to_string() }
            }
            Err(CoreError::NotFound) => Response::BadHandle,
            Err(CoreError::BrokenPipe) => Response::BrokenPipe,
            Err(e) => error_response(&e),
        }
    }

    fn handle_shutdown(&self) -> Response {
        let live_sessions = reap(&self.registry, self.liveness.as_ref());
        Response::ShutdownResult { live_sessions }
    }
}

/// Parses the wire protocol's opaque `flags` bitmask into the engine's
/// `OpenFlags` (spec §6: the session-semantics bit must be set by the
/// caller and is cleared before forwarding to the file I/O capability).
fn parse_open_flags(flags: u32, mode: u32) -> Result<OpenFlags, String> {
    if flags & SESSION_FLAG == 0 {
        return Err("session-semantics flag not set".to_string());
    }
    let rest = flags & !SESSION_FLAG;
    Ok(OpenFlags {
        read: true,
        write: true,
        create: rest & O_CREAT != 0,
        truncate: rest & O_TRUNC != 0,
        mode,
    })
}

fn error_response(error: &CoreError) -> Response {
    match error {
        CoreError::NotFound => Response::BadHandle,
        CoreError::BrokenPipe => Response::BrokenPipe,
        other => Response::Error { kind: format!("{other:?}"), message: other.to_string() },
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
