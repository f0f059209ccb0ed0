// SPDX-License-Identifier: MIT

//! create-session-and-incarnation / create-incarnation / close-incarnation
//! (spec §4.6), wired up against a `Registry`, a `Clock`, and the
//! injected `FileIo`/`ProcessLiveness` capabilities.

use crate::copy;
use crate::naming;
use sessionfs_core::{Clock, CoreError, FileIo, HandleId, OpenFlags, OwnerId, PathGate, ProcessLiveness};
use sessionfs_registry::{Incarnation, Registry, SessionEntry};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// The outcome of `OPEN`: the incarnation's handle id and its snapshot
/// status (zero on a clean copy, negative on a copy error the caller
/// should immediately discard by calling `close_incarnation`).
#[derive(Debug, Clone, Copy)]
pub struct OpenResult {
    pub handle_id: HandleId,
    pub status: i32,
}

/// The outcome of `CLOSE`: whether the session was still valid (so a
/// commit ran) and the now-detached incarnation's snapshot path. The
/// core never unlinks this path itself (spec §4.6 step 5, §6
/// "Persisted state"): it is handed back so the external collaborator
/// that actually owns host file I/O can remove it.
#[derive(Debug, Clone)]
pub struct CloseResult {
    pub committed: bool,
    pub snapshot_path: PathBuf,
}

pub struct Engine<C: Clock> {
    registry: Arc<Registry>,
    file_io: Arc<dyn FileIo>,
    process_liveness: Arc<dyn ProcessLiveness>,
    path_gate: PathGate,
    clock: C,
    chunk_size: usize,
}

impl<C: Clock> Engine<C> {
    pub fn new(
        registry: Arc<Registry>,
        file_io: Arc<dyn FileIo>,
        process_liveness: Arc<dyn ProcessLiveness>,
        path_gate: PathGate,
        clock: C,
    ) -> Self {
        Self { registry, file_io, process_liveness, path_gate, clock, chunk_size: copy::DEFAULT_CHUNK_SIZE }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// `OPEN(original_path, flags, mode, owner_id)` (spec §4.6).
    pub fn open_with_session(
        &self,
        original_path: &Path,
        flags: OpenFlags,
        owner_id: OwnerId,
    ) -> Result<OpenResult, CoreError> {
        if !self.path_gate.is_under_root(original_path, self.file_io.as_ref()) {
            return Err(CoreError::InvalidArgument(format!("{} is not under the session root", original_path.display())));
        }

        let canonical = self.file_io.canonicalize(original_path).unwrap_or_else(|_| original_path.to_path_buf());

        // Step 1 + retry-once on a torn session (spec §4.6 step 1/5).
        for attempt in 0..2 {
            let entry = self.registry.admit_or_get(&canonical, || self.build_session(&canonical, &flags))?;

            if !entry.is_valid() {
                entry.release();
                if attempt == 0 {
                    continue;
                }
                return Err(CoreError::Again);
            }

            let result = self.create_incarnation(&entry, flags, owner_id);
            entry.release();

            // Step 5: create-incarnation can only fail with `Again` if the
            // session was invalidated between admission and here. Clean it
            // up if we can, but — unlike the admission race above — this
            // is not retried; the failure is returned to the caller as-is.
            if matches!(result, Err(CoreError::Again))
                && entry.is_valid()
                && entry.is_empty()
                && entry.invalidate()
            {
                self.registry.detach(entry.path());
            }
            return result;
        }
        unreachable!("loop always returns within two attempts")
    }

    fn build_session(&self, canonical: &Path, flags: &OpenFlags) -> Result<Arc<SessionEntry>, CoreError> {
        let original_flags = if flags.create { OpenFlags::read_write().with_create(flags.mode) } else { OpenFlags::read_write() };
        let original_handle = self.file_io.open(canonical, original_flags)?;
        let node = self.registry.telemetry().publish_session(canonical);
        Ok(Arc::new(SessionEntry::new(canonical.to_path_buf(), original_handle, self.registry.telemetry().clone(), node)))
    }

    /// create-incarnation (spec §4.6): pre-condition is a held refcount
    /// on `session`, which the caller (`open_with_session`) already has.
    fn create_incarnation(&self, session: &Arc<SessionEntry>, flags: OpenFlags, owner_id: OwnerId) -> Result<OpenResult, CoreError> {
        if !session.is_valid() {
            return Err(CoreError::Again);
        }

        let snapshot_path = naming::snapshot_path(session.path(), owner_id, &self.clock);
        let snapshot_flags = OpenFlags { create: true, truncate: true, ..flags };
        let mut snapshot_handle = self.file_io.open(&snapshot_path, snapshot_flags)?;
        let handle_id = snapshot_handle.id();

        let owner_name = self.process_liveness.process_name(owner_id).unwrap_or_else(|| format!("owner-{owner_id}"));

        let status = session.snapshot_from_original(|original| copy::copy_chunked(original, snapshot_handle.as_mut(), self.chunk_size));
        let status = match status {
            Ok(_) => 0,
            Err(e) => {
                warn!(owner_id = owner_id.as_u32(), %e, "snapshot copy failed");
                CoreError::from(e).as_status()
            }
        };

        let incarnation = Incarnation { owner_id, handle_id, handle: snapshot_handle, snapshot_path, status };
        session.append_incarnation(incarnation, owner_name);

        info!(owner_id = owner_id.as_u32(), handle_id = handle_id.as_u64(), status, "incarnation created");
        Ok(OpenResult { handle_id, status })
    }

    /// `CLOSE(original_path, handle_id, owner_id)` (spec §4.6).
    ///
    /// The core never unlinks the incarnation's snapshot file (spec §6
    /// "Persisted state": that's the external collaborator's job once
    /// it has the path back); `CloseResult::snapshot_path` carries it
    /// out for the caller to remove.
    pub fn close_incarnation(&self, handle_id: HandleId, owner_id: OwnerId) -> Result<CloseResult, CoreError> {
        let entry = self.registry.find_by_handle(owner_id, handle_id).ok_or(CoreError::NotFound)?;

        // Session lookup has happened above; re-check liveness here, as
        // close to the commit as the single write-locked close call
        // allows, so a owner that exited in between is observed as
        // broken_pipe rather than committing on its behalf (spec §7).
        let process_liveness = &self.process_liveness;
        let outcome = entry.close_incarnation(owner_id, handle_id, |original, incarnation| {
            if !process_liveness.is_alive(owner_id) {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "owner vanished before commit"));
            }
            copy::copy_chunked(incarnation, original, self.chunk_size)
        });

        let outcome = match outcome {
            Some(outcome) => outcome,
            None => {
                entry.release();
                return Err(CoreError::NotFound);
            }
        };

        let snapshot_path = outcome.incarnation.snapshot_path.clone();

        let result = match outcome.commit_error {
            None => Ok(CloseResult { committed: outcome.committed, snapshot_path }),
            Some(e) if e.kind() == io::ErrorKind::BrokenPipe => Err(CoreError::BrokenPipe),
            Some(e) => {
                warn!(owner_id = owner_id.as_u32(), handle_id = handle_id.as_u64(), %e, "commit failed");
                Err(CoreError::IoFailure(e))
            }
        };

        if entry.is_valid() && entry.is_empty() && entry.refcount() == 1 && entry.invalidate() {
            self.registry.detach(entry.path());
        }
        entry.release();

        result
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
