// SPDX-License-Identifier: MIT

//! A single session: the original file handle plus its incarnation
//! list (spec §3, §4.3).
//!
//! `sess_lock` guards `SessionInner`. Appending a new incarnation only
//! needs the *read* side: the inner `Vec` sits behind its own `Mutex`,
//! so concurrent opens only serialize against each other for the brief
//! push, not for the whole session. Removing an incarnation (on close)
//! and committing back to the original both take the *write* side,
//! since both need every other incarnation's view of the list to stay
//! put while they run. The separate `original` mutex means concurrent
//! snapshot reads (held under `sess_lock` read side) race only for the
//! shared read of the original file, exactly as spec'd.

use crate::incarnation::Incarnation;
use crate::telemetry::{SessionTelemetry, Telemetry};
use parking_lot::{Mutex, RwLock};
use sessionfs_core::{FileHandle, HandleId, OwnerId};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// The result of an atomic close: whether the session was still valid
/// (so a commit was attempted), the commit's I/O error if any, and the
/// incarnation removed from the list.
pub struct CloseOutcome {
    pub incarnation: Incarnation,
    pub committed: bool,
    pub commit_error: Option<io::Error>,
}

struct SessionInner {
    incarnations: Mutex<Vec<Incarnation>>,
}

/// One entry in the registry: the canonical path it was opened under,
/// the shared original handle, and the live incarnation list.
pub struct SessionEntry {
    path: PathBuf,
    original: Mutex<Box<dyn FileHandle>>,
    sess_lock: RwLock<SessionInner>,
    refcount: AtomicUsize,
    valid: AtomicBool,
    telemetry: Telemetry,
    telemetry_node: Arc<SessionTelemetry>,
}

impl SessionEntry {
    pub fn new(
        path: PathBuf,
        original: Box<dyn FileHandle>,
        telemetry: Telemetry,
        telemetry_node: Arc<SessionTelemetry>,
    ) -> Self {
        Self {
            path,
            original: Mutex::new(original),
            sess_lock: RwLock::new(SessionInner { incarnations: Mutex::new(Vec::new()) }),
            refcount: AtomicUsize::new(0),
            valid: AtomicBool::new(true),
            telemetry,
            telemetry_node,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn telemetry_node(&self) -> &Arc<SessionTelemetry> {
        &self.telemetry_node
    }

    /// Bumps the refcount that keeps this entry pinned in the registry
    /// even after it's invalidated. Returns the count after the bump.
    pub fn acquire(&self) -> usize {
        self.refcount.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Returns the count after the drop.
    pub fn release(&self) -> usize {
        let prev = self.refcount.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(prev > 0, "session refcount underflow");
        prev - 1
    }

    pub fn refcount(&self) -> usize {
        self.refcount.load(Ordering::Acquire)
    }

    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Marks this session invalid, exactly once. Returns `true` if this
    /// call won the race (and so is the one responsible for tearing the
    /// entry down once the refcount reaches zero).
    pub fn invalidate(&self) -> bool {
        self.valid.compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire).is_ok()
    }

    /// Appends a newly admitted incarnation (read side of `sess_lock`)
    /// and records it with the telemetry façade.
    pub fn append_incarnation(&self, incarnation: Incarnation, owner_name: String) {
        let owner_id = incarnation.owner_id;
        let handle_id = incarnation.handle_id;
        let guard = self.sess_lock.read();
        guard.incarnations.lock().push(incarnation);
        self.telemetry.record_incarnation_open(&self.telemetry_node, owner_id, handle_id, owner_name);
    }

    /// Removes an incarnation by key (write side of `sess_lock`) and
    /// records the removal with the telemetry façade. Returns the
    /// removed incarnation if it was present.
    pub fn remove_incarnation(&self, owner_id: OwnerId, handle_id: HandleId) -> Option<Incarnation> {
        let guard = self.sess_lock.write();
        let removed = {
            let mut incarnations = guard.incarnations.lock();
            let idx = incarnations.iter().position(|inc| inc.key() == (owner_id, handle_id))?;
            incarnations.remove(idx)
        };
        self.telemetry.record_incarnation_close(&self.telemetry_node, owner_id, handle_id);
        Some(removed)
    }

    /// Closes a single incarnation atomically: checks `valid`, runs
    /// `commit` only if the session was still valid, and removes the
    /// incarnation from the list, all under the write side of
    /// `sess_lock` plus the `original` mutex. `commit` is called with
    /// `(original, incarnation)` in that order. Returns `None` if no
    /// incarnation with this key is present (bad handle).
    pub fn close_incarnation(
        &self,
        owner_id: OwnerId,
        handle_id: HandleId,
        commit: impl FnOnce(&mut dyn FileHandle, &mut dyn FileHandle) -> io::Result<u64>,
    ) -> Option<CloseOutcome> {
        let guard = self.sess_lock.write();
        let (mut removed, was_valid) = {
            let mut incarnations = guard.incarnations.lock();
            let idx = incarnations.iter().position(|inc| inc.key() == (owner_id, handle_id))?;
            (incarnations.remove(idx), self.valid.load(Ordering::Acquire))
        };
        let commit_error = if was_valid {
            let mut original = self.original.lock();
            commit(original.as_mut(), removed.handle.as_mut()).err()
        } else {
            None
        };
        self.telemetry.record_incarnation_close(&self.telemetry_node, owner_id, handle_id);
        Some(CloseOutcome { incarnation: removed, committed: was_valid, commit_error })
    }

    /// Bulk-removes every incarnation (write side of `sess_lock`),
    /// recording each removal with telemetry. Used only by the reaper,
    /// which re-attaches the ones whose owner is still alive via
    /// `append_incarnation`.
    pub fn drain_incarnations(&self) -> Vec<Incarnation> {
        let guard = self.sess_lock.write();
        let drained = {
            let mut incarnations = guard.incarnations.lock();
            incarnations.drain(..).collect::<Vec<_>>()
        };
        for inc in &drained {
            self.telemetry.record_incarnation_close(&self.telemetry_node, inc.owner_id, inc.handle_id);
        }
        drained
    }

    pub fn contains_incarnation(&self, owner_id: OwnerId, handle_id: HandleId) -> bool {
        let guard = self.sess_lock.read();
        let incarnations = guard.incarnations.lock();
        incarnations.iter().any(|inc| inc.key() == (owner_id, handle_id))
    }

    pub fn incarnation_count(&self) -> usize {
        let guard = self.sess_lock.read();
        let incarnations = guard.incarnations.lock();
        incarnations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incarnation_count() == 0
    }

    fn with_original<R>(&self, f: impl FnOnce(&mut dyn FileHandle) -> R) -> R {
        let mut guard = self.original.lock();
        f(guard.as_mut())
    }

    /// Reads from the original file to build a new incarnation's
    /// snapshot. Takes `sess_lock`'s read side: concurrent snapshots
    /// only serialize against each other for the shared read of the
    /// original (the `original` mutex below), never against the whole
    /// session.
    pub fn snapshot_from_original<R>(&self, f: impl FnOnce(&mut dyn FileHandle) -> R) -> R {
        let _guard = self.sess_lock.read();
        self.with_original(f)
    }

    /// Writes an incarnation's bytes back to the original file on
    /// close. Takes `sess_lock`'s write side so no other incarnation's
    /// view of the session is in flux while the commit runs.
    pub fn commit_to_original<R>(&self, f: impl FnOnce(&mut dyn FileHandle) -> R) -> R {
        let _guard = self.sess_lock.write();
        self.with_original(f)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
