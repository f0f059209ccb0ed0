// SPDX-License-Identifier: MIT

//! The session registry: a reader-mostly map from canonical path to
//! session, keyed for lookup without ever blocking on the admission
//! lock (spec §4.2).
//!
//! Lookups (`find_by_path`, `find_by_handle`) only ever take the map's
//! read side. Admission (`admit_or_get`) and removal (`detach`) take
//! the map's write side, but only briefly — they never call into
//! `FileIo`/`ProcessLiveness` while holding it; that happens in
//! `sessionfs-engine`, with an already-acquired `Arc<SessionEntry>` in
//! hand. The `admission_lock` serializes concurrent *admissions* of the
//! same path so only one caller ever constructs the entry that's about
//! to be inserted.

use crate::session::SessionEntry;
use crate::telemetry::Telemetry;
use parking_lot::{Mutex, RwLock};
use sessionfs_core::{HandleId, OwnerId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Registry {
    sessions: RwLock<HashMap<PathBuf, Arc<SessionEntry>>>,
    admission_lock: Mutex<()>,
    telemetry: Telemetry,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self { sessions: RwLock::new(HashMap::new()), admission_lock: Mutex::new(()), telemetry: Telemetry::new() }
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Looks up a session by canonical path, bumping its refcount if
    /// found. Does not filter by validity: a caller that races a
    /// teardown may get back an entry that's already invalid and must
    /// check `is_valid()`/retry itself (spec §4.6 step on the admission
    /// retry).
    pub fn find_by_path(&self, path: &Path) -> Option<Arc<SessionEntry>> {
        let sessions = self.sessions.read();
        let entry = sessions.get(path)?.clone();
        entry.acquire();
        Some(entry)
    }

    /// Looks up the session that owns a given incarnation, by scanning
    /// every live session's list. Used on CLOSE, where only the
    /// `(owner_id, handle_id)` pair is known to the caller (spec §4.6).
    pub fn find_by_handle(&self, owner_id: OwnerId, handle_id: HandleId) -> Option<Arc<SessionEntry>> {
        let sessions = self.sessions.read();
        for entry in sessions.values() {
            if entry.contains_incarnation(owner_id, handle_id) {
                entry.acquire();
                return Some(entry.clone());
            }
        }
        None
    }

    /// Returns the existing session for `path`, or admits a new one
    /// built by `init` if none exists yet. `init` only runs while this
    /// call holds `admission_lock`, never the map's write lock, and
    /// only after a second existence check — so a second caller that
    /// loses the admission race gets the winner's entry instead of
    /// calling `init` itself.
    pub fn admit_or_get(
        &self,
        path: &Path,
        init: impl FnOnce() -> Result<Arc<SessionEntry>, sessionfs_core::CoreError>,
    ) -> Result<Arc<SessionEntry>, sessionfs_core::CoreError> {
        if let Some(entry) = self.find_by_path(path) {
            return Ok(entry);
        }

        let _admission = self.admission_lock.lock();
        if let Some(entry) = self.find_by_path(path) {
            return Ok(entry);
        }

        let entry = init()?;
        entry.acquire();
        self.sessions.write().insert(path.to_path_buf(), entry.clone());
        Ok(entry)
    }

    /// Removes a session from the map. The caller must already hold
    /// proof the entry is invalid and empty (normally: it just called
    /// `entry.invalidate()` and won, and `entry.is_empty()` is true
    /// under its own `sess_lock` write side) — `detach` itself re-checks
    /// both before removing, to guard against a caller's stale view.
    pub fn detach(&self, path: &Path) -> Option<Arc<SessionEntry>> {
        let _admission = self.admission_lock.lock();
        let mut sessions = self.sessions.write();
        let entry = sessions.get(path)?;
        if entry.is_valid() || !entry.is_empty() {
            return None;
        }
        sessions.remove(path)
    }

    /// A snapshot-consistent list of every live session, for the
    /// reaper to walk without holding the map lock for the whole sweep.
    /// `Arc` cloning here does the reclamation-deferral work a manual
    /// RCU list would otherwise need: an entry removed from the map
    /// mid-sweep stays alive until every clone (including the reaper's)
    /// is dropped.
    pub fn snapshot(&self) -> Vec<Arc<SessionEntry>> {
        self.sessions.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
