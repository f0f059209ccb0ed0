// SPDX-License-Identifier: MIT

//! A single open-with-session incarnation (spec §3, §4.4).

use sessionfs_core::{FileHandle, HandleId, OwnerId};
use std::path::PathBuf;

/// One per successful open-with-session. Owns the private snapshot
/// handle and path; keyed within its parent session by
/// `(owner_id, handle_id)`.
pub struct Incarnation {
    pub owner_id: OwnerId,
    pub handle_id: HandleId,
    /// Private snapshot file handle.
    pub handle: Box<dyn FileHandle>,
    /// Snapshot file path, kept for unlink-on-removal by the caller.
    pub snapshot_path: PathBuf,
    /// Zero on a clean snapshot copy, negative on a copy error.
    /// Immutable after construction (spec §3).
    pub status: i32,
}

impl Incarnation {
    pub fn key(&self) -> (OwnerId, HandleId) {
        (self.owner_id, self.handle_id)
    }

    pub fn is_ok(&self) -> bool {
        self.status == 0
    }
}
