// SPDX-License-Identifier: MIT

//! Injected capability traits (spec §1, §6: "Host file I/O ... is an
//! injected capability, not implemented here").
//!
//! `sessionfs-core` only defines the seams. Concrete implementations live
//! in `sessionfs-adapters` (a `std::fs`-backed disk adapter and a
//! `procfs`-backed liveness checker) so the engine and registry crates can
//! be exercised against in-memory fakes without touching a real
//! filesystem or `/proc`.

use crate::ids::HandleId;
use std::io;
use std::path::{Path, PathBuf};

/// Host open(2) flags, already rewritten by the lifecycle engine: the
/// session-semantics bit from the wire request is cleared before this
/// struct is built (spec §6), and `open_original` always sets
/// `read = true, write = true` regardless of the caller's flags (spec
/// §4.3).
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenFlags {
    pub read: bool,
    pub write: bool,
    pub create: bool,
    pub truncate: bool,
    pub mode: u32,
}

impl OpenFlags {
    pub fn read_write() -> Self {
        Self { read: true, write: true, ..Default::default() }
    }

    pub fn with_create(mut self, mode: u32) -> Self {
        self.create = true;
        self.mode = mode;
        self
    }
}

/// A single open file, as handed back by a [`FileIo`] capability.
///
/// Implementations are not required to be `Send`/`Sync` on their own;
/// the engine always accesses a given handle from a single call site at
/// a time under the owning session's `sess_lock`.
pub trait FileHandle: Send {
    /// Opaque per-process-unique id for this handle (spec glossary:
    /// "Handle id"), typically the underlying fd number.
    fn id(&self) -> HandleId;

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;
    fn set_len(&mut self, len: u64) -> io::Result<()>;
    fn seek_start(&mut self, pos: u64) -> io::Result<u64>;
    fn sync_all(&mut self) -> io::Result<()>;
}

/// Host regular-file service: open/create/read/write/close/unlink, plus
/// canonical path resolution (spec component A).
pub trait FileIo: Send + Sync {
    fn open(&self, path: &Path, flags: OpenFlags) -> io::Result<Box<dyn FileHandle>>;
    fn unlink(&self, path: &Path) -> io::Result<()>;
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Is the process identified by `owner_id` still alive and non-zombie?
/// Used only by the reaper (spec §4.7).
pub trait ProcessLiveness: Send + Sync {
    fn is_alive(&self, owner_id: crate::OwnerId) -> bool;

    /// Best-effort process/task name, used for the telemetry owner
    /// attribute (spec §6); `None` when the owner is no longer reachable.
    fn process_name(&self, owner_id: crate::OwnerId) -> Option<String>;
}
