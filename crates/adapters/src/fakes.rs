// SPDX-License-Identifier: MIT

//! In-memory fakes for `FileIo` and `ProcessLiveness`, used by every
//! other crate's test suite so none of them need a real filesystem or
//! `/proc` (mirrors the teacher's `test-support` fake-adapter
//! convention).

use parking_lot::RwLock;
use sessionfs_core::{FileHandle, FileIo, HandleId, OpenFlags, OwnerId, ProcessLiveness};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct FileState {
    bytes: Vec<u8>,
    pos: usize,
}

/// A single open file against a [`FakeFileIo`] store: an independent
/// cursor over a shared, ref-counted byte buffer.
pub struct FakeHandle {
    id: HandleId,
    state: Arc<RwLock<FileState>>,
    fail_next_read: Arc<std::sync::atomic::AtomicBool>,
}

impl FileHandle for FakeHandle {
    fn id(&self) -> HandleId {
        self.id
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail_next_read.swap(false, Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "injected read failure"));
        }
        let mut state = self.state.write();
        let available = state.bytes.len().saturating_sub(state.pos);
        let n = available.min(buf.len());
        let pos = state.pos;
        buf[..n].copy_from_slice(&state.bytes[pos..pos + n]);
        state.pos += n;
        Ok(n)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let mut state = self.state.write();
        let pos = state.pos;
        let end = pos + buf.len();
        if state.bytes.len() < end {
            state.bytes.resize(end, 0);
        }
        state.bytes[pos..end].copy_from_slice(buf);
        state.pos = end;
        Ok(())
    }

    fn set_len(&mut self, len: u64) -> io::Result<()> {
        let mut state = self.state.write();
        state.bytes.resize(len as usize, 0);
        state.pos = state.pos.min(state.bytes.len());
        Ok(())
    }

    fn seek_start(&mut self, pos: u64) -> io::Result<u64> {
        let mut state = self.state.write();
        state.pos = pos as usize;
        Ok(pos)
    }

    fn sync_all(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// An in-memory `FileIo`: every path maps to a shared byte buffer, so
/// two handles opened on the same path observe each other's writes
/// (matching the real filesystem's behavior for the `original` handle
/// that snapshot and commit both touch).
#[derive(Default, Clone)]
pub struct FakeFileIo {
    files: Arc<RwLock<HashMap<PathBuf, Arc<RwLock<FileState>>>>>,
    handles: Arc<RwLock<HashMap<HandleId, Arc<RwLock<FileState>>>>>,
    next_handle_id: Arc<AtomicU64>,
    fail_next_read: Arc<std::sync::atomic::AtomicBool>,
}

impl FakeFileIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a path with initial contents, as if it already existed on
    /// disk before any session touched it.
    pub fn seed(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        let state = Arc::new(RwLock::new(FileState { bytes: contents.into(), pos: 0 }));
        self.files.write().insert(path.into(), state);
    }

    pub fn read_all(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.read().get(path).map(|state| state.read().bytes.clone())
    }

    /// Makes the next `read` call against any handle fail once, to
    /// exercise the snapshot-failure / discard path (spec §8 scenario 3).
    pub fn fail_next_read(&self) {
        self.fail_next_read.store(true, Ordering::SeqCst);
    }

    /// Writes directly through a previously opened handle id, as a real
    /// caller would through the raw fd `OPEN` handed back — tests use
    /// this to simulate a client writing to its incarnation without
    /// reaching into engine internals.
    pub fn write_via_handle(&self, id: HandleId, at: u64, bytes: &[u8]) {
        let state = self.handles.read().get(&id).cloned().expect("handle id not tracked by this FakeFileIo");
        let mut guard = state.write();
        let pos = at as usize;
        let end = pos + bytes.len();
        if guard.bytes.len() < end {
            guard.bytes.resize(end, 0);
        }
        guard.bytes[pos..end].copy_from_slice(bytes);
    }

    pub fn read_via_handle(&self, id: HandleId) -> Vec<u8> {
        let state = self.handles.read().get(&id).cloned().expect("handle id not tracked by this FakeFileIo");
        state.read().bytes.clone()
    }
}

impl FileIo for FakeFileIo {
    fn open(&self, path: &Path, flags: OpenFlags) -> io::Result<Box<dyn FileHandle>> {
        let mut files = self.files.write();
        let state = files
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(RwLock::new(FileState::default())))
            .clone();
        if flags.truncate {
            state.write().bytes.clear();
        }
        let id = HandleId::new(self.next_handle_id.fetch_add(1, Ordering::SeqCst));
        self.handles.write().insert(id, state.clone());
        Ok(Box::new(FakeHandle { id, state, fail_next_read: Arc::clone(&self.fail_next_read) }))
    }

    fn unlink(&self, path: &Path) -> io::Result<()> {
        self.files.write().remove(path);
        Ok(())
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        if self.files.read().contains_key(path) {
            Ok(path.to_path_buf())
        } else {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such fake file"))
        }
    }
}

/// An in-memory `ProcessLiveness`: every owner is alive by default
/// until explicitly marked dead.
#[derive(Default, Clone)]
pub struct FakeLiveness {
    dead: Arc<RwLock<HashMap<u32, ()>>>,
    names: Arc<RwLock<HashMap<u32, String>>>,
}

impl FakeLiveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kill(&self, owner_id: OwnerId) {
        self.dead.write().insert(owner_id.as_u32(), ());
    }

    pub fn name(&self, owner_id: OwnerId, name: impl Into<String>) {
        self.names.write().insert(owner_id.as_u32(), name.into());
    }
}

impl ProcessLiveness for FakeLiveness {
    fn is_alive(&self, owner_id: OwnerId) -> bool {
        !self.dead.read().contains_key(&owner_id.as_u32())
    }

    fn process_name(&self, owner_id: OwnerId) -> Option<String> {
        if !self.is_alive(owner_id) {
            return None;
        }
        Some(self.names.read().get(&owner_id.as_u32()).cloned().unwrap_or_else(|| format!("proc-{owner_id}")))
    }
}

#[cfg(test)]
#[path = "fakes_tests.rs"]
mod tests;
