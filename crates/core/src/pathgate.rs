// SPDX-License-Identifier: MIT

//! The session root and the "is this path under it" predicate (spec §4.1).

use crate::capability::FileIo;
use parking_lot::RwLock;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("root path must be absolute: {0}")]
    NotAbsolute(String),
}

/// Default session root, matching the kernel module's default mount point.
pub const DEFAULT_ROOT: &str = "/mnt";

/// An atomically-updatable session root plus the membership predicate.
///
/// Cloning `PathGate` shares the same underlying root (it wraps an
/// `Arc<RwLock<String>>`); this is deliberately injected rather than a
/// process-wide global so tests can construct independent roots.
#[derive(Clone)]
pub struct PathGate {
    root: Arc<RwLock<String>>,
}

impl Default for PathGate {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl PathGate {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: Arc::new(RwLock::new(root.into())) }
    }

    /// Current root. Readers never observe a partial string: the lock is
    /// held only for the duration of the clone.
    pub fn read_root(&self) -> String {
        self.root.read().clone()
    }

    /// Replace the root. Rejects relative paths; the previous value
    /// remains readable on failure. Writers exclude readers for the
    /// duration of the replacement only.
    pub fn write_root(&self, new_root: impl Into<String>) -> Result<(), GateError> {
        let new_root = new_root.into();
        if !new_root.starts_with('/') {
            return Err(GateError::NotAbsolute(new_root));
        }
        *self.root.write() = new_root;
        Ok(())
    }

    /// Is `path` under the current root?
    ///
    /// If `path` exists, resolve it to canonical form through the
    /// injected `FileIo` capability and check the root is an ancestor
    /// directory (spec §4.1: "resolves the argument to a canonical form
    /// through the File I/O capability when the path exists"). If it
    /// does not exist yet (the common case for a `create` open paired
    /// with the session-semantics flag) — or canonicalization otherwise
    /// fails — fall back to a textual prefix match against the current
    /// root; this mirrors the original kernel module's behavior and is
    /// required so `create` opens can be gated before the file appears
    /// (spec §4.1, §9 design notes).
    pub fn is_under_root(&self, path: &Path, file_io: &dyn FileIo) -> bool {
        let root = self.read_root();
        match file_io.canonicalize(path) {
            Ok(resolved) => resolved.starts_with(&root),
            Err(_) => Self::textual_prefix_match(path, &root),
        }
    }

    fn textual_prefix_match(path: &Path, root: &str) -> bool {
        let normalized = normalize_lexically(path);
        normalized.starts_with(Path::new(root))
    }
}

/// Lexically normalizes `.`/`..` components without touching the
/// filesystem (needed for the nonexistent-path fallback, since
/// `canonicalize` requires the path to exist).
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
#[path = "pathgate_tests.rs"]
mod tests;
