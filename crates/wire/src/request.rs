// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// Bit in `Request::Open::flags` that enables session semantics. The core
/// clears this bit before forwarding the remainder to the `FileIo`
/// capability (spec §6).
pub const SESSION_FLAG: u32 = 1 << 31;

/// Request from a caller to the session manager.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Request {
    /// Open `original_path` with session semantics.
    ///
    /// `flags` is an opaque bitmask; [`SESSION_FLAG`] must be set by the
    /// caller. `owner_id` is typically the caller's pid.
    Open { original_path: String, flags: u32, mode: u32, owner_id: u32 },

    /// Close a previously opened incarnation.
    Close { original_path: String, handle_id: u64, owner_id: u32 },

    /// Ask the manager to reap dead-owner incarnations and report whether
    /// it is safe to stop.
    Shutdown,

    /// Ambient observability: current telemetry snapshot (not part of
    /// the original request surface, but every daemon needs a status
    /// probe).
    Status,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
