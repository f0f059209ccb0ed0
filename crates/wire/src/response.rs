// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// Response from the session manager to a caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Response {
    /// `OPEN` succeeded or produced a discardable incarnation.
    ///
    /// `status` is the incarnation's validity status (spec §4.6): zero
    /// means a good snapshot, negative means the caller should
    /// immediately `CLOSE` without reading/writing.
    Opened { handle_id: u64, status: i32 },

    /// `CLOSE` completed (commit or discard, per session validity).
    /// `snapshot_path` is the incarnation's now-detached snapshot file;
    /// the core never unlinks it itself, so the caller is expected to
    /// remove it after a successful close (spec §6 "Persisted state").
    Closed { snapshot_path: String },

    /// `CLOSE` could not complete because the owner vanished between
    /// session lookup and commit; the caller is expected to signal the
    /// owning process.
    BrokenPipe,

    /// `CLOSE` referenced a handle the registry has no record of.
    BadHandle,

    /// `SHUTDOWN` result: count of incarnations still holding sessions
    /// open after the reaper ran.
    ShutdownResult { live_sessions: u64 },

    /// Telemetry snapshot.
    Status { active_sessions_num: u64 },

    /// Any other error kind from `sessionfs_core::CoreError`.
    Error { kind: String, message: String },
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
