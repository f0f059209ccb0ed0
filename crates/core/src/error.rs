// SPDX-License-Identifier: MIT

//! Error kinds shared across the workspace (spec §7).
//!
//! Propagation policy: `Again` is locally recoverable (the caller retries
//! admission at most once); everything else is surfaced to the caller
//! unchanged. There is no fatal variant — a core-internal invariant
//! violation (duplicate incarnation key, refcount underflow) is a
//! programming defect and is asserted with `debug_assert!` at the call
//! site rather than modeled as a runtime error.

use thiserror::Error;

/// Errors surfaced by the session manager's request surface.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Path not under the session root, a required flag was missing, or
    /// the request was otherwise malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Allocation failed. Modeled for protocol completeness; unreachable
    /// in practice since allocation failure aborts the process in safe Rust.
    #[error("out of memory")]
    NoMemory,

    /// Registry lookup missed during CLOSE.
    #[error("handle not found")]
    NotFound,

    /// The session was mid-teardown; the caller may retry exactly once.
    #[error("session is being torn down, retry")]
    Again,

    /// The core is in shutdown and is not accepting new sessions.
    #[error("unavailable: shutting down")]
    Unavailable,

    /// The file I/O capability reported an error during an original open,
    /// snapshot open, read, or write. Not fatal to the core: it is
    /// surfaced as the incarnation's status.
    #[error("io failure: {0}")]
    IoFailure(#[from] std::io::Error),

    /// CLOSE could not complete because the owner process vanished
    /// between session lookup and commit.
    #[error("broken pipe: owner vanished during commit")]
    BrokenPipe,
}

impl CoreError {
    /// Maps to the `incarnation.status` convention: zero is success,
    /// negative is failure (spec §4.6/§6). `IoFailure` is the only kind
    /// that naturally travels this path.
    pub fn as_status(&self) -> i32 {
        match self {
            CoreError::InvalidArgument(_) => -1,
            CoreError::NoMemory => -2,
            CoreError::NotFound => -3,
            CoreError::Again => -4,
            CoreError::Unavailable => -5,
            CoreError::IoFailure(_) => -6,
            CoreError::BrokenPipe => -7,
        }
    }
}
