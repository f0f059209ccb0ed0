// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sessionfs-registry: the reader-mostly session registry and the
//! telemetry façade (spec §4.2, §4.8).
//!
//! Locking order is `admission_lock` → `sess_lock`, never the reverse
//! (spec §9 design notes). `Registry` never calls into `FileIo` or
//! `ProcessLiveness` while holding `admission_lock`; that I/O happens in
//! `sessionfs-engine` after a session handle has been acquired.

pub mod incarnation;
pub mod registry;
pub mod session;
pub mod telemetry;

pub use incarnation::Incarnation;
pub use registry::Registry;
pub use session::SessionEntry;
pub use telemetry::{SessionTelemetry, Telemetry};
