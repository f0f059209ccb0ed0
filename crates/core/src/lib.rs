// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sessionfs-core: domain types shared by every other crate in the workspace.
//!
//! This crate owns nothing that talks to the host kernel. It defines the
//! vocabulary (`OwnerId`, `HandleId`, error kinds), the injected capability
//! traits (`FileIo`, `ProcessLiveness`) that concrete adapters implement,
//! the `Clock` abstraction used for monotonic snapshot timestamps, and the
//! session-root path gate.

pub mod capability;
pub mod clock;
pub mod error;
pub mod ids;
pub mod pathgate;

pub use capability::{FileHandle, FileIo, OpenFlags, ProcessLiveness};
pub use clock::{Clock, SystemClock};
pub use error::CoreError;
pub use ids::{HandleId, OwnerId};
pub use pathgate::{GateError, PathGate};

#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
