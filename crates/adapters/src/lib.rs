// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Concrete implementations of the `FileIo` and `ProcessLiveness`
//! capabilities `sessionfs-core` only declares the seams for: a
//! `std::fs`-backed disk adapter and a `/proc`-backed liveness checker.
//!
//! Behind the `test-support` feature, in-memory fakes of both let
//! `sessionfs-engine` and `sessionfs-registry` be exercised without
//! touching a real filesystem or `/proc`.

pub mod disk;
pub mod procfs_liveness;

pub use disk::DiskFileIo;
pub use procfs_liveness::ProcfsLiveness;

#[cfg(any(test, feature = "test-support"))]
pub mod fakes;

#[cfg(any(test, feature = "test-support"))]
pub use fakes::{FakeFileIo, FakeLiveness};
