// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sessionfs-engine: the lifecycle protocols that tie the path gate,
//! registry, and injected capabilities together (spec §4.5, §4.6, §4.7).

pub mod copy;
pub mod lifecycle;
pub mod naming;
pub mod reaper;

pub use lifecycle::{CloseResult, Engine, OpenResult};
pub use reaper::reap;
