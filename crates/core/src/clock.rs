// SPDX-License-Identifier: MIT

//! Clock abstraction for testable time handling.
//!
//! `unique_token` is the monotonic source behind incarnation snapshot
//! filenames (spec §4.4): two calls within the same nanosecond must not
//! collide, so `SystemClock` backs it with a process-wide atomic that is
//! only ever allowed to increase.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A clock that provides the current time and a collision-free token
/// derived from it, used to name incarnation snapshot files.
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> Instant;
    fn epoch_ns(&self) -> u64;

    /// A value that strictly increases across calls within this process,
    /// even when two calls land on the same wall-clock nanosecond.
    fn unique_token(&self) -> u64;
}

static LAST_TOKEN: AtomicU64 = AtomicU64::new(0);

/// Real system clock.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ns(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos() as u64
    }

    fn unique_token(&self) -> u64 {
        let candidate = self.epoch_ns();
        let mut prev = LAST_TOKEN.load(Ordering::Relaxed);
        loop {
            let next = if candidate > prev { candidate } else { prev + 1 };
            match LAST_TOKEN.compare_exchange_weak(
                prev,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}

/// Fake clock for testing with controllable time.
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<Instant>>,
    epoch_ns: Arc<Mutex<u64>>,
    token: Arc<AtomicU64>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(Instant::now())),
            epoch_ns: Arc::new(Mutex::new(1_000_000_000)),
            token: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, duration: Duration) {
        *self.current.lock() += duration;
        *self.epoch_ns.lock() += duration.as_nanos() as u64;
    }

    pub fn set_epoch_ns(&self, ns: u64) {
        *self.epoch_ns.lock() = ns;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.current.lock()
    }

    fn epoch_ns(&self) -> u64 {
        *self.epoch_ns.lock()
    }

    fn unique_token(&self) -> u64 {
        // Deterministic but still collision-free across calls in one test.
        self.epoch_ns().wrapping_add(self.token.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
