// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn system_clock_unique_token_is_strictly_increasing() {
    let clock = SystemClock;
    let mut last = clock.unique_token();
    for _ in 0..64 {
        let next = clock.unique_token();
        assert!(next > last, "token did not increase: {next} <= {last}");
        last = next;
    }
}

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new();
    let t0 = clock.epoch_ns();
    clock.advance(Duration::from_secs(1));
    assert_eq!(clock.epoch_ns(), t0 + 1_000_000_000);
}

#[test]
fn fake_clock_unique_token_never_repeats() {
    let clock = FakeClock::new();
    let a = clock.unique_token();
    let b = clock.unique_token();
    assert_ne!(a, b);
}
