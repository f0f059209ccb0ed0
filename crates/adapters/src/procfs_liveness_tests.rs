// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn current_process_is_alive() {
    let liveness = ProcfsLiveness;
    let pid = OwnerId::new(std::process::id());
    assert!(liveness.is_alive(pid));
    assert!(liveness.process_name(pid).is_some());
}

#[test]
fn nonexistent_pid_is_not_alive() {
    let liveness = ProcfsLiveness;
    // Linux pid_max defaults well under this; vanishingly unlikely to
    // collide with a real process in CI or dev environments.
    let pid = OwnerId::new(4_000_000);
    assert!(!liveness.is_alive(pid));
    assert!(liveness.process_name(pid).is_none());
}
