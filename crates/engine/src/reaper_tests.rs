// SPDX-License-Identifier: MIT

use super::*;
use sessionfs_adapters::{FakeFileIo, FakeLiveness};
use sessionfs_core::{FakeClock, OpenFlags, OwnerId, PathGate};
use std::path::Path;
use std::sync::Arc;

fn make_engine() -> (Engine<FakeClock>, FakeFileIo, FakeLiveness, Arc<Registry>) {
    let registry = Arc::new(Registry::new());
    let file_io = FakeFileIo::new();
    let liveness = FakeLiveness::new();
    let gate = PathGate::new("/mnt");
    let engine = Engine::new(
        Arc::clone(&registry),
        Arc::new(file_io.clone()),
        Arc::new(liveness.clone()),
        gate,
        FakeClock::new(),
    );
    (engine, file_io, liveness, registry)
}

#[test]
fn dead_owners_incarnations_are_dropped_and_session_detached() {
    let (engine, file_io, liveness, registry) = make_engine();
    file_io.seed("/mnt/a.txt", b"data".to_vec());

    let opened = engine.open_with_session(Path::new("/mnt/a.txt"), OpenFlags::read_write(), OwnerId::new(1)).unwrap();
    assert_eq!(registry.telemetry().active_sessions_num(), 1);

    liveness.kill(OwnerId::new(1));
    let live = reap(&registry, &liveness);

    assert_eq!(live, 0);
    assert_eq!(registry.telemetry().active_sessions_num(), 0);
    assert!(registry.is_empty());
    let _ = opened;
}

#[test]
fn live_owners_incarnations_survive_and_session_remains() {
    let (engine, file_io, liveness, registry) = make_engine();
    file_io.seed("/mnt/b.txt", b"data".to_vec());

    let opened = engine.open_with_session(Path::new("/mnt/b.txt"), OpenFlags::read_write(), OwnerId::new(1)).unwrap();
    let live = reap(&registry, &liveness);

    assert_eq!(live, 1);
    assert_eq!(registry.telemetry().active_sessions_num(), 1);
    assert!(!registry.is_empty());

    let entry = registry.find_by_path(Path::new("/mnt/b.txt")).unwrap();
    assert!(entry.contains_incarnation(OwnerId::new(1), opened.handle_id));
    entry.release();
}

#[test]
fn mixed_owners_reaps_only_the_dead_one() {
    let (engine, file_io, liveness, registry) = make_engine();
    file_io.seed("/mnt/c.txt", b"data".to_vec());

    let o1 = engine.open_with_session(Path::new("/mnt/c.txt"), OpenFlags::read_write(), OwnerId::new(1)).unwrap();
    let o2 = engine.open_with_session(Path::new("/mnt/c.txt"), OpenFlags::read_write(), OwnerId::new(2)).unwrap();
    assert_eq!(registry.telemetry().active_sessions_num(), 2);

    liveness.kill(OwnerId::new(1));
    let live = reap(&registry, &liveness);

    assert_eq!(live, 1);
    let entry = registry.find_by_path(Path::new("/mnt/c.txt")).unwrap();
    assert!(!entry.contains_incarnation(OwnerId::new(1), o1.handle_id));
    assert!(entry.contains_incarnation(OwnerId::new(2), o2.handle_id));
    entry.release();
}

#[test]
fn reap_over_empty_registry_returns_zero() {
    let registry = Registry::new();
    let liveness = FakeLiveness::new();
    assert_eq!(reap(&registry, &liveness), 0);
}
