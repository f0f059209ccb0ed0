// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn seed_then_open_reads_back_contents() {
    let io = FakeFileIo::new();
    io.seed("/mnt/a.txt", b"hello".to_vec());

    let mut handle = io.open(Path::new("/mnt/a.txt"), OpenFlags::read_write()).unwrap();
    let mut buf = [0u8; 5];
    let n = handle.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"hello");
}

#[test]
fn two_handles_on_same_path_share_state() {
    let io = FakeFileIo::new();
    io.seed("/mnt/a.txt", b"AAA".to_vec());

    let mut h1 = io.open(Path::new("/mnt/a.txt"), OpenFlags::read_write()).unwrap();
    let mut h2 = io.open(Path::new("/mnt/a.txt"), OpenFlags::read_write()).unwrap();
    h1.write_all(b"BBB").unwrap();

    let mut buf = [0u8; 3];
    h2.seek_start(0).unwrap();
    h2.read(&mut buf).unwrap();
    assert_eq!(&buf, b"BBB");
}

#[test]
fn fail_next_read_fails_exactly_one_read() {
    let io = FakeFileIo::new();
    io.seed("/mnt/a.txt", b"hello".to_vec());
    io.fail_next_read();

    let mut handle = io.open(Path::new("/mnt/a.txt"), OpenFlags::read_write()).unwrap();
    let mut buf = [0u8; 5];
    assert!(handle.read(&mut buf).is_err());
    assert!(handle.read(&mut buf).is_ok());
}

#[test]
fn unlink_removes_path() {
    let io = FakeFileIo::new();
    io.seed("/mnt/a.txt", b"x".to_vec());
    io.unlink(Path::new("/mnt/a.txt")).unwrap();
    assert!(io.read_all(Path::new("/mnt/a.txt")).is_none());
}

#[test]
fn canonicalize_fails_for_unknown_path() {
    let io = FakeFileIo::new();
    assert!(io.canonicalize(Path::new("/mnt/missing.txt")).is_err());
}

#[test]
fn fake_liveness_defaults_alive_until_killed() {
    let liveness = FakeLiveness::new();
    let owner = OwnerId::new(42);
    assert!(liveness.is_alive(owner));
    liveness.kill(owner);
    assert!(!liveness.is_alive(owner));
    assert!(liveness.process_name(owner).is_none());
}

#[test]
fn write_via_handle_is_visible_through_the_path() {
    let io = FakeFileIo::new();
    io.seed("/mnt/a.txt", b"AAA".to_vec());
    let handle = io.open(Path::new("/mnt/a.txt"), OpenFlags::read_write()).unwrap();

    io.write_via_handle(handle.id(), 0, b"ZZZ");

    assert_eq!(io.read_all(Path::new("/mnt/a.txt")).unwrap(), b"ZZZ");
    assert_eq!(io.read_via_handle(handle.id()), b"ZZZ");
}

#[test]
fn fake_liveness_returns_named_owner() {
    let liveness = FakeLiveness::new();
    let owner = OwnerId::new(7);
    liveness.name(owner, "worker");
    assert_eq!(liveness.process_name(owner), Some("worker".to_string()));
}
