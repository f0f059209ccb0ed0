// SPDX-License-Identifier: MIT

use super::*;
use crate::incarnation::Incarnation;
use sessionfs_core::FileHandle;
use std::io;

struct FakeHandle(HandleId);

impl FileHandle for FakeHandle {
    fn id(&self) -> HandleId {
        self.0
    }
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }
    fn write_all(&mut self, _buf: &[u8]) -> io::Result<()> {
        Ok(())
    }
    fn set_len(&mut self, _len: u64) -> io::Result<()> {
        Ok(())
    }
    fn seek_start(&mut self, _pos: u64) -> io::Result<u64> {
        Ok(0)
    }
    fn sync_all(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn new_entry(registry: &Registry, path: &Path) -> Arc<SessionEntry> {
    let node = registry.telemetry().publish_session(path);
    Arc::new(SessionEntry::new(
        path.to_path_buf(),
        Box::new(FakeHandle(HandleId::new(0))),
        registry.telemetry().clone(),
        node,
    ))
}

#[test]
fn admit_or_get_constructs_only_once() {
    let registry = Registry::new();
    let path = Path::new("/mnt/a.txt");
    let mut calls = 0;

    let first = registry.admit_or_get(path, || {
        calls += 1;
        Ok(new_entry(&registry, path))
    });
    assert!(first.is_ok());

    let second = registry.admit_or_get(path, || {
        calls += 1;
        Ok(new_entry(&registry, path))
    });
    assert!(second.is_ok());
    assert_eq!(calls, 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn find_by_path_bumps_refcount() {
    let registry = Registry::new();
    let path = Path::new("/mnt/a.txt");
    registry.admit_or_get(path, || Ok(new_entry(&registry, path))).unwrap();

    let found = registry.find_by_path(path).unwrap();
    assert_eq!(found.refcount(), 1);
    found.release();
}

#[test]
fn find_by_handle_scans_incarnations() {
    let registry = Registry::new();
    let path = Path::new("/mnt/a.txt");
    let entry = registry.admit_or_get(path, || Ok(new_entry(&registry, path))).unwrap();
    entry.append_incarnation(
        Incarnation {
            owner_id: OwnerId::new(1),
            handle_id: HandleId::new(5),
            handle: Box::new(FakeHandle(HandleId::new(5))),
            snapshot_path: PathBuf::from("/var/tmp/1_5"),
            status: 0,
        },
        "proc".into(),
    );

    let found = registry.find_by_handle(OwnerId::new(1), HandleId::new(5));
    assert!(found.is_some());
    assert!(registry.find_by_handle(OwnerId::new(99), HandleId::new(99)).is_none());
}

#[test]
fn detach_requires_invalid_and_empty() {
    let registry = Registry::new();
    let path = Path::new("/mnt/a.txt");
    let entry = registry.admit_or_get(path, || Ok(new_entry(&registry, path))).unwrap();

    assert!(registry.detach(path).is_none(), "still valid, must not detach");
    assert!(entry.invalidate());
    assert!(registry.detach(path).is_some());
    assert!(registry.is_empty());
}

#[test]
fn snapshot_is_stable_against_concurrent_removal() {
    let registry = Registry::new();
    let path = Path::new("/mnt/a.txt");
    let entry = registry.admit_or_get(path, || Ok(new_entry(&registry, path))).unwrap();

    let snap = registry.snapshot();
    assert_eq!(snap.len(), 1);

    entry.invalidate();
    registry.detach(path);
    assert!(registry.is_empty());
    // The snapshot still holds a strong reference; it keeps working.
    assert_eq!(snap[0].path(), path);
}
