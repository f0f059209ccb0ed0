// SPDX-License-Identifier: MIT

//! `std::fs`-backed implementation of the `FileIo` capability (spec
//! component A).

use sessionfs_core::{FileHandle, FileIo, HandleId, OpenFlags};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

/// A single open regular file, backed by a real file descriptor.
pub struct DiskHandle {
    file: File,
}

impl DiskHandle {
    fn new(file: File) -> Self {
        Self { file }
    }
}

impl FileHandle for DiskHandle {
    fn id(&self) -> HandleId {
        HandleId::new(self.file.as_raw_fd() as u64)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.write_all(buf)
    }

    fn set_len(&mut self, len: u64) -> io::Result<()> {
        self.file.set_len(len)
    }

    fn seek_start(&mut self, pos: u64) -> io::Result<u64> {
        self.file.seek(SeekFrom::Start(pos))
    }

    fn sync_all(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }
}

/// Host regular-file service backed directly by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileIo;

impl FileIo for DiskFileIo {
    fn open(&self, path: &Path, flags: OpenFlags) -> io::Result<Box<dyn FileHandle>> {
        let mut opts = OpenOptions::new();
        opts.read(flags.read).write(flags.write).create(flags.create).truncate(flags.truncate);
        if flags.create {
            opts.mode(flags.mode);
        }
        let file = opts.open(path)?;
        Ok(Box::new(DiskHandle::new(file)))
    }

    fn unlink(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }
}

#[cfg(test)]
#[path = "disk_tests.rs"]
mod tests;
