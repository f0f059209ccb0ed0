// SPDX-License-Identifier: MIT

//! The chunked snapshot/commit copy routine shared by both directions
//! (spec §4.5): fixed-size reads from `src` written verbatim to `dst`,
//! both starting at offset zero, until EOF. No rollback on error — a
//! read or write failure partway through leaves `dst` with whatever was
//! already written (the documented non-goal, spec §1/§9).

use sessionfs_core::FileHandle;
use std::io;

/// Default chunk size (spec §6: "typical 512").
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Copies all of `src` into `dst`, truncating `dst` to zero length
/// first so a zero-byte source produces a zero-byte destination (spec
/// §8 boundary behavior). Returns the number of bytes copied.
pub fn copy_chunked(src: &mut dyn FileHandle, dst: &mut dyn FileHandle, chunk_size: usize) -> io::Result<u64> {
    src.seek_start(0)?;
    dst.seek_start(0)?;
    dst.set_len(0)?;

    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;
    loop {
        let n = src.read(&mut buf)?;
        if n == 0 {
            break;
        }
        dst.write_all(&buf[..n])?;
        total += n as u64;
    }
    dst.sync_all()?;
    Ok(total)
}

#[cfg(test)]
#[path = "copy_tests.rs"]
mod tests;
