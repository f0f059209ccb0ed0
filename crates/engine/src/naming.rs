// SPDX-License-Identifier: MIT

//! Incarnation snapshot path naming (spec §4.4).

use sessionfs_core::{Clock, OwnerId};
use std::path::{Path, PathBuf};

/// Snapshot paths are rejected past this length and fall back to
/// `/var/tmp`; matches the typical Linux `PATH_MAX`.
pub const MAX_SNAPSHOT_PATH_LEN: usize = 4096;

/// Derives `<original_path>_incarnation_<owner_id>_<monotonic_timestamp>`,
/// falling back to `/var/tmp/<owner_id>_<monotonic_timestamp>` if that
/// would exceed [`MAX_SNAPSHOT_PATH_LEN`]. The timestamp comes from
/// `Clock::unique_token`, which is guaranteed not to repeat within a
/// process even across calls on the same wall-clock tick.
pub fn snapshot_path(original: &Path, owner_id: OwnerId, clock: &impl Clock) -> PathBuf {
    let token = clock.unique_token();
    let candidate = format!("{}_incarnation_{}_{}", original.display(), owner_id, token);
    if candidate.len() <= MAX_SNAPSHOT_PATH_LEN {
        PathBuf::from(candidate)
    } else {
        PathBuf::from(format!("/var/tmp/{owner_id}_{token}"))
    }
}

#[cfg(test)]
#[path = "naming_tests.rs"]
mod tests;
