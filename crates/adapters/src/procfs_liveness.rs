// SPDX-License-Identifier: MIT

//! `/proc`-backed implementation of `ProcessLiveness` (spec §4.7),
//! used only by the reaper to decide which incarnations' owners have
//! vanished.

use procfs::process::{Process, Stat};
use sessionfs_core::{OwnerId, ProcessLiveness};
use tracing::debug;

/// Reads process liveness and name straight out of `/proc/<pid>`,
/// mirroring the kernel module's `pid_task`/`PF_EXITING` check: a pid
/// that no longer resolves, or whose state is `Zombie`, counts as dead.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcfsLiveness;

impl ProcfsLiveness {
    fn stat(owner_id: OwnerId) -> Option<Stat> {
        let pid = owner_id.as_u32() as i32;
        Process::new(pid).ok()?.stat().ok()
    }
}

impl ProcessLiveness for ProcfsLiveness {
    fn is_alive(&self, owner_id: OwnerId) -> bool {
        match Self::stat(owner_id) {
            Some(stat) => stat.state != 'Z',
            None => {
                debug!(owner_id = owner_id.as_u32(), "owner process not found in /proc");
                false
            }
        }
    }

    fn process_name(&self, owner_id: OwnerId) -> Option<String> {
        Self::stat(owner_id).map(|stat| stat.comm)
    }
}

#[cfg(test)]
#[path = "procfs_liveness_tests.rs"]
mod tests;
