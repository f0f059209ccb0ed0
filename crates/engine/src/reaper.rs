// SPDX-License-Identifier: MIT

//! The reaper (spec §4.7): walks a registry snapshot on shutdown,
//! dropping incarnations whose owner process is gone, and reports how
//! many live incarnations remain.

use sessionfs_core::ProcessLiveness;
use sessionfs_registry::Registry;
use tracing::info;

/// Walks every session in the registry, draining and re-sorting its
/// incarnation list into "owner still alive" (re-attached) and "owner
/// gone" (unpublished, snapshot file left on disk for out-of-band
/// cleanup). Sessions left empty and valid are detached. Returns the
/// count of incarnations whose owner is still alive.
pub fn reap(registry: &Registry, liveness: &dyn ProcessLiveness) -> u64 {
    let mut live = 0u64;

    for entry in registry.snapshot() {
        let drained = entry.drain_incarnations();
        for incarnation in drained {
            if liveness.is_alive(incarnation.owner_id) {
                let owner_name = liveness.process_name(incarnation.owner_id).unwrap_or_else(|| format!("owner-{}", incarnation.owner_id));
                entry.append_incarnation(incarnation, owner_name);
                live += 1;
            } else {
                info!(
                    owner_id = incarnation.owner_id.as_u32(),
                    handle_id = incarnation.handle_id.as_u64(),
                    snapshot = %incarnation.snapshot_path.display(),
                    "reaped incarnation of dead owner"
                );
                // Snapshot file deliberately left on disk; see spec §4.7.
            }
        }

        if entry.is_valid() && entry.is_empty() && entry.invalidate() {
            registry.detach(entry.path());
        }
    }

    live
}

#[cfg(test)]
#[path = "reaper_tests.rs"]
mod tests;
