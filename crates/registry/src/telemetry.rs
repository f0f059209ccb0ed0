// SPDX-License-Identifier: MIT

//! Telemetry façade: publishes `active_sessions_num` and, per session,
//! `active_incarnations_num` plus per-incarnation owner info (spec §3,
//! §4.8, §6).
//!
//! All mutation here happens under the owning session's `sess_lock`
//! write side — closing the gap the spec's design notes (§9) call out
//! ("the close path in the original sometimes updates telemetry counters
//! without holding `sess_lock` write side").

use parking_lot::RwLock;
use sessionfs_core::{HandleId, OwnerId};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Derives the telemetry node name for a canonical original path: the
/// path with every `/` remapped to `-` (spec §6).
pub fn node_name(path: &Path) -> String {
    path.to_string_lossy().replace('/', "-")
}

/// Per-session telemetry node.
pub struct SessionTelemetry {
    node_name: String,
    active_incarnations_num: AtomicU64,
    owners: RwLock<HashMap<(OwnerId, HandleId), String>>,
}

impl SessionTelemetry {
    fn new(node_name: String) -> Self {
        Self {
            node_name,
            active_incarnations_num: AtomicU64::new(0),
            owners: RwLock::new(HashMap::new()),
        }
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    pub fn active_incarnations_num(&self) -> u64 {
        self.active_incarnations_num.load(Ordering::Acquire)
    }

    /// The attribute name read back for a given incarnation: `<owner>_<handle>`.
    pub fn attribute_name(owner_id: OwnerId, handle_id: HandleId) -> String {
        format!("{owner_id}_{handle_id}")
    }

    pub fn owner_of(&self, owner_id: OwnerId, handle_id: HandleId) -> Option<String> {
        self.owners.read().get(&(owner_id, handle_id)).cloned()
    }
}

/// Process-wide telemetry façade, shared (cloned, cheaply: it's an
/// `Arc` internally) between the registry and anything that serves
/// status queries (the daemon's `Status` wire request).
#[derive(Clone)]
pub struct Telemetry {
    active_sessions_num: Arc<AtomicU64>,
    nodes: Arc<RwLock<HashMap<String, Arc<SessionTelemetry>>>>,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl Telemetry {
    pub fn new() -> Self {
        Self { active_sessions_num: Arc::new(AtomicU64::new(0)), nodes: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// Global counter: sum over all sessions of their incarnation count
    /// (spec §3 — yes, despite the name, this counts incarnations, not
    /// `Session` objects; see P3).
    pub fn active_sessions_num(&self) -> u64 {
        self.active_sessions_num.load(Ordering::Acquire)
    }

    /// Register a telemetry node for a newly admitted session.
    pub fn publish_session(&self, path: &Path) -> Arc<SessionTelemetry> {
        let name = node_name(path);
        let node = Arc::new(SessionTelemetry::new(name.clone()));
        self.nodes.write().insert(name, node.clone());
        node
    }

    /// Remove a session's telemetry node entirely (on session teardown).
    pub fn unpublish_session(&self, node: &SessionTelemetry) {
        self.nodes.write().remove(node.node_name());
    }

    pub fn session_node(&self, path: &Path) -> Option<Arc<SessionTelemetry>> {
        self.nodes.read().get(&node_name(path)).cloned()
    }

    /// Record a newly admitted incarnation. Must be called under the
    /// owning session's `sess_lock` write side.
    pub fn record_incarnation_open(
        &self,
        node: &SessionTelemetry,
        owner_id: OwnerId,
        handle_id: HandleId,
        owner_name: String,
    ) {
        node.active_incarnations_num.fetch_add(1, Ordering::AcqRel);
        node.owners.write().insert((owner_id, handle_id), owner_name);
        self.active_sessions_num.fetch_add(1, Ordering::AcqRel);
    }

    /// Record an incarnation's removal. Must be called under the
    /// owning session's `sess_lock` write side.
    pub fn record_incarnation_close(&self, node: &SessionTelemetry, owner_id: OwnerId, handle_id: HandleId) {
        node.active_incarnations_num.fetch_sub(1, Ordering::AcqRel);
        node.owners.write().remove(&(owner_id, handle_id));
        self.active_sessions_num.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
#[path = "telemetry_tests.rs"]
mod tests;
