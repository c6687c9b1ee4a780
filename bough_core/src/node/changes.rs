// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change draining for arrangement and rendering passes.

use alloc::vec::Vec;

use understory_dirty::Channel;

use super::id::NodeId;
use super::store::NodeTree;
use crate::dirty;

/// The set of changes accumulated since the previous
/// [`NodeTree::take_changes`] call.
///
/// Handle lists only contain nodes that are still alive when the changes are
/// taken. Removed nodes are reported by serial id, since their handles are
/// already stale.
#[derive(Clone, Debug, Default)]
pub struct TreeChanges {
    /// Nodes whose layout or workspace layout changed.
    pub layouts: Vec<NodeId>,
    /// Nodes whose rectangle changed, directly or through an ancestor.
    pub geometry: Vec<NodeId>,
    /// Nodes whose child list changed.
    pub topology: Vec<NodeId>,
    /// Nodes whose marks changed.
    pub marks: Vec<NodeId>,
    /// Nodes created since the last drain that are still alive.
    pub added: Vec<NodeId>,
    /// Serial ids of nodes destroyed since the last drain.
    pub removed: Vec<u64>,
}

impl TreeChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.layouts.clear();
        self.geometry.clear();
        self.topology.clear();
        self.marks.clear();
        self.added.clear();
        self.removed.clear();
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
            && self.geometry.is_empty()
            && self.topology.is_empty()
            && self.marks.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
    }
}

impl NodeTree {
    /// Drains all dirty channels and lifecycle lists.
    ///
    /// The tree itself computes nothing; an arranger reads the returned lists
    /// to decide which nodes to revisit.
    pub fn take_changes(&mut self) -> TreeChanges {
        let mut changes = TreeChanges::default();
        self.take_changes_into(&mut changes);
        changes
    }

    /// Like [`take_changes`](Self::take_changes), but reuses a caller-provided
    /// buffer to avoid allocation.
    pub fn take_changes_into(&mut self, changes: &mut TreeChanges) {
        changes.clear();

        let geometry: Vec<u32> = self
            .dirty
            .drain(dirty::GEOMETRY)
            .affected()
            .deterministic()
            .run()
            .collect();
        self.collect_live(&geometry, &mut changes.geometry);

        for (channel, out) in [
            (dirty::LAYOUT, &mut changes.layouts),
            (dirty::TOPOLOGY, &mut changes.topology),
            (dirty::MARKS, &mut changes.marks),
        ] {
            let drained = self.drain_local(channel);
            self.collect_live(&drained, out);
        }

        // Move lifecycle lists.
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
        self.pending_added.clear();
        self.pending_removed.clear();
        changes.added.retain(|&id| self.is_alive(id));
    }

    fn drain_local(&mut self, channel: Channel) -> Vec<u32> {
        self.dirty.drain(channel).deterministic().run().collect()
    }

    fn collect_live(&self, indices: &[u32], out: &mut Vec<NodeId>) {
        out.extend(
            indices
                .iter()
                .filter(|&&idx| idx < self.len && self.live[idx as usize])
                .map(|&idx| self.handle(idx)),
        );
    }
}
