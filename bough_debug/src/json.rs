// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON tree snapshots.
//!
//! [`snapshot`] describes a subtree as nested JSON objects, one per node:
//!
//! ```json
//! {
//!   "id": 3,
//!   "name": "1",
//!   "type": "workspace",
//!   "layout": "splith",
//!   "workspace_layout": "none",
//!   "rect": { "x": 0.0, "y": 0.0, "width": 800.0, "height": 600.0 },
//!   "marks": [],
//!   "active": 4,
//!   "nodes": [ ... ]
//! }
//! ```
//!
//! `id` is the node's serial id, stable for its whole life, so clients can
//! refer back to nodes with
//! [`NodeTree::find_by_id`](bough_core::node::NodeTree::find_by_id).
//! `active` is the serial id of the visible child, or `null` for a node
//! without children.

use std::io::{self, Write};

use bough_core::node::{NodeId, NodeKind, NodeTree};
use serde_json::{Value, json};

/// Builds a JSON description of `node` and all of its descendants.
#[must_use]
pub fn snapshot(tree: &NodeTree, node: NodeId) -> Value {
    let rect = if tree.kind(node) == NodeKind::Root {
        tree.root_state().bounds
    } else {
        tree.geometry(node)
    };
    let nodes: Vec<Value> = tree.children(node).map(|c| snapshot(tree, c)).collect();
    let marks: Vec<&str> = tree.marks(node).collect();
    let active = tree.active_child(node).map(|a| tree.id(a));

    json!({
        "id": tree.id(node),
        "name": tree.name(node),
        "type": tree.kind(node).as_str(),
        "layout": tree.layout(node).as_str(),
        "workspace_layout": tree.workspace_layout(node).as_str(),
        "rect": {
            "x": rect.x0,
            "y": rect.y0,
            "width": rect.width(),
            "height": rect.height(),
        },
        "marks": marks,
        "active": active,
        "nodes": nodes,
    })
}

/// Writes the [`snapshot`] of `node` as pretty-printed JSON.
pub fn write_snapshot(tree: &NodeTree, node: NodeId, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, &snapshot(tree, node))?;
    Ok(())
}
