// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Whole-tree structural checks.

use core::fmt;

use bough_core::node::{NodeKind, NodeTree};

/// A structural property that does not hold.
///
/// Nodes are identified by serial id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root node has a parent.
    RootHasParent,
    /// A node does not appear exactly once among its parent's children.
    ChildListMismatch {
        /// The node.
        node: u64,
        /// How often it appears in its parent's child list.
        occurrences: usize,
    },
    /// A node sits under a kind that may not contain it.
    KindOrder {
        /// The node.
        node: u64,
        /// The node's kind.
        kind: NodeKind,
        /// The parent's kind.
        parent_kind: NodeKind,
    },
    /// Following parent links from a node never reaches the root.
    Cycle {
        /// The node.
        node: u64,
    },
    /// An output's workspaces are not sorted by name.
    UnsortedWorkspaces {
        /// The output.
        output: u64,
    },
    /// Fewer nodes are reachable from the root than are alive.
    ///
    /// Detached nodes are legitimate between mutations, so this is only
    /// reported by [`check_attached`].
    Unreachable {
        /// Live nodes.
        live: usize,
        /// Nodes reachable from the root.
        reachable: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootHasParent => f.write_str("root node has a parent"),
            Self::ChildListMismatch { node, occurrences } => write!(
                f,
                "node #{node} appears {occurrences} times among its parent's children"
            ),
            Self::KindOrder {
                node,
                kind,
                parent_kind,
            } => write!(f, "{kind} node #{node} is attached under a {parent_kind}"),
            Self::Cycle { node } => write!(f, "parent chain of node #{node} does not reach the root"),
            Self::UnsortedWorkspaces { output } => {
                write!(f, "workspaces of output #{output} are not sorted")
            }
            Self::Unreachable { live, reachable } => {
                write!(f, "{live} nodes alive but only {reachable} reachable from the root")
            }
        }
    }
}

impl core::error::Error for InvariantViolation {}

/// Checks every node reachable from the root.
///
/// - The root has no parent.
/// - Every other node appears exactly once in its parent's child list.
/// - Every parent's kind may contain its child's kind.
/// - Parent chains end at the root without revisiting a node.
/// - Workspaces under each output are sorted by name.
pub fn check_invariants(tree: &NodeTree) -> Result<(), InvariantViolation> {
    let root = tree.root();
    if tree.parent(root).is_some() {
        return Err(InvariantViolation::RootHasParent);
    }
    let limit = tree.node_count();

    for node in tree.descendants(root).skip(1) {
        let id = tree.id(node);
        let Some(parent) = tree.parent(node) else {
            return Err(InvariantViolation::Cycle { node: id });
        };

        let occurrences = tree.children(parent).filter(|&c| c == node).count();
        if occurrences != 1 {
            return Err(InvariantViolation::ChildListMismatch {
                node: id,
                occurrences,
            });
        }

        let (kind, parent_kind) = (tree.kind(node), tree.kind(parent));
        if !parent_kind.may_contain(kind) {
            return Err(InvariantViolation::KindOrder {
                node: id,
                kind,
                parent_kind,
            });
        }

        let mut steps = 0;
        let mut top = node;
        for ancestor in tree.ancestors(node) {
            steps += 1;
            if steps > limit {
                return Err(InvariantViolation::Cycle { node: id });
            }
            top = ancestor;
        }
        if top != root {
            return Err(InvariantViolation::Cycle { node: id });
        }

        if kind == NodeKind::Output {
            let names: alloc::vec::Vec<&str> = tree
                .children(node)
                .map(|ws| tree.name(ws).unwrap_or(""))
                .collect();
            if names.windows(2).any(|pair| pair[0] > pair[1]) {
                return Err(InvariantViolation::UnsortedWorkspaces { output: id });
            }
        }
    }
    Ok(())
}

/// Like [`check_invariants`], and additionally requires every live node to
/// be reachable from the root.
pub fn check_attached(tree: &NodeTree) -> Result<(), InvariantViolation> {
    check_invariants(tree)?;
    let live = tree.node_count();
    let reachable = tree.descendants(tree.root()).count();
    if reachable != live {
        return Err(InvariantViolation::Unreachable { live, reachable });
    }
    Ok(())
}
