// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.
//!
//! Every walk borrows the tree immutably, so a callback can never attach,
//! detach or destroy nodes mid-walk. Collect handles first and mutate
//! afterwards.

use alloc::collections::VecDeque;

use super::id::{INVALID, NodeId};
use super::kind::NodeKind;
use super::store::NodeTree;

/// An iterator over the direct children of a node.
///
/// Created by [`NodeTree::children`]. Iterates front to back, or back to
/// front with [`rev`](Iterator::rev).
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a NodeTree,
    front: u32,
    back: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a NodeTree, first: u32, last: u32) -> Self {
        Self {
            tree,
            front: first,
            back: last,
        }
    }

    fn finish(&mut self) {
        self.front = INVALID;
        self.back = INVALID;
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.front == INVALID {
            return None;
        }
        let idx = self.front;
        if idx == self.back {
            self.finish();
        } else {
            self.front = self.tree.next_sibling[idx as usize];
        }
        Some(self.tree.handle(idx))
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<NodeId> {
        if self.back == INVALID {
            return None;
        }
        let idx = self.back;
        if idx == self.front {
            self.finish();
        } else {
            self.back = self.tree.prev_sibling[idx as usize];
        }
        Some(self.tree.handle(idx))
    }
}

/// A pre-order iterator over a node and everything below it.
///
/// Created by [`NodeTree::descendants`]. Walks the sibling links directly,
/// without an explicit stack.
#[derive(Debug)]
pub struct Descendants<'a> {
    tree: &'a NodeTree,
    start: u32,
    current: u32,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = self.current;
        if idx == INVALID {
            return None;
        }
        let tree = self.tree;

        let first = tree.first_child[idx as usize];
        self.current = if first != INVALID {
            first
        } else {
            let mut cursor = idx;
            loop {
                if cursor == self.start {
                    break INVALID;
                }
                let next = tree.next_sibling[cursor as usize];
                if next != INVALID {
                    break next;
                }
                cursor = tree.parent[cursor as usize];
            }
        };
        Some(tree.handle(idx))
    }
}

/// An iterator from a node's parent up to the root.
///
/// Created by [`NodeTree::ancestors`]. Does not include the starting node.
#[derive(Debug)]
pub struct Ancestors<'a> {
    tree: &'a NodeTree,
    current: u32,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.parent[idx as usize];
        Some(self.tree.handle(idx))
    }
}

impl NodeTree {
    /// Returns a pre-order iterator over `node` and its descendants.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Descendants<'_> {
        self.validate(node);
        Descendants {
            tree: self,
            start: node.idx,
            current: node.idx,
        }
    }

    /// Returns an iterator over the ancestors of `node`, nearest first.
    #[must_use]
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        self.validate(node);
        Ancestors {
            tree: self,
            current: self.parent[node.idx as usize],
        }
    }

    /// Calls `f` for every descendant of `root` (excluding `root`) whose kind
    /// is `kind`, in pre-order.
    pub fn for_each_descendant_of_kind(
        &self,
        root: NodeId,
        kind: NodeKind,
        mut f: impl FnMut(NodeId),
    ) {
        for node in self.descendants(root).skip(1) {
            if self.kind[node.idx as usize] == kind {
                f(node);
            }
        }
    }

    /// Calls `f` for every descendant of `root` (excluding `root`) in
    /// breadth-first order: all children first, then all grandchildren.
    pub fn for_each_descendant_bfs(&self, root: NodeId, mut f: impl FnMut(NodeId)) {
        let mut queue: VecDeque<NodeId> = self.children(root).collect();
        while let Some(node) = queue.pop_front() {
            f(node);
            queue.extend(self.children(node));
        }
    }

    /// Calls `f` for every descendant of `root` (excluding `root`) in
    /// depth-first pre-order.
    pub fn for_each_descendant_dfs(&self, root: NodeId, f: impl FnMut(NodeId)) {
        self.descendants(root).skip(1).for_each(f);
    }

    /// Returns the first descendant of `root` (excluding `root`), in
    /// depth-first pre-order, for which `pred` returns `true`.
    pub fn find(&self, root: NodeId, mut pred: impl FnMut(NodeId) -> bool) -> Option<NodeId> {
        self.descendants(root).skip(1).find(|&node| pred(node))
    }

    /// Returns the first node at or below `root` carrying `mark`, in
    /// depth-first pre-order.
    #[must_use]
    pub fn find_mark(&self, root: NodeId, mark: &str) -> Option<NodeId> {
        self.descendants(root)
            .find(|node| self.marks[node.idx as usize].contains(mark))
    }

    /// Returns the nearest strict ancestor of `node` whose kind is `kind`.
    ///
    /// Returns `None` when no such ancestor exists, including when `kind`
    /// sorts at or below `node`'s own kind.
    #[must_use]
    pub fn ancestor_of_kind(&self, node: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.ancestors(node)
            .find(|a| self.kind[a.idx as usize] == kind)
    }

    /// Returns whether `ancestor` lies strictly above `node`.
    #[must_use]
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.validate(ancestor);
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Returns whether `node` lies anywhere in `ancestor`'s subtree,
    /// excluding `ancestor` itself.
    ///
    /// Takes its arguments in the same order as
    /// [`is_ancestor_of`](Self::is_ancestor_of) and always agrees with it.
    #[must_use]
    pub fn is_descendant_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.validate(node);
        self.descendants(ancestor).skip(1).any(|d| d == node)
    }

    /// Returns whether `child` is a direct child of `parent`.
    #[must_use]
    pub fn has_child(&self, parent: NodeId, child: NodeId) -> bool {
        self.validate(parent);
        self.validate(child);
        self.parent[child.idx as usize] == parent.idx
    }
}
