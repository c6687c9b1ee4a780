// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point hit-testing.
//!
//! Hit-testing maps a layout-space point to the view under it and then asks
//! that view's resource which surface accepts input there. Outputs are
//! positioned in layout space; everything below an output is positioned in
//! that output's space, so the point is converted once when crossing an
//! output and then compared against node rectangles directly.
//!
//! At each level the node's layout decides which children take part:
//!
//! | Layout                     | Children tested                        |
//! |----------------------------|----------------------------------------|
//! | `Stacked`, `Tabbed`        | only the active child                  |
//! | `Floating`                 | all, last (topmost) first              |
//! | `None`, `HorizontalSplit`, `VerticalSplit` | all, first to last     |
//!
//! The first child whose rectangle contains the point wins; its siblings
//! are not consulted even if it yields no surface. An output only exposes
//! its active workspace.

use kurbo::{Point, Vec2};

use super::id::{INVALID, NodeId};
use super::kind::{Layout, NodeKind};
use super::payload::Payload;
use super::store::NodeTree;
use crate::resource::SurfaceId;

/// Result of a successful [`NodeTree::hit_test`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// The view under the point.
    pub view: NodeId,
    /// The surface of that view that accepts input at the point.
    pub surface: SurfaceId,
    /// The point in surface-local coordinates.
    pub local: Point,
}

impl NodeTree {
    /// Finds the view and surface under `point`, starting at `node`.
    ///
    /// `point` is in layout space. Starting at the root tests every output;
    /// starting lower tests only that subtree.
    #[must_use]
    pub fn hit_test(&self, node: NodeId, point: Point) -> Option<Hit> {
        self.validate(node);
        match self.kind[node.idx as usize] {
            NodeKind::Root => self
                .children(node)
                .find(|&o| self.rect[o.idx as usize].contains(point))
                .and_then(|o| self.hit_output(o.idx, point)),
            NodeKind::Output => self.hit_output(node.idx, point),
            NodeKind::Workspace | NodeKind::Container | NodeKind::View => {
                let offset = self
                    .ancestor_of_kind(node, NodeKind::Output)
                    .map_or(Vec2::ZERO, |o| self.rect[o.idx as usize].origin().to_vec2());
                self.hit_local(node.idx, point - offset)
            }
        }
    }

    fn hit_output(&self, output: u32, point: Point) -> Option<Hit> {
        let rect = self.rect[output as usize];
        if !rect.contains(point) {
            return None;
        }
        let workspace = self.active_child_idx(output);
        if workspace == INVALID {
            return None;
        }
        self.hit_local(workspace, point - rect.origin().to_vec2())
    }

    /// Hit-tests below an output, with `point` in output space.
    fn hit_local(&self, idx: u32, point: Point) -> Option<Hit> {
        let rect = self.rect[idx as usize];
        if !rect.contains(point) {
            return None;
        }

        if self.kind[idx as usize] == NodeKind::View {
            let Some(Payload::View(view)) = &self.payload[idx as usize] else {
                return None;
            };
            let found = view
                .resource
                .surface_at(point - rect.origin().to_vec2())?;
            return Some(Hit {
                view: self.handle(idx),
                surface: found.surface,
                local: found.local,
            });
        }

        let contains = |&c: &NodeId| self.rect[c.idx as usize].contains(point);
        let child = match self.layout[idx as usize] {
            Layout::Stacked | Layout::Tabbed => {
                self.handle_or_none(self.active_child_idx(idx)).filter(contains)
            }
            Layout::Floating => self.children(self.handle(idx)).rev().find(contains),
            Layout::None | Layout::HorizontalSplit | Layout::VerticalSplit => {
                self.children(self.handle(idx)).find(contains)
            }
        };
        self.hit_local(child?.idx, point)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::resource::{SurfaceHit, ViewResource};

    /// Accepts input everywhere, reporting the point it was given.
    struct Opaque(u32);

    impl ViewResource for Opaque {
        fn surface_at(&self, point: Point) -> Option<SurfaceHit> {
            Some(SurfaceHit {
                surface: SurfaceId(self.0),
                local: point,
            })
        }

        fn close(&mut self) {}
    }

    /// Never accepts input.
    struct Transparent;

    impl ViewResource for Transparent {
        fn surface_at(&self, _: Point) -> Option<SurfaceHit> {
            None
        }

        fn close(&mut self) {}
    }

    fn single_output(width: f64, height: f64) -> (NodeTree, NodeId, NodeId) {
        let mut tree = NodeTree::new();
        let output = tree.create_node(NodeKind::Output);
        let root = tree.root();
        tree.add_child(root, output);
        tree.set_geometry(output, Rect::new(0.0, 0.0, width, height));
        let ws = tree.create_workspace(output, "1").unwrap();
        tree.set_geometry(ws, Rect::new(0.0, 0.0, width, height));
        (tree, output, ws)
    }

    #[test]
    fn full_output_view_gets_local_point() {
        let (mut tree, _, ws) = single_output(800.0, 600.0);
        let view = tree.create_view(ws, Opaque(7));
        tree.set_geometry(view, Rect::new(0.0, 0.0, 800.0, 600.0));

        let hit = tree.hit_test(tree.root(), Point::new(10.0, 10.0)).unwrap();
        assert_eq!(hit.view, view);
        assert_eq!(hit.surface, SurfaceId(7));
        assert_eq!(hit.local, Point::new(10.0, 10.0));
    }

    #[test]
    fn point_outside_every_output_misses() {
        let (mut tree, _, ws) = single_output(800.0, 600.0);
        let view = tree.create_view(ws, Opaque(1));
        tree.set_geometry(view, Rect::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(tree.hit_test(tree.root(), Point::new(900.0, 10.0)), None);
    }

    #[test]
    fn second_output_translates_point() {
        let (mut tree, _, _) = single_output(800.0, 600.0);
        let right = tree.create_node(NodeKind::Output);
        let root = tree.root();
        tree.add_child(root, right);
        tree.set_geometry(right, Rect::new(800.0, 0.0, 1600.0, 600.0));
        let ws = tree.create_workspace(right, "2").unwrap();
        tree.set_geometry(ws, Rect::new(0.0, 0.0, 800.0, 600.0));
        let view = tree.create_view(ws, Opaque(2));
        tree.set_geometry(view, Rect::new(100.0, 50.0, 500.0, 450.0));

        let hit = tree.hit_test(root, Point::new(920.0, 70.0)).unwrap();
        assert_eq!(hit.view, view);
        assert_eq!(hit.local, Point::new(20.0, 20.0));

        // Starting below the output converts through the same origin.
        let from_ws = tree.hit_test(ws, Point::new(920.0, 70.0)).unwrap();
        assert_eq!(from_ws, hit);
    }

    #[test]
    fn split_children_tested_by_rectangle() {
        let (mut tree, _, ws) = single_output(800.0, 600.0);
        tree.set_layout(ws, Layout::HorizontalSplit);
        let left = tree.create_view(ws, Opaque(1));
        let right = tree.create_view(left, Opaque(2));
        tree.set_geometry(left, Rect::new(0.0, 0.0, 400.0, 600.0));
        tree.set_geometry(right, Rect::new(400.0, 0.0, 800.0, 600.0));

        let root = tree.root();
        assert_eq!(tree.hit_test(root, Point::new(100.0, 100.0)).unwrap().view, left);
        let hit = tree.hit_test(root, Point::new(500.0, 100.0)).unwrap();
        assert_eq!(hit.view, right);
        assert_eq!(hit.local, Point::new(100.0, 100.0));
    }

    #[test]
    fn stacked_tests_only_active_child() {
        let (mut tree, _, ws) = single_output(800.0, 600.0);
        let con = tree.create_container();
        tree.add_child(ws, con);
        tree.set_geometry(con, Rect::new(0.0, 0.0, 800.0, 600.0));
        tree.set_layout(con, Layout::Stacked);
        let a = tree.create_node(NodeKind::View);
        tree.add_child(con, a);
        let b = tree.create_view(a, Opaque(2));
        let full = Rect::new(0.0, 20.0, 800.0, 600.0);
        tree.set_geometry(a, full);
        tree.set_geometry(b, full);

        // `a` is active by default and has no resource, so nothing is hit.
        let root = tree.root();
        assert_eq!(tree.hit_test(root, Point::new(50.0, 50.0)), None);
        tree.set_active_child(con, b);
        assert_eq!(tree.hit_test(root, Point::new(50.0, 50.0)).unwrap().view, b);
    }

    #[test]
    fn floating_prefers_topmost() {
        let (mut tree, _, ws) = single_output(800.0, 600.0);
        tree.set_layout(ws, Layout::Floating);
        let below = tree.create_view(ws, Opaque(1));
        let above = tree.create_view(below, Opaque(2));
        tree.set_geometry(below, Rect::new(0.0, 0.0, 300.0, 300.0));
        tree.set_geometry(above, Rect::new(100.0, 100.0, 400.0, 400.0));

        let root = tree.root();
        let overlap = Point::new(150.0, 150.0);
        assert_eq!(tree.hit_test(root, overlap).unwrap().view, above);
        tree.raise(below);
        let hit = tree.hit_test(root, overlap).unwrap();
        assert_eq!(hit.view, below);
        assert_eq!(hit.local, Point::new(150.0, 150.0));
    }

    #[test]
    fn transparent_view_blocks_siblings() {
        let (mut tree, _, ws) = single_output(800.0, 600.0);
        tree.set_layout(ws, Layout::Floating);
        let below = tree.create_view(ws, Opaque(1));
        let above = tree.create_view(below, Transparent);
        let rect = Rect::new(0.0, 0.0, 800.0, 600.0);
        tree.set_geometry(below, rect);
        tree.set_geometry(above, rect);
        assert_eq!(tree.hit_test(tree.root(), Point::new(5.0, 5.0)), None);
    }

    #[test]
    fn only_active_workspace_is_tested() {
        let (mut tree, output, ws1) = single_output(800.0, 600.0);
        let ws2 = tree.create_workspace(output, "2").unwrap();
        let v1 = tree.create_view(ws1, Opaque(1));
        let v2 = tree.create_view(ws2, Opaque(2));
        let full = Rect::new(0.0, 0.0, 800.0, 600.0);
        tree.set_geometry(v1, full);
        tree.set_geometry(v2, full);

        let root = tree.root();
        assert_eq!(tree.hit_test(root, Point::new(1.0, 1.0)).unwrap().view, v1);
        tree.set_active_child(output, ws2);
        assert_eq!(tree.hit_test(root, Point::new(1.0, 1.0)).unwrap().view, v2);
    }

    #[test]
    fn output_without_workspaces_misses() {
        let mut tree = NodeTree::new();
        let output = tree.create_node(NodeKind::Output);
        let root = tree.root();
        tree.add_child(root, output);
        tree.set_geometry(output, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(tree.hit_test(root, Point::new(1.0, 1.0)), None);
    }
}
