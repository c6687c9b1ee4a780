// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and property management.

use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{INVALID, ListenerId, NodeId};
use super::kind::{Layout, NodeKind};
use super::payload::{OutputState, Payload, RootState, ViewState};
use super::signal::{DestroyEvent, ReparentEvent, Signal};
use super::traverse::Children;
use crate::config::{TreeConfig, WorkspaceNamePolicy};
use crate::dirty;
use crate::error::TreeError;
use crate::resource::{OutputResource, ViewResource};
use crate::trace::{
    LayoutChangedEvent, NodeAttachedEvent, NodeCreatedEvent, NodeDestroyedEvent,
    NodeDetachedEvent, TraceSink, Tracer,
};

/// Struct-of-arrays storage for the whole window tree.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Destroyed nodes are recycled via a free list,
/// and generation counters make stale handles fail loudly.
///
/// The root node is created with the tree and lives as long as it does.
#[derive(Debug)]
pub struct NodeTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) last_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,
    pub(crate) active_child: Vec<u32>,

    // -- Node data --
    pub(crate) kind: Vec<NodeKind>,
    pub(crate) serial: Vec<u64>,
    pub(crate) name: Vec<Option<String>>,
    pub(crate) layout: Vec<Layout>,
    pub(crate) prev_layout: Vec<Layout>,
    pub(crate) workspace_layout: Vec<Layout>,
    pub(crate) rect: Vec<Rect>,
    pub(crate) marks: Vec<BTreeSet<String>>,
    pub(crate) payload: Vec<Option<Payload>>,

    // -- Notifications --
    pub(crate) on_destroy: Vec<Signal<DestroyEvent>>,
    pub(crate) on_reparent: Vec<Signal<ReparentEvent>>,
    next_listener: u64,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) live: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
    next_serial: u64,
    root: NodeId,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<NodeId>,
    pub(crate) pending_removed: Vec<u64>,

    config: TreeConfig,
    tracer: Tracer,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    /// Creates a tree holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TreeConfig::new())
    }

    /// Creates a tree holding only the root node, with the given configuration.
    #[must_use]
    pub fn with_config(config: TreeConfig) -> Self {
        let mut tree = Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            last_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            active_child: Vec::new(),
            kind: Vec::new(),
            serial: Vec::new(),
            name: Vec::new(),
            layout: Vec::new(),
            prev_layout: Vec::new(),
            workspace_layout: Vec::new(),
            rect: Vec::new(),
            marks: Vec::new(),
            payload: Vec::new(),
            on_destroy: Vec::new(),
            on_reparent: Vec::new(),
            next_listener: 0,
            generation: Vec::new(),
            live: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            next_serial: 1,
            root: NodeId {
                idx: INVALID,
                generation: 0,
            },
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            config,
            tracer: Tracer::default(),
        };
        tree.root = tree.alloc(
            NodeKind::Root,
            Some(Payload::Root(RootState::default())),
        );
        tree
    }

    /// Returns the configuration the tree was created with.
    #[must_use]
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Installs a trace sink, returning the previous one.
    ///
    /// Without the `trace` feature the sink is dropped immediately.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) -> Option<Box<dyn TraceSink>> {
        self.tracer.set(Some(sink))
    }

    /// Removes and returns the installed trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.tracer.set(None)
    }

    // -- Factory API --

    /// Creates a detached node of the given kind with no payload.
    ///
    /// Outputs and views created this way carry no external resource: they
    /// cannot be closed and views never report a hit. Prefer
    /// [`create_output`](Self::create_output) and
    /// [`create_view`](Self::create_view).
    ///
    /// # Panics
    ///
    /// Panics if `kind` is [`NodeKind::Root`]; the root is a singleton.
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        assert!(kind != NodeKind::Root, "the root node is a singleton");
        self.alloc(kind, None)
    }

    /// Creates an output node for `resource` and attaches it under the root.
    ///
    /// Outputs are not ordered among themselves; the new one is appended.
    pub fn create_output(&mut self, resource: impl OutputResource + 'static) -> NodeId {
        let geometry = resource.geometry();
        let name = resource.name().map(ToString::to_string);
        let id = self.alloc(
            NodeKind::Output,
            Some(Payload::Output(OutputState {
                resource: Box::new(resource),
            })),
        );
        self.name[id.idx as usize] = name;
        self.rect[id.idx as usize] = geometry;
        self.attach(self.root.idx, id.idx, INVALID);
        id
    }

    /// Creates a workspace called `name` under `output`.
    ///
    /// Workspaces under an output are kept sorted by name (byte-wise
    /// comparison). The new workspace covers the whole output.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::WorkspaceNameTaken`] if the output already has a
    /// workspace with this name and the tree is configured with
    /// [`WorkspaceNamePolicy::Reject`].
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `output` is not an output.
    pub fn create_workspace(&mut self, output: NodeId, name: &str) -> Result<NodeId, TreeError> {
        self.validate(output);
        assert!(
            self.kind[output.idx as usize] == NodeKind::Output,
            "workspaces can only be created under an output"
        );
        self.check_workspace_name(output.idx, name, INVALID)?;

        let id = self.alloc(NodeKind::Workspace, None);
        let ws = id.idx as usize;
        self.name[ws] = Some(name.to_string());
        self.rect[ws] = Rect::from_origin_size(Point::ORIGIN, self.rect[output.idx as usize].size());
        self.attach(output.idx, id.idx, INVALID);
        Ok(id)
    }

    /// Creates a detached container node.
    ///
    /// Attach it with [`add_child`](Self::add_child),
    /// [`insert_child`](Self::insert_child), [`add_sibling`](Self::add_sibling)
    /// or [`reparent`](Self::reparent).
    pub fn create_container(&mut self) -> NodeId {
        self.alloc(NodeKind::Container, None)
    }

    /// Creates a view node for `resource`, placed right after `sibling`.
    ///
    /// Views are kept in insertion order. If `sibling` is itself a workspace
    /// (typically an empty one) the view becomes its last child instead.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, or if `sibling` is neither a workspace
    /// nor a node whose parent is a workspace or container.
    pub fn create_view(&mut self, sibling: NodeId, resource: impl ViewResource + 'static) -> NodeId {
        self.validate(sibling);
        let s = sibling.idx;
        let (parent, before) = if self.kind[s as usize] == NodeKind::Workspace {
            (s, INVALID)
        } else {
            (self.parent[s as usize], self.next_sibling[s as usize])
        };
        assert!(
            parent != INVALID
                && matches!(
                    self.kind[parent as usize],
                    NodeKind::Workspace | NodeKind::Container
                ),
            "views must be created next to a node inside a workspace or container"
        );

        let title = resource.title().map(ToString::to_string);
        let id = self.alloc(
            NodeKind::View,
            Some(Payload::View(ViewState {
                resource: Box::new(resource),
            })),
        );
        self.name[id.idx as usize] = title;
        self.attach(parent, id.idx, before);
        id
    }

    // -- Lifecycle API --

    /// Destroys `node` and everything below it.
    ///
    /// The node is detached first, then its destroy listeners run, then each
    /// child is destroyed the same way (pre-order), and finally the slots are
    /// released. Destroy does not fire reparent notifications.
    ///
    /// Returns the former parent so the caller can re-arrange it.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale (including destroying twice) or if
    /// `node` is the root.
    pub fn destroy(&mut self, node: NodeId) -> Option<NodeId> {
        self.validate(node);
        assert!(node != self.root, "cannot destroy the root node");
        let idx = node.idx;
        let parent = self.parent[idx as usize];
        if parent != INVALID {
            self.detach(idx);
        }
        self.destroy_detached(idx, parent);
        self.handle_or_none(parent)
    }

    /// Asks the external resource behind `node` to close.
    ///
    /// The node stays in the tree; call [`destroy`](Self::destroy) once the
    /// resource confirms it has gone away.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotClosable`] for roots, workspaces, containers,
    /// and outputs or views created without a resource.
    pub fn close(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.validate(node);
        let idx = node.idx as usize;
        match &mut self.payload[idx] {
            Some(Payload::Output(output)) => {
                output.resource.close();
                Ok(())
            }
            Some(Payload::View(view)) => {
                view.resource.close();
                Ok(())
            }
            Some(Payload::Root(_)) | None => Err(TreeError::NotClosable(self.kind[idx])),
        }
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        id.idx < self.len
            && self.live[id.idx as usize]
            && self.generation[id.idx as usize] == id.generation
    }

    /// Returns the number of live nodes, including the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Topology API --

    /// Appends `child` to `parent`'s children.
    ///
    /// Workspaces attached under an output are placed by name instead.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, `child` already has a parent,
    /// `parent`'s kind may not contain `child`'s kind, or the move would
    /// create a cycle. Also panics when a workspace would join an output
    /// that already has one with the same name and the tree rejects
    /// duplicates.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        self.attach(parent.idx, child.idx, INVALID);
    }

    /// Inserts `child` at position `index` among `parent`'s children.
    ///
    /// An `index` past the end appends. Workspaces attached under an output
    /// are placed by name instead.
    ///
    /// # Panics
    ///
    /// Same conditions as [`add_child`](Self::add_child).
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        let before = self.nth_child(parent.idx, index);
        self.attach(parent.idx, child.idx, before);
    }

    /// Inserts `child` immediately after `sibling`, under the same parent.
    ///
    /// # Panics
    ///
    /// Panics if `sibling` is detached, plus the conditions of
    /// [`add_child`](Self::add_child).
    pub fn add_sibling(&mut self, sibling: NodeId, child: NodeId) {
        self.validate(sibling);
        self.validate(child);
        let parent = self.parent[sibling.idx as usize];
        assert!(parent != INVALID, "sibling has no parent");
        self.attach(parent, child.idx, self.next_sibling[sibling.idx as usize]);
    }

    /// Detaches `child` from its parent, returning the former parent.
    ///
    /// Returns `None` (and does nothing) if `child` was already detached.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_child(&mut self, child: NodeId) -> Option<NodeId> {
        self.validate(child);
        let c = child.idx;
        let old = self.parent[c as usize];
        if old == INVALID {
            return None;
        }
        self.detach(c);
        self.fire_reparent(c, old, INVALID);
        self.handle_or_none(old)
    }

    /// Moves `child` to the end of `new_parent`'s children.
    ///
    /// Fires a single reparent notification carrying the previous parent.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, `new_parent`'s kind may not contain
    /// `child`'s kind, the move would create a cycle, or a workspace would
    /// collide with a same-named sibling on its new output.
    pub fn reparent(&mut self, child: NodeId, new_parent: NodeId) {
        self.validate(child);
        self.validate(new_parent);
        let c = child.idx;
        let p = new_parent.idx;
        self.assert_may_attach(p, c, true);

        let old = self.parent[c as usize];
        if old != INVALID {
            self.detach(c);
        }
        self.link_checked(p, c, INVALID);
        self.fire_reparent(c, old, p);
    }

    /// Moves `child` to the end of its sibling list, the top of the
    /// stacking order used when hit-testing floating layouts.
    ///
    /// Workspaces under an output are ordered by name, so raising one does
    /// nothing.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `child` is detached.
    pub fn raise(&mut self, child: NodeId) {
        self.validate(child);
        let c = child.idx;
        let p = self.parent[c as usize];
        assert!(p != INVALID, "node has no parent");
        if self.last_child[p as usize] == c || self.keeps_sorted(p, c) {
            return;
        }
        self.unlink_raw(c);
        self.link_raw(p, c, INVALID);
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.handle_or_none(self.parent[id.idx as usize])
    }

    /// Returns an iterator over the direct children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(
            self,
            self.first_child[id.idx as usize],
            self.last_child[id.idx as usize],
        )
    }

    /// Returns the number of direct children of a node.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Returns the position of `id` among its siblings, if attached.
    #[must_use]
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        self.validate(id);
        if self.parent[id.idx as usize] == INVALID {
            return None;
        }
        Some(self.sibling_position(id.idx))
    }

    /// Selects which child of an output, stacked or tabbed node is visible.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale or `child` is not a child of `parent`.
    pub fn set_active_child(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        assert!(
            self.parent[child.idx as usize] == parent.idx,
            "active child must be a child of the node"
        );
        self.active_child[parent.idx as usize] = child.idx;
        self.dirty.mark(parent.idx, dirty::TOPOLOGY);
    }

    /// Returns the visible child of a node.
    ///
    /// Falls back to the first child when none was selected, or when the
    /// selected one has since been detached.
    #[must_use]
    pub fn active_child(&self, parent: NodeId) -> Option<NodeId> {
        self.validate(parent);
        self.handle_or_none(self.active_child_idx(parent.idx))
    }

    // -- Property getters --

    /// Returns the kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.validate(id);
        self.kind[id.idx as usize]
    }

    /// Returns the serial id of a node, unique for the lifetime of the tree.
    #[must_use]
    pub fn id(&self, id: NodeId) -> u64 {
        self.validate(id);
        self.serial[id.idx as usize]
    }

    /// Resolves a serial id back to a live handle.
    #[must_use]
    pub fn find_by_id(&self, serial: u64) -> Option<NodeId> {
        (0..self.len)
            .find(|&idx| self.live[idx as usize] && self.serial[idx as usize] == serial)
            .map(|idx| self.handle(idx))
    }

    /// Returns the display name of a node.
    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.validate(id);
        self.name[id.idx as usize].as_deref()
    }

    /// Returns the layout of a node.
    #[must_use]
    pub fn layout(&self, id: NodeId) -> Layout {
        self.validate(id);
        self.layout[id.idx as usize]
    }

    /// Returns the layout the node had before the last [`set_layout`](Self::set_layout).
    #[must_use]
    pub fn previous_layout(&self, id: NodeId) -> Layout {
        self.validate(id);
        self.prev_layout[id.idx as usize]
    }

    /// Returns the default layout for new containers on a workspace.
    #[must_use]
    pub fn workspace_layout(&self, id: NodeId) -> Layout {
        self.validate(id);
        self.workspace_layout[id.idx as usize]
    }

    /// Returns the rectangle of a node, excluding borders and gaps.
    ///
    /// Outputs are positioned in layout space. Every other kind is positioned
    /// relative to its output. The root's rectangle has no meaning; see
    /// [`RootState::bounds`] instead.
    #[must_use]
    pub fn geometry(&self, id: NodeId) -> Rect {
        self.validate(id);
        self.rect[id.idx as usize]
    }

    /// Returns the origin of [`geometry`](Self::geometry).
    #[must_use]
    pub fn position(&self, id: NodeId) -> Point {
        self.geometry(id).origin()
    }

    /// Returns the size of [`geometry`](Self::geometry).
    #[must_use]
    pub fn size(&self, id: NodeId) -> Size {
        self.geometry(id).size()
    }

    /// Returns the kind-specific payload, if the node has one.
    #[must_use]
    pub fn payload(&self, id: NodeId) -> Option<&Payload> {
        self.validate(id);
        self.payload[id.idx as usize].as_ref()
    }

    /// Returns the root state.
    #[must_use]
    pub fn root_state(&self) -> &RootState {
        match &self.payload[self.root.idx as usize] {
            Some(Payload::Root(state)) => state,
            _ => unreachable!("the root node always carries root state"),
        }
    }

    /// Returns the output resource behind an output node.
    #[must_use]
    pub fn output_resource(&self, id: NodeId) -> Option<&dyn OutputResource> {
        match self.payload(id)? {
            Payload::Output(output) => Some(output.resource()),
            Payload::Root(_) | Payload::View(_) => None,
        }
    }

    /// Returns the view resource behind a view node.
    #[must_use]
    pub fn view_resource(&self, id: NodeId) -> Option<&dyn ViewResource> {
        match self.payload(id)? {
            Payload::View(view) => Some(view.resource()),
            Payload::Root(_) | Payload::Output(_) => None,
        }
    }

    /// Returns the marks on a node, in sorted order.
    pub fn marks(&self, id: NodeId) -> impl Iterator<Item = &str> + '_ {
        self.validate(id);
        self.marks[id.idx as usize].iter().map(String::as_str)
    }

    /// Returns whether a node carries `mark`.
    #[must_use]
    pub fn has_mark(&self, id: NodeId, mark: &str) -> bool {
        self.validate(id);
        self.marks[id.idx as usize].contains(mark)
    }

    // -- Mutation API (auto-marks dirty) --

    /// Replaces the layout of a node, remembering the old one as the
    /// previous layout.
    ///
    /// Does not re-arrange anything; drain [`take_changes`](Self::take_changes)
    /// to find nodes needing arrangement. Returns `id` for chaining.
    pub fn set_layout(&mut self, id: NodeId, layout: Layout) -> NodeId {
        self.validate(id);
        let idx = id.idx as usize;
        let previous = self.layout[idx];
        self.prev_layout[idx] = previous;
        self.layout[idx] = layout;
        self.dirty.mark(id.idx, dirty::LAYOUT);
        self.tracer.layout_changed(&LayoutChangedEvent {
            id: self.serial[idx],
            previous,
            layout,
            workspace_default: false,
        });
        id
    }

    /// Sets the default layout for new containers on a workspace.
    ///
    /// Returns `id` for chaining.
    pub fn set_workspace_layout(&mut self, id: NodeId, layout: Layout) -> NodeId {
        self.validate(id);
        let idx = id.idx as usize;
        let previous = core::mem::replace(&mut self.workspace_layout[idx], layout);
        self.dirty.mark(id.idx, dirty::LAYOUT);
        self.tracer.layout_changed(&LayoutChangedEvent {
            id: self.serial[idx],
            previous,
            layout,
            workspace_default: true,
        });
        id
    }

    /// Sets the display name of a node.
    ///
    /// Renaming an attached workspace moves it to keep its output's
    /// workspaces sorted.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::WorkspaceNameTaken`] when renaming a workspace to
    /// a name used by a sibling and the tree rejects duplicates.
    pub fn set_name(&mut self, id: NodeId, name: Option<&str>) -> Result<(), TreeError> {
        self.validate(id);
        let idx = id.idx;
        let parent = self.parent[idx as usize];
        let sorted = self.keeps_sorted(parent, idx);
        if sorted {
            self.check_workspace_name(parent, name.unwrap_or(""), idx)?;
        }
        self.name[idx as usize] = name.map(ToString::to_string);
        if sorted {
            self.unlink_raw(idx);
            let before = self.sorted_position(parent, idx);
            self.link_raw(parent, idx, before);
            self.dirty.mark(parent, dirty::TOPOLOGY);
        }
        Ok(())
    }

    /// Sets the rectangle of a node.
    ///
    /// Marks the GEOMETRY channel dirty with eager propagation to descendants.
    pub fn set_geometry(&mut self, id: NodeId, rect: Rect) {
        self.validate(id);
        self.rect[id.idx as usize] = rect;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
        if self.kind[id.idx as usize] == NodeKind::Output {
            self.update_root_bounds();
        }
    }

    /// Re-reads an output's rectangle from its resource.
    ///
    /// Does nothing for outputs created without a resource.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `output` is not an output.
    pub fn refresh_output_geometry(&mut self, output: NodeId) {
        self.validate(output);
        assert!(
            self.kind[output.idx as usize] == NodeKind::Output,
            "only outputs have resource geometry"
        );
        let geometry = match &self.payload[output.idx as usize] {
            Some(Payload::Output(state)) => state.resource.geometry(),
            _ => return,
        };
        self.set_geometry(output, geometry);
    }

    /// Adds a mark. Returns `false` if the node already had it.
    pub fn add_mark(&mut self, id: NodeId, mark: &str) -> bool {
        self.validate(id);
        let added = self.marks[id.idx as usize].insert(mark.to_string());
        if added {
            self.dirty.mark(id.idx, dirty::MARKS);
        }
        added
    }

    /// Removes a mark. Returns `false` if the node did not have it.
    pub fn remove_mark(&mut self, id: NodeId, mark: &str) -> bool {
        self.validate(id);
        let removed = self.marks[id.idx as usize].remove(mark);
        if removed {
            self.dirty.mark(id.idx, dirty::MARKS);
        }
        removed
    }

    // -- Notification API --

    /// Registers a listener for `node`'s destroy notification.
    pub fn on_destroy(
        &mut self,
        node: NodeId,
        listener: impl FnMut(&DestroyEvent) + 'static,
    ) -> ListenerId {
        self.validate(node);
        let lid = self.next_listener_id();
        self.on_destroy[node.idx as usize].add(lid, Box::new(listener));
        lid
    }

    /// Registers a listener for `node`'s reparent notification.
    pub fn on_reparent(
        &mut self,
        node: NodeId,
        listener: impl FnMut(&ReparentEvent) + 'static,
    ) -> ListenerId {
        self.validate(node);
        let lid = self.next_listener_id();
        self.on_reparent[node.idx as usize].add(lid, Box::new(listener));
        lid
    }

    /// Unregisters a destroy or reparent listener from `node`.
    ///
    /// Returns `false` if no such listener was registered, including when the
    /// node is already gone.
    pub fn remove_listener(&mut self, node: NodeId, listener: ListenerId) -> bool {
        if !self.is_alive(node) {
            return false;
        }
        let idx = node.idx as usize;
        self.on_destroy[idx].remove(listener) || self.on_reparent[idx].remove(listener)
    }

    /// Returns how many listeners are registered on `node`.
    #[must_use]
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.validate(node);
        let idx = node.idx as usize;
        self.on_destroy[idx].len() + self.on_reparent[idx].len()
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            self.is_alive(id),
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Returns a handle for a live slot.
    pub(crate) fn handle(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    pub(crate) fn handle_or_none(&self, idx: u32) -> Option<NodeId> {
        (idx != INVALID).then(|| self.handle(idx))
    }

    pub(crate) fn active_child_idx(&self, idx: u32) -> u32 {
        match self.active_child[idx as usize] {
            INVALID => self.first_child[idx as usize],
            active => active,
        }
    }

    fn next_listener_id(&mut self) -> ListenerId {
        let lid = ListenerId(self.next_listener);
        self.next_listener += 1;
        lid
    }

    /// Allocates a detached node.
    fn alloc(&mut self, kind: NodeKind, payload: Option<Payload>) -> NodeId {
        let serial = self.next_serial;
        self.next_serial += 1;

        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot. Its generation was bumped on release.
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.last_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.active_child[i] = INVALID;
            self.kind[i] = kind;
            self.serial[i] = serial;
            self.name[i] = None;
            self.layout[i] = Layout::None;
            self.prev_layout[i] = Layout::None;
            self.workspace_layout[i] = Layout::None;
            self.rect[i] = Rect::ZERO;
            self.marks[i].clear();
            self.payload[i] = payload;
            self.live[i] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.last_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.active_child.push(INVALID);
            self.kind.push(kind);
            self.serial.push(serial);
            self.name.push(None);
            self.layout.push(Layout::None);
            self.prev_layout.push(Layout::None);
            self.workspace_layout.push(Layout::None);
            self.rect.push(Rect::ZERO);
            self.marks.push(BTreeSet::new());
            self.payload.push(payload);
            self.on_destroy.push(Signal::default());
            self.on_reparent.push(Signal::default());
            self.generation.push(0);
            self.live.push(true);
            idx
        };

        let id = self.handle(idx);
        self.pending_added.push(id);
        self.tracer.node_created(&NodeCreatedEvent { id: serial, kind });
        id
    }

    /// Fires destroy listeners for a detached node, destroys its children,
    /// then releases its slot.
    fn destroy_detached(&mut self, idx: u32, former_parent: u32) {
        let event = DestroyEvent {
            node: self.handle(idx),
            id: self.serial[idx as usize],
            kind: self.kind[idx as usize],
            parent: self.handle_or_none(former_parent),
        };
        // Listeners are discarded once they have run.
        let mut listeners = core::mem::take(&mut self.on_destroy[idx as usize]);
        listeners.emit(&event);
        drop(listeners);
        self.on_reparent[idx as usize].clear();

        while self.first_child[idx as usize] != INVALID {
            let child = self.first_child[idx as usize];
            self.detach(child);
            self.destroy_detached(child, idx);
        }

        self.release(idx);
    }

    /// Frees a detached, childless slot.
    fn release(&mut self, idx: u32) {
        let i = idx as usize;
        let serial = self.serial[i];
        let kind = self.kind[i];

        // Drops the external resource, if any.
        self.payload[i] = None;
        self.name[i] = None;
        self.marks[i].clear();
        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[i] += 1;
        self.live[i] = false;
        self.free_list.push(idx);
        self.pending_removed.push(serial);
        self.tracer
            .node_destroyed(&NodeDestroyedEvent { id: serial, kind });
    }

    /// Checks kind ordering, acyclicity and the workspace naming policy
    /// before linking `child` under `parent`.
    fn assert_may_attach(&self, parent: u32, child: u32, allow_attached: bool) {
        assert!(
            allow_attached || self.parent[child as usize] == INVALID,
            "child already has a parent"
        );
        let (pk, ck) = (self.kind[parent as usize], self.kind[child as usize]);
        assert!(pk.may_contain(ck), "a {pk} node cannot contain a {ck} node");
        let mut cursor = parent;
        while cursor != INVALID {
            assert!(cursor != child, "attaching would create a cycle");
            cursor = self.parent[cursor as usize];
        }
        if self.keeps_sorted(parent, child) {
            assert!(
                self.check_workspace_name(parent, self.sort_key(child), child)
                    .is_ok(),
                "workspace name already taken on this output"
            );
        }
    }

    /// Links a detached `child` under `parent` before `before` (or at the
    /// end when `before` is [`INVALID`]) and fires the reparent notification.
    fn attach(&mut self, parent: u32, child: u32, before: u32) {
        self.assert_may_attach(parent, child, false);
        self.link_checked(parent, child, before);
        self.fire_reparent(child, INVALID, parent);
    }

    /// Links an already validated `child`, adding dirty edges and tracing.
    fn link_checked(&mut self, parent: u32, child: u32, before: u32) {
        let before = if self.keeps_sorted(parent, child) {
            self.sorted_position(parent, child)
        } else {
            before
        };
        self.link_raw(parent, child, before);

        // Child rectangles follow their ancestors.
        let _ = self.dirty.add_dependency(child, parent, dirty::GEOMETRY);
        self.dirty.mark_with(child, dirty::GEOMETRY, &EagerPolicy);
        self.dirty.mark(parent, dirty::TOPOLOGY);
        if parent == self.root.idx {
            self.update_root_bounds();
        }

        self.tracer.node_attached(&NodeAttachedEvent {
            id: self.serial[child as usize],
            kind: self.kind[child as usize],
            parent: self.serial[parent as usize],
            index: self.sibling_position(child),
        });
    }

    /// Unlinks `idx` from its parent, removing dirty edges and tracing.
    ///
    /// Does not fire notifications.
    fn detach(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        if self.active_child[p as usize] == idx {
            self.active_child[p as usize] = INVALID;
        }
        self.unlink_raw(idx);

        self.dirty.remove_dependency(idx, p, dirty::GEOMETRY);
        self.dirty.mark(p, dirty::TOPOLOGY);
        if p == self.root.idx {
            self.update_root_bounds();
        }

        self.tracer.node_detached(&NodeDetachedEvent {
            id: self.serial[idx as usize],
            kind: self.kind[idx as usize],
            parent: self.serial[p as usize],
        });
    }

    fn fire_reparent(&mut self, idx: u32, old_parent: u32, new_parent: u32) {
        let event = ReparentEvent {
            node: self.handle(idx),
            id: self.serial[idx as usize],
            old_parent: self.handle_or_none(old_parent),
            new_parent: self.handle_or_none(new_parent),
        };
        self.on_reparent[idx as usize].emit(&event);
    }

    /// Inserts `c` into `p`'s child list before `before`, or last.
    fn link_raw(&mut self, p: u32, c: u32, before: u32) {
        self.parent[c as usize] = p;
        if before == INVALID {
            let last = self.last_child[p as usize];
            self.prev_sibling[c as usize] = last;
            self.next_sibling[c as usize] = INVALID;
            if last == INVALID {
                self.first_child[p as usize] = c;
            } else {
                self.next_sibling[last as usize] = c;
            }
            self.last_child[p as usize] = c;
        } else {
            debug_assert!(
                self.parent[before as usize] == p,
                "insertion point must be a child of the parent"
            );
            let prev = self.prev_sibling[before as usize];
            self.prev_sibling[c as usize] = prev;
            self.next_sibling[c as usize] = before;
            if prev == INVALID {
                self.first_child[p as usize] = c;
            } else {
                self.next_sibling[prev as usize] = c;
            }
            self.prev_sibling[before as usize] = c;
        }
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_raw(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        } else {
            // Was last child.
            self.last_child[p as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    fn nth_child(&self, parent: u32, index: usize) -> u32 {
        let mut cursor = self.first_child[parent as usize];
        for _ in 0..index {
            if cursor == INVALID {
                break;
            }
            cursor = self.next_sibling[cursor as usize];
        }
        cursor
    }

    fn sibling_position(&self, idx: u32) -> usize {
        let mut position = 0;
        let mut cursor = self.prev_sibling[idx as usize];
        while cursor != INVALID {
            position += 1;
            cursor = self.prev_sibling[cursor as usize];
        }
        position
    }

    /// Whether `child` must be kept name-sorted under `parent`.
    fn keeps_sorted(&self, parent: u32, child: u32) -> bool {
        parent != INVALID
            && self.kind[parent as usize] == NodeKind::Output
            && self.kind[child as usize] == NodeKind::Workspace
    }

    fn sort_key(&self, idx: u32) -> &str {
        self.name[idx as usize].as_deref().unwrap_or("")
    }

    /// Returns the first child of `parent` whose name sorts after `child`'s.
    ///
    /// Equal names keep insertion order.
    fn sorted_position(&self, parent: u32, child: u32) -> u32 {
        let key = self.sort_key(child);
        let mut cursor = self.first_child[parent as usize];
        while cursor != INVALID && self.sort_key(cursor) <= key {
            cursor = self.next_sibling[cursor as usize];
        }
        cursor
    }

    /// Applies the workspace naming policy to `name` under `output`,
    /// ignoring `except` (the workspace being renamed).
    fn check_workspace_name(&self, output: u32, name: &str, except: u32) -> Result<(), TreeError> {
        if self.config.workspace_names == WorkspaceNamePolicy::AllowDuplicate {
            return Ok(());
        }
        let mut cursor = self.first_child[output as usize];
        while cursor != INVALID {
            if cursor != except && self.sort_key(cursor) == name {
                return Err(TreeError::WorkspaceNameTaken {
                    name: name.to_string(),
                });
            }
            cursor = self.next_sibling[cursor as usize];
        }
        Ok(())
    }

    fn update_root_bounds(&mut self) {
        let root = self.root.idx;
        let mut bounds: Option<Rect> = None;
        let mut cursor = self.first_child[root as usize];
        while cursor != INVALID {
            let rect = self.rect[cursor as usize];
            bounds = Some(bounds.map_or(rect, |b| b.union(rect)));
            cursor = self.next_sibling[cursor as usize];
        }
        if let Some(Payload::Root(state)) = &mut self.payload[root as usize] {
            state.bounds = bounds.unwrap_or(Rect::ZERO);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    use super::*;
    use crate::resource::{SurfaceHit, SurfaceId};

    struct TestOutput {
        rect: Rect,
        closed: Rc<RefCell<bool>>,
    }

    impl TestOutput {
        fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
            Self {
                rect: Rect::new(x, y, x + w, y + h),
                closed: Rc::new(RefCell::new(false)),
            }
        }
    }

    impl OutputResource for TestOutput {
        fn geometry(&self) -> Rect {
            self.rect
        }

        fn name(&self) -> Option<&str> {
            Some("TEST-1")
        }

        fn close(&mut self) {
            *self.closed.borrow_mut() = true;
        }
    }

    struct TestView {
        closed: Rc<RefCell<bool>>,
    }

    impl TestView {
        fn new() -> Self {
            Self {
                closed: Rc::new(RefCell::new(false)),
            }
        }
    }

    impl ViewResource for TestView {
        fn surface_at(&self, point: Point) -> Option<SurfaceHit> {
            Some(SurfaceHit {
                surface: SurfaceId(1),
                local: point,
            })
        }

        fn title(&self) -> Option<&str> {
            Some("term")
        }

        fn close(&mut self) {
            *self.closed.borrow_mut() = true;
        }
    }

    fn names(tree: &NodeTree, parent: NodeId) -> Vec<&str> {
        tree.children(parent)
            .map(|c| tree.name(c).unwrap_or(""))
            .collect()
    }

    /// Root -> output -> workspace "1".
    fn desktop() -> (NodeTree, NodeId, NodeId) {
        let mut tree = NodeTree::new();
        let output = tree.create_output(TestOutput::new(0.0, 0.0, 800.0, 600.0));
        let ws = tree.create_workspace(output, "1").unwrap();
        (tree, output, ws)
    }

    #[test]
    fn new_tree_has_only_root() {
        let tree = NodeTree::new();
        let root = tree.root();
        assert_eq!(tree.kind(root), NodeKind::Root);
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.node_count(), 1);
        assert!(matches!(tree.payload(root), Some(Payload::Root(_))));
    }

    #[test]
    fn create_node_is_detached_and_empty() {
        let mut tree = NodeTree::new();
        let c = tree.create_node(NodeKind::Container);
        assert_eq!(tree.parent(c), None);
        assert_eq!(tree.child_count(c), 0);
        assert_eq!(tree.marks(c).count(), 0);
        assert!(tree.payload(c).is_none());
        assert_eq!(tree.layout(c), Layout::None);
    }

    #[test]
    #[should_panic(expected = "the root node is a singleton")]
    fn create_second_root_panics() {
        let mut tree = NodeTree::new();
        let _ = tree.create_node(NodeKind::Root);
    }

    #[test]
    fn serial_ids_are_never_reused() {
        let mut tree = NodeTree::new();
        let a = tree.create_container();
        let id_a = tree.id(a);
        tree.destroy(a);
        let b = tree.create_container();
        // Same slot, new generation, new serial.
        assert_eq!(a.idx, b.idx);
        assert_ne!(a.generation, b.generation);
        assert!(tree.id(b) > id_a);
        assert!(!tree.is_alive(a));
        assert_eq!(tree.find_by_id(id_a), None);
        assert_eq!(tree.find_by_id(tree.id(b)), Some(b));
    }

    #[test]
    fn create_output_attaches_under_root() {
        let mut tree = NodeTree::new();
        let a = tree.create_output(TestOutput::new(0.0, 0.0, 800.0, 600.0));
        let b = tree.create_output(TestOutput::new(800.0, 0.0, 1024.0, 768.0));
        let kids: Vec<_> = tree.children(tree.root()).collect();
        assert_eq!(kids, vec![a, b]);
        assert_eq!(tree.name(a), Some("TEST-1"));
        assert_eq!(tree.geometry(b), Rect::new(800.0, 0.0, 1824.0, 768.0));
        assert_eq!(
            tree.root_state().bounds,
            Rect::new(0.0, 0.0, 1824.0, 768.0)
        );
        tree.destroy(b);
        assert_eq!(tree.root_state().bounds, Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn workspaces_are_sorted_by_name() {
        let (mut tree, output, _) = desktop();
        tree.create_workspace(output, "beta").unwrap();
        tree.create_workspace(output, "alpha").unwrap();
        tree.create_workspace(output, "10").unwrap();
        assert_eq!(names(&tree, output), vec!["1", "10", "alpha", "beta"]);
    }

    #[test]
    fn workspace_covers_output() {
        let mut tree = NodeTree::new();
        let output = tree.create_output(TestOutput::new(1920.0, 0.0, 1280.0, 1024.0));
        let ws = tree.create_workspace(output, "web").unwrap();
        assert_eq!(tree.geometry(ws), Rect::new(0.0, 0.0, 1280.0, 1024.0));
    }

    #[test]
    fn duplicate_workspace_name_is_rejected_by_default() {
        let (mut tree, output, _) = desktop();
        let err = tree.create_workspace(output, "1").unwrap_err();
        assert_eq!(
            err,
            TreeError::WorkspaceNameTaken {
                name: "1".to_string()
            }
        );
        assert_eq!(tree.child_count(output), 1);
    }

    #[test]
    fn duplicate_workspace_name_allowed_by_config() {
        let config = TreeConfig::new().with_workspace_names(WorkspaceNamePolicy::AllowDuplicate);
        let mut tree = NodeTree::with_config(config);
        let output = tree.create_output(TestOutput::new(0.0, 0.0, 800.0, 600.0));
        let first = tree.create_workspace(output, "a").unwrap();
        let second = tree.create_workspace(output, "a").unwrap();
        let kids: Vec<_> = tree.children(output).collect();
        assert_eq!(kids, vec![first, second], "equal names keep insertion order");
    }

    #[test]
    fn renaming_workspace_resorts() {
        let (mut tree, output, one) = desktop();
        tree.create_workspace(output, "2").unwrap();
        tree.set_name(one, Some("3")).unwrap();
        assert_eq!(names(&tree, output), vec!["2", "3"]);
        let err = tree.set_name(one, Some("2")).unwrap_err();
        assert!(matches!(err, TreeError::WorkspaceNameTaken { .. }));
        assert_eq!(tree.name(one), Some("3"));
    }

    #[test]
    fn create_view_inserts_after_sibling() {
        let (mut tree, _, ws) = desktop();
        let a = tree.create_view(ws, TestView::new());
        let c = tree.create_view(a, TestView::new());
        let b = tree.create_view(a, TestView::new());
        let kids: Vec<_> = tree.children(ws).collect();
        assert_eq!(kids, vec![a, b, c]);
        assert_eq!(tree.name(a), Some("term"));
    }

    #[test]
    #[should_panic(expected = "views must be created next to a node inside a workspace or container")]
    fn create_view_next_to_output_panics() {
        let (mut tree, output, _) = desktop();
        let _ = tree.create_view(output, TestView::new());
    }

    #[test]
    fn container_attach_and_reparent() {
        let (mut tree, _, ws) = desktop();
        let view = tree.create_view(ws, TestView::new());
        let con = tree.create_container();
        tree.add_child(ws, con);
        tree.reparent(view, con);
        assert_eq!(tree.parent(view), Some(con));
        let kids: Vec<_> = tree.children(ws).collect();
        assert_eq!(kids, vec![con]);
    }

    #[test]
    fn insert_child_and_add_sibling_positions() {
        let (mut tree, _, ws) = desktop();
        let a = tree.create_container();
        let b = tree.create_container();
        let c = tree.create_container();
        let d = tree.create_container();
        tree.add_child(ws, a);
        tree.insert_child(ws, 0, b);
        tree.add_sibling(b, c);
        tree.insert_child(ws, 99, d);
        let kids: Vec<_> = tree.children(ws).collect();
        assert_eq!(kids, vec![b, c, a, d]);
        assert_eq!(tree.index_in_parent(a), Some(2));
    }

    #[test]
    fn containers_nest() {
        let (mut tree, _, ws) = desktop();
        let outer = tree.create_container();
        let inner = tree.create_container();
        tree.add_child(ws, outer);
        tree.add_child(outer, inner);
        assert_eq!(tree.parent(inner), Some(outer));
    }

    #[test]
    #[should_panic(expected = "a workspace node cannot contain a output node")]
    fn kind_ordering_is_enforced() {
        let (mut tree, _, ws) = desktop();
        let output = tree.create_node(NodeKind::Output);
        tree.add_child(ws, output);
    }

    #[test]
    #[should_panic(expected = "attaching would create a cycle")]
    fn reparent_into_descendant_panics() {
        let (mut tree, _, ws) = desktop();
        let outer = tree.create_container();
        let inner = tree.create_container();
        tree.add_child(ws, outer);
        tree.add_child(outer, inner);
        tree.reparent(outer, inner);
    }

    #[test]
    #[should_panic(expected = "child already has a parent")]
    fn add_attached_child_panics() {
        let (mut tree, _, ws) = desktop();
        let con = tree.create_container();
        tree.add_child(ws, con);
        tree.add_child(ws, con);
    }

    #[test]
    fn remove_child_returns_old_parent() {
        let (mut tree, _, ws) = desktop();
        let con = tree.create_container();
        tree.add_child(ws, con);
        assert_eq!(tree.remove_child(con), Some(ws));
        assert_eq!(tree.parent(con), None);
        assert_eq!(tree.child_count(ws), 0);
        assert_eq!(tree.remove_child(con), None);
    }

    #[test]
    fn set_layout_remembers_previous() {
        let (mut tree, _, ws) = desktop();
        let con = tree.create_container();
        let same = tree.set_layout(con, Layout::HorizontalSplit);
        assert_eq!(same, con);
        tree.set_layout(con, Layout::Tabbed);
        assert_eq!(tree.layout(con), Layout::Tabbed);
        assert_eq!(tree.previous_layout(con), Layout::HorizontalSplit);

        tree.set_workspace_layout(ws, Layout::Stacked);
        assert_eq!(tree.workspace_layout(ws), Layout::Stacked);
    }

    #[test]
    fn marks_behave_as_a_set() {
        let mut tree = NodeTree::new();
        let con = tree.create_container();
        assert!(tree.add_mark(con, "b"));
        assert!(tree.add_mark(con, "a"));
        assert!(!tree.add_mark(con, "a"));
        assert_eq!(tree.marks(con).collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(tree.has_mark(con, "b"));
        assert!(tree.remove_mark(con, "b"));
        assert!(!tree.remove_mark(con, "b"));
        assert!(!tree.has_mark(con, "b"));
    }

    #[test]
    fn destroy_is_recursive_and_returns_parent() {
        let (mut tree, _, ws) = desktop();
        let con = tree.create_container();
        tree.add_child(ws, con);
        let view = tree.create_view(ws, TestView::new());
        tree.reparent(view, con);
        let before = tree.node_count();

        assert_eq!(tree.destroy(con), Some(ws));
        assert!(!tree.is_alive(con));
        assert!(!tree.is_alive(view));
        assert_eq!(tree.child_count(ws), 0);
        assert_eq!(tree.node_count(), before - 2);
    }

    #[test]
    fn destroy_fires_after_detach_in_registration_order() {
        let (mut tree, _, ws) = desktop();
        let con = tree.create_container();
        tree.add_child(ws, con);
        let log: Rc<RefCell<Vec<(u32, Option<NodeId>)>>> = Rc::new(RefCell::new(Vec::new()));
        for tag in [1, 2] {
            let log = Rc::clone(&log);
            tree.on_destroy(con, move |e| log.borrow_mut().push((tag, e.parent)));
        }
        tree.destroy(con);
        assert_eq!(*log.borrow(), vec![(1, Some(ws)), (2, Some(ws))]);
    }

    #[test]
    fn destroy_notifies_children_with_their_parent() {
        let (mut tree, _, ws) = desktop();
        let con = tree.create_container();
        tree.add_child(ws, con);
        let view = tree.create_view(ws, TestView::new());
        tree.reparent(view, con);

        let order = Rc::new(RefCell::new(Vec::new()));
        for node in [con, view] {
            let order = Rc::clone(&order);
            tree.on_destroy(node, move |e| order.borrow_mut().push((e.node, e.parent)));
        }
        tree.destroy(con);
        assert_eq!(*order.borrow(), vec![(con, Some(ws)), (view, Some(con))]);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn double_destroy_panics() {
        let mut tree = NodeTree::new();
        let con = tree.create_container();
        tree.destroy(con);
        tree.destroy(con);
    }

    #[test]
    #[should_panic(expected = "cannot destroy the root node")]
    fn destroy_root_panics() {
        let mut tree = NodeTree::new();
        let root = tree.root();
        tree.destroy(root);
    }

    #[test]
    fn reparent_events_carry_previous_parent() {
        let (mut tree, _, ws) = desktop();
        let a = tree.create_container();
        let b = tree.create_container();
        tree.add_child(ws, a);
        tree.add_child(ws, b);
        let view = tree.create_view(ws, TestView::new());

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        tree.on_reparent(view, move |e| {
            sink.borrow_mut().push((e.old_parent, e.new_parent));
        });
        tree.reparent(view, a);
        tree.reparent(view, b);
        tree.remove_child(view);
        tree.add_child(a, view);
        assert_eq!(
            *events.borrow(),
            vec![
                (Some(ws), Some(a)),
                (Some(a), Some(b)),
                (Some(b), None),
                (None, Some(a)),
            ]
        );
    }

    #[test]
    fn removed_listener_stops_firing() {
        let (mut tree, _, ws) = desktop();
        let con = tree.create_container();
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        let lid = tree.on_reparent(con, move |_| *h.borrow_mut() += 1);
        tree.add_child(ws, con);
        assert!(tree.remove_listener(con, lid));
        tree.remove_child(con);
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(tree.listener_count(con), 0);
    }

    #[test]
    fn listener_lists_are_dropped_with_node() {
        let mut tree = NodeTree::new();
        let con = tree.create_container();
        let lid = tree.on_destroy(con, |_| {});
        tree.destroy(con);
        assert!(!tree.remove_listener(con, lid));
        let reused = tree.create_container();
        assert_eq!(tree.listener_count(reused), 0);
    }

    #[test]
    fn close_reaches_resources() {
        let mut tree = NodeTree::new();
        let out = TestOutput::new(0.0, 0.0, 10.0, 10.0);
        let out_closed = Rc::clone(&out.closed);
        let output = tree.create_output(out);
        let ws = tree.create_workspace(output, "1").unwrap();
        let view = TestView::new();
        let view_closed = Rc::clone(&view.closed);
        let view = tree.create_view(ws, view);

        tree.close(view).unwrap();
        assert!(*view_closed.borrow());
        assert!(tree.is_alive(view), "close does not remove the node");
        tree.close(output).unwrap();
        assert!(*out_closed.borrow());
        assert_eq!(tree.close(ws), Err(TreeError::NotClosable(NodeKind::Workspace)));
        let root = tree.root();
        assert_eq!(tree.close(root), Err(TreeError::NotClosable(NodeKind::Root)));
    }

    #[test]
    fn active_child_defaults_to_first_and_resets_on_detach() {
        let (mut tree, _, ws) = desktop();
        let con = tree.create_container();
        tree.add_child(ws, con);
        assert_eq!(tree.active_child(ws), Some(con));
        let a = tree.create_view(ws, TestView::new());
        tree.reparent(a, con);
        let b = tree.create_view(a, TestView::new());
        assert_eq!(tree.active_child(con), Some(a));
        tree.set_active_child(con, b);
        assert_eq!(tree.active_child(con), Some(b));
        tree.remove_child(b);
        assert_eq!(tree.active_child(con), Some(a));
    }

    #[test]
    fn raise_moves_to_top_and_keeps_active() {
        let (mut tree, _, ws) = desktop();
        let a = tree.create_view(ws, TestView::new());
        let b = tree.create_view(a, TestView::new());
        tree.set_active_child(ws, a);
        tree.raise(a);
        let kids: Vec<_> = tree.children(ws).collect();
        assert_eq!(kids, vec![b, a]);
        assert_eq!(tree.active_child(ws), Some(a));
    }

    #[test]
    fn raising_a_workspace_keeps_name_order() {
        let (mut tree, output, ws) = desktop();
        tree.create_workspace(output, "2").unwrap();
        tree.raise(ws);
        assert_eq!(names(&tree, output), vec!["1", "2"]);
    }

    #[test]
    #[should_panic(expected = "workspace name already taken on this output")]
    fn reparent_workspace_onto_same_name_panics() {
        let (mut tree, output, _) = desktop();
        let other = tree.create_output(TestOutput::new(800.0, 0.0, 800.0, 600.0));
        let dup = tree.create_workspace(other, "1").unwrap();
        tree.reparent(dup, output);
    }

    #[test]
    #[should_panic(expected = "workspace name already taken on this output")]
    fn add_detached_workspace_with_taken_name_panics() {
        let (mut tree, output, _) = desktop();
        let other = tree.create_output(TestOutput::new(800.0, 0.0, 800.0, 600.0));
        let ws = tree.create_workspace(other, "1").unwrap();
        tree.remove_child(ws);
        tree.add_child(output, ws);
    }

    #[test]
    fn moved_workspaces_land_in_name_order() {
        let (mut tree, output, _) = desktop();
        let other = tree.create_output(TestOutput::new(800.0, 0.0, 800.0, 600.0));
        let zero = tree.create_workspace(other, "0").unwrap();
        let three = tree.create_workspace(other, "3").unwrap();
        let two = tree.create_workspace(other, "2").unwrap();

        tree.reparent(three, output);
        tree.remove_child(zero);
        tree.insert_child(output, 2, zero);
        tree.remove_child(two);
        tree.add_child(output, two);
        assert_eq!(names(&tree, output), vec!["0", "1", "2", "3"]);
        assert_eq!(tree.child_count(other), 0);

        // Moving within the same output keeps its own name.
        tree.reparent(two, output);
        assert_eq!(names(&tree, output), vec!["0", "1", "2", "3"]);
    }

    #[test]
    fn duplicate_workspace_moves_allowed_by_config() {
        let config = TreeConfig::new().with_workspace_names(WorkspaceNamePolicy::AllowDuplicate);
        let mut tree = NodeTree::with_config(config);
        let left = tree.create_output(TestOutput::new(0.0, 0.0, 800.0, 600.0));
        let right = tree.create_output(TestOutput::new(800.0, 0.0, 800.0, 600.0));
        tree.create_workspace(left, "1").unwrap();
        let moved = tree.create_workspace(right, "1").unwrap();
        tree.reparent(moved, left);
        assert_eq!(names(&tree, left), vec!["1", "1"]);
    }

    #[test]
    fn refresh_output_geometry_rereads_resource() {
        let mut tree = NodeTree::new();
        let output = tree.create_output(TestOutput::new(0.0, 0.0, 100.0, 100.0));
        tree.set_geometry(output, Rect::new(5.0, 5.0, 6.0, 6.0));
        tree.refresh_output_geometry(output);
        assert_eq!(tree.geometry(output), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(tree.position(output), Point::ORIGIN);
        assert_eq!(tree.size(output), Size::new(100.0, 100.0));
    }

    #[test]
    fn resources_are_reachable_by_kind() {
        let (mut tree, output, ws) = desktop();
        let view = tree.create_view(ws, TestView::new());
        assert!(tree.output_resource(output).is_some());
        assert!(tree.view_resource(output).is_none());
        assert_eq!(tree.view_resource(view).and_then(|v| v.title()), Some("term"));
        assert!(tree.output_resource(ws).is_none());
    }
}
