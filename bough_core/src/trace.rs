// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for tree mutations.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! tree calls as it creates, attaches, detaches and destroys nodes and as it
//! changes layouts. All method bodies default to no-ops, so implementing only
//! the events you care about is fine.
//!
//! A sink is installed with
//! [`NodeTree::set_trace_sink`](crate::node::NodeTree::set_trace_sink) and
//! held by an internal [`Tracer`]. When the `trace` feature is **off**, every
//! `Tracer` method compiles to nothing and installed sinks are dropped. When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Unlike the per-node notification channels in [`node`](crate::node), trace
//! events carry only serial ids and plain values, never handles, so sinks can
//! log or record them without touching the tree.

use alloc::boxed::Box;

use crate::node::{Layout, NodeKind};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a node is allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeCreatedEvent {
    /// Serial id of the new node.
    pub id: u64,
    /// Kind of the new node.
    pub kind: NodeKind,
}

/// Emitted after a node is linked under a parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeAttachedEvent {
    /// Serial id of the attached node.
    pub id: u64,
    /// Kind of the attached node.
    pub kind: NodeKind,
    /// Serial id of the new parent.
    pub parent: u64,
    /// Position among the parent's children.
    pub index: usize,
}

/// Emitted after a node is unlinked from its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeDetachedEvent {
    /// Serial id of the detached node.
    pub id: u64,
    /// Kind of the detached node.
    pub kind: NodeKind,
    /// Serial id of the former parent.
    pub parent: u64,
}

/// Emitted once a node's slot has been released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeDestroyedEvent {
    /// Serial id of the destroyed node.
    pub id: u64,
    /// Kind of the destroyed node.
    pub kind: NodeKind,
}

/// Emitted when a node's layout (or workspace layout) is replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutChangedEvent {
    /// Serial id of the node.
    pub id: u64,
    /// Layout before the change.
    pub previous: Layout,
    /// Layout after the change.
    pub layout: Layout,
    /// Whether this was the workspace default layout rather than the node's own.
    pub workspace_default: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from a [`NodeTree`](crate::node::NodeTree).
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a node is created.
    fn on_node_created(&mut self, e: &NodeCreatedEvent) {
        _ = e;
    }

    /// Called when a node is attached to a parent.
    fn on_node_attached(&mut self, e: &NodeAttachedEvent) {
        _ = e;
    }

    /// Called when a node is detached from its parent.
    fn on_node_detached(&mut self, e: &NodeDetachedEvent) {
        _ = e;
    }

    /// Called when a node has been destroyed.
    fn on_node_destroyed(&mut self, e: &NodeDestroyedEvent) {
        _ = e;
    }

    /// Called when a layout changes.
    fn on_layout_changed(&mut self, e: &LayoutChangedEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Owning wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
#[derive(Default)]
pub(crate) struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Tracer {
    /// Replaces the sink, returning the previous one.
    pub(crate) fn set(&mut self, sink: Option<Box<dyn TraceSink>>) -> Option<Box<dyn TraceSink>> {
        #[cfg(feature = "trace")]
        {
            core::mem::replace(&mut self.sink, sink)
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            None
        }
    }

    #[inline]
    pub(crate) fn node_created(&mut self, e: &NodeCreatedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_node_created(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    #[inline]
    pub(crate) fn node_attached(&mut self, e: &NodeAttachedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_node_attached(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    #[inline]
    pub(crate) fn node_detached(&mut self, e: &NodeDetachedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_node_detached(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    #[inline]
    pub(crate) fn node_destroyed(&mut self, e: &NodeDestroyedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_node_destroyed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    #[inline]
    pub(crate) fn layout_changed(&mut self, e: &LayoutChangedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layout_changed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
