// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window tree data model.
//!
//! A *node* is one element of the display hierarchy. Each node has:
//!
//! - An identity: a [`NodeId`] handle that becomes stale when the node is
//!   destroyed, plus a serial [`id`](NodeTree::id) that is never reused and
//!   is what introspection shows to users.
//! - A [`NodeKind`], fixed at creation. Kinds are strictly ordered
//!   (root, output, workspace, container, view) and a node may only be
//!   attached under a kind that [may contain](NodeKind::may_contain) it.
//! - Topology: parent, first/last child, and sibling links forming an
//!   ordered tree. Workspaces under an output stay sorted by name; every
//!   other child list keeps insertion order.
//! - Properties set by the caller: [`name`](NodeTree::set_name),
//!   [`layout`](NodeTree::set_layout),
//!   [`geometry`](NodeTree::set_geometry) and
//!   [`marks`](NodeTree::add_mark).
//! - An optional [`Payload`] holding the external resource behind outputs
//!   and views.
//! - Two notification channels, *destroy* and *reparent*.
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles.
//!
//! # Dirty tracking
//!
//! Mutations mark dirty channels (see [`dirty`](crate::dirty)) and
//! [`take_changes`](NodeTree::take_changes) reports them:
//!
//! - **GEOMETRY** propagates to all descendants.
//! - **LAYOUT** / **MARKS** are local-only.
//! - **TOPOLOGY** is marked on the parent whose child list changed.

mod changes;
mod hit;
mod id;
mod kind;
mod payload;
mod signal;
mod store;
mod traverse;

pub use changes::TreeChanges;
pub use hit::Hit;
pub use id::{INVALID, ListenerId, NodeId};
pub use kind::{Layout, NodeKind};
pub use payload::{OutputState, Payload, RootState, ViewState};
pub use signal::{DestroyEvent, ReparentEvent};
pub use store::NodeTree;
pub use traverse::{Ancestors, Children, Descendants};
