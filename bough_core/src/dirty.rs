// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The tree does not arrange anything itself. Instead it records, per
//! channel, which nodes an arranger (or renderer) has to revisit, using
//! multi-channel dirty tracking from [`understory_dirty`].
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`GEOMETRY`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) over child-to-parent
//!   dependency edges. Moving or resizing a node invalidates every
//!   descendant, since their rectangles are expressed in the same output
//!   space and are usually derived from the ancestor's.
//!
//! - **Local-only**: [`LAYOUT`] and [`MARKS`] are marked with the default
//!   policy. Only the node whose arrangement policy or marks changed appears
//!   in the drain output.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on the *parent* whenever its
//!   child list changes (attach, detach, reorder, destroy).
//!
//! # Consumption
//!
//! Callers never query dirty state directly. Each
//! [`NodeTree::take_changes`](crate::node::NodeTree::take_changes) call
//! drains all channels into a [`TreeChanges`](crate::node::TreeChanges).

use understory_dirty::Channel;

/// Arrangement policy changed. No propagation.
pub const LAYOUT: Channel = Channel::new(0);

/// Rectangle changed. Propagates to descendants.
pub const GEOMETRY: Channel = Channel::new(1);

/// Child list changed. Marked on the parent, no propagation.
pub const TOPOLOGY: Channel = Channel::new(2);

/// Marks changed. No propagation.
pub const MARKS: Channel = Channel::new(3);
