// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window and scene tree for a tiling compositor.
//!
//! `bough_core` holds the structural backbone a compositor's other
//! subsystems read and mutate: one root spanning every display, an output
//! per physical display, named workspaces on each output, nestable
//! containers, and views for client windows. It is `no_std` compatible
//! (with `alloc`) and uses struct-of-arrays storage with generational
//! handles.
//!
//! # Architecture
//!
//! ```text
//!   commands / hotplug / client events
//!       │
//!       ▼
//!   NodeTree mutation ──► destroy / reparent listeners
//!       │
//!       ▼
//!   NodeTree::take_changes() ──► TreeChanges ──► arranger, renderer
//!
//!   input events ──► NodeTree::hit_test() ──► Hit { view, surface, local }
//! ```
//!
//! **[`node`]**: The tree itself, with factories, attach/detach, destroy,
//! traversal, search and hit-testing, plus per-node notifications.
//!
//! **[`resource`]**: The [`OutputResource`](resource::OutputResource) and
//! [`ViewResource`](resource::ViewResource) traits through which displays
//! and client windows plug into the tree.
//!
//! **[`dirty`]**: Multi-channel dirty tracking via `understory_dirty`.
//! GEOMETRY propagates to descendants; LAYOUT and MARKS are local-only;
//! TOPOLOGY marks the parent whose children changed.
//!
//! **[`config`]**: [`TreeConfig`](config::TreeConfig) and the workspace
//! naming policy.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types
//! for mutation instrumentation.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables trace dispatch (one branch per
//!   call site). Without it, installed sinks are dropped.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod dirty;
mod error;
pub mod node;
pub mod resource;
pub mod trace;

pub use error::TreeError;
