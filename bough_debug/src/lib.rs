// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and introspection for bough diagnostics.
//!
//! This crate provides development tooling on top of
//! [`bough_core`]:
//!
//! - [`pretty::PrettyPrintSink`]: a [`TraceSink`](bough_core::trace::TraceSink)
//!   writing one human-readable line per tree mutation.
//! - [`pretty::write_tree`]: an indented one-line-per-node dump of a subtree.
//! - [`json::snapshot`]: a nested JSON description of a subtree, in the
//!   shape IPC `get_tree` style clients expect.

pub mod json;
pub mod pretty;
