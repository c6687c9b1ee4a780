// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recoverable tree errors.
//!
//! Only conditions a caller can reasonably hit at runtime are reported here.
//! Contract violations (stale handles, kind-ordering violations, cycles) panic
//! instead.

use alloc::string::String;
use core::fmt;

use crate::node::NodeKind;

/// Errors from [`NodeTree`](crate::node::NodeTree) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// A workspace with this name already exists on the output.
    WorkspaceNameTaken {
        /// The requested name.
        name: String,
    },
    /// The node has no external resource that could be closed.
    NotClosable(NodeKind),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WorkspaceNameTaken { name } => {
                write!(f, "workspace name {name:?} is already in use on this output")
            }
            Self::NotClosable(kind) => write!(f, "{kind} nodes cannot be closed"),
        }
    }
}

impl core::error::Error for TreeError {}
