// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree configuration.

/// What [`NodeTree::create_workspace`](crate::node::NodeTree::create_workspace)
/// does when the requested name already exists on the same output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WorkspaceNamePolicy {
    /// Refuse with [`TreeError::WorkspaceNameTaken`](crate::TreeError::WorkspaceNameTaken).
    #[default]
    Reject,
    /// Insert after the last workspace with an equal name.
    AllowDuplicate,
}

/// Configuration for a [`NodeTree`](crate::node::NodeTree).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeConfig {
    /// Policy for colliding workspace names.
    pub workspace_names: WorkspaceNamePolicy,
}

impl TreeConfig {
    /// Default configuration: duplicate workspace names are rejected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            workspace_names: WorkspaceNamePolicy::Reject,
        }
    }

    /// Returns this configuration with a different workspace naming policy.
    #[must_use]
    pub const fn with_workspace_names(mut self, policy: WorkspaceNamePolicy) -> Self {
        self.workspace_names = policy;
        self
    }
}
