// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node kinds and arrangement policies.

use core::fmt;

/// The fixed category of a node.
///
/// Variants are declared in hierarchy order. A node may only be the child of
/// a node whose kind sorts before its own, with one exception: containers may
/// nest inside other containers. See [`may_contain`](Self::may_contain).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    /// The whole display. Exactly one per tree.
    Root,
    /// A physical display.
    Output,
    /// A logical desktop on an output.
    Workspace,
    /// A grouping/split node.
    Container,
    /// A leaf window.
    View,
}

impl NodeKind {
    /// All kinds, in hierarchy order.
    pub const ALL: [Self; 5] = [
        Self::Root,
        Self::Output,
        Self::Workspace,
        Self::Container,
        Self::View,
    ];

    /// Returns a short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Output => "output",
            Self::Workspace => "workspace",
            Self::Container => "container",
            Self::View => "view",
        }
    }

    /// Returns whether a node of this kind may directly hold a `child` kind.
    ///
    /// Root only holds outputs and outputs only hold workspaces. Workspaces
    /// hold containers and views; containers hold containers and views.
    #[must_use]
    pub const fn may_contain(self, child: Self) -> bool {
        match self {
            Self::Root => matches!(child, Self::Output),
            Self::Output => matches!(child, Self::Workspace),
            Self::Workspace | Self::Container => matches!(child, Self::Container | Self::View),
            Self::View => false,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a node arranges its children.
///
/// The tree only stores this value. Computing child geometry from it is the
/// arranger's job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Layout {
    /// No arrangement policy.
    #[default]
    None,
    /// Children side by side, left to right.
    HorizontalSplit,
    /// Children stacked top to bottom.
    VerticalSplit,
    /// One visible child with a title bar per child.
    Stacked,
    /// One visible child with a tab bar.
    Tabbed,
    /// Freely positioned, possibly overlapping children.
    Floating,
}

impl Layout {
    /// Returns a short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::HorizontalSplit => "splith",
            Self::VerticalSplit => "splitv",
            Self::Stacked => "stacked",
            Self::Tabbed => "tabbed",
            Self::Floating => "floating",
        }
    }

    /// Returns whether this is a horizontal or vertical split.
    #[must_use]
    pub const fn is_split(self) -> bool {
        matches!(self, Self::HorizontalSplit | Self::VerticalSplit)
    }

    /// Returns whether only one child is visible at a time.
    #[must_use]
    pub const fn shows_single_child(self) -> bool {
        matches!(self, Self::Stacked | Self::Tabbed)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
