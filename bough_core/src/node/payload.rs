// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kind-specific node state.

use alloc::boxed::Box;
use core::fmt;

use kurbo::Rect;

use super::kind::NodeKind;
use crate::resource::{OutputResource, ViewResource};

/// State carried only by the root node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RootState {
    /// Union of all attached output rectangles, in layout space.
    ///
    /// Zero-sized when no outputs are attached.
    pub bounds: Rect,
}

/// State carried only by output nodes.
pub struct OutputState {
    pub(crate) resource: Box<dyn OutputResource>,
}

impl OutputState {
    /// Returns the wrapped output.
    #[must_use]
    pub fn resource(&self) -> &dyn OutputResource {
        &*self.resource
    }
}

impl fmt::Debug for OutputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputState")
            .field("geometry", &self.resource.geometry())
            .field("name", &self.resource.name())
            .finish_non_exhaustive()
    }
}

/// State carried only by view nodes.
pub struct ViewState {
    pub(crate) resource: Box<dyn ViewResource>,
}

impl ViewState {
    /// Returns the wrapped view.
    #[must_use]
    pub fn resource(&self) -> &dyn ViewResource {
        &*self.resource
    }
}

impl fmt::Debug for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewState")
            .field("title", &self.resource.title())
            .finish_non_exhaustive()
    }
}

/// Kind-specific payload.
///
/// Workspaces and containers carry no payload.
#[derive(Debug)]
pub enum Payload {
    /// Payload of the [`Root`](NodeKind::Root) node.
    Root(RootState),
    /// Payload of an [`Output`](NodeKind::Output) node.
    Output(OutputState),
    /// Payload of a [`View`](NodeKind::View) node.
    View(ViewState),
}

impl Payload {
    /// Returns the node kind this payload belongs to.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Root(_) => NodeKind::Root,
            Self::Output(_) => NodeKind::Output,
            Self::View(_) => NodeKind::View,
        }
    }
}
