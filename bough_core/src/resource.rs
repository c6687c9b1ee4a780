// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contracts for the external objects that back outputs and views.
//!
//! The tree never talks to a display server directly. Output nodes wrap an
//! [`OutputResource`] supplied by whatever manages physical displays, and
//! view nodes wrap a [`ViewResource`] supplied by the window/surface
//! implementation. Both are asked to close through
//! [`NodeTree::close`](crate::node::NodeTree::close); the tree only removes
//! the node once the caller confirms with
//! [`NodeTree::destroy`](crate::node::NodeTree::destroy).

use core::fmt;

use kurbo::{Point, Rect};

/// An opaque reference to a client surface.
///
/// Surfaces are owned by the view implementation. Core passes them through
/// without interpreting the value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SurfaceId(pub u32);

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({})", self.0)
    }
}

/// A surface found under a point, with the point in that surface's space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    /// The surface that accepts input at the point.
    pub surface: SurfaceId,
    /// The point in surface-local coordinates.
    pub local: Point,
}

/// A physical display backing an output node.
pub trait OutputResource {
    /// Returns the output's rectangle in layout space.
    fn geometry(&self) -> Rect;

    /// Returns the connector or model name, if known.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Asks the output to begin shutting down.
    fn close(&mut self);
}

/// A client window backing a view node.
pub trait ViewResource {
    /// Returns the surface at `point`, given in view-local coordinates.
    ///
    /// Returning `None` means the view is transparent to input there.
    fn surface_at(&self, point: Point) -> Option<SurfaceHit>;

    /// Returns the window title, if any.
    fn title(&self) -> Option<&str> {
        None
    }

    /// Asks the client to close the window.
    fn close(&mut self);
}
