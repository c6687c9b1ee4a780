// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory stand-ins for displays and client windows.

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::cell::Cell;

use bough_core::resource::{OutputResource, SurfaceHit, SurfaceId, ViewResource};
use kurbo::{Point, Rect};

/// A shared flag flipped when a stub's `close` is called.
///
/// Clone it before handing the stub to the tree to observe the call later.
#[derive(Clone, Debug, Default)]
pub struct CloseFlag(Rc<Cell<bool>>);

impl CloseFlag {
    /// Returns whether `close` was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.0.get()
    }

    fn set(&self) {
        self.0.set(true);
    }
}

/// An [`OutputResource`] with fixed geometry.
#[derive(Debug)]
pub struct StubOutput {
    geometry: Rc<Cell<Rect>>,
    name: Option<String>,
    closed: CloseFlag,
}

impl StubOutput {
    /// Creates an output at `(x, y)` in layout space.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            geometry: Rc::new(Cell::new(Rect::new(x, y, x + width, y + height))),
            name: None,
            closed: CloseFlag::default(),
        }
    }

    /// Sets the connector name reported to the tree.
    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Returns the flag set when the tree closes this output.
    #[must_use]
    pub fn close_flag(&self) -> CloseFlag {
        self.closed.clone()
    }

    /// Returns a handle that changes the reported geometry, as a mode change
    /// would. Call [`NodeTree::refresh_output_geometry`] afterwards.
    ///
    /// [`NodeTree::refresh_output_geometry`]: bough_core::node::NodeTree::refresh_output_geometry
    #[must_use]
    pub fn geometry_handle(&self) -> Rc<Cell<Rect>> {
        Rc::clone(&self.geometry)
    }
}

impl OutputResource for StubOutput {
    fn geometry(&self) -> Rect {
        self.geometry.get()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn close(&mut self) {
        self.closed.set();
    }
}

/// A [`ViewResource`] with a single surface.
///
/// By default the surface accepts input everywhere. An input region (in
/// view-local coordinates) narrows that; points outside it pass through.
#[derive(Debug)]
pub struct StubView {
    surface: SurfaceId,
    input: Option<Rect>,
    title: Option<String>,
    closed: CloseFlag,
}

impl StubView {
    /// Creates an opaque view with the given surface id.
    #[must_use]
    pub fn new(surface: u32) -> Self {
        Self {
            surface: SurfaceId(surface),
            input: None,
            title: None,
            closed: CloseFlag::default(),
        }
    }

    /// Creates a view that never accepts input.
    #[must_use]
    pub fn transparent(surface: u32) -> Self {
        Self::new(surface).with_input_region(Rect::ZERO)
    }

    /// Restricts input to `region`, in view-local coordinates.
    #[must_use]
    pub fn with_input_region(mut self, region: Rect) -> Self {
        self.input = Some(region);
        self
    }

    /// Sets the title reported to the tree.
    #[must_use]
    pub fn titled(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Returns the flag set when the tree closes this view.
    #[must_use]
    pub fn close_flag(&self) -> CloseFlag {
        self.closed.clone()
    }
}

impl ViewResource for StubView {
    fn surface_at(&self, point: Point) -> Option<SurfaceHit> {
        if self.input.is_some_and(|region| !region.contains(point)) {
            return None;
        }
        Some(SurfaceHit {
            surface: self.surface,
            local: point,
        })
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn close(&mut self) {
        self.closed.set();
    }
}
