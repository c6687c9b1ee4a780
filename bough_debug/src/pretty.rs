// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output and tree dumps.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).
//! [`write_tree`] prints the current state of a subtree, one node per line.

use std::io::{self, Write};

use bough_core::node::{Layout, NodeId, NodeKind, NodeTree};
use bough_core::trace::{
    LayoutChangedEvent, NodeAttachedEvent, NodeCreatedEvent, NodeDestroyedEvent,
    NodeDetachedEvent, TraceSink,
};
use kurbo::Rect;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink, returning the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_node_created(&mut self, e: &NodeCreatedEvent) {
        let _ = writeln!(self.writer, "[create] {} #{}", e.kind, e.id);
    }

    fn on_node_attached(&mut self, e: &NodeAttachedEvent) {
        let _ = writeln!(
            self.writer,
            "[attach] {} #{} -> #{} at {}",
            e.kind, e.id, e.parent, e.index,
        );
    }

    fn on_node_detached(&mut self, e: &NodeDetachedEvent) {
        let _ = writeln!(
            self.writer,
            "[detach] {} #{} from #{}",
            e.kind, e.id, e.parent,
        );
    }

    fn on_node_destroyed(&mut self, e: &NodeDestroyedEvent) {
        let _ = writeln!(self.writer, "[destroy] {} #{}", e.kind, e.id);
    }

    fn on_layout_changed(&mut self, e: &LayoutChangedEvent) {
        let which = if e.workspace_default {
            "workspace_layout"
        } else {
            "layout"
        };
        let _ = writeln!(
            self.writer,
            "[{which}] #{} {} -> {}",
            e.id, e.previous, e.layout,
        );
    }
}

/// Writes an indented dump of `node` and its descendants, one line each.
///
/// Each line shows the kind, serial id, name, layout (when set), rectangle
/// and marks. The root shows the bounds of all outputs instead of its own
/// rectangle.
pub fn write_tree(tree: &NodeTree, node: NodeId, writer: &mut dyn Write) -> io::Result<()> {
    write_node(tree, node, 0, writer)
}

fn write_node(tree: &NodeTree, node: NodeId, depth: usize, writer: &mut dyn Write) -> io::Result<()> {
    let kind = tree.kind(node);
    write!(writer, "{:indent$}{kind} #{}", "", tree.id(node), indent = depth * 2)?;
    if let Some(name) = tree.name(node) {
        write!(writer, " {name:?}")?;
    }
    let layout = tree.layout(node);
    if layout != Layout::None {
        write!(writer, " [{layout}]")?;
    }
    let rect = if kind == NodeKind::Root {
        tree.root_state().bounds
    } else {
        tree.geometry(node)
    };
    write!(writer, " {}", format_rect(rect))?;
    let marks: Vec<&str> = tree.marks(node).collect();
    if !marks.is_empty() {
        write!(writer, " marks={}", marks.join(","))?;
    }
    writeln!(writer)?;

    for child in tree.children(node) {
        write_node(tree, child, depth + 1, writer)?;
    }
    Ok(())
}

fn format_rect(rect: Rect) -> String {
    format!(
        "{},{} {}x{}",
        rect.x0,
        rect.y0,
        rect.width(),
        rect.height()
    )
}
