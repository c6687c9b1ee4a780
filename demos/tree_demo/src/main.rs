// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated compositor session that exercises the tree and its diagnostics.
//!
//! Plugs in two outputs, maps a handful of views across workspaces, changes
//! layouts, routes a few pointer positions through hit-testing, then
//! unplugs an output. Every mutation is traced through a
//! [`PrettyPrintSink`](bough_debug::pretty::PrettyPrintSink) on stdout and
//! the final tree is written to `tree.json`.

use std::fs::File;
use std::io::BufWriter;

use bough_core::node::{Layout, NodeKind, NodeTree};
use bough_debug::json::write_snapshot;
use bough_debug::pretty::{PrettyPrintSink, write_tree};
use bough_harness::{EventLog, StubOutput, StubView, check_attached};
use kurbo::{Point, Rect};

fn main() {
    let mut tree = NodeTree::new();
    tree.set_trace_sink(Box::new(PrettyPrintSink::new(Box::new(std::io::stdout()))));
    let log = EventLog::new();

    // -- hotplug ---------------------------------------------------------
    let left = tree.create_output(StubOutput::new(0.0, 0.0, 1920.0, 1080.0).named("DP-1"));
    let right = tree.create_output(StubOutput::new(1920.0, 0.0, 1280.0, 1024.0).named("HDMI-A-1"));
    let code = tree
        .create_workspace(left, "2:code")
        .expect("fresh output has no workspaces");
    let web = tree
        .create_workspace(left, "1:web")
        .expect("names are distinct");
    let chat = tree
        .create_workspace(right, "3:chat")
        .expect("fresh output has no workspaces");
    tree.set_active_child(left, code);

    // -- map views -------------------------------------------------------
    tree.set_layout(code, Layout::HorizontalSplit);
    let editor = tree.create_view(code, StubView::new(1).titled("editor"));
    let stack = tree.create_container();
    tree.add_sibling(editor, stack);
    tree.set_layout(stack, Layout::Stacked);
    let term = tree.create_view(code, StubView::new(2).titled("term"));
    tree.reparent(term, stack);
    let logs = tree.create_view(term, StubView::new(3).titled("logs"));
    tree.set_active_child(stack, logs);
    let browser = tree.create_view(web, StubView::new(4).titled("browser"));

    tree.set_layout(chat, Layout::Floating);
    let irc = tree.create_view(chat, StubView::new(5).titled("irc"));
    let mail = tree.create_view(irc, StubView::new(6).titled("mail"));
    tree.add_mark(mail, "inbox");
    for node in [editor, term, logs, irc, mail] {
        log.watch(&mut tree, node);
    }

    // -- arrange (a trivial stand-in for a real arranger) ----------------
    tree.set_geometry(editor, Rect::new(0.0, 0.0, 960.0, 1080.0));
    tree.set_geometry(stack, Rect::new(960.0, 0.0, 1920.0, 1080.0));
    for view in [term, logs] {
        tree.set_geometry(view, Rect::new(960.0, 24.0, 1920.0, 1080.0));
    }
    tree.set_geometry(browser, Rect::new(0.0, 0.0, 1920.0, 1080.0));
    tree.set_geometry(irc, Rect::new(100.0, 100.0, 700.0, 600.0));
    tree.set_geometry(mail, Rect::new(400.0, 300.0, 1000.0, 900.0));

    let changes = tree.take_changes();
    println!(
        "changes: {} added, {} geometry, {} layouts, {} topology",
        changes.added.len(),
        changes.geometry.len(),
        changes.layouts.len(),
        changes.topology.len(),
    );

    // -- pointer ---------------------------------------------------------
    let root = tree.root();
    for point in [
        Point::new(10.0, 10.0),
        Point::new(1500.0, 500.0),
        Point::new(1920.0 + 500.0, 400.0),
        Point::new(1920.0 + 5.0, 1020.0),
    ] {
        match tree.hit_test(root, point) {
            Some(hit) => println!(
                "pointer {point:?} -> {:?} {:?} at {:?}",
                tree.name(hit.view),
                hit.surface,
                hit.local
            ),
            None => println!("pointer {point:?} -> nothing"),
        }
    }
    if let Some(marked) = tree.find_mark(root, "inbox") {
        tree.raise(marked);
    }
    let views = tree
        .descendants(root)
        .filter(|&n| tree.kind(n) == NodeKind::View)
        .count();
    println!("{views} views mapped");

    // -- unplug ----------------------------------------------------------
    if let Some(ws) = tree.children(right).next() {
        let moved: Vec<_> = tree.children(ws).collect();
        for view in moved {
            tree.reparent(view, web);
        }
    }
    tree.destroy(right);
    println!("notifications: {}", log.take().len());
    check_attached(&tree).expect("tree invariants hold");

    let mut dump = Vec::new();
    write_tree(&tree, root, &mut dump).expect("writing to a Vec cannot fail");
    print!("{}", String::from_utf8_lossy(&dump));

    let path = "tree.json";
    let file = File::create(path).expect("failed to create tree.json");
    write_snapshot(&tree, root, &mut BufWriter::new(file)).expect("failed to write tree snapshot");
    println!("Wrote {path} ({} nodes)", tree.node_count());
}
