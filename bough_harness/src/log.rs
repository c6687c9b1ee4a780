// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording of destroy and reparent notifications.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use bough_core::node::{DestroyEvent, ListenerId, NodeId, NodeTree, ReparentEvent};

/// One recorded notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoggedEvent {
    /// A destroy notification fired.
    Destroy(DestroyEvent),
    /// A reparent notification fired.
    Reparent(ReparentEvent),
}

/// Records notifications from every node it watches, in firing order.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<LoggedEvent>>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to both channels of `node`.
    ///
    /// Returns the destroy and reparent listener ids.
    pub fn watch(&self, tree: &mut NodeTree, node: NodeId) -> (ListenerId, ListenerId) {
        let events = Rc::clone(&self.events);
        let destroy = tree.on_destroy(node, move |e| {
            events.borrow_mut().push(LoggedEvent::Destroy(*e));
        });
        let events = Rc::clone(&self.events);
        let reparent = tree.on_reparent(node, move |e| {
            events.borrow_mut().push(LoggedEvent::Reparent(*e));
        });
        (destroy, reparent)
    }

    /// Returns a copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<LoggedEvent> {
        self.events.borrow().clone()
    }

    /// Returns the nodes whose destroy notification fired, in order.
    #[must_use]
    pub fn destroyed(&self) -> Vec<NodeId> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                LoggedEvent::Destroy(d) => Some(d.node),
                LoggedEvent::Reparent(_) => None,
            })
            .collect()
    }

    /// Returns and forgets everything recorded so far.
    pub fn take(&self) -> Vec<LoggedEvent> {
        core::mem::take(&mut *self.events.borrow_mut())
    }
}
