// Copyright 2026 the Bough Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node notification channels.
//!
//! Every node owns two channels: *destroy* and *reparent*. Listeners are
//! plain closures invoked synchronously, in registration order, at fixed
//! points inside tree mutations:
//!
//! - **destroy** fires once, after the node has been unlinked from its parent
//!   and before its slot is released. The channel is discarded afterwards.
//! - **reparent** fires after the node's parent link changed (attach, detach
//!   or move), before the caller runs any arrangement pass. The event carries
//!   the previous parent so listeners can work out which regions changed.
//!
//! Listeners cannot reach the tree (it is mutably borrowed while they run).
//! Subsystems that need to react structurally should record the event and
//! act on it once the mutation returns.
//!
//! Registration returns a [`ListenerId`]. A subsystem whose lifetime is
//! shorter than the node's must unsubscribe with it, or the closure keeps
//! running against whatever state it captured.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use super::id::{ListenerId, NodeId};
use super::kind::NodeKind;

/// Payload of a destroy notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DestroyEvent {
    /// Handle of the node being destroyed. Stale once the listener returns.
    pub node: NodeId,
    /// Serial id of the node.
    pub id: u64,
    /// Kind of the node.
    pub kind: NodeKind,
    /// The parent the node was detached from, if it was attached.
    pub parent: Option<NodeId>,
}

/// Payload of a reparent notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReparentEvent {
    /// Handle of the node that moved.
    pub node: NodeId,
    /// Serial id of the node.
    pub id: u64,
    /// Parent before the change.
    pub old_parent: Option<NodeId>,
    /// Parent after the change.
    pub new_parent: Option<NodeId>,
}

type Listener<E> = Box<dyn FnMut(&E)>;

/// An ordered list of listeners for one event type.
pub(crate) struct Signal<E> {
    listeners: Vec<(ListenerId, Listener<E>)>,
}

impl<E> Default for Signal<E> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<E> fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<E> Signal<E> {
    pub(crate) fn add(&mut self, id: ListenerId, listener: Listener<E>) {
        self.listeners.push((id, listener));
    }

    /// Returns whether a listener with `id` was registered.
    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub(crate) fn emit(&mut self, event: &E) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn clear(&mut self) {
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    use super::*;

    #[test]
    fn emits_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut signal: Signal<u32> = Signal::default();
        for tag in [1, 2, 3] {
            let log = Rc::clone(&log);
            signal.add(
                ListenerId(tag),
                Box::new(move |e: &u32| log.borrow_mut().push((tag, *e))),
            );
        }
        signal.emit(&7);
        assert_eq!(*log.borrow(), vec![(1, 7), (2, 7), (3, 7)]);
    }

    #[test]
    fn removed_listener_is_not_called() {
        let hits = Rc::new(RefCell::new(0_u32));
        let mut signal: Signal<()> = Signal::default();
        let h = Rc::clone(&hits);
        signal.add(ListenerId(0), Box::new(move |()| *h.borrow_mut() += 1));
        assert!(signal.remove(ListenerId(0)));
        assert!(!signal.remove(ListenerId(0)), "second removal finds nothing");
        signal.emit(&());
        assert_eq!(*hits.borrow(), 0);
        assert_eq!(signal.len(), 0);
    }
}
