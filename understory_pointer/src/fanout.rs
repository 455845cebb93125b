// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered fan-out registry.
//!
//! Platforms often give a native widget a single delegate slot. [`FanOut`]
//! lets several listeners share that slot: install the registry as the one
//! delegate, [`add`](FanOut::add) listeners to it, and forward each callback to
//! every listener in registration order.
//!
//! ```
//! use understory_pointer::fanout::FanOut;
//!
//! let mut log = FanOut::new();
//! let a = log.add(String::from("a"));
//! let _b = log.add(String::from("b"));
//! let mut order = Vec::new();
//! log.for_each(|s| order.push(s.clone()));
//! assert_eq!(order, ["a", "b"]);
//!
//! assert_eq!(log.remove(a).as_deref(), Some("a"));
//! assert_eq!(log.len(), 1);
//! ```

use alloc::vec::Vec;

/// Handle returned by [`FanOut::add`]; pass it to [`FanOut::remove`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u32);

/// An ordered set of listeners.
///
/// Listeners are invoked in the order they were added. Removing a listener
/// keeps the relative order of the rest. Ids are never reused by a registry.
#[derive(Clone, Debug)]
pub struct FanOut<L> {
    next: u32,
    listeners: Vec<(ListenerId, L)>,
}

impl<L> Default for FanOut<L> {
    fn default() -> Self {
        Self {
            next: 0,
            listeners: Vec::new(),
        }
    }
}

impl<L> FanOut<L> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener; it runs after every listener already registered.
    pub fn add(&mut self, listener: L) -> ListenerId {
        let id = ListenerId(self.next);
        self.next = self.next.wrapping_add(1);
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener, returning it if it was registered.
    pub fn remove(&mut self, id: ListenerId) -> Option<L> {
        let idx = self.listeners.iter().position(|(i, _)| *i == id)?;
        Some(self.listeners.remove(idx).1)
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|(i, _)| *i == id)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Iterate listeners in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &L> {
        self.listeners.iter().map(|(_, l)| l)
    }

    /// Iterate listeners mutably in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut L> {
        self.listeners.iter_mut().map(|(_, l)| l)
    }

    /// Invoke `f` on every listener in registration order.
    pub fn for_each(&mut self, mut f: impl FnMut(&mut L)) {
        for (_, l) in &mut self.listeners {
            f(l);
        }
    }

    /// Remove every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}
