// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coalescing keys: per-gesture batch counters for move events.
//!
//! ## Usage
//!
//! 1) [`add`](CoalescingKeyTable::add) an entry when a gesture or hover interaction starts,
//!    keyed by its [`Interaction`]: the kind of interaction and its start [`Timestamp`].
//! 2) [`increment`](CoalescingKeyTable::increment) it on every structurally significant event
//!    (additional contact down/up, hover path change).
//! 3) [`get`](CoalescingKeyTable::get) it to stamp each move.
//! 4) [`remove`](CoalescingKeyTable::remove) it when the interaction ends.
//!
//! ```
//! use understory_pointer::coalesce::{CoalescingKeyTable, Interaction};
//! use understory_pointer::types::{CoalescingKey, Timestamp};
//!
//! let mut keys = CoalescingKeyTable::new();
//! let id = Interaction::Gesture(Timestamp(1_000));
//! keys.add(id);
//! assert_eq!(keys.get(id), Ok(CoalescingKey(0)));
//! keys.increment(id).unwrap();
//! assert_eq!(keys.get(id), Ok(CoalescingKey(1)));
//!
//! // A hover interaction that started at the same instant is a separate entry.
//! keys.add(Interaction::Hover(Timestamp(1_000)));
//! assert_eq!(keys.get(id), Ok(CoalescingKey(1)));
//!
//! keys.remove(id);
//! assert!(keys.get(id).is_err());
//! ```

use core::fmt;

use hashbrown::HashMap;

use crate::error::PointerError;
use crate::types::{CoalescingKey, Timestamp};

/// Identity of a live interaction in a [`CoalescingKeyTable`].
///
/// A contact gesture and a hover interaction may start at the same instant
/// (a stylus hovering while a finger taps), so the kind is part of the key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Interaction {
    /// A contact gesture, by the timestamp of its first contact.
    Gesture(Timestamp),
    /// A hover interaction, by the timestamp of its first qualifying move.
    Hover(Timestamp),
}

impl Interaction {
    /// Start timestamp of the interaction.
    pub const fn timestamp(self) -> Timestamp {
        match self {
            Self::Gesture(t) | Self::Hover(t) => t,
        }
    }
}

/// Lookup of an identity that has no table entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MissingKey(pub Interaction);

impl fmt::Display for MissingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Interaction::Gesture(t) => {
                write!(f, "no coalescing key registered for gesture {}", t.0)
            }
            Interaction::Hover(t) => {
                write!(f, "no coalescing key registered for hover interaction {}", t.0)
            }
        }
    }
}

impl core::error::Error for MissingKey {}

impl<K> From<MissingKey> for PointerError<K> {
    fn from(err: MissingKey) -> Self {
        Self::MissingCoalescingKey(err.0.timestamp())
    }
}

/// Maps interaction identities to their current batch counter.
///
/// Counters start at zero and only grow while the entry lives. The exposed
/// [`CoalescingKey`] is the low 16 bits of the counter.
#[derive(Clone, Debug, Default)]
pub struct CoalescingKeyTable {
    counters: HashMap<Interaction, u32>,
}

impl CoalescingKeyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `id` at key zero, replacing any previous counter.
    pub fn add(&mut self, id: Interaction) {
        self.counters.insert(id, 0);
    }

    /// Advance the counter for `id` and return the new key.
    pub fn increment(&mut self, id: Interaction) -> Result<CoalescingKey, MissingKey> {
        let counter = self.counters.get_mut(&id).ok_or(MissingKey(id))?;
        *counter = counter.wrapping_add(1);
        Ok(truncate(*counter))
    }

    /// Current key for `id`.
    pub fn get(&self, id: Interaction) -> Result<CoalescingKey, MissingKey> {
        self.counters
            .get(&id)
            .map(|&c| truncate(c))
            .ok_or(MissingKey(id))
    }

    /// Stop tracking `id`, returning its last key. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: Interaction) -> Option<CoalescingKey> {
        self.counters.remove(&id).map(truncate)
    }

    /// Whether `id` is tracked.
    pub fn contains(&self, id: Interaction) -> bool {
        self.counters.contains_key(&id)
    }

    /// Number of tracked identities.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Whether no identity is tracked.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.counters.clear();
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "keys are the low 16 bits of the counter"
)]
fn truncate(counter: u32) -> CoalescingKey {
    CoalescingKey((counter & 0xffff) as u16)
}
