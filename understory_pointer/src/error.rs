// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract violations reported by the dispatcher.

use core::fmt;

use crate::types::{SamplePhase, Timestamp};

/// A broken calling contract.
///
/// These are programming errors in the embedding code (or in the platform's
/// event stream). The dispatcher detects them before emitting anything for the
/// offending call and leaves its state untouched, so the caller can decide
/// whether to abort or carry on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerError<K> {
    /// A coalescing key was read or bumped for an identity with no table entry.
    MissingCoalescingKey(Timestamp),
    /// A sample that needs an open gesture arrived while none was open.
    NoActiveGesture(SamplePhase),
    /// The gesture was already cancelled, either by a cancel sample or by a claim.
    AlreadyCancelled {
        /// Identity of the cancelled gesture, if one was open at the time.
        gesture: Option<Timestamp>,
    },
    /// A different descendant tried to claim while a claim is held.
    ClaimConflict {
        /// Current claim holder; it keeps the claim.
        holder: K,
        /// The rejected claimant.
        claimant: K,
    },
}

impl<K: fmt::Debug> fmt::Display for PointerError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCoalescingKey(id) => {
                write!(f, "no coalescing key registered for gesture {}", id.0)
            }
            Self::NoActiveGesture(phase) => {
                write!(f, "{phase:?} sample arrived with no active gesture")
            }
            Self::AlreadyCancelled { gesture: Some(id) } => {
                write!(f, "gesture {} was already cancelled", id.0)
            }
            Self::AlreadyCancelled { gesture: None } => {
                write!(f, "gesture was already cancelled")
            }
            Self::ClaimConflict { holder, claimant } => write!(
                f,
                "{claimant:?} cannot claim the gesture: already claimed by {holder:?}"
            ),
        }
    }
}

impl<K: fmt::Debug> core::error::Error for PointerError<K> {}
