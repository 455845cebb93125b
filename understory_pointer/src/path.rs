// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit paths and divergence between them.
//!
//! ## Ordering
//!
//! A [`HitPath`] is stored innermost-first: index `0` is the directly hit node
//! (the primary target), the last entry is the surface root. This is the
//! reverse of the root→target paths used by most of Understory, and matches
//! what hit testers naturally produce when walking up from a leaf.
//!
//! ## Divergence
//!
//! Two paths are compared from their root ends inward. The number of matching
//! entries is the common-suffix length; everything before it in either path is
//! a divergent prefix.
//!
//! ```
//! use understory_pointer::path::HitPath;
//!
//! let old: HitPath<u32> = HitPath::from_slice(&[10, 2, 1]);
//! let new: HitPath<u32> = HitPath::from_slice(&[20, 2, 1]);
//! let d = new.divergence_from(&old);
//! assert_eq!(d.common_suffix, 2);
//! assert!(d.has_diverged());
//! assert_eq!(d.entered, &[20]);
//! assert_eq!(d.left, &[10]);
//! ```

use core::iter::Rev;
use core::slice::Iter;

use smallvec::SmallVec;

/// Inline capacity before a path spills to the heap.
const INLINE_DEPTH: usize = 16;

/// An ordered sequence of node identifiers, innermost-first.
///
/// Produced fresh by a [`HitTester`](crate::hit::HitTester) for each query.
/// Derived paths (see [`HitPath::truncated_at`]) are new values; a path is
/// never narrowed in place.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HitPath<K> {
    nodes: SmallVec<[K; INLINE_DEPTH]>,
}

impl<K: Copy + Eq> HitPath<K> {
    /// Create an empty path.
    pub fn new() -> Self {
        Self {
            nodes: SmallVec::new(),
        }
    }

    /// Create a path from an innermost-first slice.
    pub fn from_slice(nodes: &[K]) -> Self {
        Self {
            nodes: SmallVec::from_slice(nodes),
        }
    }

    /// Create a path from a root→target slice, as produced by a tree walk.
    pub fn from_root_path(root_to_target: &[K]) -> Self {
        root_to_target.iter().rev().copied().collect()
    }

    /// The primary target (innermost node), if any.
    pub fn target(&self) -> Option<K> {
        self.nodes.first().copied()
    }

    /// The outermost node, if any.
    pub fn root(&self) -> Option<K> {
        self.nodes.last().copied()
    }

    /// Number of nodes on the path.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the path has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Innermost-first view of the nodes.
    pub fn as_slice(&self) -> &[K] {
        &self.nodes
    }

    /// Iterate innermost→root (bubble order).
    pub fn iter(&self) -> Iter<'_, K> {
        self.nodes.iter()
    }

    /// Iterate root→innermost (capture order).
    pub fn iter_root_first(&self) -> Rev<Iter<'_, K>> {
        self.nodes.iter().rev()
    }

    /// Whether `node` is on the path.
    pub fn contains(&self, node: &K) -> bool {
        self.nodes.contains(node)
    }

    /// Index of `node` counted from the innermost entry.
    pub fn position(&self, node: &K) -> Option<usize> {
        self.nodes.iter().position(|k| k == node)
    }

    /// Derive a path that starts at `boundary`, dropping every deeper entry.
    ///
    /// If `boundary` is not on the path the result equals `self`.
    #[must_use]
    pub fn truncated_at(&self, boundary: &K) -> Self {
        match self.position(boundary) {
            Some(idx) => Self::from_slice(&self.nodes[idx..]),
            None => self.clone(),
        }
    }

    /// Number of equal entries when comparing both paths from their root ends.
    pub fn common_suffix_len(&self, other: &Self) -> usize {
        self.iter_root_first()
            .zip(other.iter_root_first())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Compare `self` (the new path) against `previous`.
    pub fn divergence_from<'a>(&'a self, previous: &'a Self) -> Divergence<'a, K> {
        let common_suffix = self.common_suffix_len(previous);
        Divergence {
            common_suffix,
            longest: self.len().max(previous.len()),
            entered: &self.nodes[..self.len() - common_suffix],
            left: &previous.nodes[..previous.len() - common_suffix],
        }
    }
}

impl<K> Default for HitPath<K> {
    fn default() -> Self {
        Self {
            nodes: SmallVec::new(),
        }
    }
}

impl<K: Copy + Eq> FromIterator<K> for HitPath<K> {
    /// Collect innermost-first.
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a, K> IntoIterator for &'a HitPath<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Result of comparing a new hit path against the previous one.
///
/// Both prefixes are innermost-first slices into the compared paths.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Divergence<'a, K> {
    /// Matching entries counted from the root end.
    pub common_suffix: usize,
    /// Length of the longer of the two paths.
    pub longest: usize,
    /// Nodes of the new path not shared with the previous one.
    pub entered: &'a [K],
    /// Nodes of the previous path not shared with the new one.
    pub left: &'a [K],
}

impl<K> Divergence<'_, K> {
    /// Whether the paths differ anywhere.
    pub fn has_diverged(&self) -> bool {
        self.common_suffix < self.longest
    }
}
