// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing seam.
//!
//! The dispatcher does not know about geometry. It asks a [`HitTester`] for
//! the innermost-first path under a point and routes events along it.
//!
//! Any `Fn(Point) -> Option<HitPath<K>>` is a hit tester, so tests and small
//! integrations can pass a closure:
//!
//! ```
//! use kurbo::Point;
//! use understory_pointer::hit::HitTester;
//! use understory_pointer::path::HitPath;
//!
//! let hits = |pt: Point| (pt.x < 100.0).then(|| HitPath::from_slice(&[2_u32, 1]));
//! assert_eq!(hits.hit_test(Point::new(10.0, 0.0)).unwrap().target(), Some(2));
//! assert!(hits.hit_test(Point::new(200.0, 0.0)).is_none());
//! ```

use kurbo::Point;

use crate::path::HitPath;

/// Map a surface-space point to the path of nodes under it.
///
/// Implementations must be pure with respect to the current tree: the same
/// point against the same tree yields the same path.
pub trait HitTester<K> {
    /// Innermost-first path under `pt`, or `None` when nothing is hit
    /// (for example after the surface was detached).
    fn hit_test(&self, pt: Point) -> Option<HitPath<K>>;
}

impl<K, F> HitTester<K> for F
where
    F: Fn(Point) -> Option<HitPath<K>>,
{
    #[inline]
    fn hit_test(&self, pt: Point) -> Option<HitPath<K>> {
        self(pt)
    }
}

/// Resolve a root→target path through a parent chain.
///
/// Walks `parent_of` from `target` up to a root and returns the innermost-first
/// path. Useful for hit testers that only know the leaf under a point.
///
/// ```
/// use understory_pointer::hit::path_from_parents;
///
/// let parent_of = |n: &u32| match *n {
///     3 => Some(2),
///     2 => Some(1),
///     _ => None,
/// };
/// assert_eq!(path_from_parents(3, parent_of).as_slice(), &[3, 2, 1]);
/// ```
pub fn path_from_parents<K: Copy + Eq>(
    target: K,
    mut parent_of: impl FnMut(&K) -> Option<K>,
) -> HitPath<K> {
    let mut cur = Some(target);
    core::iter::from_fn(move || {
        let node = cur?;
        cur = parent_of(&node);
        Some(node)
    })
    .collect()
}
