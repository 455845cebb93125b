// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer dispatcher: turn raw samples into ordered pointer events.
//!
//! ## Overview
//!
//! A [`PointerDispatcher`] serves one surface. Feed it one [`RawSample`] at a
//! time with [`handle_sample`](PointerDispatcher::handle_sample); it queries a
//! [`HitTester`] for the path under the sample, updates its gesture and hover
//! state, and emits zero or more [`PointerEvent`]s to an [`EventSink`], in
//! order, before returning.
//!
//! ## Contact gestures
//!
//! - First contact down: `enter` for every node root→target (only for devices
//!   without native hover), then `down` on the target.
//! - Additional contact down / intermediate contact up: bump the gesture's
//!   coalescing key, then `down` / `up` on the target.
//! - Move: `move` on the target, stamped with the current key.
//! - Last contact up: `up` on the target, then `leave` for every node
//!   target→root (only for devices without native hover).
//! - Cancel: `cancel` on the target, then `leave` target→root.
//!
//! Only the primary target is addressed, even with several contacts down.
//!
//! ## Hover
//!
//! Hover-capable devices get enter/leave from
//! [`handle_hover_move`](PointerDispatcher::handle_hover_move) instead: the new
//! path is compared with the previous one from the root end, `enter` is emitted
//! for the newly entered nodes (root→target), `leave` for the nodes left behind
//! (target→root), then one `move`. Platform hover enter/exit samples are ignored.
//!
//! ## Gesture claims
//!
//! A descendant that starts handling the gesture natively (a scroll view, for
//! example) calls [`claim_gesture`](PointerDispatcher::claim_gesture). The
//! dispatcher cancels the gesture and ignores every sample until
//! [`release_gesture`](PointerDispatcher::release_gesture).
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use understory_pointer::dispatcher::PointerDispatcher;
//! use understory_pointer::path::HitPath;
//! use understory_pointer::types::{
//!     PointerEvent, PointerKind, RawSample, SamplePhase, SurfaceId, Timestamp, ToolType,
//! };
//!
//! // B inside A inside the root (0).
//! let hits = |_: Point| Some(HitPath::from_slice(&[2_u32, 1, 0]));
//! let mut dispatcher = PointerDispatcher::new(SurfaceId(1));
//! let mut out: Vec<PointerEvent<u32>> = Vec::new();
//!
//! let touch = |phase, x, t| {
//!     RawSample::new(phase, Point::new(x, 10.0), Timestamp(t)).with_tool(ToolType::Finger)
//! };
//! dispatcher.handle_sample(&touch(SamplePhase::Down, 10.0, 100), &hits, &mut out)?;
//! dispatcher.handle_sample(&touch(SamplePhase::Move, 15.0, 116), &hits, &mut out)?;
//! dispatcher.handle_sample(&touch(SamplePhase::Up, 15.0, 132), &hits, &mut out)?;
//!
//! let seen: Vec<_> = out.iter().map(|e| (e.kind(), *e.target())).collect();
//! assert_eq!(seen, [
//!     (PointerKind::Enter, 0), (PointerKind::Enter, 1), (PointerKind::Enter, 2),
//!     (PointerKind::Down, 2),
//!     (PointerKind::Move, 2),
//!     (PointerKind::Up, 2),
//!     (PointerKind::Leave, 2), (PointerKind::Leave, 1), (PointerKind::Leave, 0),
//! ]);
//! # Ok::<(), understory_pointer::error::PointerError<u32>>(())
//! ```

use core::fmt::Debug;

use kurbo::Point;

use crate::coalesce::{CoalescingKeyTable, Interaction};
use crate::error::PointerError;
use crate::hit::HitTester;
use crate::path::HitPath;
use crate::sink::EventSink;
use crate::types::{
    CoalescingKey, PointerEvent, PointerKind, RawSample, SamplePhase, SurfaceId, Timestamp,
};

/// Default jitter threshold for hover moves, in surface units.
pub const DEFAULT_HOVER_EPSILON: f64 = 1.0;

/// Tunables for a [`PointerDispatcher`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DispatcherConfig {
    /// A hover move qualifies only if it moved farther than this on at least one axis.
    pub hover_epsilon: f64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            hover_epsilon: DEFAULT_HOVER_EPSILON,
        }
    }
}

impl DispatcherConfig {
    /// Set the hover jitter threshold.
    #[must_use]
    pub const fn with_hover_epsilon(mut self, hover_epsilon: f64) -> Self {
        self.hover_epsilon = hover_epsilon;
        self
    }
}

/// One discrete-contact gesture, from first contact down to last contact up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GestureSession {
    /// Timestamp of the first contact; also the gesture's coalescing identity.
    pub start: Timestamp,
    /// Contacts currently down.
    pub contacts: u32,
}

impl GestureSession {
    /// Identity of this gesture in the [`CoalescingKeyTable`].
    pub const fn id(&self) -> Interaction {
        Interaction::Gesture(self.start)
    }
}

/// One continuous hover interaction.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverSession<K> {
    interaction: Timestamp,
    last_position: Option<Point>,
    last_path: HitPath<K>,
}

impl<K: Copy + Eq> HoverSession<K> {
    fn new(interaction: Timestamp) -> Self {
        Self {
            interaction,
            last_position: None,
            last_path: HitPath::new(),
        }
    }

    /// Timestamp of the first qualifying hover move; the interaction's coalescing identity.
    pub fn interaction(&self) -> Timestamp {
        self.interaction
    }

    /// Identity of this interaction in the [`CoalescingKeyTable`].
    pub fn id(&self) -> Interaction {
        Interaction::Hover(self.interaction)
    }

    /// Position of the last hover move that produced events.
    pub fn last_position(&self) -> Option<Point> {
        self.last_position
    }

    /// Hit path of the last hover move that produced events.
    pub fn last_path(&self) -> &HitPath<K> {
        &self.last_path
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum GestureState<K> {
    Idle,
    Active(GestureSession),
    Cancelled {
        gesture: Option<Timestamp>,
    },
    Suspended {
        claimant: K,
        gesture: Option<Timestamp>,
    },
}

/// Per-surface pointer dispatch state machine.
///
/// ## Usage
///
/// - Create one dispatcher per surface with [`PointerDispatcher::new`] and keep
///   it with the surface; nothing is shared between surfaces.
/// - Call [`handle_sample`](Self::handle_sample) for every raw sample, in
///   arrival order, from a single thread.
/// - Wire your native gesture recognizers to
///   [`claim_gesture`](Self::claim_gesture) and
///   [`release_gesture`](Self::release_gesture).
///
/// Every entry point returns `Ok(())` for benign drops (unknown phases, jitter,
/// no hit) and `Err` only for [`PointerError`] contract violations, which are
/// detected before anything is emitted.
#[derive(Clone, Debug)]
pub struct PointerDispatcher<K> {
    surface: SurfaceId,
    config: DispatcherConfig,
    keys: CoalescingKeyTable,
    gesture: GestureState<K>,
    hover: Option<HoverSession<K>>,
}

impl<K: Copy + Eq + Debug> PointerDispatcher<K> {
    /// Create a dispatcher for `surface` with the default configuration.
    pub fn new(surface: SurfaceId) -> Self {
        Self::with_config(surface, DispatcherConfig::default())
    }

    /// Create a dispatcher for `surface` with `config`.
    pub fn with_config(surface: SurfaceId, config: DispatcherConfig) -> Self {
        Self {
            surface,
            config,
            keys: CoalescingKeyTable::new(),
            gesture: GestureState::Idle,
            hover: None,
        }
    }

    /// Surface this dispatcher serves.
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Active configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// The open contact gesture, if any.
    pub fn active_gesture(&self) -> Option<GestureSession> {
        match self.gesture {
            GestureState::Active(session) => Some(session),
            _ => None,
        }
    }

    /// Current coalescing key of the open contact gesture.
    pub fn gesture_key(&self) -> Option<CoalescingKey> {
        let session = self.active_gesture()?;
        self.keys.get(session.id()).ok()
    }

    /// The descendant currently holding the gesture, if any.
    pub fn claimant(&self) -> Option<K> {
        match self.gesture {
            GestureState::Suspended { claimant, .. } => Some(claimant),
            _ => None,
        }
    }

    /// Whether dispatch is suspended by a gesture claim.
    pub fn is_suspended(&self) -> bool {
        matches!(self.gesture, GestureState::Suspended { .. })
    }

    /// The hover interaction, if one has started.
    pub fn hover_session(&self) -> Option<&HoverSession<K>> {
        self.hover.as_ref()
    }

    /// Coalescing keys of all live interactions.
    pub fn coalescing_keys(&self) -> &CoalescingKeyTable {
        &self.keys
    }

    /// Handle one raw sample.
    ///
    /// Ignored entirely while a claim is held. Hover moves from hover-capable
    /// devices are forwarded to [`handle_hover_move`](Self::handle_hover_move);
    /// their platform enter/exit samples are dropped.
    pub fn handle_sample<M: Clone>(
        &mut self,
        sample: &RawSample<M>,
        hits: &impl HitTester<K>,
        sink: &mut impl EventSink<K, M>,
    ) -> Result<(), PointerError<K>> {
        if self.is_suspended() {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                surface = self.surface.0,
                phase = ?sample.phase,
                "sample ignored while a descendant holds the gesture"
            );
            return Ok(());
        }

        if sample.supports_hover {
            match sample.phase {
                SamplePhase::HoverMove => return self.handle_hover_move(sample, hits, sink),
                SamplePhase::HoverEnter | SamplePhase::HoverExit => return Ok(()),
                _ => {}
            }
        }

        if matches!(
            sample.phase,
            SamplePhase::HoverEnter
                | SamplePhase::HoverMove
                | SamplePhase::HoverExit
                | SamplePhase::Other(_)
        ) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                surface = self.surface.0,
                phase = ?sample.phase,
                supports_hover = sample.supports_hover,
                "sample ignored: unrecognized phase"
            );
            return Ok(());
        }

        let Some(path) = hits.hit_test(sample.position) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                surface = self.surface.0,
                phase = ?sample.phase,
                "sample dropped: nothing under the pointer"
            );
            return Ok(());
        };
        let Some(target) = path.target() else {
            return Ok(());
        };

        match sample.phase {
            SamplePhase::Down => {
                self.begin_gesture(sample.timestamp);
                if !sample.supports_hover {
                    for &node in path.iter_root_first() {
                        sink.emit(self.event(PointerKind::Enter, node, sample));
                    }
                }
                sink.emit(self.event(PointerKind::Down, target, sample));
            }
            SamplePhase::PointerDown => {
                let session = self.open_gesture(sample.phase)?;
                self.keys.increment(session.id()).map_err(Self::violation)?;
                self.gesture = GestureState::Active(GestureSession {
                    contacts: session.contacts.saturating_add(1),
                    ..session
                });
                sink.emit(self.event(PointerKind::Down, target, sample));
            }
            SamplePhase::Move => {
                let session = self.open_gesture(sample.phase)?;
                let key = self.keys.get(session.id()).map_err(Self::violation)?;
                sink.emit(PointerEvent::moved(self.surface, target, sample.clone(), key));
            }
            SamplePhase::PointerUp => {
                let session = self.open_gesture(sample.phase)?;
                self.keys.increment(session.id()).map_err(Self::violation)?;
                #[cfg(feature = "tracing")]
                if session.contacts <= 1 {
                    tracing::debug!(
                        surface = self.surface.0,
                        contacts = session.contacts,
                        "intermediate up without another contact down"
                    );
                }
                self.gesture = GestureState::Active(GestureSession {
                    contacts: session.contacts.saturating_sub(1),
                    ..session
                });
                sink.emit(self.event(PointerKind::Up, target, sample));
            }
            SamplePhase::Up => {
                let session = self.open_gesture(sample.phase)?;
                self.keys.remove(session.id());
                self.gesture = GestureState::Idle;
                sink.emit(self.event(PointerKind::Up, target, sample));
                if !sample.supports_hover {
                    for &node in path.iter() {
                        sink.emit(self.event(PointerKind::Leave, node, sample));
                    }
                }
            }
            SamplePhase::Cancel => {
                self.cancel(&path, sample, sink)?;
            }
            SamplePhase::HoverEnter
            | SamplePhase::HoverMove
            | SamplePhase::HoverExit
            | SamplePhase::Other(_) => {}
        }
        Ok(())
    }

    /// Handle a hover move from a hover-capable device.
    ///
    /// Samples of any other phase are ignored. Moves within
    /// [`DispatcherConfig::hover_epsilon`] of the last one are dropped without
    /// touching any state. While a claim is held, the hit path is cut at the
    /// claimant so no event reaches a node inside it.
    pub fn handle_hover_move<M: Clone>(
        &mut self,
        sample: &RawSample<M>,
        hits: &impl HitTester<K>,
        sink: &mut impl EventSink<K, M>,
    ) -> Result<(), PointerError<K>> {
        if sample.phase != SamplePhase::HoverMove {
            return Ok(());
        }

        let pos = sample.position;
        if let Some(last) = self.hover.as_ref().and_then(|h| h.last_position) {
            let eps = self.config.hover_epsilon;
            if within(pos.x, last.x, eps) && within(pos.y, last.y, eps) {
                #[cfg(feature = "tracing")]
                tracing::trace!(surface = self.surface.0, "hover move below jitter threshold");
                return Ok(());
            }
        }

        let surface = self.surface;
        let keys = &mut self.keys;
        let session = self.hover.get_or_insert_with(|| {
            keys.add(Interaction::Hover(sample.timestamp));
            HoverSession::new(sample.timestamp)
        });

        let Some(path) = hits.hit_test(pos) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(surface = surface.0, "hover move dropped: nothing under the pointer");
            return Ok(());
        };
        let path = match &self.gesture {
            GestureState::Suspended { claimant, .. } => path.truncated_at(claimant),
            _ => path,
        };
        let Some(target) = path.target() else {
            return Ok(());
        };

        let divergence = path.divergence_from(&session.last_path);
        if divergence.has_diverged() {
            keys.increment(session.id()).map_err(Self::violation)?;
            for &node in divergence.entered.iter().rev() {
                sink.emit(PointerEvent::new(PointerKind::Enter, surface, node, sample.clone()));
            }
            for &node in divergence.left {
                sink.emit(PointerEvent::new(PointerKind::Leave, surface, node, sample.clone()));
            }
        }

        let key = keys.get(session.id()).map_err(Self::violation)?;
        sink.emit(PointerEvent::moved(surface, target, sample.clone(), key));

        session.last_path = path;
        session.last_position = Some(pos);
        Ok(())
    }

    /// Give `claimant` exclusive ownership of the in-flight gesture.
    ///
    /// Emits `cancel` on the target under `sample` and `leave` target→root,
    /// drops the gesture's coalescing key, then suspends dispatch until
    /// [`release_gesture`](Self::release_gesture).
    ///
    /// Re-claiming by the current holder is a no-op. A claim by a different
    /// descendant is rejected with [`PointerError::ClaimConflict`] and the
    /// first claim stays in place.
    pub fn claim_gesture<M: Clone>(
        &mut self,
        claimant: K,
        sample: &RawSample<M>,
        hits: &impl HitTester<K>,
        sink: &mut impl EventSink<K, M>,
    ) -> Result<(), PointerError<K>> {
        if let GestureState::Suspended { claimant: holder, .. } = self.gesture {
            if holder == claimant {
                return Ok(());
            }
            return Err(Self::violation(PointerError::ClaimConflict { holder, claimant }));
        }

        let path = hits.hit_test(sample.position).unwrap_or_default();
        let gesture = self.cancel(&path, sample, sink)?;
        self.gesture = GestureState::Suspended { claimant, gesture };
        #[cfg(feature = "tracing")]
        tracing::debug!(surface = self.surface.0, claimant = ?claimant, "gesture claimed");
        Ok(())
    }

    /// Drop the current claim and resume dispatch.
    ///
    /// Returns the previous claimant. Only the claimant should call this; the
    /// dispatcher does not check who is asking.
    pub fn release_gesture(&mut self) -> Option<K> {
        let claimant = self.claimant()?;
        self.gesture = GestureState::Idle;
        Some(claimant)
    }

    /// End the hover interaction explicitly.
    ///
    /// Emits `leave` target→root for the last hovered path and drops the
    /// interaction's coalescing key. The dispatcher never ends a hover
    /// interaction by itself; call this when your platform reports that the
    /// device went out of range. Returns the ended session.
    pub fn end_hover<M: Clone>(
        &mut self,
        sample: &RawSample<M>,
        sink: &mut impl EventSink<K, M>,
    ) -> Option<HoverSession<K>> {
        let session = self.hover.take()?;
        self.keys.remove(session.id());
        for &node in session.last_path.iter() {
            sink.emit(self.event(PointerKind::Leave, node, sample));
        }
        Some(session)
    }

    /// Forget every session, claim, and key without emitting anything.
    ///
    /// Use when the surface is detached.
    pub fn reset(&mut self) {
        self.keys.clear();
        self.gesture = GestureState::Idle;
        self.hover = None;
    }

    fn begin_gesture(&mut self, start: Timestamp) {
        if let GestureState::Active(stale) = self.gesture {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                surface = self.surface.0,
                stale = stale.start.0,
                "first contact while a gesture is open; replacing it"
            );
            self.keys.remove(stale.id());
        }
        self.keys.add(Interaction::Gesture(start));
        self.gesture = GestureState::Active(GestureSession { start, contacts: 1 });
    }

    fn open_gesture(&self, phase: SamplePhase) -> Result<GestureSession, PointerError<K>> {
        self.active_gesture()
            .ok_or_else(|| Self::violation(PointerError::NoActiveGesture(phase)))
    }

    /// Shared cancellation: `cancel` on the target, `leave` target→root, drop the key.
    ///
    /// Returns the identity of the cancelled gesture, if one was open.
    fn cancel<M: Clone>(
        &mut self,
        path: &HitPath<K>,
        sample: &RawSample<M>,
        sink: &mut impl EventSink<K, M>,
    ) -> Result<Option<Timestamp>, PointerError<K>> {
        let gesture = match self.gesture {
            GestureState::Cancelled { gesture } | GestureState::Suspended { gesture, .. } => {
                return Err(Self::violation(PointerError::AlreadyCancelled { gesture }));
            }
            GestureState::Active(session) => Some(session.start),
            GestureState::Idle => None,
        };

        if let Some(target) = path.target() {
            sink.emit(self.event(PointerKind::Cancel, target, sample));
            for &node in path.iter() {
                sink.emit(self.event(PointerKind::Leave, node, sample));
            }
        }
        if let Some(id) = gesture {
            self.keys.remove(Interaction::Gesture(id));
        }
        self.gesture = GestureState::Cancelled { gesture };
        Ok(gesture)
    }

    /// Report a contract violation on its way to the caller.
    fn violation<E: Into<PointerError<K>>>(err: E) -> PointerError<K> {
        let err = err.into();
        #[cfg(feature = "tracing")]
        tracing::warn!(error = %err, "pointer dispatch contract violation");
        err
    }

    fn event<M: Clone>(
        &self,
        kind: PointerKind,
        target: K,
        sample: &RawSample<M>,
    ) -> PointerEvent<K, M> {
        PointerEvent::new(kind, self.surface, target, sample.clone())
    }
}

fn within(a: f64, b: f64, eps: f64) -> bool {
    let d = a - b;
    -eps <= d && d <= eps
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::types::ToolType;

    const ROOT: u32 = 1;
    const A: u32 = 2;
    const B: u32 = 3;
    const C: u32 = 4;

    // Root spans everything; A is x < 100 with B inside it for x < 50; C is x >= 100.
    fn tree(pt: Point) -> Option<HitPath<u32>> {
        if pt.x < 0.0 {
            return None;
        }
        let path: &[u32] = if pt.x < 50.0 {
            &[B, A, ROOT]
        } else if pt.x < 100.0 {
            &[A, ROOT]
        } else {
            &[C, ROOT]
        };
        Some(HitPath::from_slice(path))
    }

    fn touch(phase: SamplePhase, x: f64, t: u64) -> RawSample {
        RawSample::new(phase, Point::new(x, 0.0), Timestamp(t)).with_tool(ToolType::Finger)
    }

    fn mouse(phase: SamplePhase, x: f64, t: u64) -> RawSample {
        RawSample::new(phase, Point::new(x, 0.0), Timestamp(t)).with_tool(ToolType::Mouse)
    }

    fn kinds(out: &[PointerEvent<u32>]) -> Vec<(PointerKind, u32)> {
        out.iter().map(|e| (e.kind(), *e.target())).collect()
    }

    fn keys(out: &[PointerEvent<u32>]) -> Vec<Option<u16>> {
        out.iter().map(|e| e.coalescing_key().map(|k| k.0)).collect()
    }

    use PointerKind::{Cancel, Down, Enter, Leave, Move, Up};

    #[test]
    fn tap_without_hover_support() {
        let mut d = PointerDispatcher::new(SurfaceId(7));
        let mut out = Vec::new();
        d.handle_sample(&touch(SamplePhase::Down, 10.0, 100), &tree, &mut out)
            .unwrap();
        d.handle_sample(&touch(SamplePhase::Move, 15.0, 110), &tree, &mut out)
            .unwrap();
        d.handle_sample(&touch(SamplePhase::Up, 15.0, 120), &tree, &mut out)
            .unwrap();

        assert_eq!(
            kinds(&out),
            vec![
                (Enter, ROOT),
                (Enter, A),
                (Enter, B),
                (Down, B),
                (Move, B),
                (Up, B),
                (Leave, B),
                (Leave, A),
                (Leave, ROOT),
            ]
        );
        assert_eq!(out[4].coalescing_key(), Some(CoalescingKey(0)));
        assert!(out.iter().all(|e| e.surface() == SurfaceId(7)));
        assert!(d.active_gesture().is_none());
        assert!(d.coalescing_keys().is_empty());
    }

    // Mouse clicks rely on hover moves for enter/leave.
    #[test]
    fn click_with_hover_support_skips_enter_leave() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_sample(&mouse(SamplePhase::Down, 10.0, 1), &tree, &mut out)
            .unwrap();
        d.handle_sample(&mouse(SamplePhase::Up, 10.0, 2), &tree, &mut out)
            .unwrap();
        assert_eq!(kinds(&out), vec![(Down, B), (Up, B)]);
    }

    #[test]
    fn multi_touch_bumps_the_key() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        let samples = [
            touch(SamplePhase::Down, 10.0, 100),
            touch(SamplePhase::Move, 11.0, 101),
            touch(SamplePhase::PointerDown, 12.0, 102),
            touch(SamplePhase::Move, 13.0, 103),
            touch(SamplePhase::Move, 14.0, 104),
            touch(SamplePhase::PointerUp, 15.0, 105),
            touch(SamplePhase::Move, 16.0, 106),
            touch(SamplePhase::Up, 17.0, 107),
        ];
        for s in &samples {
            d.handle_sample(s, &tree, &mut out).unwrap();
            if s.phase == SamplePhase::PointerDown {
                assert_eq!(d.active_gesture().map(|g| g.contacts), Some(2));
            }
        }
        let moves: Vec<_> = out
            .iter()
            .filter(|e| e.kind() == Move)
            .map(|e| e.coalescing_key().unwrap().0)
            .collect();
        assert_eq!(moves, [0, 1, 1, 2]);

        // Enter only once, before the first down.
        let enters = out.iter().filter(|e| e.kind() == Enter).count();
        assert_eq!(enters, 3);
        let downs = out.iter().filter(|e| e.kind() == Down).count();
        let ups = out.iter().filter(|e| e.kind() == Up).count();
        assert_eq!((downs, ups), (2, 2));
        assert!(d.coalescing_keys().is_empty());
    }

    // Only the primary target is addressed, wherever the contacts are.
    #[test]
    fn moves_address_the_target_under_the_sample() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_sample(&touch(SamplePhase::Down, 10.0, 1), &tree, &mut out)
            .unwrap();
        out.clear();
        d.handle_sample(&touch(SamplePhase::Move, 150.0, 2), &tree, &mut out)
            .unwrap();
        assert_eq!(kinds(&out), vec![(Move, C)]);
    }

    #[test]
    fn raw_cancel_cancels_once() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_sample(&touch(SamplePhase::Down, 60.0, 5), &tree, &mut out)
            .unwrap();
        out.clear();
        d.handle_sample(&touch(SamplePhase::Cancel, 60.0, 6), &tree, &mut out)
            .unwrap();
        assert_eq!(kinds(&out), vec![(Cancel, A), (Leave, A), (Leave, ROOT)]);
        assert!(!d.coalescing_keys().contains(Interaction::Gesture(Timestamp(5))));

        out.clear();
        let err = d
            .handle_sample(&touch(SamplePhase::Cancel, 60.0, 7), &tree, &mut out)
            .unwrap_err();
        assert_eq!(
            err,
            PointerError::AlreadyCancelled {
                gesture: Some(Timestamp(5))
            }
        );
        assert!(out.is_empty());
    }

    #[test]
    fn new_gesture_after_cancel() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_sample(&touch(SamplePhase::Down, 10.0, 1), &tree, &mut out)
            .unwrap();
        d.handle_sample(&touch(SamplePhase::Cancel, 10.0, 2), &tree, &mut out)
            .unwrap();
        out.clear();
        d.handle_sample(&touch(SamplePhase::Down, 10.0, 3), &tree, &mut out)
            .unwrap();
        assert_eq!(out.last().map(|e| e.kind()), Some(Down));
        assert_eq!(d.active_gesture().map(|g| g.start), Some(Timestamp(3)));
    }

    #[test]
    fn claim_cancels_and_suspends() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_sample(&touch(SamplePhase::Down, 10.0, 1), &tree, &mut out)
            .unwrap();
        d.handle_sample(&touch(SamplePhase::Move, 20.0, 2), &tree, &mut out)
            .unwrap();
        out.clear();

        d.claim_gesture(A, &touch(SamplePhase::Move, 20.0, 3), &tree, &mut out)
            .unwrap();
        assert_eq!(
            kinds(&out),
            vec![(Cancel, B), (Leave, B), (Leave, A), (Leave, ROOT)]
        );
        assert!(d.is_suspended());
        assert_eq!(d.claimant(), Some(A));
        assert!(d.coalescing_keys().is_empty());

        // Everything is ignored while suspended.
        out.clear();
        for (i, phase) in [
            SamplePhase::Move,
            SamplePhase::PointerDown,
            SamplePhase::Up,
            SamplePhase::Cancel,
            SamplePhase::Down,
        ]
        .into_iter()
        .enumerate()
        {
            d.handle_sample(&touch(phase, 30.0, 10 + i as u64), &tree, &mut out)
                .unwrap();
        }
        assert!(out.is_empty());

        assert_eq!(d.release_gesture(), Some(A));
        assert!(!d.is_suspended());
        assert_eq!(d.release_gesture(), None);

        d.handle_sample(&touch(SamplePhase::Down, 10.0, 20), &tree, &mut out)
            .unwrap();
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn second_claimant_is_rejected() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_sample(&touch(SamplePhase::Down, 10.0, 1), &tree, &mut out)
            .unwrap();
        let s = touch(SamplePhase::Move, 10.0, 2);
        d.claim_gesture(B, &s, &tree, &mut out).unwrap();
        out.clear();

        // Same claimant: quiet no-op.
        d.claim_gesture(B, &s, &tree, &mut out).unwrap();
        // Different claimant: reported, first claim kept.
        let err = d.claim_gesture(A, &s, &tree, &mut out).unwrap_err();
        assert_eq!(
            err,
            PointerError::ClaimConflict {
                holder: B,
                claimant: A
            }
        );
        assert!(out.is_empty());
        assert_eq!(d.claimant(), Some(B));
    }

    #[test]
    fn claim_after_cancel_is_a_double_cancel() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_sample(&touch(SamplePhase::Down, 10.0, 1), &tree, &mut out)
            .unwrap();
        d.handle_sample(&touch(SamplePhase::Cancel, 10.0, 2), &tree, &mut out)
            .unwrap();
        out.clear();
        let err = d
            .claim_gesture(A, &touch(SamplePhase::Move, 10.0, 3), &tree, &mut out)
            .unwrap_err();
        assert_eq!(
            err,
            PointerError::AlreadyCancelled {
                gesture: Some(Timestamp(1))
            }
        );
        assert!(out.is_empty());
        assert!(!d.is_suspended());
    }

    #[test]
    fn claim_with_no_hit_still_suspends() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_sample(&touch(SamplePhase::Down, 10.0, 1), &tree, &mut out)
            .unwrap();
        out.clear();
        d.claim_gesture(A, &touch(SamplePhase::Move, -5.0, 2), &tree, &mut out)
            .unwrap();
        assert!(out.is_empty());
        assert!(d.is_suspended());
        assert!(d.coalescing_keys().is_empty());
    }

    #[test]
    fn samples_without_a_gesture_are_violations() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        for phase in [
            SamplePhase::Move,
            SamplePhase::PointerDown,
            SamplePhase::PointerUp,
            SamplePhase::Up,
        ] {
            let err = d
                .handle_sample(&touch(phase, 10.0, 1), &tree, &mut out)
                .unwrap_err();
            assert_eq!(err, PointerError::NoActiveGesture(phase));
        }
        assert!(out.is_empty());
    }

    #[test]
    fn benign_drops() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        // Unknown phase.
        d.handle_sample(&touch(SamplePhase::Other(42), 10.0, 1), &tree, &mut out)
            .unwrap();
        // Hover phases from a device without hover.
        d.handle_sample(&touch(SamplePhase::HoverMove, 10.0, 2), &tree, &mut out)
            .unwrap();
        // Platform hover enter/exit from a hover device.
        d.handle_sample(&mouse(SamplePhase::HoverEnter, 10.0, 3), &tree, &mut out)
            .unwrap();
        d.handle_sample(&mouse(SamplePhase::HoverExit, 10.0, 4), &tree, &mut out)
            .unwrap();
        // Nothing under the pointer, even for an otherwise invalid move.
        d.handle_sample(&touch(SamplePhase::Move, -1.0, 5), &tree, &mut out)
            .unwrap();
        assert!(out.is_empty());
        assert!(d.coalescing_keys().is_empty());
        assert!(d.hover_session().is_none());
    }

    // A lost up: the next first contact replaces the stale gesture.
    #[test]
    fn down_replaces_a_stale_gesture() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_sample(&touch(SamplePhase::Down, 10.0, 1), &tree, &mut out)
            .unwrap();
        d.handle_sample(&touch(SamplePhase::Down, 10.0, 9), &tree, &mut out)
            .unwrap();
        assert!(!d.coalescing_keys().contains(Interaction::Gesture(Timestamp(1))));
        assert!(d.coalescing_keys().contains(Interaction::Gesture(Timestamp(9))));
        assert_eq!(d.coalescing_keys().len(), 1);
    }

    #[test]
    fn hover_enter_leave_on_path_change() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_sample(&mouse(SamplePhase::HoverMove, 10.0, 50), &tree, &mut out)
            .unwrap();
        assert_eq!(
            kinds(&out),
            vec![(Enter, ROOT), (Enter, A), (Enter, B), (Move, B)]
        );
        assert_eq!(keys(&out), vec![None, None, None, Some(1)]);

        // Within A but outside B: only B is left.
        out.clear();
        d.handle_sample(&mouse(SamplePhase::HoverMove, 60.0, 51), &tree, &mut out)
            .unwrap();
        assert_eq!(kinds(&out), vec![(Leave, B), (Move, A)]);
        assert_eq!(keys(&out), vec![None, Some(2)]);

        // Same path: a plain move keeps the key.
        out.clear();
        d.handle_sample(&mouse(SamplePhase::HoverMove, 70.0, 52), &tree, &mut out)
            .unwrap();
        assert_eq!(kinds(&out), vec![(Move, A)]);
        assert_eq!(keys(&out), vec![Some(2)]);

        // Across to C: enter C, leave A, root untouched.
        out.clear();
        d.handle_sample(&mouse(SamplePhase::HoverMove, 150.0, 53), &tree, &mut out)
            .unwrap();
        assert_eq!(kinds(&out), vec![(Enter, C), (Leave, A), (Move, C)]);
        assert_eq!(keys(&out), vec![None, None, Some(3)]);

        let session = d.hover_session().unwrap();
        assert_eq!(session.interaction(), Timestamp(50));
        assert_eq!(session.last_path().as_slice(), &[C, ROOT]);
        assert_eq!(session.last_position(), Some(Point::new(150.0, 0.0)));
    }

    #[test]
    fn hover_jitter_is_a_strict_no_op() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        let s = mouse(SamplePhase::HoverMove, 10.0, 1);
        d.handle_sample(&s, &tree, &mut out).unwrap();
        let before = d.clone();
        out.clear();

        d.handle_sample(&s, &tree, &mut out).unwrap();
        d.handle_sample(&mouse(SamplePhase::HoverMove, 11.0, 2), &tree, &mut out)
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(d.hover_session(), before.hover_session());
        assert_eq!(
            d.coalescing_keys().get(Interaction::Hover(Timestamp(1))),
            before.coalescing_keys().get(Interaction::Hover(Timestamp(1)))
        );

        // Just past the threshold on one axis qualifies.
        d.handle_sample(&mouse(SamplePhase::HoverMove, 11.5, 3), &tree, &mut out)
            .unwrap();
        assert_eq!(kinds(&out), vec![(Move, B)]);
    }

    #[test]
    fn custom_epsilon() {
        let config = DispatcherConfig::default().with_hover_epsilon(20.0);
        let mut d = PointerDispatcher::with_config(SurfaceId(0), config);
        let mut out = Vec::new();
        d.handle_sample(&mouse(SamplePhase::HoverMove, 10.0, 1), &tree, &mut out)
            .unwrap();
        out.clear();
        d.handle_sample(&mouse(SamplePhase::HoverMove, 25.0, 2), &tree, &mut out)
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(d.config().hover_epsilon, 20.0);
    }

    // While a descendant holds the gesture, hover never reaches nodes inside it.
    #[test]
    fn hover_is_truncated_at_the_claimant() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_sample(&touch(SamplePhase::Down, 60.0, 1), &tree, &mut out)
            .unwrap();
        d.claim_gesture(A, &touch(SamplePhase::Move, 60.0, 2), &tree, &mut out)
            .unwrap();
        out.clear();

        // handle_sample is suspended, so drive hover directly.
        d.handle_hover_move(&mouse(SamplePhase::HoverMove, 10.0, 3), &tree, &mut out)
            .unwrap();
        assert_eq!(kinds(&out), vec![(Enter, ROOT), (Enter, A), (Move, A)]);
        assert!(out.iter().all(|e| *e.target() != B));
    }

    #[test]
    fn handle_hover_move_ignores_other_phases() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_hover_move(&mouse(SamplePhase::Move, 10.0, 1), &tree, &mut out)
            .unwrap();
        d.handle_hover_move(&mouse(SamplePhase::HoverExit, 10.0, 1), &tree, &mut out)
            .unwrap();
        assert!(out.is_empty());
        assert!(d.hover_session().is_none());
    }

    #[test]
    fn end_hover_leaves_the_last_path() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_sample(&mouse(SamplePhase::HoverMove, 10.0, 1), &tree, &mut out)
            .unwrap();
        out.clear();
        let ended = d.end_hover(&mouse(SamplePhase::HoverExit, 10.0, 2), &mut out);
        assert_eq!(ended.map(|s| s.interaction()), Some(Timestamp(1)));
        assert_eq!(kinds(&out), vec![(Leave, B), (Leave, A), (Leave, ROOT)]);
        assert!(d.coalescing_keys().is_empty());

        out.clear();
        assert!(
            d.end_hover(&mouse(SamplePhase::HoverExit, 10.0, 3), &mut out)
                .is_none()
        );
        assert!(out.is_empty());
    }

    #[test]
    fn reset_forgets_everything() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_sample(&mouse(SamplePhase::HoverMove, 10.0, 1), &tree, &mut out)
            .unwrap();
        d.handle_sample(&touch(SamplePhase::Down, 10.0, 2), &tree, &mut out)
            .unwrap();
        d.claim_gesture(A, &touch(SamplePhase::Move, 10.0, 3), &tree, &mut out)
            .unwrap();
        d.reset();
        assert!(!d.is_suspended());
        assert!(d.active_gesture().is_none());
        assert!(d.hover_session().is_none());
        assert!(d.coalescing_keys().is_empty());
    }

    #[test]
    fn gesture_key_tracks_the_open_gesture() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        assert_eq!(d.gesture_key(), None);
        d.handle_sample(&touch(SamplePhase::Down, 10.0, 1), &tree, &mut out)
            .unwrap();
        assert_eq!(d.gesture_key(), Some(CoalescingKey(0)));
        d.handle_sample(&touch(SamplePhase::PointerDown, 10.0, 2), &tree, &mut out)
            .unwrap();
        assert_eq!(d.gesture_key(), Some(CoalescingKey(1)));
    }

    // A stylus hovers while a finger taps; both interactions start at t=100.
    #[test]
    fn hover_survives_a_tap_with_the_same_start() {
        let stylus = |x, t| {
            RawSample::new(SamplePhase::HoverMove, Point::new(x, 0.0), Timestamp(t))
                .with_tool(ToolType::Stylus)
        };
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_sample(&stylus(10.0, 100), &tree, &mut out).unwrap();
        d.handle_sample(&touch(SamplePhase::Down, 60.0, 100), &tree, &mut out)
            .unwrap();
        d.handle_sample(&touch(SamplePhase::Up, 60.0, 101), &tree, &mut out)
            .unwrap();
        assert!(d.coalescing_keys().contains(Interaction::Hover(Timestamp(100))));
        assert!(!d.coalescing_keys().contains(Interaction::Gesture(Timestamp(100))));

        out.clear();
        d.handle_sample(&stylus(60.0, 102), &tree, &mut out).unwrap();
        d.handle_sample(&stylus(70.0, 103), &tree, &mut out).unwrap();
        assert_eq!(kinds(&out), vec![(Leave, B), (Move, A), (Move, A)]);
        assert_eq!(keys(&out), vec![None, Some(2), Some(2)]);
    }

    // The same sequence with the gesture opening first.
    #[test]
    fn tap_keys_survive_a_hover_with_the_same_start() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_sample(&touch(SamplePhase::Down, 10.0, 7), &tree, &mut out)
            .unwrap();
        d.handle_sample(&touch(SamplePhase::PointerDown, 10.0, 7), &tree, &mut out)
            .unwrap();
        d.handle_sample(&mouse(SamplePhase::HoverMove, 60.0, 7), &tree, &mut out)
            .unwrap();
        d.handle_sample(&mouse(SamplePhase::HoverMove, 150.0, 8), &tree, &mut out)
            .unwrap();
        let hover = d.hover_session().unwrap().id();
        assert_eq!(d.coalescing_keys().get(hover), Ok(CoalescingKey(2)));
        assert_eq!(d.gesture_key(), Some(CoalescingKey(1)));
        out.clear();
        d.handle_sample(&touch(SamplePhase::Move, 12.0, 9), &tree, &mut out)
            .unwrap();
        assert_eq!(keys(&out), vec![Some(1)]);
    }

    // A hit tester may report a hit with no nodes on it.
    #[test]
    fn empty_hit_path_is_a_no_op() {
        let empty = |_: Point| Some(HitPath::<u32>::new());
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        for phase in [
            SamplePhase::Down,
            SamplePhase::PointerDown,
            SamplePhase::Move,
            SamplePhase::Up,
            SamplePhase::Cancel,
        ] {
            d.handle_sample(&touch(phase, 10.0, 1), &empty, &mut out)
                .unwrap();
        }
        assert!(out.is_empty());
        assert!(d.active_gesture().is_none());
        assert!(d.coalescing_keys().is_empty());

        d.handle_hover_move(&mouse(SamplePhase::HoverMove, 10.0, 2), &empty, &mut out)
            .unwrap();
        d.handle_sample(&mouse(SamplePhase::HoverMove, 40.0, 3), &empty, &mut out)
            .unwrap();
        assert!(out.is_empty());
        assert!(d.active_gesture().is_none());
        // The session opened, but no path or position was recorded.
        let session = d.hover_session().unwrap();
        assert!(session.last_path().is_empty());
        assert_eq!(session.last_position(), None);
        assert_eq!(d.coalescing_keys().get(session.id()), Ok(CoalescingKey(0)));
    }

    #[test]
    fn contacts_follow_downs_and_ups() {
        let mut d = PointerDispatcher::new(SurfaceId(0));
        let mut out = Vec::new();
        d.handle_sample(&touch(SamplePhase::Down, 10.0, 1), &tree, &mut out)
            .unwrap();
        d.handle_sample(&touch(SamplePhase::PointerDown, 10.0, 2), &tree, &mut out)
            .unwrap();
        d.handle_sample(&touch(SamplePhase::PointerDown, 10.0, 3), &tree, &mut out)
            .unwrap();
        assert_eq!(d.active_gesture().map(|g| g.contacts), Some(3));
        for t in 4..7 {
            d.handle_sample(&touch(SamplePhase::PointerUp, 10.0, t), &tree, &mut out)
                .unwrap();
        }
        // An unmatched intermediate up is tolerated; the count stays at zero.
        assert_eq!(d.active_gesture().map(|g| g.contacts), Some(0));
        assert_eq!(d.gesture_key(), Some(CoalescingKey(5)));
    }
}
