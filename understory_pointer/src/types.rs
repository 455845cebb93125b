// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core value types: raw input samples, pointer event kinds, and emitted events.
//!
//! ## Overview
//!
//! A [`RawSample`] is what the platform hands in: a position, a discrete
//! [`SamplePhase`], a timestamp, and whether the originating device reports
//! hover on its own. A [`PointerEvent`] is what the
//! [`PointerDispatcher`](crate::dispatcher::PointerDispatcher) hands out: a
//! semantic [`PointerKind`] addressed to one node of the hit path.

use kurbo::Point;

/// Event time of a raw sample, in the platform's monotonic clock units.
///
/// The timestamp of the first sample of a gesture (or hover interaction) is
/// also its identity in the [`CoalescingKeyTable`](crate::coalesce::CoalescingKeyTable).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub u64);

/// Identifier of the surface (root view) a dispatcher serves.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub i32);

/// Batch tag stamped on move events.
///
/// Consumers group consecutive moves carrying the same key into one batch.
/// The key is 16 bits wide and wraps; compare keys for equality only.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoalescingKey(pub u16);

/// Class of device that produced a sample.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ToolType {
    /// A finger on a touch screen.
    Finger,
    /// A stylus tip.
    Stylus,
    /// A mouse or trackpad.
    Mouse,
    /// The eraser end of a stylus.
    Eraser,
    /// The platform did not report a tool.
    #[default]
    Unknown,
}

impl ToolType {
    /// Whether this device class reports its own hover enter/exit.
    ///
    /// Such devices get enter/leave from hover moves rather than around each
    /// contact gesture.
    pub const fn supports_hover(self) -> bool {
        matches!(self, Self::Mouse | Self::Stylus)
    }
}

/// Discrete phase of a raw sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SamplePhase {
    /// First contact of a gesture goes down.
    Down,
    /// An additional contact goes down while others are already down.
    PointerDown,
    /// One or more contacts moved.
    Move,
    /// A contact lifts while others remain down.
    PointerUp,
    /// The last contact lifts.
    Up,
    /// The platform aborted the gesture.
    Cancel,
    /// A hovering device entered the surface.
    HoverEnter,
    /// A hovering device moved without contact.
    HoverMove,
    /// A hovering device left the surface.
    HoverExit,
    /// A platform action this dispatcher does not know about.
    Other(u32),
}

/// A raw, platform-level input sample.
///
/// `M` is an opaque payload (pressure, pointer ids, the native event handle)
/// that is cloned into every [`PointerEvent`] produced for the sample.
#[derive(Clone, Debug, PartialEq)]
pub struct RawSample<M = ()> {
    /// Discrete phase of this sample.
    pub phase: SamplePhase,
    /// Position in the surface's reference frame.
    pub position: Point,
    /// Event time.
    pub timestamp: Timestamp,
    /// Device class that produced the sample.
    pub tool: ToolType,
    /// Whether the device reports native hover enter/exit.
    ///
    /// Defaults to [`ToolType::supports_hover`] for the sample's tool.
    pub supports_hover: bool,
    /// Caller payload.
    pub meta: M,
}

impl RawSample<()> {
    /// Create a sample from an unknown tool with no payload.
    pub fn new(phase: SamplePhase, position: Point, timestamp: Timestamp) -> Self {
        Self::with_meta(phase, position, timestamp, ())
    }
}

impl<M> RawSample<M> {
    /// Create a sample carrying `meta`.
    pub fn with_meta(phase: SamplePhase, position: Point, timestamp: Timestamp, meta: M) -> Self {
        Self {
            phase,
            position,
            timestamp,
            tool: ToolType::Unknown,
            supports_hover: ToolType::Unknown.supports_hover(),
            meta,
        }
    }

    /// Set the tool and derive hover support from it.
    #[must_use]
    pub fn with_tool(mut self, tool: ToolType) -> Self {
        self.tool = tool;
        self.supports_hover = tool.supports_hover();
        self
    }

    /// Override the device hover capability reported for this sample.
    #[must_use]
    pub fn with_hover_support(mut self, supports_hover: bool) -> Self {
        self.supports_hover = supports_hover;
        self
    }
}

/// Semantic kind of an emitted pointer event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// The pointer entered a node (outer→inner).
    Enter,
    /// The pointer left a node (inner→outer).
    Leave,
    /// A contact went down on the target.
    Down,
    /// The pointer moved over the target.
    Move,
    /// A contact lifted from the target.
    Up,
    /// The gesture was aborted.
    Cancel,
}

impl PointerKind {
    /// DOM name of this event kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enter => "pointerenter",
            Self::Leave => "pointerleave",
            Self::Down => "pointerdown",
            Self::Move => "pointermove",
            Self::Up => "pointerup",
            Self::Cancel => "pointercancel",
        }
    }

    /// Whether handlers see this kind in a bubble phase.
    ///
    /// Enter and leave are addressed to each node of a path individually
    /// and do not bubble.
    pub const fn bubbles(self) -> bool {
        !matches!(self, Self::Enter | Self::Leave)
    }
}

/// A pointer event addressed to one node.
///
/// Produced by the [`PointerDispatcher`](crate::dispatcher::PointerDispatcher)
/// and handed by value to an [`EventSink`](crate::sink::EventSink).
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent<K, M = ()> {
    kind: PointerKind,
    surface: SurfaceId,
    target: K,
    sample: RawSample<M>,
    coalescing_key: Option<CoalescingKey>,
}

impl<K, M> PointerEvent<K, M> {
    /// Create an event without a coalescing key.
    pub fn new(kind: PointerKind, surface: SurfaceId, target: K, sample: RawSample<M>) -> Self {
        Self {
            kind,
            surface,
            target,
            sample,
            coalescing_key: None,
        }
    }

    /// Create a move event stamped with `key`.
    pub fn moved(surface: SurfaceId, target: K, sample: RawSample<M>, key: CoalescingKey) -> Self {
        Self {
            kind: PointerKind::Move,
            surface,
            target,
            sample,
            coalescing_key: Some(key),
        }
    }

    /// Event kind.
    pub fn kind(&self) -> PointerKind {
        self.kind
    }

    /// Surface the event was produced for.
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Node the event is addressed to.
    pub fn target(&self) -> &K {
        &self.target
    }

    /// The raw sample that produced this event.
    pub fn sample(&self) -> &RawSample<M> {
        &self.sample
    }

    /// Batch key; present only on [`PointerKind::Move`].
    pub fn coalescing_key(&self) -> Option<CoalescingKey> {
        self.coalescing_key
    }

    /// Take the parts of the event apart.
    pub fn into_parts(self) -> (PointerKind, K, RawSample<M>, Option<CoalescingKey>) {
        (self.kind, self.target, self.sample, self.coalescing_key)
    }
}
