// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll surface callbacks: a listener capability, fan-out forwarding, and interval snapping.
//!
//! A native scroll surface reports its lifecycle through [`ScrollListener`].
//! Register any number of listeners in a [`FanOut`] and install the registry
//! as the surface's only listener; it forwards every callback in registration
//! order. [`SnapToInterval`] is itself a listener that rewrites the resting
//! offset at the end of a drag.
//!
//! ```
//! use kurbo::{Point, Size, Vec2};
//! use understory_pointer::fanout::FanOut;
//! use understory_pointer::scroll::{ScrollAxis, ScrollListener, SnapToInterval};
//!
//! let mut listeners: FanOut<Box<dyn ScrollListener>> = FanOut::new();
//! listeners.add(Box::new(
//!     SnapToInterval::new(ScrollAxis::Vertical, 100.0)
//!         .with_extents(Size::new(320.0, 1000.0), Size::new(320.0, 400.0)),
//! ));
//!
//! // Flinging down from 130 toward 180 rests on the next interval.
//! let mut target = Point::new(0.0, 180.0);
//! listeners.will_end_dragging(Vec2::new(0.0, 2.0), &mut target);
//! assert_eq!(target, Point::new(0.0, 200.0));
//! ```

use alloc::boxed::Box;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `ceil`, `floor`, `round`
use kurbo::{Point, Size, Vec2};

use crate::fanout::FanOut;

/// Callbacks a scroll surface delivers over a drag/fling lifecycle.
///
/// Every method has an empty default so listeners implement only what they need.
pub trait ScrollListener {
    /// Content offset changed.
    fn did_scroll(&mut self, _offset: Point) {}
    /// A drag is about to start at `offset`.
    fn will_begin_dragging(&mut self, _offset: Point) {}
    /// A drag is ending with `velocity`; listeners may rewrite the resting `target`.
    fn will_end_dragging(&mut self, _velocity: Vec2, _target: &mut Point) {}
    /// A drag ended; `decelerate` tells whether a fling follows.
    fn did_end_dragging(&mut self, _decelerate: bool) {}
    /// The fling came to rest at `offset`.
    fn did_end_decelerating(&mut self, _offset: Point) {}
    /// Zoom scale changed.
    fn did_zoom(&mut self, _scale: f64) {}
}

impl<L: ScrollListener + ?Sized> ScrollListener for Box<L> {
    fn did_scroll(&mut self, offset: Point) {
        (**self).did_scroll(offset);
    }
    fn will_begin_dragging(&mut self, offset: Point) {
        (**self).will_begin_dragging(offset);
    }
    fn will_end_dragging(&mut self, velocity: Vec2, target: &mut Point) {
        (**self).will_end_dragging(velocity, target);
    }
    fn did_end_dragging(&mut self, decelerate: bool) {
        (**self).did_end_dragging(decelerate);
    }
    fn did_end_decelerating(&mut self, offset: Point) {
        (**self).did_end_decelerating(offset);
    }
    fn did_zoom(&mut self, scale: f64) {
        (**self).did_zoom(scale);
    }
}

/// Forwards each callback to every registered listener, in registration order.
///
/// For [`will_end_dragging`](ScrollListener::will_end_dragging) each listener
/// sees the target as rewritten by the listeners before it.
impl<L: ScrollListener> ScrollListener for FanOut<L> {
    fn did_scroll(&mut self, offset: Point) {
        self.for_each(|l| l.did_scroll(offset));
    }
    fn will_begin_dragging(&mut self, offset: Point) {
        self.for_each(|l| l.will_begin_dragging(offset));
    }
    fn will_end_dragging(&mut self, velocity: Vec2, target: &mut Point) {
        self.for_each(|l| l.will_end_dragging(velocity, target));
    }
    fn did_end_dragging(&mut self, decelerate: bool) {
        self.for_each(|l| l.did_end_dragging(decelerate));
    }
    fn did_end_decelerating(&mut self, offset: Point) {
        self.for_each(|l| l.did_end_decelerating(offset));
    }
    fn did_zoom(&mut self, scale: f64) {
        self.for_each(|l| l.did_zoom(scale));
    }
}

/// Scroll direction a snapping policy applies to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollAxis {
    /// Snap the x offset.
    Horizontal,
    /// Snap the y offset.
    #[default]
    Vertical,
}

/// Where in the viewport a snap point lands.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SnapAlignment {
    /// Snap points align with the leading edge of the viewport.
    #[default]
    Start,
    /// Snap points align with the center of the viewport.
    Center,
    /// Snap points align with the trailing edge of the viewport.
    End,
}

/// Rest a drag on a multiple of a fixed interval.
///
/// The direction of the release velocity picks the neighbouring snap point:
/// positive rounds up, negative rounds down, zero rounds to the nearest. The
/// result is clamped to the scrollable range.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnapToInterval {
    /// Axis being snapped.
    pub axis: ScrollAxis,
    /// Distance between snap points; non-positive disables snapping.
    pub interval: f64,
    /// Viewport anchor of the snap points.
    pub alignment: SnapAlignment,
    /// Size of the scrollable content.
    pub content: Size,
    /// Size of the visible viewport.
    pub viewport: Size,
}

impl SnapToInterval {
    /// Snap `axis` to multiples of `interval`, with no extent limit yet.
    pub fn new(axis: ScrollAxis, interval: f64) -> Self {
        Self {
            axis,
            interval,
            alignment: SnapAlignment::Start,
            content: Size::new(f64::INFINITY, f64::INFINITY),
            viewport: Size::ZERO,
        }
    }

    /// Set the viewport anchor.
    #[must_use]
    pub fn with_alignment(mut self, alignment: SnapAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the content and viewport sizes used for clamping.
    #[must_use]
    pub fn with_extents(mut self, content: Size, viewport: Size) -> Self {
        self.content = content;
        self.viewport = viewport;
        self
    }

    /// Snap a one-dimensional resting offset given the release velocity along the axis.
    pub fn snap_offset(&self, target: f64, velocity: f64) -> f64 {
        if self.interval <= 0.0 || !self.interval.is_finite() {
            return target;
        }
        let (content, viewport) = match self.axis {
            ScrollAxis::Horizontal => (self.content.width, self.viewport.width),
            ScrollAxis::Vertical => (self.content.height, self.viewport.height),
        };
        let align = match self.alignment {
            SnapAlignment::Start => 0.0,
            SnapAlignment::Center => 0.5 * viewport - 0.5 * self.interval,
            SnapAlignment::End => viewport - self.interval,
        };

        let fractional = (target + align) / self.interval;
        let index = if velocity > 0.0 {
            fractional.ceil()
        } else if velocity < 0.0 {
            fractional.floor()
        } else {
            fractional.round()
        };
        let snapped = index * self.interval - align;
        let max = (content - viewport).max(0.0);
        snapped.max(0.0).min(max)
    }

    /// Snap a two-dimensional resting offset; only the configured axis changes.
    pub fn adjust(&self, velocity: Vec2, target: Point) -> Point {
        match self.axis {
            ScrollAxis::Horizontal => Point::new(self.snap_offset(target.x, velocity.x), target.y),
            ScrollAxis::Vertical => Point::new(target.x, self.snap_offset(target.y, velocity.y)),
        }
    }
}

impl ScrollListener for SnapToInterval {
    fn will_end_dragging(&mut self, velocity: Vec2, target: &mut Point) {
        *target = self.adjust(velocity, *target);
    }
}
