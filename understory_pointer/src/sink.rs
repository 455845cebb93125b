// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event sink seam.
//!
//! The dispatcher hands each [`PointerEvent`] to an [`EventSink`] synchronously,
//! in emission order. Collect into a `Vec` or wrap a closure with [`FnSink`]:
//!
//! ```
//! use kurbo::Point;
//! use understory_pointer::sink::{EventSink, FnSink};
//! use understory_pointer::types::{
//!     PointerEvent, PointerKind, RawSample, SamplePhase, SurfaceId, Timestamp,
//! };
//!
//! let mut seen: Vec<PointerKind> = Vec::new();
//! let mut sink = FnSink(|ev: PointerEvent<u32>| seen.push(ev.kind()));
//! let sample = RawSample::new(SamplePhase::Down, Point::ZERO, Timestamp(1));
//! sink.emit(PointerEvent::new(PointerKind::Down, SurfaceId(0), 7, sample));
//! assert_eq!(seen, [PointerKind::Down]);
//! ```

use alloc::vec::Vec;

use crate::types::PointerEvent;

/// Receiver of emitted pointer events.
pub trait EventSink<K, M = ()> {
    /// Take ownership of one event.
    fn emit(&mut self, event: PointerEvent<K, M>);
}

impl<K, M> EventSink<K, M> for Vec<PointerEvent<K, M>> {
    #[inline]
    fn emit(&mut self, event: PointerEvent<K, M>) {
        self.push(event);
    }
}

impl<K, M, S: EventSink<K, M> + ?Sized> EventSink<K, M> for &mut S {
    #[inline]
    fn emit(&mut self, event: PointerEvent<K, M>) {
        (**self).emit(event);
    }
}

/// Adapt a closure into an [`EventSink`].
#[derive(Debug)]
pub struct FnSink<F>(pub F);

impl<K, M, F: FnMut(PointerEvent<K, M>)> EventSink<K, M> for FnSink<F> {
    #[inline]
    fn emit(&mut self, event: PointerEvent<K, M>) {
        (self.0)(event);
    }
}

/// A sink that drops everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullSink;

impl<K, M> EventSink<K, M> for NullSink {
    #[inline]
    fn emit(&mut self, _event: PointerEvent<K, M>) {}
}
