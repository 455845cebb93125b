// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pointer --heading-base-level=0

//! Understory Pointer: a deterministic, `no_std` pointer-event dispatcher.
//!
//! ## Overview
//!
//! This crate turns a stream of raw, platform-level input samples (touch,
//! stylus, and mouse contacts with a position, a tool, and a phase such as
//! down/move/up/cancel/hover) into an ordered stream of semantic pointer
//! events (enter, leave, down, move, up, cancel) addressed to nodes of a view
//! hierarchy.
//! It does not perform hit testing. Instead, it asks a [`HitTester`](crate::hit::HitTester)
//! for the innermost-first [`HitPath`](crate::path::HitPath) under each sample and
//! hands every event it produces to an [`EventSink`](crate::sink::EventSink).
//!
//! ## Ordering
//!
//! - `enter` runs root→target (capture order), `leave` runs target→root (bubble order).
//!   For the same path, the leave sequence is the exact reverse of the enter sequence.
//! - On contact devices without native hover, `enter` fires once per gesture,
//!   before the first `down`, and `leave` fires once, after the last `up` or as part
//!   of a cancel.
//! - Hover-capable devices get enter/leave from path changes between hover moves
//!   instead, computed by comparing the old and new paths from their root ends.
//!
//! ## Coalescing keys
//!
//! Every move carries a [`CoalescingKey`](crate::types::CoalescingKey). The key of a
//! gesture stays the same across plain moves and advances on every structurally
//! significant event (additional contact down, intermediate contact up, hover path
//! change), so a consumer can merge a run of moves that share a key into one batch.
//! Keys live in a [`CoalescingKeyTable`](crate::coalesce::CoalescingKeyTable), one
//! entry per live gesture or hover interaction.
//!
//! ## Gesture claims
//!
//! A descendant that recognizes the gesture natively can claim it with
//! [`PointerDispatcher::claim_gesture`](crate::dispatcher::PointerDispatcher::claim_gesture).
//! The dispatcher emits one `cancel` and a `leave` for every node on the path, then
//! ignores samples until the claim is released. The first claimant wins.
//!
//! ## Workflow
//!
//! 1) Create one [`PointerDispatcher`](crate::dispatcher::PointerDispatcher) per surface.
//! 2) Feed every raw sample, in arrival order, to
//!    [`handle_sample`](crate::dispatcher::PointerDispatcher::handle_sample).
//! 3) Deliver the emitted events to your handlers, for example by routing
//!    `down`/`move`/`up`/`cancel` through a capture → target → bubble sequence.
//!
//! ```
//! use kurbo::Point;
//! use understory_pointer::dispatcher::PointerDispatcher;
//! use understory_pointer::path::HitPath;
//! use understory_pointer::types::{
//!     PointerEvent, PointerKind, RawSample, SamplePhase, SurfaceId, Timestamp, ToolType,
//! };
//!
//! // Two siblings (10, 20) under a root (1), split at x = 50.
//! let hits = |pt: Point| {
//!     let leaf = if pt.x < 50.0 { 10 } else { 20 };
//!     Some(HitPath::from_slice(&[leaf, 1_u32]))
//! };
//! let mut dispatcher = PointerDispatcher::new(SurfaceId(0));
//! let mut out: Vec<PointerEvent<u32>> = Vec::new();
//!
//! let hover = |x, t| {
//!     RawSample::new(SamplePhase::HoverMove, Point::new(x, 5.0), Timestamp(t))
//!         .with_tool(ToolType::Mouse)
//! };
//! dispatcher.handle_sample(&hover(10.0, 1), &hits, &mut out).unwrap();
//! out.clear();
//! dispatcher.handle_sample(&hover(60.0, 2), &hits, &mut out).unwrap();
//!
//! let seen: Vec<_> = out.iter().map(|e| (e.kind(), *e.target())).collect();
//! assert_eq!(seen, [
//!     (PointerKind::Enter, 20),
//!     (PointerKind::Leave, 10),
//!     (PointerKind::Move, 20),
//! ]);
//! ```
//!
//! ## Scroll surfaces
//!
//! The [`fanout`] and [`scroll`] modules let one native scroll surface serve several
//! listeners through a single callback slot, and provide an interval-snapping listener.
//!
//! ## Features
//!
//! - `std` (default): build Kurbo with `std`.
//! - `libm`: build Kurbo with `libm` for `no_std` targets.
//! - `tracing`: log dropped samples at `debug`/`trace` and contract violations at `warn`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod coalesce;
pub mod dispatcher;
pub mod error;
pub mod fanout;
pub mod hit;
pub mod path;
pub mod scroll;
pub mod sink;
pub mod types;
