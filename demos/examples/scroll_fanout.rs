// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll listener fan-out with interval snapping.
//!
//! A native scroll surface has one listener slot. Install a `FanOut` there,
//! then register a snapping policy and a logger behind it.
//!
//! Run:
//! - `cargo run -p understory_demos --example scroll_fanout`

use kurbo::{Point, Size, Vec2};
use understory_pointer::fanout::FanOut;
use understory_pointer::scroll::{ScrollAxis, ScrollListener, SnapAlignment, SnapToInterval};

#[derive(Debug, Default)]
struct Logger;

impl ScrollListener for Logger {
    fn did_scroll(&mut self, offset: Point) {
        println!("  scrolled to {offset:?}");
    }
    fn will_end_dragging(&mut self, velocity: Vec2, target: &mut Point) {
        println!("  drag ends with velocity {velocity:?}, resting at {target:?}");
    }
    fn did_end_decelerating(&mut self, offset: Point) {
        println!("  at rest: {offset:?}");
    }
}

fn main() {
    let mut listeners: FanOut<Box<dyn ScrollListener>> = FanOut::new();
    let snap = SnapToInterval::new(ScrollAxis::Horizontal, 320.0)
        .with_alignment(SnapAlignment::Center)
        .with_extents(Size::new(1600.0, 480.0), Size::new(360.0, 480.0));
    listeners.add(Box::new(snap));
    let logger = listeners.add(Box::new(Logger));

    for (release, velocity) in [(410.0, 1.5), (410.0, -1.5), (410.0, 0.0), (1500.0, 3.0)] {
        println!("fling released toward x={release}");
        listeners.will_begin_dragging(Point::new(release - 40.0, 0.0));
        listeners.did_scroll(Point::new(release, 0.0));
        let mut target = Point::new(release, 0.0);
        listeners.will_end_dragging(Vec2::new(velocity, 0.0), &mut target);
        listeners.did_end_dragging(true);
        listeners.did_end_decelerating(target);
    }

    listeners.remove(logger);
    println!("{} listener(s) left", listeners.len());
}
