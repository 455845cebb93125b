// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture claims.
//!
//! A list row receives a touch; after the finger travels far enough the
//! enclosing scroll view claims the gesture. The dispatcher cancels the row's
//! interaction and stays silent until the scroll view releases its claim.
//!
//! Run:
//! - `cargo run -p understory_demos --example pointer_claim`
//! - `RUST_LOG=understory_pointer=trace cargo run -p understory_demos --example pointer_claim`

use kurbo::Point;
use tracing_subscriber::EnvFilter;
use understory_pointer::dispatcher::PointerDispatcher;
use understory_pointer::error::PointerError;
use understory_pointer::path::HitPath;
use understory_pointer::types::{
    PointerEvent, RawSample, SamplePhase, SurfaceId, Timestamp, ToolType,
};

const ROOT: u32 = 0;
const SCROLL: u32 = 1;
const PAGER: u32 = 2;

fn hit(pt: Point) -> Option<HitPath<u32>> {
    let row = 100 + (pt.y / 44.0).max(0.0) as u32;
    Some(HitPath::from_slice(&[row, SCROLL, ROOT]))
}

fn touch(phase: SamplePhase, y: f64, t: u64) -> RawSample {
    RawSample::new(phase, Point::new(160.0, y), Timestamp(t)).with_tool(ToolType::Finger)
}

fn print(out: &mut Vec<PointerEvent<u32>>) {
    for e in out.drain(..) {
        println!("  {} -> {}", e.kind().as_str(), e.target());
    }
}

fn main() -> Result<(), PointerError<u32>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut dispatcher = PointerDispatcher::new(SurfaceId(0));
    let mut out = Vec::new();
    let touch_slop = 10.0;

    let start = 300.0;
    println!("down");
    dispatcher.handle_sample(&touch(SamplePhase::Down, start, 0), &hit, &mut out)?;
    print(&mut out);

    for (t, y) in [296.0, 288.0, 270.0, 240.0, 200.0].into_iter().enumerate() {
        let sample = touch(SamplePhase::Move, y, t as u64 + 1);
        if !dispatcher.is_suspended() && f64::abs(start - y) > touch_slop {
            println!("scroll view claims at y={y}");
            dispatcher.claim_gesture(SCROLL, &sample, &hit, &mut out)?;
            print(&mut out);
            continue;
        }
        println!("move y={y}");
        dispatcher.handle_sample(&sample, &hit, &mut out)?;
        print(&mut out);
    }

    // A nested pager also wants the gesture; the first claim wins.
    let late = touch(SamplePhase::Move, 200.0, 10);
    if let Err(err) = dispatcher.claim_gesture(PAGER, &late, &hit, &mut out) {
        println!("{err}");
    }

    dispatcher.handle_sample(&touch(SamplePhase::Up, 200.0, 11), &hit, &mut out)?;
    println!("up while claimed: {} events", out.len());

    if let Some(holder) = dispatcher.release_gesture() {
        println!("released by {holder}");
    }
    println!("tap");
    dispatcher.handle_sample(&touch(SamplePhase::Down, 20.0, 20), &hit, &mut out)?;
    dispatcher.handle_sample(&touch(SamplePhase::Up, 20.0, 21), &hit, &mut out)?;
    print(&mut out);
    Ok(())
}
