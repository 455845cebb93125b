// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer dispatch basics.
//!
//! Feed a two-finger touch gesture through a `PointerDispatcher` over a small
//! box tree and print every event with its coalescing key.
//!
//! Run:
//! - `cargo run -p understory_demos --example pointer_basics`
//! - `RUST_LOG=debug cargo run -p understory_demos --example pointer_basics`

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_pointer::dispatcher::PointerDispatcher;
use understory_pointer::hit::path_from_parents;
use understory_pointer::path::HitPath;
use understory_pointer::sink::FnSink;
use understory_pointer::types::{
    PointerEvent, RawSample, SamplePhase, SurfaceId, Timestamp, ToolType,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Node {
    Window,
    Toolbar,
    Canvas,
    Button,
}

const LAYOUT: [(Node, Option<Node>, Rect); 4] = [
    (Node::Window, None, Rect::new(0.0, 0.0, 400.0, 300.0)),
    (Node::Toolbar, Some(Node::Window), Rect::new(0.0, 0.0, 400.0, 40.0)),
    (Node::Button, Some(Node::Toolbar), Rect::new(8.0, 8.0, 72.0, 32.0)),
    (Node::Canvas, Some(Node::Window), Rect::new(0.0, 40.0, 400.0, 300.0)),
];

fn parent(node: Node) -> Option<Node> {
    LAYOUT.iter().find(|(n, ..)| *n == node).and_then(|(_, p, _)| *p)
}

// Deepest node under the point: the last match in layout order.
fn hit(pt: Point) -> Option<HitPath<Node>> {
    let target = LAYOUT
        .iter()
        .filter(|(_, _, r)| r.contains(pt))
        .max_by_key(|(n, ..)| depth(*n))?
        .0;
    Some(path_from_parents(target, |n| parent(*n)))
}

fn depth(node: Node) -> usize {
    core::iter::successors(Some(node), |n| parent(*n)).count()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut dispatcher = PointerDispatcher::new(SurfaceId(1));
    let mut sink = FnSink(|ev: PointerEvent<Node>| {
        let key = ev
            .coalescing_key()
            .map(|k| format!(" key={}", k.0))
            .unwrap_or_default();
        println!(
            "{:<14} {:?} @ {:?}{key}",
            ev.kind().as_str(),
            ev.target(),
            ev.sample().position
        );
    });

    let touch = |phase, x, y, t| {
        RawSample::new(phase, Point::new(x, y), Timestamp(t)).with_tool(ToolType::Finger)
    };
    let samples = [
        touch(SamplePhase::Down, 200.0, 150.0, 1_000),
        touch(SamplePhase::Move, 204.0, 152.0, 1_016),
        touch(SamplePhase::PointerDown, 204.0, 152.0, 1_020),
        touch(SamplePhase::Move, 210.0, 160.0, 1_032),
        touch(SamplePhase::Move, 216.0, 168.0, 1_048),
        touch(SamplePhase::PointerUp, 216.0, 168.0, 1_060),
        touch(SamplePhase::Move, 220.0, 170.0, 1_064),
        touch(SamplePhase::Up, 220.0, 170.0, 1_080),
        // A tap on the toolbar button.
        touch(SamplePhase::Down, 20.0, 20.0, 2_000),
        touch(SamplePhase::Up, 20.0, 20.0, 2_050),
        // Out of order: a move with no gesture is reported, not dispatched.
        touch(SamplePhase::Move, 20.0, 20.0, 2_100),
    ];

    for sample in &samples {
        if let Err(err) = dispatcher.handle_sample(sample, &hit, &mut sink) {
            println!("rejected: {err}");
        }
    }
}
