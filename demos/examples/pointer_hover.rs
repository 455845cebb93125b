// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover enter/leave from path changes.
//!
//! Sweep a mouse across a grid of cells and print the enter/leave/move events
//! the dispatcher derives from each change of hit path. Small wiggles under
//! the jitter threshold produce nothing.
//!
//! Run:
//! - `cargo run -p understory_demos --example pointer_hover`

use kurbo::Point;
use understory_pointer::dispatcher::{DispatcherConfig, PointerDispatcher};
use understory_pointer::path::HitPath;
use understory_pointer::types::{
    PointerEvent, PointerKind, RawSample, SamplePhase, SurfaceId, Timestamp, ToolType,
};

// Rows of three 100x100 cells; ids are "row.col" under a row node under the root.
fn hit(pt: Point) -> Option<HitPath<&'static str>> {
    const CELLS: [[&str; 3]; 2] = [["0.0", "0.1", "0.2"], ["1.0", "1.1", "1.2"]];
    const ROWS: [&str; 2] = ["row0", "row1"];
    if pt.x < 0.0 || pt.y < 0.0 {
        return None;
    }
    let row = (pt.y / 100.0) as usize;
    let col = (pt.x / 100.0) as usize;
    let cell = CELLS.get(row)?.get(col)?;
    Some(HitPath::from_root_path(&["root", ROWS[row], *cell]))
}

fn main() {
    let config = DispatcherConfig::default().with_hover_epsilon(2.0);
    let mut dispatcher = PointerDispatcher::with_config(SurfaceId(0), config);
    let mut out: Vec<PointerEvent<&str>> = Vec::new();

    let path = [
        (50.0, 50.0),
        (51.0, 50.5), // jitter
        (150.0, 50.0),
        (150.0, 150.0),
        (250.0, 150.0),
        (350.0, 150.0), // off the grid
        (250.0, 60.0),
    ];
    for (t, (x, y)) in path.into_iter().enumerate() {
        let sample = RawSample::new(SamplePhase::HoverMove, Point::new(x, y), Timestamp(t as u64))
            .with_tool(ToolType::Mouse);
        out.clear();
        if let Err(err) = dispatcher.handle_sample(&sample, &hit, &mut out) {
            println!("rejected: {err}");
        }
        let line: Vec<String> = out
            .iter()
            .map(|e| match e.kind() {
                PointerKind::Move => format!("move {} (key {})", e.target(), key(e)),
                k => format!("{} {}", k.as_str().trim_start_matches("pointer"), e.target()),
            })
            .collect();
        println!("({x:>5}, {y:>5}) -> [{}]", line.join(", "));
    }

    out.clear();
    let exit = RawSample::new(SamplePhase::HoverExit, Point::ZERO, Timestamp(100));
    if let Some(session) = dispatcher.end_hover(&exit, &mut out) {
        println!(
            "hover from t={} ended: {:?}",
            session.interaction().0,
            out.iter().map(|e| *e.target()).collect::<Vec<_>>()
        );
    }
}

fn key(e: &PointerEvent<&str>) -> u16 {
    e.coalescing_key().map_or(0, |k| k.0)
}
