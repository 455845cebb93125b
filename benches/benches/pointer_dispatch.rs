// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::Point;
use understory_pointer::dispatcher::PointerDispatcher;
use understory_pointer::path::HitPath;
use understory_pointer::sink::NullSink;
use understory_pointer::types::{RawSample, SamplePhase, SurfaceId, Timestamp, ToolType};

/// A chain of `depth` nested nodes; the leaf id changes every 10 units of x.
fn nested(depth: u32) -> impl Fn(Point) -> Option<HitPath<u32>> {
    move |pt: Point| {
        let leaf = 1_000 + (pt.x / 10.0) as u32;
        Some(std::iter::once(leaf).chain((0..depth).rev()).collect())
    }
}

fn gesture(moves: usize) -> Vec<RawSample> {
    let touch = |phase, x: f64, t: u64| {
        RawSample::new(phase, Point::new(x, 0.0), Timestamp(t)).with_tool(ToolType::Finger)
    };
    let mut samples = Vec::with_capacity(moves + 2);
    samples.push(touch(SamplePhase::Down, 0.0, 0));
    for i in 0..moves {
        samples.push(touch(SamplePhase::Move, i as f64, i as u64 + 1));
    }
    samples.push(touch(SamplePhase::Up, moves as f64, moves as u64 + 1));
    samples
}

fn bench_touch_gesture(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointer/touch_gesture");
    for depth in [4_u32, 16, 64] {
        let hits = nested(depth);
        let samples = gesture(256);
        group.throughput(Throughput::Elements(samples.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &samples, |b, samples| {
            b.iter_batched(
                || PointerDispatcher::<u32>::new(SurfaceId(0)),
                |mut d| {
                    for s in samples {
                        d.handle_sample(s, &hits, &mut NullSink).unwrap();
                    }
                    black_box(d);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

// Every 5 samples the leaf changes, so this mixes plain moves with
// enter/leave divergence under a deep shared ancestry.
fn bench_hover_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointer/hover_sweep");
    for depth in [4_u32, 16, 64] {
        let hits = nested(depth);
        let samples: Vec<RawSample> = (0..1_000_u64)
            .map(|t| {
                RawSample::new(SamplePhase::HoverMove, Point::new(t as f64 * 2.0, 0.0), Timestamp(t))
                    .with_tool(ToolType::Mouse)
            })
            .collect();
        group.throughput(Throughput::Elements(samples.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &samples, |b, samples| {
            b.iter_batched(
                || PointerDispatcher::<u32>::new(SurfaceId(0)),
                |mut d| {
                    for s in samples {
                        d.handle_sample(s, &hits, &mut NullSink).unwrap();
                    }
                    black_box(d);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_divergence(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointer/divergence");
    for depth in [4_u32, 16, 64, 256] {
        let old: HitPath<u32> = std::iter::once(u32::MAX).chain((0..depth).rev()).collect();
        let new: HitPath<u32> = std::iter::once(u32::MAX - 1).chain((0..depth).rev()).collect();
        group.bench_with_input(BenchmarkId::from_parameter(depth), &(old, new), |b, (old, new)| {
            b.iter(|| black_box(new.divergence_from(old).common_suffix));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_touch_gesture,
    bench_hover_sweep,
    bench_divergence
);
criterion_main!(benches);
