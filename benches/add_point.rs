// Copyright 2025 the Gumo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks of per-sample hit testing.

#![expect(missing_docs, reason = "criterion emits undocumented functions")]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use gumo::{Element, Elements, PixelSession, Point, Rect, StrokeSession, TrailSampling, Vec2};

/// A grid of rectangles with a freehand stroke through each cell.
fn grid(n: usize) -> Elements {
    let mut scene = Elements::new();
    for i in 0..n {
        let x = (i % 32) as f64 * 40.0;
        let y = (i / 32) as f64 * 40.0;
        scene.push(Element::rectangle(format!("r{i}"), Rect::new(x, y, x + 30.0, y + 30.0)));
        let points = (0..64).map(|k| Vec2::new(f64::from(k) * 0.5, (f64::from(k) * 0.3).sin() * 10.0));
        scene.push(Element::free_draw(format!("f{i}"), (x, y + 15.0), points));
    }
    scene
}

fn trail() -> Vec<Point> {
    (0..200)
        .map(|i| {
            let t = f64::from(i) * 0.05;
            Point::new(t * 120.0, 300.0 + (t * 3.0).sin() * 250.0)
        })
        .collect()
}

fn bench_stroke(cc: &mut Criterion) {
    let trail = trail();
    for n in [64, 512] {
        let scene = grid(n);
        cc.bench_with_input(BenchmarkId::new("stroke gesture", n), &scene, |bb, scene| {
            bb.iter(|| {
                let mut session = StrokeSession::new();
                session.start_path(trail[0], 2.0);
                for &p in &trail[1..] {
                    black_box(session.add_point(black_box(p), false, scene));
                }
            });
        });
    }
}

fn bench_pixel(cc: &mut Criterion) {
    let trail = trail();
    for n in [64, 512] {
        let scene = grid(n);
        cc.bench_with_input(BenchmarkId::new("pixel gesture", n), &scene, |bb, scene| {
            bb.iter(|| {
                let mut session = PixelSession::new();
                session.start_path(trail[0], 10.0, TrailSampling::Points);
                for &p in &trail[1..] {
                    black_box(session.add_point(black_box(p), scene));
                }
                black_box(session.finalize(scene))
            });
        });
    }
}

criterion_group!(benches, bench_stroke, bench_pixel);
criterion_main!(benches);
