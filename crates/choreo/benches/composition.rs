#![forbid(unsafe_code)]

//! Benchmarks for building, lowering and scheduling animation trees.

use choreo::animate::{self, Tween};
use choreo::{Animation, Point, TimingCurve};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn build_leaves(count: usize) -> Vec<Animation> {
    (0..count)
        .map(|i| {
            let x = i as f64;
            animate::move_to(
                Tween::new(0.25)
                    .to(Point::new(x, x * 2.0))
                    .curve(TimingCurve::EaseInOutCubic),
            )
            .unwrap_or_else(|_| animate::wait(0.25))
        })
        .collect()
}

/// A balanced tree alternating sequence and group levels.
fn build_tree(depth: u32, fanout: usize) -> Animation {
    if depth == 0 {
        return animate::fade_in(0.1).unwrap_or_else(|_| animate::wait(0.1));
    }
    let children: Vec<Animation> = (0..fanout).map(|_| build_tree(depth - 1, fanout)).collect();
    if depth % 2 == 0 {
        animate::group(children).build()
    } else {
        animate::sequence(children)
            .build()
            .unwrap_or_else(|_| animate::wait(0.0))
    }
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("choreo/construct");

    for count in [10, 100, 1000] {
        let leaves = build_leaves(count);
        group.bench_with_input(BenchmarkId::new("sequence", count), &leaves, |b, leaves| {
            b.iter(|| black_box(animate::sequence(leaves).build()));
        });
        group.bench_with_input(BenchmarkId::new("group", count), &leaves, |b, leaves| {
            b.iter(|| black_box(animate::group(leaves).build()));
        });
    }

    group.bench_function("leaf", |b| {
        b.iter(|| black_box(animate::rotate_degrees(Tween::new(0.5).by(black_box(90.0)))));
    });

    group.finish();
}

fn bench_lowering(c: &mut Criterion) {
    let mut group = c.benchmark_group("choreo/lower");

    for depth in [2, 4, 6] {
        let tree = build_tree(depth, 3);
        group.bench_with_input(BenchmarkId::new("to_engine", depth), &tree, |b, tree| {
            b.iter(|| black_box(tree.to_engine()));
        });
        group.bench_with_input(BenchmarkId::new("schedule", depth), &tree, |b, tree| {
            b.iter(|| black_box(tree.schedule()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_construction, bench_lowering);
criterion_main!(benches);
