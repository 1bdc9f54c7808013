// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use dropstory_tree::{ElementId, LocalElement, QueryFilter, StackDirection, StackLayout, Tree};
use kurbo::{Point, Rect};

/// Body with `zones` stacked zones, each holding `per_zone` 20x20 cards.
fn build_board(zones: usize, per_zone: usize) -> (Tree, Vec<ElementId>) {
    let mut tree = Tree::new();
    let body = tree.insert(None, LocalElement::with_bounds(Rect::new(0.0, 0.0, 2000.0, 2000.0)));
    let mut cards = Vec::with_capacity(zones * per_zone);
    for z in 0..zones {
        let y0 = z as f64 * 60.0;
        let zone = tree.insert(
            Some(body),
            LocalElement::with_bounds(Rect::new(0.0, y0, 2000.0, y0 + 50.0)).class("zone"),
        );
        tree.update_style(zone, |s| {
            s.stack = Some(StackLayout {
                direction: StackDirection::Horizontal,
                gap: 5.0,
                wrap: true,
            });
        });
        for _ in 0..per_zone {
            cards.push(tree.insert(
                Some(zone),
                LocalElement::with_bounds(Rect::new(0.0, 0.0, 20.0, 20.0)).class("card"),
            ));
        }
    }
    let _ = tree.commit();
    (tree, cards)
}

fn bench_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit");
    for &(zones, per_zone) in &[(10, 10), (30, 30)] {
        group.bench_function(format!("layout_z{}_c{}", zones, per_zone), |b| {
            b.iter_batched(
                || build_board(zones, per_zone),
                |(mut tree, cards)| {
                    for card in cards.iter().step_by(7) {
                        tree.update_style(*card, |s| s.left = Some(3.0));
                    }
                    black_box(tree.commit());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test");
    for &(zones, per_zone) in &[(10, 10), (30, 30)] {
        let (tree, cards) = build_board(zones, per_zone);
        let probes: Vec<Point> = (0..64)
            .map(|i| Point::new((i * 29 % 1000) as f64, (i * 17 % (zones * 60)) as f64))
            .collect();
        group.bench_function(format!("pointer_z{}_c{}", zones, per_zone), |b| {
            b.iter(|| {
                for p in &probes {
                    black_box(tree.hit_test_point(*p, QueryFilter::POINTER));
                }
            });
        });
        let excluded = cards[0];
        group.bench_function(format!("excluding_z{}_c{}", zones, per_zone), |b| {
            b.iter(|| {
                for p in &probes {
                    black_box(tree.hit_test_point(*p, QueryFilter::POINTER.excluding(excluded)));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_commit, bench_hit_test);
criterion_main!(benches);
