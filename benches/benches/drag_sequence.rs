// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use dropstory::{DragDrop, DragDropOptions, InputEvent};
use dropstory_tree::{ElementId, LocalElement, Tree};
use kurbo::{Point, Rect, Vec2};

/// Two side-by-side zones of 400x400; the left one holds `cards` 30x30 cards.
fn build(cards: usize, options: DragDropOptions) -> (DragDrop, Vec<ElementId>) {
    let mut tree = Tree::new();
    let body = tree.insert(None, LocalElement::with_bounds(Rect::new(0.0, 0.0, 800.0, 400.0)));
    let left = tree.insert(
        Some(body),
        LocalElement::with_bounds(Rect::new(0.0, 0.0, 400.0, 400.0)).class("zone"),
    );
    tree.insert(
        Some(body),
        LocalElement::with_bounds(Rect::new(400.0, 0.0, 800.0, 400.0)).class("zone"),
    );
    let ids = (0..cards)
        .map(|_| {
            tree.insert(
                Some(left),
                LocalElement::with_bounds(Rect::new(0.0, 0.0, 30.0, 30.0)).class("card"),
            )
        })
        .collect();
    let dd = DragDrop::new(tree, options).expect("board is well formed");
    (dd, ids)
}

fn drag_once(dd: &mut DragDrop, card: ElementId, steps: usize) {
    let start = dd.tree().bounding_rect(card).unwrap_or(Rect::ZERO).origin();
    dd.handle_input(&InputEvent::pointer_down(card, start + Vec2::new(5.0, 5.0)));
    for i in 0..steps {
        let t = i as f64 / steps as f64;
        dd.handle_input(&InputEvent::pointer_move(Point::new(10.0 + 580.0 * t, 200.0)));
    }
    black_box(dd.handle_input(&InputEvent::pointer_up(Point::new(600.0, 200.0))));
}

fn bench_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag");
    for &cards in &[8_usize, 64] {
        group.bench_function(format!("plain_c{}", cards), |b| {
            b.iter_batched(
                || build(cards, DragDropOptions::new("card").dropzones("zone")),
                |(mut dd, ids)| drag_once(&mut dd, ids[0], 32),
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("ghost_stacking_c{}", cards), |b| {
            b.iter_batched(
                || {
                    build(
                        cards,
                        DragDropOptions::new("card")
                            .dropzones("zone")
                            .ghost(true)
                            .stacking(true),
                    )
                },
                |(mut dd, ids)| drag_once(&mut dd, ids[0], 32),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_drag);
criterion_main!(benches);
