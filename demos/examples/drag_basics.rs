// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag a card between two dropzones with stacking enabled.
//!
//! Run:
//! - `RUST_LOG=dropstory=debug cargo run -p dropstory_demos --example drag_basics`

use dropstory::{DragDrop, DragDropOptions, InputEvent, NotificationKind};
use dropstory_tree::{LocalElement, Tree};
use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree = Tree::new();
    let body = tree.insert(None, LocalElement::with_bounds(Rect::new(0.0, 0.0, 640.0, 480.0)));
    let board = tree.insert(
        Some(body),
        LocalElement::with_bounds(Rect::new(20.0, 20.0, 620.0, 460.0)).class("board"),
    );
    let todo = tree.insert(
        Some(board),
        LocalElement::with_bounds(Rect::new(0.0, 0.0, 280.0, 440.0)).class("column"),
    );
    let done = tree.insert(
        Some(board),
        LocalElement::with_bounds(Rect::new(320.0, 0.0, 600.0, 440.0)).class("column"),
    );
    let cards: Vec<_> = (0..3)
        .map(|_| {
            tree.insert(
                Some(todo),
                LocalElement::with_bounds(Rect::new(0.0, 0.0, 120.0, 40.0)).class("card"),
            )
        })
        .collect();

    let mut dd = DragDrop::new(
        tree,
        DragDropOptions::new("card")
            .dropzones("column")
            .play_area("board")
            .stacking(true),
    )
    .expect("board markup is valid");

    println!("== Before ==");
    for card in &cards {
        println!("  {:?} at {:?}", card, dd.tree().bounding_rect(*card));
    }

    // Grab the second card and drop it in the right-hand column.
    let grab = dd.tree().bounding_rect(cards[1]).unwrap_or(Rect::ZERO).center();
    dd.handle_input(&InputEvent::pointer_down(cards[1], grab));
    for x in [200.0, 300.0, 400.0, 450.0] {
        dd.handle_input(&InputEvent::pointer_move(Point::new(x, 100.0)));
    }
    let response = dd.handle_input(&InputEvent::pointer_up(Point::new(450.0, 100.0)));
    println!("== Outcome ==\n  {:?}", response.outcome);

    println!("== Notifications ==");
    for n in dd.take_notifications() {
        println!("  {:?} on {:?}", n.kind, n.target);
        if n.kind == NotificationKind::Drop {
            assert_eq!(n.target, done);
        }
    }

    println!("== After ==");
    for card in &cards {
        println!(
            "  {:?} in {:?} at {:?}",
            card,
            dd.tree().parent(*card),
            dd.tree().bounding_rect(*card)
        );
    }
    assert_eq!(dd.tree().parent(cards[1]), Some(done));
}
