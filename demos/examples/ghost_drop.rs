// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ghost dragging, restricted drops, and touch input.
//!
//! The first drag ends outside every dropzone and snaps back home. The second,
//! driven by touch events, lands in the tray.
//!
//! Run:
//! - `RUST_LOG=dropstory=debug cargo run -p dropstory_demos --example ghost_drop`

use dropstory::{DragDrop, DragDropOptions, DropOutcome, InputEvent};
use dropstory_tree::{LocalElement, Tree};
use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree = Tree::new();
    let body = tree.insert(None, LocalElement::with_bounds(Rect::new(0.0, 0.0, 500.0, 500.0)));
    let shelf = tree.insert(
        Some(body),
        LocalElement::with_bounds(Rect::new(0.0, 0.0, 500.0, 100.0)).class("slot"),
    );
    let tray = tree.insert(
        Some(body),
        LocalElement::with_bounds(Rect::new(0.0, 400.0, 500.0, 500.0)).class("slot"),
    );
    let token = tree.insert(
        Some(shelf),
        LocalElement::with_bounds(Rect::new(10.0, 10.0, 60.0, 60.0)).class("token"),
    );

    let mut dd = DragDrop::new(
        tree,
        DragDropOptions::new("token")
            .dropzones("slot")
            .ghost(true)
            .restrict_to_dropzones(true),
    )
    .expect("markup is valid");

    // Pointer drag into the empty middle band: restricted, so it returns home.
    dd.handle_input(&InputEvent::pointer_down(token, Point::new(20.0, 20.0)));
    let ghost = dd.session().and_then(|s| s.ghost());
    let opacity = dd.tree().style(token).map(|s| s.opacity);
    println!("== Ghost ==\n  {ghost:?} (source opacity {opacity:?})");
    dd.handle_input(&InputEvent::pointer_move(Point::new(250.0, 250.0)));
    let first = dd.handle_input(&InputEvent::pointer_up(Point::new(250.0, 250.0)));
    println!("== First drop ==\n  {:?}", first.outcome);
    assert_eq!(first.outcome, Some(DropOutcome::ReturnedToOrigin(shelf)));

    // Touch drag into the tray.
    let start = dd.handle_input(&InputEvent::touch_start(token, Point::new(20.0, 20.0)));
    assert!(start.prevent_default);
    dd.handle_input(&InputEvent::touch_move(Point::new(200.0, 450.0)));
    let second = dd.handle_input(&InputEvent::touch_end(Point::new(200.0, 450.0)));
    println!("== Second drop ==\n  {:?}", second.outcome);
    assert_eq!(second.outcome, Some(DropOutcome::Dropzone(tray)));

    for n in dd.take_notifications() {
        println!("  {:?} on {:?}", n.kind, n.target);
    }
}
