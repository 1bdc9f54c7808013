// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dropstory Tree: a Kurbo-native retained element tree.
//!
//! Dropstory Tree is the page model that the `dropstory` drag engine operates on.
//!
//! - Represents a hierarchy of elements with generational handles, inline styles,
//!   marker classes, and host class names.
//! - Supports DOM-like structural edits: [`Tree::append_child`], [`Tree::detach`],
//!   [`Tree::remove`], and deep [`Tree::clone_subtree`].
//! - Computes world-space rectangles in a [`Tree::commit`] step that yields coarse damage.
//! - Answers point hit tests honouring pointer-events, z-index, and paint order.
//!
//! ## Layout
//!
//! This crate is not a general layout engine. Each element carries its rendered size
//! and a flow offset inside its parent, computed upstream. On top of that,
//! [`Tree::commit`] resolves the few positioning rules drag and drop relies on:
//!
//! - `Static` elements sit at their flow offset.
//! - `Relative` elements shift by `left`/`top` and become containing blocks.
//! - `Absolute` elements sit at `left`/`top` from the nearest positioned ancestor.
//! - A parent with a [`StackLayout`] arranges its in-flow children along one axis
//!   with a gap, wrapping onto a new line when the next child would overflow.
//!
//! ## Documents and detached elements
//!
//! Elements inserted without a parent are document roots; the first one plays the
//! role of the page body ([`Tree::document`]). Elements that are detached, or
//! freshly cloned, are not part of any document: they are not laid out, report a
//! zero bounding rectangle, and are never hit.
//!
//! ## API overview
//!
//! - [`Tree`]: container managing elements, layout, and queries.
//! - [`LocalElement`]: per-element local data (flow bounds, style, marks, class names).
//! - [`Style`]: inline presentation, see [`Position`], [`Cursor`], [`PointerEvents`].
//! - [`Marks`]: marker classes interpreted by the drag engine.
//! - [`ElementId`]: generational handle of an element.
//! - [`QueryFilter`]: restricts hit results (pickable only, excluded subtree).
//!
//! ## Minimal usage
//!
//! ```
//! use dropstory_tree::{LocalElement, Position, QueryFilter, Tree};
//! use kurbo::{Point, Rect};
//!
//! let mut tree = Tree::new();
//! let body = tree.insert(None, LocalElement::with_bounds(Rect::new(0.0, 0.0, 400.0, 300.0)));
//! let card = tree.insert(
//!     Some(body),
//!     LocalElement::with_bounds(Rect::new(10.0, 10.0, 60.0, 60.0)).class("card"),
//! );
//! let _ = tree.commit();
//!
//! // Take the card out of flow and move it.
//! tree.update_style(card, |s| {
//!     s.position = Position::Absolute;
//!     s.left = Some(200.0);
//!     s.top = Some(100.0);
//! });
//! let damage = tree.commit();
//! assert!(damage.union_rect().is_some());
//!
//! let hit = tree.hit_test_point(Point::new(210.0, 110.0), QueryFilter::POINTER).unwrap();
//! assert_eq!(hit.element, card);
//! assert_eq!(tree.query_class(body, "card"), vec![card]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod damage;
mod error;
mod style;
mod tree;
mod types;

pub use damage::Damage;
pub use error::TreeError;
pub use style::{Cursor, PointerEvents, Position, StackDirection, StackLayout, Style};
pub use tree::{Hit, QueryFilter, Tree};
pub use types::{ElementId, LocalElement, Marks};
