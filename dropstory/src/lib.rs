// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dropstory: pointer-driven drag and drop over a retained element tree.
//!
//! ## Overview
//!
//! This crate moves elements of a [`dropstory_tree::Tree`] between dropzones in
//! response to pointer and touch input. It does not render anything. The host
//! owns the event loop, feeds raw [`InputEvent`]s in, and drains
//! [`Notification`]s out.
//!
//! ## Pieces
//!
//! - [`InputNormalizer`]: binds draggable elements and folds pointer and touch
//!   events into start / update / end gestures with a single position.
//! - [`DragEngine`]: the session state machine. Grabs at an offset, follows the
//!   pointer inside the play area, optionally through a ghost proxy, and decides
//!   where the element lands.
//! - [`DropzoneRegistry`]: the ordered dropzone set, with closest-zone lookup,
//!   highlighting, stacking, and the drop itself.
//! - [`StyleApplicator`]: the presentation hooks; [`InlineStyles`] writes inline
//!   styles into the tree.
//! - [`DragDrop`]: the facade wiring all of it to an owned tree.
//!
//! ## Landing rules
//!
//! On release the engine probes the element under the pointer, looking through
//! the dragged element and anything with pointer events disabled:
//!
//! - Inside a dropzone that accepts drops: the element joins it.
//! - Elsewhere, with `restrict_to_dropzones`: the element returns to the dropzone
//!   it came from, or to the play area if that zone is gone.
//! - Elsewhere, otherwise: the element stays where it was dropped, absolutely
//!   positioned in the play area.
//!
//! ## Minimal example
//!
//! ```
//! use dropstory::{DragDrop, DragDropOptions, DropOutcome, InputEvent, NotificationKind};
//! use dropstory_tree::{LocalElement, Tree};
//! use kurbo::{Point, Rect};
//!
//! let mut tree = Tree::new();
//! let body = tree.insert(None, LocalElement::with_bounds(Rect::new(0.0, 0.0, 400.0, 200.0)));
//! let left = tree.insert(
//!     Some(body),
//!     LocalElement::with_bounds(Rect::new(0.0, 0.0, 200.0, 200.0)).class("zone"),
//! );
//! let right = tree.insert(
//!     Some(body),
//!     LocalElement::with_bounds(Rect::new(200.0, 0.0, 400.0, 200.0)).class("zone"),
//! );
//! let card = tree.insert(
//!     Some(left),
//!     LocalElement::with_bounds(Rect::new(0.0, 0.0, 40.0, 40.0)).class("card"),
//! );
//!
//! let mut dd = DragDrop::new(tree, DragDropOptions::new("card").dropzones("zone")).unwrap();
//! dd.handle_input(&InputEvent::pointer_down(card, Point::new(10.0, 10.0)));
//! dd.handle_input(&InputEvent::pointer_move(Point::new(300.0, 100.0)));
//! let done = dd.handle_input(&InputEvent::pointer_up(Point::new(300.0, 100.0)));
//!
//! assert_eq!(done.outcome, Some(DropOutcome::Dropzone(right)));
//! assert_eq!(dd.tree().parent(card), Some(right));
//! let kinds: Vec<_> = dd.take_notifications().iter().map(|n| n.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         NotificationKind::DragStart,
//!         NotificationKind::Drop,
//!         NotificationKind::DragEnter,
//!         NotificationKind::DragLeave,
//!     ]
//! );
//! ```
//!
//! Diagnostics go through `tracing`; install a subscriber to see them.

pub mod config;
pub mod engine;
pub mod input;
pub mod notify;
pub mod registry;
pub mod style;

mod context;
mod error;
mod facade;

pub use config::DragConfig;
pub use context::DragContext;
pub use engine::{DragEngine, DragPhase, DragSession, DropOutcome};
pub use error::{ConfigError, DragError};
pub use facade::{DragDrop, DragDropOptions, DragDropUpdate, InputResponse};
pub use input::{Gesture, InputEvent, InputNormalizer};
pub use notify::{Notification, NotificationKind};
pub use registry::DropzoneRegistry;
pub use style::{InlineStyles, StyleApplicator};
