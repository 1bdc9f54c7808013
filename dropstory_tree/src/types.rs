// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the element tree: element identifiers, marks, and local geometry.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::Rect;

use crate::style::Style;

/// Identifier for an element in the tree.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `ElementId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct
///   `ElementId`.
///
/// Use [`Tree::is_alive`](crate::Tree::is_alive) to check whether an `ElementId` still refers to a
/// live element. Stale ids never alias a different live element because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Marker classes the drag engine reads and writes on elements.
    ///
    /// Free-form class names used for host-side lookups live in
    /// [`LocalElement::class_names`]; marks are the small fixed set the engine
    /// itself interprets.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Marks: u8 {
        /// Element is registered as draggable.
        const DRAGGABLE  = 0b0000_0001;
        /// Element is registered as a dropzone.
        const DROPZONE   = 0b0000_0010;
        /// Dropzone is highlighted while a drag is in progress.
        const HIGHLIGHT  = 0b0000_0100;
        /// Dropzone refuses elements returning to their origin.
        const RESTRICTED = 0b0000_1000;
    }
}

/// Local description of an element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocalElement {
    /// Flow bounds relative to the parent's origin.
    ///
    /// The origin is used when the parent does not stack its children; the size
    /// is always the element's rendered size.
    pub local_bounds: Rect,
    /// Inline presentation style.
    pub style: Style,
    /// Engine marker classes.
    pub marks: Marks,
    /// Host class names, used by [`Tree::query_class`](crate::Tree::query_class).
    pub class_names: Vec<String>,
}

impl LocalElement {
    /// An element with the given flow bounds and default style.
    pub fn with_bounds(local_bounds: Rect) -> Self {
        Self {
            local_bounds,
            ..Default::default()
        }
    }

    /// Builder-style helper adding a host class name.
    pub fn class(mut self, name: impl Into<String>) -> Self {
        self.class_names.push(name.into());
        self
    }

    /// Builder-style helper adding marks.
    pub fn marks(mut self, marks: Marks) -> Self {
        self.marks |= marks;
        self
    }
}
