// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use dropstory_tree::ElementId;

/// Why a drag could not start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DragError {
    /// A drag session is already active.
    #[error("a drag session is already active")]
    AlreadyDragging,
    /// The input event carries no target element.
    #[error("input event has no target element")]
    NoTarget,
    /// The element is stale or not attached to the document.
    #[error("element {0:?} is not attached to the document")]
    UnknownElement(ElementId),
}

/// Invalid or unresolvable [`DragDrop`](crate::DragDrop) options.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `draggable_class` is empty.
    #[error("a draggable class name is required")]
    MissingDraggableClass,
    /// The tree has no document root to scope queries to.
    #[error("the tree has no document root")]
    NoDocumentRoot,
    /// No element carries the requested play area class.
    #[error("play area element not found: .{0}")]
    PlayAreaNotFound(String),
    /// No element inside the play area carries the requested dropzone class.
    #[error("no dropzones found: .{0}")]
    DropzonesNotFound(String),
}
