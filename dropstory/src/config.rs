// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration and presentation constants.

pub use dropstory_tree::StackDirection;

/// z-index of a ghost proxy.
pub const GHOST_Z_INDEX: i32 = 99;
/// z-index of an element while dragged, and of an element placed freely in the play area.
pub const DRAGGING_Z_INDEX: i32 = 100;
/// Opacity of the real element while its ghost follows the pointer.
pub const GHOST_SOURCE_OPACITY: f64 = 0.3;
/// Default gap between stacked children.
pub const DEFAULT_STACK_SPACING: f64 = 5.0;

/// Behaviour switches shared by the drag engine and the dropzone registry.
///
/// Owned by [`DragDrop`](crate::DragDrop) and passed by reference; replaced as a
/// whole by [`DragDrop::update`](crate::DragDrop::update).
#[derive(Clone, Debug, PartialEq)]
pub struct DragConfig {
    /// Lay out dropzone children with flex stacking.
    pub stacking: bool,
    /// Main axis of the stacking layout.
    pub stack_direction: StackDirection,
    /// Gap between stacked children.
    pub stack_spacing: f64,
    /// Drag a ghost copy while the real element stays put until drop.
    pub ghost: bool,
    /// Only accept drops inside registered dropzones; otherwise return to origin.
    pub restrict_to_dropzones: bool,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            stacking: false,
            stack_direction: StackDirection::Horizontal,
            stack_spacing: DEFAULT_STACK_SPACING,
            ghost: false,
            restrict_to_dropzones: false,
        }
    }
}
