// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation side effects.
//!
//! The engine decides *when* an element looks draggable, dragged, ghosted or
//! stacked; a [`StyleApplicator`] decides *how*. [`InlineStyles`] writes the
//! conventional inline styles into the tree.

use dropstory_tree::{
    Cursor, ElementId, Marks, PointerEvents, Position, StackDirection, StackLayout, Tree,
};

use crate::config::{DRAGGING_Z_INDEX, GHOST_Z_INDEX};

/// Presentation hooks called by the engine and the registry.
pub trait StyleApplicator {
    /// Element became draggable.
    fn apply_draggable_styles(&self, tree: &mut Tree, element: ElementId);
    /// Element is no longer draggable.
    fn remove_draggable_styles(&self, tree: &mut Tree, element: ElementId);
    /// Element is being dragged.
    fn apply_dragging_styles(&self, tree: &mut Tree, element: ElementId);
    /// Drag ended; `resting_z` is the z-index the element keeps afterwards.
    fn remove_dragging_styles(&self, tree: &mut Tree, element: ElementId, resting_z: Option<i32>);
    /// Element is a ghost proxy.
    fn apply_ghost_styles(&self, tree: &mut Tree, ghost: ElementId);
    /// Set element opacity.
    fn set_opacity(&self, tree: &mut Tree, element: ElementId, opacity: f64);
    /// Lay out a dropzone's children as a stack.
    fn apply_stacking_styles(
        &self,
        tree: &mut Tree,
        dropzone: ElementId,
        direction: StackDirection,
        spacing: f64,
    );
    /// Return a dropzone's children to plain flow.
    fn remove_stacking_styles(&self, tree: &mut Tree, dropzone: ElementId);
    /// Put an element back into its container's natural flow.
    fn reset_position(&self, tree: &mut Tree, element: ElementId);
    /// Take an element out of flow.
    fn apply_absolute_positioning(&self, tree: &mut Tree, element: ElementId);
    /// Write an out-of-flow element's offsets.
    fn set_offset(&self, tree: &mut Tree, element: ElementId, left: f64, top: f64);
    /// Make an element the containing block for dragged elements.
    fn apply_play_area_styles(&self, tree: &mut Tree, play_area: ElementId);
}

/// Default applicator writing inline styles.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineStyles;

impl StyleApplicator for InlineStyles {
    fn apply_draggable_styles(&self, tree: &mut Tree, element: ElementId) {
        tree.update_style(element, |s| s.cursor = Cursor::Grab);
        tree.insert_marks(element, Marks::DRAGGABLE);
    }

    fn remove_draggable_styles(&self, tree: &mut Tree, element: ElementId) {
        tree.update_style(element, |s| s.cursor = Cursor::Auto);
        tree.remove_marks(element, Marks::DRAGGABLE);
    }

    fn apply_dragging_styles(&self, tree: &mut Tree, element: ElementId) {
        tree.update_style(element, |s| {
            s.cursor = Cursor::Grabbing;
            s.z_index = Some(DRAGGING_Z_INDEX);
        });
    }

    fn remove_dragging_styles(&self, tree: &mut Tree, element: ElementId, resting_z: Option<i32>) {
        tree.update_style(element, |s| {
            s.cursor = Cursor::Grab;
            s.z_index = resting_z;
            s.opacity = 1.0;
        });
    }

    fn apply_ghost_styles(&self, tree: &mut Tree, ghost: ElementId) {
        tree.update_style(ghost, |s| {
            s.pointer_events = PointerEvents::None;
            s.position = Position::Absolute;
            s.z_index = Some(GHOST_Z_INDEX);
            s.opacity = 1.0;
        });
    }

    fn set_opacity(&self, tree: &mut Tree, element: ElementId, opacity: f64) {
        tree.update_style(element, |s| s.opacity = opacity);
    }

    fn apply_stacking_styles(
        &self,
        tree: &mut Tree,
        dropzone: ElementId,
        direction: StackDirection,
        spacing: f64,
    ) {
        tree.update_style(dropzone, |s| {
            s.stack = Some(StackLayout {
                direction,
                gap: spacing,
                wrap: true,
            });
        });
    }

    fn remove_stacking_styles(&self, tree: &mut Tree, dropzone: ElementId) {
        tree.update_style(dropzone, |s| s.stack = None);
    }

    fn reset_position(&self, tree: &mut Tree, element: ElementId) {
        tree.update_style(element, |s| {
            s.left = None;
            s.top = None;
            s.position = Position::Relative;
        });
    }

    fn apply_absolute_positioning(&self, tree: &mut Tree, element: ElementId) {
        tree.update_style(element, |s| s.position = Position::Absolute);
    }

    fn set_offset(&self, tree: &mut Tree, element: ElementId, left: f64, top: f64) {
        tree.update_style(element, |s| {
            s.left = Some(left);
            s.top = Some(top);
        });
    }

    fn apply_play_area_styles(&self, tree: &mut Tree, play_area: ElementId) {
        tree.update_style(play_area, |s| s.position = Position::Relative);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropstory_tree::LocalElement;
    use kurbo::Rect;

    #[test]
    fn dragging_styles_round_trip_to_resting_state() {
        let mut tree = Tree::new();
        let el = tree.insert(None, LocalElement::with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let styles = InlineStyles;

        styles.apply_draggable_styles(&mut tree, el);
        styles.apply_dragging_styles(&mut tree, el);
        styles.set_opacity(&mut tree, el, 0.3);
        let s = tree.style(el).unwrap();
        assert_eq!(s.cursor, Cursor::Grabbing);
        assert_eq!(s.z_index, Some(DRAGGING_Z_INDEX));

        styles.remove_dragging_styles(&mut tree, el, None);
        let s = tree.style(el).unwrap();
        assert_eq!(s.cursor, Cursor::Grab);
        assert_eq!(s.z_index, None);
        assert_eq!(s.opacity, 1.0);
        assert!(tree.marks(el).contains(Marks::DRAGGABLE));
    }

    #[test]
    fn stacking_uses_direction_and_spacing() {
        let mut tree = Tree::new();
        let zone = tree.insert(None, LocalElement::default());
        let styles = InlineStyles;

        styles.apply_stacking_styles(&mut tree, zone, StackDirection::Vertical, 12.0);
        assert_eq!(
            tree.style(zone).unwrap().stack,
            Some(StackLayout {
                direction: StackDirection::Vertical,
                gap: 12.0,
                wrap: true,
            })
        );
        styles.remove_stacking_styles(&mut tree, zone);
        assert_eq!(tree.style(zone).unwrap().stack, None);
    }

    #[test]
    fn reset_position_clears_offsets() {
        let mut tree = Tree::new();
        let el = tree.insert(None, LocalElement::default());
        let styles = InlineStyles;
        styles.apply_absolute_positioning(&mut tree, el);
        styles.set_offset(&mut tree, el, 4.0, 8.0);
        styles.reset_position(&mut tree, el);
        let s = tree.style(el).unwrap();
        assert_eq!(s.position, Position::Relative);
        assert_eq!((s.left, s.top), (None, None));
    }
}
