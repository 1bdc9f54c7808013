// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dropzone registry: membership, lookup, stacking, highlighting, and drops.

use dropstory_tree::{ElementId, Marks, Tree, TreeError};
use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::context::DragContext;
use crate::input::InputEvent;
use crate::notify::{Notification, NotificationKind};
use crate::style::StyleApplicator;

/// Ordered set of dropzones scoped to a play area.
#[derive(Clone, Debug)]
pub struct DropzoneRegistry {
    play_area: ElementId,
    zones: IndexSet<ElementId>,
}

impl DropzoneRegistry {
    /// Create an empty registry scoped to `play_area`.
    pub fn new(play_area: ElementId) -> Self {
        Self {
            play_area,
            zones: IndexSet::new(),
        }
    }

    /// Current play area.
    pub fn play_area(&self) -> ElementId {
        self.play_area
    }

    pub(crate) fn set_play_area(&mut self, play_area: ElementId) {
        self.play_area = play_area;
    }

    /// Registered dropzones in registration order.
    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.zones.iter().copied()
    }

    /// Number of registered dropzones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether no dropzone is registered.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Whether `zone` is registered.
    pub fn contains(&self, zone: ElementId) -> bool {
        self.zones.contains(&zone)
    }

    /// Replace the dropzone set.
    ///
    /// Elements that are not strict descendants of the play area are skipped.
    /// Departing zones lose their dropzone and highlight marks; when stacking is
    /// enabled, new zones are stacked immediately.
    pub fn set_dropzones<S: StyleApplicator + ?Sized>(
        &mut self,
        cx: &mut DragContext<'_, S>,
        elements: impl IntoIterator<Item = ElementId>,
    ) {
        let mut next = IndexSet::new();
        for element in elements {
            if element != self.play_area && cx.tree.contains(self.play_area, element) {
                next.insert(element);
            } else {
                warn!(?element, "dropzone is outside the play area; skipped");
            }
        }

        for &gone in self.zones.difference(&next) {
            cx.tree.remove_marks(gone, Marks::DROPZONE | Marks::HIGHLIGHT);
        }
        for &zone in &next {
            cx.tree.insert_marks(zone, Marks::DROPZONE);
            if cx.config.stacking {
                self.apply_stacking_styles(cx, zone);
            }
        }
        debug!(count = next.len(), "dropzones registered");
        self.zones = next;
    }

    /// Nearest registered dropzone among `node` and its ancestors, stopping at
    /// the play area.
    pub fn find_closest_dropzone(&self, tree: &Tree, node: ElementId) -> Option<ElementId> {
        for element in tree.ancestors(node) {
            if element == self.play_area {
                return None;
            }
            if self.zones.contains(&element) {
                return Some(element);
            }
        }
        None
    }

    /// Stack `zone`'s children using the configured direction and spacing.
    pub fn apply_stacking_styles<S: StyleApplicator + ?Sized>(
        &self,
        cx: &mut DragContext<'_, S>,
        zone: ElementId,
    ) {
        cx.styles.apply_stacking_styles(
            cx.tree,
            zone,
            cx.config.stack_direction,
            cx.config.stack_spacing,
        );
    }

    /// Return `zone`'s children to plain flow.
    pub fn remove_stacking_styles<S: StyleApplicator + ?Sized>(
        &self,
        cx: &mut DragContext<'_, S>,
        zone: ElementId,
    ) {
        cx.styles.remove_stacking_styles(cx.tree, zone);
    }

    /// Whether `zone` refuses elements returning to it at the end of a drag.
    pub fn is_restricted(&self, tree: &Tree, zone: ElementId) -> bool {
        tree.marks(zone).contains(Marks::RESTRICTED)
    }

    /// Set or clear the highlight mark on every registered dropzone.
    ///
    /// Calling it twice with the same value changes nothing the second time.
    pub fn toggle_highlight(&self, tree: &mut Tree, enabled: bool) {
        for &zone in &self.zones {
            if enabled {
                tree.insert_marks(zone, Marks::HIGHLIGHT);
            } else {
                tree.remove_marks(zone, Marks::HIGHLIGHT);
            }
        }
    }

    /// Move `dragged` into `zone` and notify.
    ///
    /// Queues [`NotificationKind::Drop`], [`NotificationKind::DragEnter`] and
    /// [`NotificationKind::DragLeave`] on the zone, in that order. Nothing is
    /// queued when the element cannot be appended.
    pub fn handle_drop<S: StyleApplicator + ?Sized>(
        &self,
        cx: &mut DragContext<'_, S>,
        dragged: ElementId,
        zone: ElementId,
        source: Option<&InputEvent>,
    ) -> Result<(), TreeError> {
        if cx.config.stacking {
            self.apply_stacking_styles(cx, zone);
        }
        cx.styles.reset_position(cx.tree, dragged);
        cx.tree.append_child(zone, dragged)?;
        cx.tree.remove_marks(zone, Marks::HIGHLIGHT);

        cx.notifications.push(Notification::new(
            NotificationKind::Drop,
            zone,
            dragged,
            source.cloned(),
        ));
        cx.notifications.push(Notification::new(NotificationKind::DragEnter, zone, dragged, None));
        cx.notifications.push(Notification::new(NotificationKind::DragLeave, zone, dragged, None));
        debug!(?dragged, ?zone, "dropped into dropzone");
        Ok(())
    }
}
