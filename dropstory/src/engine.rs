// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag engine: the session state machine.
//!
//! ## Lifecycle
//!
//! - [`DragEngine::start_drag`] snapshots the dragged element's origin, raises it,
//!   optionally creates a ghost proxy in the play area, highlights every dropzone,
//!   and queues a drag start notification.
//! - [`DragEngine::update_position`] moves the ghost (or the element itself) so it
//!   stays under the pointer at the grab offset, clamped inside the play area.
//! - [`DragEngine::handle_drop`] resolves the element under the pointer, looking
//!   through the dragged element, and places the element in a dropzone, back at
//!   its origin, or freely in the play area.
//! - [`DragEngine::cancel_drag`] returns the element to its origin.
//!
//! Every path that ends a session tears it down: dragging styles are removed,
//! highlights are cleared, and the ghost is deleted. At most one session exists.

use dropstory_tree::{ElementId, QueryFilter, Tree};
use kurbo::{Point, Rect, Size, Vec2};
use tracing::{debug, warn};

use crate::config::GHOST_SOURCE_OPACITY;
use crate::context::DragContext;
use crate::error::DragError;
use crate::input::InputEvent;
use crate::notify::{Notification, NotificationKind};
use crate::registry::DropzoneRegistry;
use crate::style::StyleApplicator;

/// Engine phase.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum DragPhase {
    /// No session.
    #[default]
    Idle,
    /// A session is active.
    Dragging,
}

/// State of an active drag.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    dragged: ElementId,
    original_parent: Option<ElementId>,
    original_dropzone: Option<ElementId>,
    offset: Vec2,
    ghost: Option<ElementId>,
    resting_z: Option<i32>,
}

impl DragSession {
    /// The element being dragged.
    pub fn dragged(&self) -> ElementId {
        self.dragged
    }

    /// Parent of the dragged element when the drag started.
    pub fn original_parent(&self) -> Option<ElementId> {
        self.original_parent
    }

    /// Dropzone the dragged element started in, if any.
    pub fn original_dropzone(&self) -> Option<ElementId> {
        self.original_dropzone
    }

    /// Pointer position minus the element's top-left corner at drag start.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Ghost proxy following the pointer, if any.
    pub fn ghost(&self) -> Option<ElementId> {
        self.ghost
    }
}

/// Where a finished session left the dragged element.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DropOutcome {
    /// Dropped into this dropzone.
    Dropzone(ElementId),
    /// Returned to this container: the origin dropzone, or the play area when
    /// the origin is gone.
    ReturnedToOrigin(ElementId),
    /// Placed freely in the play area at this offset from its top-left corner.
    PlacedInPlayArea(Point),
}

/// Drag session state machine.
#[derive(Clone, Debug)]
pub struct DragEngine {
    play_area: ElementId,
    session: Option<DragSession>,
}

impl DragEngine {
    /// Create an idle engine bounded by `play_area`.
    pub fn new(play_area: ElementId) -> Self {
        Self {
            play_area,
            session: None,
        }
    }

    /// Current play area.
    pub fn play_area(&self) -> ElementId {
        self.play_area
    }

    pub(crate) fn set_play_area(&mut self, play_area: ElementId) {
        self.play_area = play_area;
    }

    /// Current phase.
    pub fn phase(&self) -> DragPhase {
        if self.session.is_some() {
            DragPhase::Dragging
        } else {
            DragPhase::Idle
        }
    }

    /// Whether a session is active.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Active session, if any.
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Start dragging the target of `source`, grabbed at `pointer`.
    pub fn start_drag<S: StyleApplicator + ?Sized>(
        &mut self,
        cx: &mut DragContext<'_, S>,
        registry: &DropzoneRegistry,
        source: &InputEvent,
        pointer: Point,
    ) -> Result<(), DragError> {
        if self.session.is_some() {
            return Err(DragError::AlreadyDragging);
        }
        let dragged = source.target().ok_or(DragError::NoTarget)?;
        if !cx.tree.is_connected(dragged) {
            return Err(DragError::UnknownElement(dragged));
        }
        if !cx.tree.is_connected(self.play_area) {
            return Err(DragError::UnknownElement(self.play_area));
        }

        let _ = cx.tree.commit();
        let resting_z = cx.tree.style(dragged).and_then(|s| s.z_index);
        let rect = world_rect(cx.tree, dragged);
        let play = world_rect(cx.tree, self.play_area);

        cx.styles.apply_dragging_styles(cx.tree, dragged);
        let original_parent = cx.tree.parent(dragged);
        let original_dropzone = registry.find_closest_dropzone(cx.tree, dragged);

        let ghost = if cx.config.ghost && original_parent != Some(self.play_area) {
            self.create_ghost(cx, dragged, rect, play)
        } else {
            None
        };

        cx.notifications.push(Notification::new(
            NotificationKind::DragStart,
            dragged,
            dragged,
            Some(source.clone()),
        ));
        registry.toggle_highlight(cx.tree, true);

        self.session = Some(DragSession {
            dragged,
            original_parent,
            original_dropzone,
            offset: pointer - rect.origin(),
            ghost,
            resting_z,
        });
        debug!(?dragged, ?original_dropzone, ghost = ghost.is_some(), "drag started");
        Ok(())
    }

    fn create_ghost<S: StyleApplicator + ?Sized>(
        &self,
        cx: &mut DragContext<'_, S>,
        dragged: ElementId,
        rect: Rect,
        play: Rect,
    ) -> Option<ElementId> {
        let ghost = cx.tree.clone_subtree(dragged)?;
        cx.styles.apply_ghost_styles(cx.tree, ghost);
        if let Err(err) = cx.tree.append_child(self.play_area, ghost) {
            warn!(%err, "ghost could not be attached; dragging the element itself");
            cx.tree.remove(ghost);
            return None;
        }
        cx.styles.set_offset(cx.tree, ghost, rect.x0 - play.x0, rect.y0 - play.y0);
        cx.styles.set_opacity(cx.tree, dragged, GHOST_SOURCE_OPACITY);
        Some(ghost)
    }

    /// Follow the pointer. Returns the new offset inside the play area, or
    /// `None` when no session is active.
    pub fn update_position<S: StyleApplicator + ?Sized>(
        &mut self,
        cx: &mut DragContext<'_, S>,
        pointer: Point,
    ) -> Option<Point> {
        let session = self.session.as_ref()?;
        let _ = cx.tree.commit();
        let play = world_rect(cx.tree, self.play_area);
        let moving = session.ghost.unwrap_or(session.dragged);
        let size = element_size(cx.tree, moving);

        let position = Point::new(
            clamp_axis(pointer.x - play.x0 - session.offset.x, play.width() - size.width),
            clamp_axis(pointer.y - play.y0 - session.offset.y, play.height() - size.height),
        );
        if session.ghost.is_none() {
            cx.styles.apply_absolute_positioning(cx.tree, moving);
        }
        cx.styles.set_offset(cx.tree, moving, position.x, position.y);
        Some(position)
    }

    /// Finish the session at `pointer`.
    ///
    /// Returns `None` when no session is active.
    pub fn handle_drop<S: StyleApplicator + ?Sized>(
        &mut self,
        cx: &mut DragContext<'_, S>,
        registry: &DropzoneRegistry,
        pointer: Point,
        source: Option<&InputEvent>,
    ) -> Option<DropOutcome> {
        let session = self.session.take()?;
        let dragged = session.dragged;
        cx.styles.set_opacity(cx.tree, dragged, 1.0);

        let _ = cx.tree.commit();
        let play = world_rect(cx.tree, self.play_area);
        // Keep the probe one unit inside the play area's edges.
        let probe = Point::new(
            pointer.x.max(play.x0 + 1.0).min(play.x1 - 1.0),
            pointer.y.max(play.y0 + 1.0).min(play.y1 - 1.0),
        );
        let below = cx
            .tree
            .hit_test_point(probe, QueryFilter::POINTER.excluding(dragged))
            .map(|hit| hit.element);
        let zone = below.and_then(|node| registry.find_closest_dropzone(cx.tree, node));
        let restrict = cx.config.restrict_to_dropzones;

        let outcome = match zone {
            Some(zone) => match registry.handle_drop(cx, dragged, zone, source) {
                Ok(()) => DropOutcome::Dropzone(zone),
                Err(err) => {
                    warn!(%err, ?zone, "drop into dropzone failed");
                    self.fallback(cx, registry, &session, probe, play, restrict)
                }
            },
            None => self.fallback(cx, registry, &session, probe, play, restrict),
        };

        self.teardown(cx, registry, session);
        debug!(?dragged, ?outcome, "drag finished");
        Some(outcome)
    }

    /// Abort the session and return the element to its origin.
    ///
    /// Returns `None` when no session is active.
    pub fn cancel_drag<S: StyleApplicator + ?Sized>(
        &mut self,
        cx: &mut DragContext<'_, S>,
        registry: &DropzoneRegistry,
    ) -> Option<DropOutcome> {
        let session = self.session.take()?;
        cx.styles.set_opacity(cx.tree, session.dragged, 1.0);
        let outcome = self.return_to_origin(cx, registry, &session);
        self.teardown(cx, registry, session);
        debug!(?outcome, "drag cancelled");
        Some(outcome)
    }

    fn fallback<S: StyleApplicator + ?Sized>(
        &self,
        cx: &mut DragContext<'_, S>,
        registry: &DropzoneRegistry,
        session: &DragSession,
        probe: Point,
        play: Rect,
        restrict: bool,
    ) -> DropOutcome {
        if restrict {
            self.return_to_origin(cx, registry, session)
        } else {
            self.place_in_play_area(cx, registry, session, probe, play)
        }
    }

    fn return_to_origin<S: StyleApplicator + ?Sized>(
        &self,
        cx: &mut DragContext<'_, S>,
        registry: &DropzoneRegistry,
        session: &DragSession,
    ) -> DropOutcome {
        let dragged = session.dragged;
        let home = session.original_dropzone.filter(|&zone| {
            registry.contains(zone)
                && cx.tree.is_connected(zone)
                && !registry.is_restricted(cx.tree, zone)
        });

        if let Some(zone) = home {
            if cx.config.stacking {
                registry.apply_stacking_styles(cx, zone);
            }
            cx.styles.reset_position(cx.tree, dragged);
            match cx.tree.append_child(zone, dragged) {
                Ok(()) => return DropOutcome::ReturnedToOrigin(zone),
                Err(err) => warn!(%err, ?zone, "origin dropzone rejected the element"),
            }
        }

        cx.styles.reset_position(cx.tree, dragged);
        if let Err(err) = cx.tree.append_child(self.play_area, dragged) {
            warn!(%err, "element could not be returned to the play area");
        }
        DropOutcome::ReturnedToOrigin(self.play_area)
    }

    fn place_in_play_area<S: StyleApplicator + ?Sized>(
        &self,
        cx: &mut DragContext<'_, S>,
        registry: &DropzoneRegistry,
        session: &DragSession,
        probe: Point,
        play: Rect,
    ) -> DropOutcome {
        let dragged = session.dragged;
        if cx.tree.parent(dragged) != Some(self.play_area) {
            if let Err(err) = cx.tree.append_child(self.play_area, dragged) {
                warn!(%err, "element could not be moved into the play area");
                return self.return_to_origin(cx, registry, session);
            }
        }
        let size = element_size(cx.tree, dragged);
        let position = Point::new(
            clamp_axis(probe.x - play.x0 - session.offset.x, play.width() - size.width),
            clamp_axis(probe.y - play.y0 - session.offset.y, play.height() - size.height),
        );
        cx.styles.apply_absolute_positioning(cx.tree, dragged);
        cx.styles.set_offset(cx.tree, dragged, position.x, position.y);
        DropOutcome::PlacedInPlayArea(position)
    }

    fn teardown<S: StyleApplicator + ?Sized>(
        &self,
        cx: &mut DragContext<'_, S>,
        registry: &DropzoneRegistry,
        session: DragSession,
    ) {
        if cx.tree.is_alive(session.dragged) {
            cx.styles.remove_dragging_styles(cx.tree, session.dragged, session.resting_z);
        }
        registry.toggle_highlight(cx.tree, false);
        if let Some(ghost) = session.ghost {
            cx.tree.remove(ghost);
        }
        let _ = cx.tree.commit();
    }
}

fn world_rect(tree: &Tree, element: ElementId) -> Rect {
    tree.bounding_rect(element).unwrap_or(Rect::ZERO)
}

fn element_size(tree: &Tree, element: ElementId) -> Size {
    tree.local(element)
        .map(|l| l.local_bounds.size())
        .unwrap_or(Size::ZERO)
}

/// Clamp to `[0, limit]`; a negative limit pins the value to zero.
fn clamp_axis(value: f64, limit: f64) -> f64 {
    value.min(limit).max(0.0)
}
