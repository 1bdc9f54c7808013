// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input normalization: pointer and touch into start / update / end gestures.
//!
//! ## Listening model
//!
//! - Each draggable element is registered in a binding table. Only a press
//!   (pointer down or touch start) on a bound element can start a gesture.
//! - While a gesture is in progress the normalizer "listens globally" for the
//!   family that started it, so moves and releases are accepted wherever they
//!   land. Events of the other family are ignored.
//! - Release or cancel detaches the global listeners again. A press while a
//!   gesture is in progress is ignored, so at most one gesture exists.
//!
//! Touch gestures use the primary contact only and ask the host to suppress the
//! platform's default scrolling and selection while they run.
//!
//! ## Minimal example
//!
//! ```
//! use dropstory::input::{Gesture, InputEvent, InputNormalizer};
//! use dropstory_tree::{LocalElement, Tree};
//! use kurbo::Point;
//!
//! let mut tree = Tree::new();
//! let card = tree.insert(None, LocalElement::default());
//!
//! let mut input = InputNormalizer::new();
//! input.bind(card);
//!
//! let start = input.normalize(&InputEvent::pointer_down(card, Point::new(5.0, 5.0)));
//! assert_eq!(
//!     start.gesture,
//!     Some(Gesture::Start { target: card, position: Point::new(5.0, 5.0) })
//! );
//! let end = input.normalize(&InputEvent::pointer_up(Point::new(9.0, 9.0)));
//! assert_eq!(end.gesture, Some(Gesture::End { position: Point::new(9.0, 9.0) }));
//! assert!(!input.is_listening());
//! ```

use dropstory_tree::ElementId;
use indexmap::IndexMap;
use kurbo::Point;

/// Phase of a mouse or pen pointer event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
    /// The platform aborted the interaction.
    Cancel,
}

/// Phase of a touch event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TouchPhase {
    /// Contact started.
    Start,
    /// Contact moved.
    Move,
    /// Contact lifted.
    End,
    /// The platform aborted the interaction.
    Cancel,
}

/// Input family, used to gate global listening.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum InputFamily {
    /// Mouse or pen.
    Pointer,
    /// Touch screen.
    Touch,
}

bitflags::bitflags! {
    /// Families an element is bound for.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct InputFamilies: u8 {
        /// Accept pointer presses.
        const POINTER = 0b01;
        /// Accept touch starts.
        const TOUCH   = 0b10;
    }
}

impl Default for InputFamilies {
    fn default() -> Self {
        Self::all()
    }
}

impl From<InputFamily> for InputFamilies {
    fn from(family: InputFamily) -> Self {
        match family {
            InputFamily::Pointer => Self::POINTER,
            InputFamily::Touch => Self::TOUCH,
        }
    }
}

/// A raw input event, in document coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Mouse or pen event.
    Pointer {
        /// Phase.
        phase: PointerPhase,
        /// Pointer position.
        position: Point,
        /// Element whose listener receives the event, if any.
        target: Option<ElementId>,
    },
    /// Touch event.
    Touch {
        /// Phase.
        phase: TouchPhase,
        /// Contacts still on the surface; the first is the primary contact.
        touches: Vec<Point>,
        /// Contacts that changed in this event.
        changed_touches: Vec<Point>,
        /// Element whose listener receives the event, if any.
        target: Option<ElementId>,
    },
}

impl InputEvent {
    /// Pointer press on `target`.
    pub fn pointer_down(target: ElementId, position: Point) -> Self {
        Self::Pointer {
            phase: PointerPhase::Down,
            position,
            target: Some(target),
        }
    }

    /// Pointer move.
    pub fn pointer_move(position: Point) -> Self {
        Self::Pointer {
            phase: PointerPhase::Move,
            position,
            target: None,
        }
    }

    /// Pointer release.
    pub fn pointer_up(position: Point) -> Self {
        Self::Pointer {
            phase: PointerPhase::Up,
            position,
            target: None,
        }
    }

    /// Pointer cancel.
    pub fn pointer_cancel(position: Point) -> Self {
        Self::Pointer {
            phase: PointerPhase::Cancel,
            position,
            target: None,
        }
    }

    /// Single-contact touch start on `target`.
    pub fn touch_start(target: ElementId, position: Point) -> Self {
        Self::Touch {
            phase: TouchPhase::Start,
            touches: vec![position],
            changed_touches: vec![position],
            target: Some(target),
        }
    }

    /// Single-contact touch move.
    pub fn touch_move(position: Point) -> Self {
        Self::Touch {
            phase: TouchPhase::Move,
            touches: vec![position],
            changed_touches: vec![position],
            target: None,
        }
    }

    /// Last contact lifted at `position`.
    pub fn touch_end(position: Point) -> Self {
        Self::Touch {
            phase: TouchPhase::End,
            touches: Vec::new(),
            changed_touches: vec![position],
            target: None,
        }
    }

    /// Touch cancel.
    pub fn touch_cancel() -> Self {
        Self::Touch {
            phase: TouchPhase::Cancel,
            touches: Vec::new(),
            changed_touches: Vec::new(),
            target: None,
        }
    }

    /// Element whose listener receives the event.
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Self::Pointer { target, .. } | Self::Touch { target, .. } => *target,
        }
    }

    /// Family of the event.
    pub fn family(&self) -> InputFamily {
        match self {
            Self::Pointer { .. } => InputFamily::Pointer,
            Self::Touch { .. } => InputFamily::Touch,
        }
    }
}

/// A logical gesture step with a single position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Gesture {
    /// Press on a bound element.
    Start {
        /// Pressed element.
        target: ElementId,
        /// Press position.
        position: Point,
    },
    /// Movement during the gesture.
    Update {
        /// Current position.
        position: Point,
    },
    /// Release.
    End {
        /// Release position.
        position: Point,
    },
    /// Platform cancel.
    Cancel {
        /// Last known position.
        position: Point,
    },
}

/// Result of [`InputNormalizer::normalize`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Normalized {
    /// Gesture step, if the event belongs to one.
    pub gesture: Option<Gesture>,
    /// The host should suppress the platform's default action.
    pub prevent_default: bool,
}

/// Binding table plus the global listening gate.
#[derive(Clone, Debug, Default)]
pub struct InputNormalizer {
    bindings: IndexMap<ElementId, InputFamilies>,
    active: Option<InputFamily>,
    last_position: Point,
}

impl InputNormalizer {
    /// Create a normalizer with no bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `element` for every input family. Returns true if it was not bound.
    pub fn bind(&mut self, element: ElementId) -> bool {
        self.bind_families(element, InputFamilies::all())
    }

    /// Bind `element` for `families`, replacing any previous binding.
    /// Returns true if it was not bound.
    pub fn bind_families(&mut self, element: ElementId, families: InputFamilies) -> bool {
        self.bindings.insert(element, families).is_none()
    }

    /// Remove `element`'s binding. Returns true if it was bound.
    pub fn unbind(&mut self, element: ElementId) -> bool {
        self.bindings.shift_remove(&element).is_some()
    }

    /// Whether `element` is bound for any family.
    pub fn is_bound(&self, element: ElementId) -> bool {
        self.bindings.contains_key(&element)
    }

    /// Bound elements in binding order.
    pub fn bound(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.bindings.keys().copied()
    }

    /// Family whose global listeners are attached, if any.
    pub fn active_family(&self) -> Option<InputFamily> {
        self.active
    }

    /// Whether global listeners are attached.
    pub fn is_listening(&self) -> bool {
        self.active.is_some()
    }

    /// Detach global listeners without producing a gesture.
    pub fn release(&mut self) {
        if let Some(family) = self.active.take() {
            tracing::debug!(?family, "global listeners detached");
        }
    }

    /// Map a raw event onto a gesture step.
    pub fn normalize(&mut self, event: &InputEvent) -> Normalized {
        match event {
            InputEvent::Pointer {
                phase,
                position,
                target,
            } => self.normalize_pointer(*phase, *position, *target),
            InputEvent::Touch {
                phase,
                touches,
                changed_touches,
                target,
            } => self.normalize_touch(
                *phase,
                touches.first().copied(),
                changed_touches.first().copied(),
                *target,
            ),
        }
    }

    fn normalize_pointer(
        &mut self,
        phase: PointerPhase,
        position: Point,
        target: Option<ElementId>,
    ) -> Normalized {
        let gesture = match phase {
            PointerPhase::Down => self.try_start(InputFamily::Pointer, target, position),
            PointerPhase::Move => self
                .listening_for(InputFamily::Pointer)
                .then(|| self.update(position)),
            PointerPhase::Up => self
                .listening_for(InputFamily::Pointer)
                .then(|| self.finish(Gesture::End { position })),
            PointerPhase::Cancel => self
                .listening_for(InputFamily::Pointer)
                .then(|| self.finish(Gesture::Cancel { position })),
        };
        Normalized {
            gesture,
            prevent_default: false,
        }
    }

    fn normalize_touch(
        &mut self,
        phase: TouchPhase,
        primary: Option<Point>,
        changed: Option<Point>,
        target: Option<ElementId>,
    ) -> Normalized {
        match phase {
            TouchPhase::Start => {
                let gesture =
                    primary.and_then(|p| self.try_start(InputFamily::Touch, target, p));
                Normalized {
                    prevent_default: gesture.is_some(),
                    gesture,
                }
            }
            TouchPhase::Move => {
                if !self.listening_for(InputFamily::Touch) {
                    return Normalized::default();
                }
                Normalized {
                    gesture: primary.map(|p| self.update(p)),
                    prevent_default: true,
                }
            }
            TouchPhase::End | TouchPhase::Cancel => {
                if !self.listening_for(InputFamily::Touch) {
                    return Normalized::default();
                }
                let position = changed.or(primary).unwrap_or(self.last_position);
                let step = if phase == TouchPhase::End {
                    Gesture::End { position }
                } else {
                    Gesture::Cancel { position }
                };
                Normalized {
                    gesture: Some(self.finish(step)),
                    prevent_default: false,
                }
            }
        }
    }

    fn try_start(
        &mut self,
        family: InputFamily,
        target: Option<ElementId>,
        position: Point,
    ) -> Option<Gesture> {
        if self.active.is_some() {
            return None;
        }
        let target = target?;
        let families = self.bindings.get(&target)?;
        if !families.contains(family.into()) {
            return None;
        }
        self.active = Some(family);
        self.last_position = position;
        tracing::debug!(?family, ?target, "global listeners attached");
        Some(Gesture::Start { target, position })
    }

    fn listening_for(&self, family: InputFamily) -> bool {
        self.active == Some(family)
    }

    fn update(&mut self, position: Point) -> Gesture {
        self.last_position = position;
        Gesture::Update { position }
    }

    fn finish(&mut self, step: Gesture) -> Gesture {
        self.release();
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropstory_tree::{LocalElement, Tree};

    fn setup() -> (Tree, ElementId, ElementId) {
        let mut tree = Tree::new();
        let root = tree.insert(None, LocalElement::default());
        let a = tree.insert(Some(root), LocalElement::default());
        let b = tree.insert(Some(root), LocalElement::default());
        (tree, a, b)
    }

    #[test]
    fn binding_is_idempotent_and_ordered() {
        let (_tree, a, b) = setup();
        let mut input = InputNormalizer::new();
        assert!(input.bind(b));
        assert!(input.bind(a));
        assert!(!input.bind(b), "second bind is a no-op");
        assert_eq!(input.bound().collect::<Vec<_>>(), vec![b, a]);

        assert!(input.unbind(b));
        assert!(!input.unbind(b));
        assert!(!input.is_bound(b));
        assert_eq!(input.bound().collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn unbound_targets_do_not_start() {
        let (_tree, a, b) = setup();
        let mut input = InputNormalizer::new();
        input.bind(a);
        let n = input.normalize(&InputEvent::pointer_down(b, Point::new(1.0, 1.0)));
        assert_eq!(n.gesture, None);
        assert!(!input.is_listening());
    }

    #[test]
    fn moves_are_ignored_until_started() {
        let (_tree, a, _b) = setup();
        let mut input = InputNormalizer::new();
        input.bind(a);
        assert_eq!(input.normalize(&InputEvent::pointer_move(Point::new(3.0, 3.0))).gesture, None);
        assert_eq!(input.normalize(&InputEvent::pointer_up(Point::new(3.0, 3.0))).gesture, None);

        input.normalize(&InputEvent::pointer_down(a, Point::new(1.0, 1.0)));
        assert_eq!(
            input.normalize(&InputEvent::pointer_move(Point::new(3.0, 4.0))).gesture,
            Some(Gesture::Update {
                position: Point::new(3.0, 4.0)
            })
        );
    }

    #[test]
    fn second_press_during_gesture_is_ignored() {
        let (_tree, a, b) = setup();
        let mut input = InputNormalizer::new();
        input.bind(a);
        input.bind(b);
        assert!(input.normalize(&InputEvent::pointer_down(a, Point::ZERO)).gesture.is_some());
        assert_eq!(input.normalize(&InputEvent::pointer_down(b, Point::ZERO)).gesture, None);
        assert_eq!(input.normalize(&InputEvent::touch_start(b, Point::ZERO)).gesture, None);
        assert_eq!(input.active_family(), Some(InputFamily::Pointer));
    }

    #[test]
    fn touch_uses_primary_contact_and_prevents_default() {
        let (_tree, a, _b) = setup();
        let mut input = InputNormalizer::new();
        input.bind(a);

        let start = input.normalize(&InputEvent::Touch {
            phase: TouchPhase::Start,
            touches: vec![Point::new(10.0, 20.0), Point::new(90.0, 90.0)],
            changed_touches: vec![Point::new(10.0, 20.0)],
            target: Some(a),
        });
        assert!(start.prevent_default);
        assert_eq!(
            start.gesture,
            Some(Gesture::Start {
                target: a,
                position: Point::new(10.0, 20.0)
            })
        );

        // Pointer events are not listened for during a touch gesture.
        assert_eq!(input.normalize(&InputEvent::pointer_up(Point::ZERO)).gesture, None);

        let mv = input.normalize(&InputEvent::touch_move(Point::new(12.0, 22.0)));
        assert!(mv.prevent_default);

        let end = input.normalize(&InputEvent::touch_end(Point::new(14.0, 24.0)));
        assert_eq!(
            end.gesture,
            Some(Gesture::End {
                position: Point::new(14.0, 24.0)
            })
        );
        assert!(!input.is_listening());
    }

    #[test]
    fn touch_cancel_reports_last_position() {
        let (_tree, a, _b) = setup();
        let mut input = InputNormalizer::new();
        input.bind(a);
        input.normalize(&InputEvent::touch_start(a, Point::new(1.0, 1.0)));
        input.normalize(&InputEvent::touch_move(Point::new(7.0, 8.0)));
        let cancel = input.normalize(&InputEvent::touch_cancel());
        assert_eq!(
            cancel.gesture,
            Some(Gesture::Cancel {
                position: Point::new(7.0, 8.0)
            })
        );
        assert!(!input.is_listening());
    }

    #[test]
    fn family_restricted_bindings() {
        let (_tree, a, _b) = setup();
        let mut input = InputNormalizer::new();
        input.bind_families(a, InputFamilies::TOUCH);
        assert_eq!(input.normalize(&InputEvent::pointer_down(a, Point::ZERO)).gesture, None);
        assert!(input.normalize(&InputEvent::touch_start(a, Point::ZERO)).gesture.is_some());
    }
}
