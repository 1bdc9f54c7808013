// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inline presentation style carried by each element.
//!
//! Only the properties the drag engine touches are modeled. Layout reads
//! [`Style::position`], [`Style::left`], [`Style::top`] and [`Style::stack`];
//! hit testing reads [`Style::pointer_events`] and [`Style::z_index`]. The
//! remaining fields are recorded for the host's renderer.

/// Positioning scheme, mirroring the CSS `position` property.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Position {
    /// In normal flow; `left`/`top` are ignored.
    #[default]
    Static,
    /// In normal flow, shifted by `left`/`top`. Establishes a containing block.
    Relative,
    /// Out of flow, placed at `left`/`top` from the nearest positioned ancestor.
    Absolute,
}

impl Position {
    /// Whether this element is a containing block for absolute descendants.
    pub fn is_positioned(self) -> bool {
        !matches!(self, Self::Static)
    }
}

/// Pointer cursor shown over an element.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// Platform default.
    #[default]
    Auto,
    /// Open hand: element can be picked up.
    Grab,
    /// Closed hand: element is being dragged.
    Grabbing,
}

/// Whether an element (and its subtree) intercepts pointer hit testing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerEvents {
    /// Participates in hit testing.
    #[default]
    Auto,
    /// Transparent to hit testing, together with all descendants.
    None,
}

/// Main axis of a stacking layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StackDirection {
    /// Children flow left to right (a flex row).
    #[default]
    Horizontal,
    /// Children flow top to bottom (a flex column).
    Vertical,
}

/// Flex-style stacking of an element's in-flow children.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StackLayout {
    /// Main axis.
    pub direction: StackDirection,
    /// Spacing between children and between wrapped lines.
    pub gap: f64,
    /// Start a new line when the next child would overflow the container.
    pub wrap: bool,
}

/// Inline style of an element.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    /// Positioning scheme.
    pub position: Position,
    /// Horizontal offset; meaning depends on [`Style::position`].
    pub left: Option<f64>,
    /// Vertical offset; meaning depends on [`Style::position`].
    pub top: Option<f64>,
    /// Explicit stacking order. `None` inherits the parent's effective order.
    pub z_index: Option<i32>,
    /// Opacity in `0.0..=1.0`.
    pub opacity: f64,
    /// Pointer cursor.
    pub cursor: Cursor,
    /// Hit-test participation.
    pub pointer_events: PointerEvents,
    /// Stacking layout for children, if any.
    pub stack: Option<StackLayout>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            position: Position::Static,
            left: None,
            top: None,
            z_index: None,
            opacity: 1.0,
            cursor: Cursor::Auto,
            pointer_events: PointerEvents::Auto,
            stack: None,
        }
    }
}
