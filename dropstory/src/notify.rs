// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notifications emitted to the host.
//!
//! The engine does not call host code. It appends [`Notification`]s to a queue in
//! emission order, and the host drains them with
//! [`DragDrop::take_notifications`](crate::DragDrop::take_notifications).

use dropstory_tree::ElementId;

use crate::input::InputEvent;

/// Kind of a notification.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NotificationKind {
    /// A drag started; targeted at the dragged element.
    DragStart,
    /// An element was dropped into a dropzone; targeted at the dropzone.
    Drop,
    /// Emitted on the dropzone right after [`NotificationKind::Drop`].
    DragEnter,
    /// Emitted on the dropzone right after [`NotificationKind::DragEnter`].
    DragLeave,
}

/// A single notification.
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    /// What happened.
    pub kind: NotificationKind,
    /// Element the notification is dispatched on.
    pub target: ElementId,
    /// The dragged element.
    pub dragged: ElementId,
    /// Input that caused it; present for [`NotificationKind::DragStart`] and
    /// [`NotificationKind::Drop`].
    pub source: Option<InputEvent>,
}

impl Notification {
    pub(crate) fn new(
        kind: NotificationKind,
        target: ElementId,
        dragged: ElementId,
        source: Option<InputEvent>,
    ) -> Self {
        Self {
            kind,
            target,
            dragged,
            source,
        }
    }
}
