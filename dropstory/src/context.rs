// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Borrowed per-operation state shared by the engine and the registry.

use dropstory_tree::Tree;

use crate::config::DragConfig;
use crate::notify::Notification;
use crate::style::{InlineStyles, StyleApplicator};

/// Borrowed state shared by the engine and the registry for one operation.
///
/// The facade owns every field and splits its borrows into a context per call,
/// so the engine and registry never hold references to each other.
#[derive(Debug)]
pub struct DragContext<'a, S: StyleApplicator + ?Sized = InlineStyles> {
    /// Element tree being manipulated.
    pub tree: &'a mut Tree,
    /// Presentation hooks.
    pub styles: &'a S,
    /// Current behaviour switches.
    pub config: &'a DragConfig,
    /// Outgoing notification queue.
    pub notifications: &'a mut Vec<Notification>,
}
