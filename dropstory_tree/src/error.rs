// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::types::ElementId;

/// Structural mutation failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The id does not refer to a live element.
    #[error("element {0:?} is not alive")]
    StaleElement(ElementId),
    /// Appending would make an element its own ancestor.
    #[error("cannot append {child:?} under {parent:?}: parent is inside the child's subtree")]
    CycleDetected {
        /// Requested parent.
        parent: ElementId,
        /// Element being appended.
        child: ElementId,
    },
}
