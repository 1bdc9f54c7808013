// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage summary returned from [`Tree::commit`](crate::Tree::commit).

use alloc::vec::Vec;
use kurbo::Rect;

/// World-space regions whose contents changed during a commit.
///
/// Holds the previous and new rectangles of every element that moved, resized,
/// or was attached or detached since the last commit. Rectangles may overlap.
#[derive(Clone, Debug, Default)]
pub struct Damage {
    /// World-space rectangles that should be repainted.
    pub dirty_rects: Vec<Rect>,
}

impl Damage {
    /// Returns the union of all damage rects.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }

    /// True when nothing changed.
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }

    pub(crate) fn push_pair(&mut self, old: Rect, new: Rect) {
        if old == new {
            return;
        }
        for r in [old, new] {
            if r.width() > 0.0 && r.height() > 0.0 {
                self.dirty_rects.push(r);
            }
        }
    }
}
