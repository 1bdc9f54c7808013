// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, layout, queries.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Point, Rect, Size, Vec2};

use crate::damage::Damage;
use crate::error::TreeError;
use crate::style::{PointerEvents, Position, StackDirection, StackLayout, Style};
use crate::types::{ElementId, LocalElement, Marks};

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Retained element tree.
///
/// Structure and style mutations take effect immediately; world-space geometry
/// (bounding rectangles, hit testing) reflects the last [`Tree::commit`].
pub struct Tree {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    roots: Vec<ElementId>,
    epoch: u64,
    mutations: u64,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("roots", &self.roots)
            .field("epoch", &self.epoch)
            .field("mutations", &self.mutations)
            .finish_non_exhaustive()
    }
}

/// Results of a hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The matched element.
    pub element: ElementId,
    /// Path from root to element (inclusive).
    pub path: Vec<ElementId>,
}

/// Filters applied during hit testing.
///
/// Used by [`Tree::hit_test_point`].
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryFilter {
    /// If true, skip elements whose effective [`PointerEvents`] is `None`.
    pub pickable_only: bool,
    /// Skip this element and its whole subtree.
    pub exclude: Option<ElementId>,
}

impl QueryFilter {
    /// Filter matching what a pointer would hit.
    pub const POINTER: Self = Self {
        pickable_only: true,
        exclude: None,
    };

    /// Same filter, additionally looking through `element`'s subtree.
    pub fn excluding(self, element: ElementId) -> Self {
        Self {
            exclude: Some(element),
            ..self
        }
    }
}

#[derive(Clone, Debug, Default)]
struct WorldElement {
    bounds: Rect,
    z: i32,
    paint_order: u32,
    pickable: bool,
    connected: bool,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    local: LocalElement,
    world: WorldElement,
    is_root: bool,
}

impl Node {
    fn new(generation: u32, local: LocalElement) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            world: WorldElement::default(),
            is_root: false,
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            roots: Vec::new(),
            epoch: 0,
            mutations: 0,
        }
    }

    /// Insert a new element as the last child of `parent`, or as a document root if `None`.
    ///
    /// A stale `parent` leaves the new element detached.
    pub fn insert(&mut self, parent: Option<ElementId>, local: LocalElement) -> ElementId {
        let id = self.alloc(local);
        match parent {
            Some(p) if self.is_alive(p) => self.link_parent(id, p),
            Some(_) => {}
            None => {
                self.node_mut(id).is_root = true;
                self.roots.push(id);
            }
        }
        self.touch();
        id
    }

    /// Remove an element (and its subtree) from the tree.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.roots.retain(|r| *r != id);
        self.free_recursive(id);
        self.touch();
    }

    /// Move `child` to the end of `parent`'s children, detaching it from its
    /// previous position first.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), TreeError> {
        if !self.is_alive(parent) {
            return Err(TreeError::StaleElement(parent));
        }
        if !self.is_alive(child) {
            return Err(TreeError::StaleElement(child));
        }
        if self.contains(child, parent) {
            return Err(TreeError::CycleDetected { parent, child });
        }
        if self.node(child).parent == Some(parent)
            && self.node(parent).children.last() == Some(&child)
        {
            return Ok(());
        }
        self.detach_quiet(child);
        self.link_parent(child, parent);
        self.touch();
        Ok(())
    }

    /// Detach an element from its parent (or from the document roots).
    ///
    /// Detached elements keep their subtree but are neither laid out nor hit-tested.
    pub fn detach(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        let node = self.node(id);
        if node.parent.is_none() && !node.is_root {
            return;
        }
        self.detach_quiet(id);
        self.touch();
    }

    /// Deep-copy an element and its subtree. The copy starts detached.
    pub fn clone_subtree(&mut self, id: ElementId) -> Option<ElementId> {
        if !self.is_alive(id) {
            return None;
        }
        let local = self.node(id).local.clone();
        let children = self.node(id).children.clone();
        let copy = self.alloc(local);
        for child in children {
            if let Some(child_copy) = self.clone_subtree(child) {
                self.link_parent(child_copy, copy);
            }
        }
        self.touch();
        Some(copy)
    }

    /// Returns true if `id` refers to a live element.
    ///
    /// An `ElementId` is live if its slot exists and its generation matches the
    /// slot's current generation. See [`ElementId`] for the generational semantics.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Returns true if `id` is live and reachable from a document root.
    pub fn is_connected(&self, id: ElementId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let mut cur = id;
        loop {
            let node = self.node(cur);
            match node.parent {
                Some(p) => cur = p,
                None => return node.is_root,
            }
        }
    }

    /// Parent of an element.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node_opt(id)?.parent
    }

    /// Children of an element in document order. Empty for stale ids.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Document roots in insertion order.
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    /// The first document root, playing the role of the page body.
    pub fn document(&self) -> Option<ElementId> {
        self.roots.first().copied()
    }

    /// Iterate from `id` up through its ancestors (inclusive of `id`).
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let start = self.is_alive(id).then_some(id);
        core::iter::successors(start, move |cur| self.parent(*cur))
    }

    /// Returns true if `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Descendants of `scope` carrying the class `name`, in document order.
    ///
    /// `scope` itself is not included.
    pub fn query_class(&self, scope: ElementId, name: &str) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.local.class_names.iter().any(|c| c == name) {
                out.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Local description of an element.
    pub fn local(&self, id: ElementId) -> Option<&LocalElement> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// Inline style of an element.
    pub fn style(&self, id: ElementId) -> Option<&Style> {
        self.node_opt(id).map(|n| &n.local.style)
    }

    /// Edit an element's inline style. Returns true if the style changed.
    pub fn update_style(&mut self, id: ElementId, f: impl FnOnce(&mut Style)) -> bool {
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        let before = node.local.style.clone();
        f(&mut node.local.style);
        let changed = node.local.style != before;
        if changed {
            self.touch();
        }
        changed
    }

    /// Update flow bounds.
    pub fn set_local_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(node) = self.node_opt_mut(id) {
            if node.local.local_bounds != bounds {
                node.local.local_bounds = bounds;
                self.touch();
            }
        }
    }

    /// Marks of an element; empty for stale ids.
    pub fn marks(&self, id: ElementId) -> Marks {
        self.node_opt(id).map(|n| n.local.marks).unwrap_or_default()
    }

    /// Replace the marks of an element. Returns true if they changed.
    pub fn set_marks(&mut self, id: ElementId, marks: Marks) -> bool {
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        if node.local.marks == marks {
            return false;
        }
        node.local.marks = marks;
        self.touch();
        true
    }

    /// Add marks to an element. Returns true if they changed.
    pub fn insert_marks(&mut self, id: ElementId, marks: Marks) -> bool {
        self.set_marks(id, self.marks(id) | marks)
    }

    /// Remove marks from an element. Returns true if they changed.
    pub fn remove_marks(&mut self, id: ElementId, marks: Marks) -> bool {
        self.set_marks(id, self.marks(id) - marks)
    }

    /// Returns true if the element carries the class name.
    pub fn has_class(&self, id: ElementId, name: &str) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.local.class_names.iter().any(|c| c == name))
    }

    /// Add a class name. Returns true if it was not present.
    pub fn add_class(&mut self, id: ElementId, name: &str) -> bool {
        if self.has_class(id, name) {
            return false;
        }
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        node.local.class_names.push(String::from(name));
        self.touch();
        true
    }

    /// Remove a class name. Returns true if it was present.
    pub fn remove_class(&mut self, id: ElementId, name: &str) -> bool {
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        let before = node.local.class_names.len();
        node.local.class_names.retain(|c| c != name);
        let changed = node.local.class_names.len() != before;
        if changed {
            self.touch();
        }
        changed
    }

    /// Number of effective mutations applied so far.
    ///
    /// Setters that leave an element unchanged do not count.
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    /// Number of commits run so far.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Lay out every connected element and return coarse damage.
    pub fn commit(&mut self) -> Damage {
        self.epoch = self.epoch.wrapping_add(1);
        let mut damage = Damage::default();
        for node in self.nodes.iter_mut().flatten() {
            node.world.connected = false;
        }

        let roots = self.roots.clone();
        let mut order = 0_u32;
        for root in roots {
            let flow = self.node(root).local.local_bounds.origin();
            self.update_world_recursive(root, flow, Point::ZERO, 0, true, &mut order, &mut damage);
        }

        for node in self.nodes.iter_mut().flatten() {
            if !node.world.connected {
                let old = node.world.bounds;
                node.world.bounds = Rect::ZERO;
                node.world.pickable = false;
                damage.push_pair(old, Rect::ZERO);
            }
        }
        damage
    }

    /// World-space rectangle of an element as of the last commit.
    ///
    /// Detached elements report [`Rect::ZERO`]; stale ids report `None`.
    pub fn bounding_rect(&self, id: ElementId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.world.bounds)
    }

    /// Hit test a world-space point. Returns the topmost element.
    ///
    /// Topmost is the highest effective z-index; among equals, the element
    /// painted last (later in document order) wins.
    pub fn hit_test_point(&self, pt: Point, filter: QueryFilter) -> Option<Hit> {
        let excluded = filter.exclude.filter(|e| self.is_alive(*e));
        let mut best: Option<(ElementId, (i32, u32))> = None;
        for (i, slot) in self.nodes.iter().enumerate() {
            let Some(node) = slot else {
                continue;
            };
            if !node.world.connected || !node.world.bounds.contains(pt) {
                continue;
            }
            if filter.pickable_only && !node.world.pickable {
                continue;
            }
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            let id = ElementId::new(i as u32, node.generation);
            if excluded.is_some_and(|ex| self.contains(ex, id)) {
                continue;
            }
            let key = (node.world.z, node.world.paint_order);
            if best.is_none_or(|(_, k)| key > k) {
                best = Some((id, key));
            }
        }
        best.map(|(element, _)| Hit {
            element,
            path: self.path_to_root(element),
        })
    }

    // --- internals ---

    fn touch(&mut self) {
        self.mutations = self.mutations.wrapping_add(1);
    }

    fn alloc(&mut self, local: LocalElement) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        ElementId::new(idx, generation)
    }

    fn free_recursive(&mut self, id: ElementId) {
        let children = self.node(id).children.clone();
        for child in children {
            self.free_recursive(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    fn detach_quiet(&mut self, id: ElementId) {
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if self.node(id).is_root {
            self.node_mut(id).is_root = false;
            self.roots.retain(|r| *r != id);
        }
    }

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: ElementId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling ElementId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: ElementId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling ElementId")
    }

    fn node_opt(&self, id: ElementId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId) {
        let parent_node = self.node_mut(parent);
        parent_node.children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn path_to_root(&self, mut id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        loop {
            out.push(id);
            let parent = self.node(id).parent;
            match parent {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    fn update_world_recursive(
        &mut self,
        id: ElementId,
        flow_origin: Point,
        containing_origin: Point,
        parent_z: i32,
        parent_pickable: bool,
        order: &mut u32,
        damage: &mut Damage,
    ) {
        let paint_order = *order;
        *order += 1;
        let (children, world, style) = {
            let node = self.node_mut(id);
            let style = node.local.style.clone();
            let origin = match style.position {
                Position::Static => flow_origin,
                Position::Relative => {
                    flow_origin + Vec2::new(style.left.unwrap_or(0.0), style.top.unwrap_or(0.0))
                }
                Position::Absolute => Point::new(
                    style.left.map_or(flow_origin.x, |l| containing_origin.x + l),
                    style.top.map_or(flow_origin.y, |t| containing_origin.y + t),
                ),
            };
            let old = node.world.bounds;
            node.world = WorldElement {
                bounds: Rect::from_origin_size(origin, node.local.local_bounds.size()),
                z: style.z_index.unwrap_or(parent_z),
                paint_order,
                pickable: parent_pickable && style.pointer_events == PointerEvents::Auto,
                connected: true,
            };
            damage.push_pair(old, node.world.bounds);
            (node.children.clone(), node.world.clone(), style)
        };

        let origin = world.bounds.origin();
        let child_containing = if style.position.is_positioned() {
            origin
        } else {
            containing_origin
        };
        let flows = self.child_flow_origins(&children, origin, world.bounds.size(), style.stack);
        for (child, flow) in children.into_iter().zip(flows) {
            self.update_world_recursive(
                child,
                flow,
                child_containing,
                world.z,
                world.pickable,
                order,
                damage,
            );
        }
    }

    /// Flow origins of `children` inside a parent at `origin` with `size`.
    fn child_flow_origins(
        &self,
        children: &[ElementId],
        origin: Point,
        size: Size,
        stack: Option<StackLayout>,
    ) -> Vec<Point> {
        let mut out = Vec::with_capacity(children.len());
        let Some(stack) = stack else {
            for child in children {
                out.push(origin + self.node(*child).local.local_bounds.origin().to_vec2());
            }
            return out;
        };

        // Main-axis cursor and the cross-axis extent of the current line.
        let mut cursor = Vec2::ZERO;
        let mut line = 0.0_f64;
        for child in children {
            let local = &self.node(*child).local;
            if local.style.position == Position::Absolute {
                out.push(origin + local.local_bounds.origin().to_vec2());
                continue;
            }
            let s = local.local_bounds.size();
            match stack.direction {
                StackDirection::Horizontal => {
                    if stack.wrap && cursor.x > 0.0 && cursor.x + s.width > size.width {
                        cursor.x = 0.0;
                        cursor.y += line + stack.gap;
                        line = 0.0;
                    }
                    out.push(origin + cursor);
                    cursor.x += s.width + stack.gap;
                    line = line.max(s.height);
                }
                StackDirection::Vertical => {
                    if stack.wrap && cursor.y > 0.0 && cursor.y + s.height > size.height {
                        cursor.y = 0.0;
                        cursor.x += line + stack.gap;
                        line = 0.0;
                    }
                    out.push(origin + cursor);
                    cursor.y += s.height + stack.gap;
                    line = line.max(s.width);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Cursor;
    use alloc::vec;

    fn boxed(x0: f64, y0: f64, x1: f64, y1: f64) -> LocalElement {
        LocalElement::with_bounds(Rect::new(x0, y0, x1, y1))
    }

    fn hit(tree: &Tree, x: f64, y: f64) -> Option<ElementId> {
        tree.hit_test_point(Point::new(x, y), QueryFilter::POINTER)
            .map(|h| h.element)
    }

    #[test]
    fn insert_and_hit_test() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 200.0, 200.0));
        let _a = tree.insert(Some(root), boxed(10.0, 10.0, 60.0, 60.0));
        let mut b_local = boxed(40.0, 40.0, 120.0, 120.0);
        b_local.style.z_index = Some(10);
        let b = tree.insert(Some(root), b_local);
        let _ = tree.commit();

        let hit = tree
            .hit_test_point(Point::new(50.0, 50.0), QueryFilter::POINTER)
            .unwrap();
        assert_eq!(hit.element, b, "topmost by z should win");
        assert_eq!(hit.path.first().copied(), Some(root));
        assert_eq!(hit.path.last().copied(), Some(b));
    }

    #[test]
    fn equal_z_later_in_document_wins() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 200.0, 200.0));
        let a = tree.insert(Some(root), boxed(40.0, 40.0, 120.0, 120.0));
        let b = tree.insert(Some(root), boxed(40.0, 40.0, 120.0, 120.0));
        let _ = tree.commit();
        assert_eq!(hit(&tree, 60.0, 60.0), Some(b));

        // Moving `a` to the end repaints it above `b`.
        tree.append_child(root, a).unwrap();
        let _ = tree.commit();
        assert_eq!(hit(&tree, 60.0, 60.0), Some(a), "appended element paints last");
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 1.0, 1.0));
        let a = tree.insert(Some(root), boxed(0.0, 0.0, 1.0, 1.0));
        assert!(tree.is_alive(root));
        assert!(tree.is_alive(a));

        tree.remove(a);
        assert!(!tree.is_alive(a));
        assert!(tree.children(root).is_empty());

        let b = tree.insert(Some(root), boxed(0.0, 0.0, 1.0, 1.0));
        assert!(tree.is_alive(b));
        assert!(!tree.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
        assert_eq!(tree.parent(a), None, "stale ids have no parent");
    }

    #[test]
    fn pointer_events_none_hides_subtree() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let mut veil = boxed(0.0, 0.0, 50.0, 50.0);
        veil.style.pointer_events = PointerEvents::None;
        let veil = tree.insert(Some(root), veil);
        let _inner = tree.insert(Some(veil), boxed(0.0, 0.0, 20.0, 20.0));
        let _ = tree.commit();

        assert_eq!(hit(&tree, 10.0, 10.0), Some(root));
        let unfiltered = tree
            .hit_test_point(Point::new(10.0, 10.0), QueryFilter::default())
            .unwrap();
        assert_ne!(unfiltered.element, root, "unfiltered query sees through nothing");
    }

    #[test]
    fn exclude_looks_through_subtree() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let zone = tree.insert(Some(root), boxed(0.0, 0.0, 80.0, 80.0));
        let item = tree.insert(Some(root), boxed(0.0, 0.0, 30.0, 30.0));
        let label = tree.insert(Some(item), boxed(0.0, 0.0, 10.0, 10.0));
        let _ = tree.commit();

        assert_eq!(hit(&tree, 5.0, 5.0), Some(label));
        let through = tree
            .hit_test_point(Point::new(5.0, 5.0), QueryFilter::POINTER.excluding(item))
            .map(|h| h.element);
        assert_eq!(through, Some(zone));
    }

    #[test]
    fn nothing_outside_any_element() {
        let mut tree = Tree::new();
        let _root = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let _ = tree.commit();
        assert_eq!(hit(&tree, 150.0, 10.0), None);
        // Right/bottom edges are exclusive.
        assert_eq!(hit(&tree, 100.0, 10.0), None);
    }

    #[test]
    fn absolute_is_placed_from_positioned_ancestor() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 500.0, 500.0));
        let mut area = boxed(100.0, 50.0, 400.0, 350.0);
        area.style.position = Position::Relative;
        let area = tree.insert(Some(root), area);
        // Static wrapper: not a containing block.
        let wrapper = tree.insert(Some(area), boxed(20.0, 20.0, 120.0, 120.0));
        let item = tree.insert(Some(wrapper), boxed(5.0, 5.0, 25.0, 25.0));
        let _ = tree.commit();
        assert_eq!(
            tree.bounding_rect(item),
            Some(Rect::new(125.0, 75.0, 145.0, 95.0)),
            "static child follows flow"
        );

        tree.update_style(item, |s| {
            s.position = Position::Absolute;
            s.left = Some(10.0);
            s.top = Some(30.0);
        });
        let damage = tree.commit();
        assert_eq!(
            tree.bounding_rect(item),
            Some(Rect::new(110.0, 80.0, 130.0, 100.0)),
            "absolute child is offset from the play area, not the wrapper"
        );
        assert!(damage.union_rect().is_some());
    }

    #[test]
    fn relative_shifts_flow_position() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let mut item = boxed(10.0, 10.0, 20.0, 20.0);
        item.style.position = Position::Relative;
        item.style.left = Some(5.0);
        let item = tree.insert(Some(root), item);
        let _ = tree.commit();
        assert_eq!(tree.bounding_rect(item), Some(Rect::new(15.0, 10.0, 25.0, 20.0)));
    }

    #[test]
    fn horizontal_stack_with_gap_and_wrap() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 1000.0, 1000.0));
        let mut zone = boxed(0.0, 0.0, 100.0, 200.0);
        zone.style.stack = Some(StackLayout {
            direction: StackDirection::Horizontal,
            gap: 5.0,
            wrap: true,
        });
        let zone = tree.insert(Some(root), zone);
        // Flow origins are ignored inside a stack.
        let a = tree.insert(Some(zone), boxed(70.0, 70.0, 110.0, 100.0));
        let b = tree.insert(Some(zone), boxed(0.0, 0.0, 40.0, 20.0));
        let c = tree.insert(Some(zone), boxed(0.0, 0.0, 40.0, 20.0));
        let _ = tree.commit();

        assert_eq!(tree.bounding_rect(a), Some(Rect::new(0.0, 0.0, 40.0, 30.0)));
        assert_eq!(tree.bounding_rect(b), Some(Rect::new(45.0, 0.0, 85.0, 20.0)));
        // 90 + 40 > 100: wraps below the tallest item of the first line.
        assert_eq!(tree.bounding_rect(c), Some(Rect::new(0.0, 35.0, 40.0, 55.0)));
    }

    #[test]
    fn vertical_stack_skips_absolute_children() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 1000.0, 1000.0));
        let mut zone = boxed(10.0, 10.0, 110.0, 510.0);
        zone.style.stack = Some(StackLayout {
            direction: StackDirection::Vertical,
            gap: 10.0,
            wrap: true,
        });
        let zone = tree.insert(Some(root), zone);
        let a = tree.insert(Some(zone), boxed(0.0, 0.0, 50.0, 50.0));
        let mut floating = boxed(0.0, 0.0, 50.0, 50.0);
        floating.style.position = Position::Absolute;
        let _floating = tree.insert(Some(zone), floating);
        let b = tree.insert(Some(zone), boxed(0.0, 0.0, 50.0, 50.0));
        let _ = tree.commit();

        assert_eq!(tree.bounding_rect(a), Some(Rect::new(10.0, 10.0, 60.0, 60.0)));
        assert_eq!(tree.bounding_rect(b), Some(Rect::new(10.0, 70.0, 60.0, 120.0)));
    }

    #[test]
    fn append_child_rejects_cycles_and_stale_ids() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 10.0, 10.0));
        let a = tree.insert(Some(root), boxed(0.0, 0.0, 10.0, 10.0));
        let b = tree.insert(Some(a), boxed(0.0, 0.0, 10.0, 10.0));

        assert_eq!(
            tree.append_child(b, a),
            Err(TreeError::CycleDetected {
                parent: b,
                child: a
            })
        );
        assert_eq!(
            tree.append_child(a, a),
            Err(TreeError::CycleDetected {
                parent: a,
                child: a
            })
        );
        tree.remove(b);
        assert_eq!(tree.append_child(root, b), Err(TreeError::StaleElement(b)));
        assert_eq!(tree.parent(a), Some(root), "failed appends leave the tree untouched");
    }

    #[test]
    fn append_child_moves_between_parents() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 10.0, 10.0));
        let z1 = tree.insert(Some(root), boxed(0.0, 0.0, 10.0, 10.0));
        let z2 = tree.insert(Some(root), boxed(0.0, 0.0, 10.0, 10.0));
        let item = tree.insert(Some(z1), boxed(0.0, 0.0, 10.0, 10.0));

        tree.append_child(z2, item).unwrap();
        assert_eq!(tree.parent(item), Some(z2));
        assert!(tree.children(z1).is_empty());
        assert_eq!(tree.children(z2), &[item]);

        let before = tree.mutation_count();
        tree.append_child(z2, item).unwrap();
        assert_eq!(tree.mutation_count(), before, "re-appending the last child is a no-op");
    }

    #[test]
    fn detached_elements_are_not_laid_out() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let item = tree.insert(Some(root), boxed(10.0, 10.0, 30.0, 30.0));
        let _ = tree.commit();
        assert!(tree.is_connected(item));

        tree.detach(item);
        let damage = tree.commit();
        assert!(!tree.is_connected(item));
        assert_eq!(tree.bounding_rect(item), Some(Rect::ZERO));
        assert_eq!(hit(&tree, 15.0, 15.0), Some(root));
        assert_eq!(damage.union_rect(), Some(Rect::new(10.0, 10.0, 30.0, 30.0)));

        tree.append_child(root, item).unwrap();
        let _ = tree.commit();
        assert_eq!(hit(&tree, 15.0, 15.0), Some(item));
    }

    #[test]
    fn clone_subtree_is_a_detached_deep_copy() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let mut card = boxed(0.0, 0.0, 40.0, 40.0).class("card");
        card.style.cursor = Cursor::Grabbing;
        let card = tree.insert(Some(root), card);
        let _label = tree.insert(Some(card), boxed(0.0, 0.0, 10.0, 10.0).class("label"));

        let copy = tree.clone_subtree(card).unwrap();
        assert_ne!(copy, card);
        assert_eq!(tree.parent(copy), None);
        assert!(!tree.is_connected(copy));
        assert_eq!(tree.children(copy).len(), 1);
        assert_eq!(tree.style(copy).map(|s| s.cursor), Some(Cursor::Grabbing));
        assert!(tree.has_class(copy, "card"));
        assert_eq!(tree.query_class(root, "label").len(), 1, "copy is outside the document");

        tree.append_child(root, copy).unwrap();
        assert_eq!(tree.query_class(root, "label").len(), 2);
    }

    #[test]
    fn query_class_is_document_order_and_excludes_scope() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 10.0, 10.0).class("item"));
        let a = tree.insert(Some(root), boxed(0.0, 0.0, 1.0, 1.0).class("item"));
        let a1 = tree.insert(Some(a), boxed(0.0, 0.0, 1.0, 1.0).class("item"));
        let _b = tree.insert(Some(root), boxed(0.0, 0.0, 1.0, 1.0).class("other"));
        let c = tree.insert(Some(root), boxed(0.0, 0.0, 1.0, 1.0).class("item"));
        assert_eq!(tree.query_class(root, "item"), vec![a, a1, c]);
    }

    #[test]
    fn setters_count_only_effective_mutations() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 10.0, 10.0));
        let start = tree.mutation_count();

        assert!(tree.insert_marks(root, Marks::HIGHLIGHT));
        assert!(!tree.insert_marks(root, Marks::HIGHLIGHT));
        assert!(tree.update_style(root, |s| s.opacity = 0.5));
        assert!(!tree.update_style(root, |s| s.opacity = 0.5));
        assert!(tree.add_class(root, "zone"));
        assert!(!tree.add_class(root, "zone"));
        assert_eq!(tree.mutation_count(), start + 3);

        assert!(tree.remove_marks(root, Marks::HIGHLIGHT));
        assert!(!tree.remove_marks(root, Marks::HIGHLIGHT));
        assert_eq!(tree.mutation_count(), start + 4);
    }

    #[test]
    fn ancestors_and_contains() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 10.0, 10.0));
        let a = tree.insert(Some(root), boxed(0.0, 0.0, 10.0, 10.0));
        let b = tree.insert(Some(a), boxed(0.0, 0.0, 10.0, 10.0));
        let chain: Vec<_> = tree.ancestors(b).collect();
        assert_eq!(chain, vec![b, a, root]);
        assert!(tree.contains(root, b));
        assert!(tree.contains(b, b));
        assert!(!tree.contains(b, root));
        assert_eq!(tree.document(), Some(root));
    }

    #[test]
    fn z_index_is_inherited_by_descendants() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let mut raised = boxed(0.0, 0.0, 50.0, 50.0);
        raised.style.z_index = Some(5);
        let raised = tree.insert(Some(root), raised);
        let child = tree.insert(Some(raised), boxed(0.0, 0.0, 20.0, 20.0));
        // Later sibling without z: painted after, but lower effective z.
        let _later = tree.insert(Some(root), boxed(0.0, 0.0, 30.0, 30.0));
        let _ = tree.commit();
        assert_eq!(hit(&tree, 10.0, 10.0), Some(child));
    }
}
