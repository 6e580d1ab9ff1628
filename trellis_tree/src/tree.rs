// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree container: structure, box geometry, and point hit testing.

use alloc::vec::Vec;
use kurbo::{Point, Rect};

use crate::types::{NodeFlags, NodeId};

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    bounds: Rect,
    flags: NodeFlags,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A document tree with world-space boxes per node.
///
/// The tree stores structure (parent/children, in document order), a
/// world-space bounding [`Rect`] per node, and [`NodeFlags`]. It performs no
/// layout of its own; callers position nodes by calling
/// [`Tree::set_bounds`] with whatever layout system they choose.
///
/// Nodes detached from their parent (via [`Tree::detach`] or
/// [`Tree::clone_subtree`]) stay alive but are unreachable from the roots and
/// therefore never hit.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<NodeId>,
}

impl Tree {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Returns `true` if `id` refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Inserts a new node with the given bounds and default flags.
    ///
    /// With `parent = Some(..)` the node is appended to that parent's children;
    /// with `None` it becomes a new root (stacked above earlier roots for hit
    /// testing). A dead `parent` id yields a detached node.
    pub fn insert(&mut self, parent: Option<NodeId>, bounds: Rect) -> NodeId {
        let id = self.alloc(Node {
            parent: None,
            children: Vec::new(),
            bounds,
            flags: NodeFlags::default(),
        });
        match parent {
            Some(p) if self.is_alive(p) => {
                self.get_mut(id).expect("just allocated").parent = Some(p);
                self.get_mut(p).expect("liveness checked").children.push(id);
            }
            Some(_) => {}
            None => self.roots.push(id),
        }
        id
    }

    /// Unlinks `item` from its parent (or from the root list). The node stays alive.
    pub fn detach(&mut self, item: NodeId) {
        let Some(node) = self.get(item) else { return };
        if let Some(p) = node.parent {
            if let Some(parent) = self.get_mut(p) {
                parent.children.retain(|&c| c != item);
            }
            if let Some(node) = self.get_mut(item) {
                node.parent = None;
            }
        } else {
            self.roots.retain(|&r| r != item);
        }
    }

    /// Moves `item` into `parent`, in front of `reference`.
    ///
    /// The item is detached from wherever it currently is first. A `None`
    /// reference appends; a reference that is not a child of `parent` also
    /// appends. Inserting a node into its own subtree is ignored.
    pub fn insert_before(&mut self, parent: NodeId, item: NodeId, reference: Option<NodeId>) {
        if !self.is_alive(parent) || !self.is_alive(item) || self.is_ancestor(item, parent) {
            return;
        }
        self.detach(item);
        let Some(node) = self.get_mut(parent) else {
            return;
        };
        let at = reference
            .and_then(|r| node.children.iter().position(|&c| c == r))
            .unwrap_or(node.children.len());
        node.children.insert(at, item);
        if let Some(node) = self.get_mut(item) {
            node.parent = Some(parent);
        }
    }

    /// Appends `item` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, item: NodeId) {
        self.insert_before(parent, item, None);
    }

    /// Attaches `item` as a new root, stacked above every existing root.
    pub fn attach_root(&mut self, item: NodeId) {
        if !self.is_alive(item) {
            return;
        }
        self.detach(item);
        self.roots.push(item);
    }

    /// Detaches `item` and frees it together with its whole subtree.
    pub fn remove(&mut self, item: NodeId) {
        if !self.is_alive(item) {
            return;
        }
        self.detach(item);
        let mut stack = alloc::vec![item];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.slots[id.idx()].node.take() {
                stack.extend(node.children);
                self.free.push(id.0);
            }
        }
    }

    /// Returns the parent of `item`, if any.
    #[must_use]
    pub fn parent(&self, item: NodeId) -> Option<NodeId> {
        self.get(item)?.parent
    }

    /// Returns the sibling immediately after `item` in its parent's child order.
    #[must_use]
    pub fn next_sibling(&self, item: NodeId) -> Option<NodeId> {
        let siblings = self.sibling_list(item)?;
        let at = siblings.iter().position(|&c| c == item)?;
        siblings.get(at + 1).copied()
    }

    /// Returns the sibling immediately before `item` in its parent's child order.
    #[must_use]
    pub fn prev_sibling(&self, item: NodeId) -> Option<NodeId> {
        let siblings = self.sibling_list(item)?;
        let at = siblings.iter().position(|&c| c == item)?;
        at.checked_sub(1).and_then(|i| siblings.get(i)).copied()
    }

    /// Returns the children of `item` in document order.
    #[must_use]
    pub fn children_of(&self, item: NodeId) -> &[NodeId] {
        self.get(item).map_or(&[], |n| n.children.as_slice())
    }

    /// Returns the world-space bounds of `item`.
    #[must_use]
    pub fn bounds(&self, item: NodeId) -> Option<Rect> {
        Some(self.get(item)?.bounds)
    }

    /// Sets the world-space bounds of `item`.
    pub fn set_bounds(&mut self, item: NodeId, bounds: Rect) {
        if let Some(node) = self.get_mut(item) {
            node.bounds = bounds;
        }
    }

    /// Returns the flags of `item`.
    #[must_use]
    pub fn flags(&self, item: NodeId) -> Option<NodeFlags> {
        Some(self.get(item)?.flags)
    }

    /// Sets the flags of `item`.
    pub fn set_flags(&mut self, item: NodeId, flags: NodeFlags) {
        if let Some(node) = self.get_mut(item) {
            node.flags = flags;
        }
    }

    /// Returns `true` if `item` or one of its ancestors carries
    /// [`NodeFlags::TEXT_INPUT`].
    #[must_use]
    pub fn is_text_input(&self, item: NodeId) -> bool {
        let mut cur = Some(item);
        while let Some(id) = cur {
            let Some(node) = self.get(id) else {
                return false;
            };
            if node.flags.contains(NodeFlags::TEXT_INPUT) {
                return true;
            }
            cur = node.parent;
        }
        false
    }

    /// Deep-copies the subtree rooted at `item`.
    ///
    /// The copy keeps bounds and flags per node and comes back detached:
    /// alive, but unreachable from the roots until inserted somewhere.
    pub fn clone_subtree(&mut self, item: NodeId) -> Option<NodeId> {
        let node = self.get(item)?;
        let (bounds, flags) = (node.bounds, node.flags);
        let children = node.children.clone();
        let copy = self.alloc(Node {
            parent: None,
            children: Vec::new(),
            bounds,
            flags,
        });
        for child in children {
            if let Some(child_copy) = self.clone_subtree(child) {
                self.get_mut(child_copy).expect("just cloned").parent = Some(copy);
                self.get_mut(copy).expect("just allocated").children.push(child_copy);
            }
        }
        Some(copy)
    }

    /// Returns the topmost node whose bounds contain `point`.
    ///
    /// Document order decides stacking: later roots over earlier ones, later
    /// siblings over earlier ones, descendants over their ancestors. Only
    /// nodes that are both [`NodeFlags::VISIBLE`] and [`NodeFlags::PICKABLE`]
    /// can be hit; an invisible node hides its whole subtree. The `ignoring`
    /// node and its subtree are skipped entirely, which lets callers hide a
    /// floating element from its own hit tests.
    #[must_use]
    pub fn node_at_point(&self, point: Point, ignoring: Option<NodeId>) -> Option<NodeId> {
        for &root in self.roots.iter().rev() {
            if let Some(hit) = self.hit(root, point, ignoring) {
                return Some(hit);
            }
        }
        None
    }

    fn hit(&self, id: NodeId, point: Point, ignoring: Option<NodeId>) -> Option<NodeId> {
        if ignoring == Some(id) {
            return None;
        }
        let node = self.get(id)?;
        if !node.flags.contains(NodeFlags::VISIBLE) {
            return None;
        }
        for &child in node.children.iter().rev() {
            if let Some(hit) = self.hit(child, point, ignoring) {
                return Some(hit);
            }
        }
        if node.flags.contains(NodeFlags::PICKABLE) && node.bounds.contains(point) {
            return Some(id);
        }
        None
    }

    fn is_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut cur = Some(of);
        while let Some(id) = cur {
            if id == candidate {
                return true;
            }
            cur = self.parent(id);
        }
        false
    }

    fn sibling_list(&self, item: NodeId) -> Option<&[NodeId]> {
        match self.get(item)?.parent {
            Some(p) => Some(self.children_of(p)),
            None => Some(self.roots.as_slice()),
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.node = Some(node);
            NodeId::new(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).expect("tree slot count exceeds u32");
            self.slots.push(Slot {
                generation: 1,
                node: Some(node),
            });
            NodeId::new(idx, 1)
        }
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_mut()
    }
}
