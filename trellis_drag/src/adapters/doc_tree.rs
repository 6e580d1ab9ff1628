// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document-tree adapter: host capability implementations for
//! [`trellis_tree::Tree`].
//!
//! [`TreeHost`] maps straight onto the tree's structural API. The
//! [`VisualHost`] side realizes the mirror as a real node: a non-pickable
//! subtree clone whose bounds track the pointer, appended to the configured
//! mirror container or stacked as a topmost root. That makes mirror motion
//! observable through ordinary bounds queries, which is all the reference
//! host needs (and exactly what tests want).
//!
//! ## Example
//!
//! A complete drag: press on the first row, slide past the start tolerance,
//! release below the second row's midpoint.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use trellis_drag::{DragController, DragEvent, Options, PointerInput};
//! use trellis_tree::Tree;
//!
//! let mut tree = Tree::new();
//! let list = tree.insert(None, Rect::new(0.0, 0.0, 100.0, 60.0));
//! let a = tree.insert(Some(list), Rect::new(0.0, 0.0, 100.0, 20.0));
//! let b = tree.insert(Some(list), Rect::new(0.0, 20.0, 100.0, 40.0));
//!
//! let mut drag = DragController::new(vec![list], Options::default());
//!
//! drag.on_pointer_down(&tree, &PointerInput::mouse(Point::new(50.0, 10.0), 0).with_target(a));
//! let events = drag.on_pointer_move(&mut tree, &PointerInput::mouse(Point::new(50.0, 35.0), 16));
//! assert!(matches!(events[0], DragEvent::Drag { .. }));
//!
//! let events = drag.on_pointer_up(&mut tree, &PointerInput::released(Point::new(50.0, 35.0), 32));
//! assert!(matches!(events[0], DragEvent::Drop { .. }));
//! assert_eq!(tree.children_of(list), &[b, a]);
//! ```

use alloc::vec::Vec;
use kurbo::{Point, Rect, Size};
use trellis_tree::{NodeFlags, NodeId, Tree};

use crate::host::{TreeHost, VisualHost};

impl TreeHost<NodeId> for Tree {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.next_sibling(node)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.children_of(node).to_vec()
    }

    fn bounds(&self, node: NodeId) -> Rect {
        self.bounds(node).unwrap_or(Rect::ZERO)
    }

    fn node_at(&self, point: Point, ignoring: Option<NodeId>) -> Option<NodeId> {
        self.node_at_point(point, ignoring)
    }

    fn is_text_input(&self, node: NodeId) -> bool {
        self.is_text_input(node)
    }

    fn insert_before(&mut self, container: NodeId, item: NodeId, reference: Option<NodeId>) {
        self.insert_before(container, item, reference);
    }

    fn detach(&mut self, item: NodeId) {
        self.detach(item);
    }

    fn clone_node(&mut self, item: NodeId) -> NodeId {
        // A stale item degenerates to handing the original back, which the
        // controller then simply moves.
        self.clone_subtree(item).unwrap_or(item)
    }
}

impl VisualHost<NodeId> for Tree {
    fn create_mirror(&mut self, item: NodeId, bounds: Rect, container: Option<NodeId>) -> NodeId {
        let mirror = match self.clone_subtree(item) {
            Some(mirror) => mirror,
            None => self.insert(None, bounds),
        };
        self.set_bounds(mirror, bounds);
        // The controller hides the mirror from its own hit tests explicitly;
        // stripping PICKABLE keeps it out of everyone else's too.
        if let Some(flags) = self.flags(mirror) {
            self.set_flags(mirror, flags & !NodeFlags::PICKABLE);
        }
        match container {
            Some(c) => self.append(c, mirror),
            None => self.attach_root(mirror),
        }
        mirror
    }

    fn move_mirror(&mut self, mirror: NodeId, origin: Point) {
        if let Some(rect) = self.bounds(mirror) {
            self.set_bounds(mirror, Rect::from_origin_size(origin, rect.size()));
        }
    }

    fn resize_mirror(&mut self, mirror: NodeId, size: Size) {
        if let Some(rect) = self.bounds(mirror) {
            self.set_bounds(mirror, Rect::from_origin_size(rect.origin(), size));
        }
    }

    fn remove_mirror(&mut self, mirror: NodeId) {
        self.remove(mirror);
    }
}
