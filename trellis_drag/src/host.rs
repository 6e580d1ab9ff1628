// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host capability traits.
//!
//! The controller never owns a document tree. It addresses externally-owned
//! nodes through opaque handles (`K`) and delegates every structural query,
//! every box lookup, and the few mutations it is allowed to perform to these
//! traits. Hosts decide what a node is: a DOM element, a widget id, a scene
//! graph handle.
//!
//! [`TreeHost`] carries the load-bearing operations. [`VisualHost`] collects
//! the cosmetic collaborators (mirror rendering, markers, transitions);
//! apart from the mirror itself, everything there defaults to a no-op so
//! minimal hosts stay minimal.

use alloc::vec::Vec;
use kurbo::{Point, Rect, Size};

/// Structural and geometric access to the host's document tree.
///
/// The controller mutates the tree only through [`TreeHost::insert_before`]
/// and [`TreeHost::detach`], and only ever for the active item or its copy.
/// Queries on a node that no longer exists should return `None` / empty
/// rather than panic; the controller treats missing ancestry as "no target".
pub trait TreeHost<K> {
    /// The parent of `node`, or `None` at a tree boundary.
    fn parent(&self, node: K) -> Option<K>;

    /// The sibling immediately after `node` in its parent's child order.
    fn next_sibling(&self, node: K) -> Option<K>;

    /// The children of `node` in document order.
    fn children(&self, node: K) -> Vec<K>;

    /// The world-space bounding box of `node`.
    fn bounds(&self, node: K) -> Rect;

    /// The topmost visible element at a document coordinate, skipping
    /// `ignoring` and its subtree. The controller passes the mirror here so
    /// the floating proxy never occludes the element beneath it.
    fn node_at(&self, point: Point, ignoring: Option<K>) -> Option<K>;

    /// Whether `node` is a text-editable element (input, text area, or
    /// inherited editability). Used to keep text selection working while
    /// `ignore_input_text_selection` is enabled. Default: nothing is.
    fn is_text_input(&self, _node: K) -> bool {
        false
    }

    /// Moves `item` into `container` in front of `reference`; `None`
    /// appends. The item is detached from wherever it currently is first.
    fn insert_before(&mut self, container: K, item: K, reference: Option<K>);

    /// Unlinks `item` from its parent without destroying it.
    fn detach(&mut self, item: K);

    /// Deep-copies `item`, returning a detached clone. Called once per
    /// copy-drag session.
    fn clone_node(&mut self, item: K) -> K;
}

/// Cosmetic collaborators: mirror rendering and transition hooks.
pub trait VisualHost<K> {
    /// Creates the floating mirror for `item`, visually cloning it at
    /// `bounds`, appended to `container` (or the host's default surface when
    /// `None`). The mirror must not participate in hit testing.
    fn create_mirror(&mut self, item: K, bounds: Rect, container: Option<K>) -> K;

    /// Moves the mirror so its top-left corner sits at `origin`.
    fn move_mirror(&mut self, mirror: K, origin: Point);

    /// Resizes the mirror. Issued when the item crosses into a different
    /// container under an axis lock, so the mirror matches the new
    /// container's width.
    fn resize_mirror(&mut self, mirror: K, size: Size);

    /// Destroys the mirror.
    fn remove_mirror(&mut self, mirror: K);

    /// Toggles the "in transit" visual marker on the dragged item for the
    /// duration of the session. Default: no-op.
    fn set_in_transit(&mut self, _item: K, _in_transit: bool) {}

    /// Drops any active text focus. Issued at drag start; on some touch
    /// platforms a held finger over a focused input triggers selection UI.
    /// Default: no-op.
    fn clear_focus(&mut self) {}

    /// Transition hook for a node displaced by a shadow move: `from` is its
    /// box before the move, `millis` the configured duration. Default:
    /// no-op.
    fn animate_shift(&mut self, _node: K, _from: Rect, _millis: u32) {}
}
