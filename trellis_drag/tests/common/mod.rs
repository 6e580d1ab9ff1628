// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures and drivers for the drag integration tests.

#![allow(
    missing_docs,
    dead_code,
    reason = "Integration-test helper module; not every test binary uses every helper."
)]

use kurbo::{Point, Rect};
use trellis_drag::{CloneKind, DragController, DragEvent, DragPolicy, PointerInput};
use trellis_tree::{NodeId, Tree};

/// The box of row `i` in a 100px-wide vertical list: 20px tall, stacked.
pub(crate) fn row(i: usize) -> Rect {
    let top = 20.0 * i as f64;
    Rect::new(0.0, top, 100.0, top + 20.0)
}

/// The center of row `i`.
pub(crate) fn row_center(i: usize) -> Point {
    row(i).center()
}

/// A vertical list container at the origin with `n` 20px rows.
///
/// The container box is at least three rows tall so there is always some
/// padding area below the items.
pub(crate) fn vertical_list(n: usize) -> (Tree, NodeId, Vec<NodeId>) {
    let mut tree = Tree::new();
    let height = 20.0 * n.max(3) as f64;
    let list = tree.insert(None, Rect::new(0.0, 0.0, 100.0, height));
    let items = (0..n).map(|i| tree.insert(Some(list), row(i))).collect();
    (tree, list, items)
}

pub(crate) fn press<P: DragPolicy<NodeId>>(
    drag: &mut DragController<NodeId, P>,
    tree: &Tree,
    target: NodeId,
    at: Point,
) -> Vec<DragEvent<NodeId>> {
    drag.on_pointer_down(tree, &PointerInput::mouse(at, 0).with_target(target))
}

pub(crate) fn drag_to<P: DragPolicy<NodeId>>(
    drag: &mut DragController<NodeId, P>,
    tree: &mut Tree,
    at: Point,
) -> Vec<DragEvent<NodeId>> {
    drag.on_pointer_move(tree, &PointerInput::mouse(at, 16))
}

pub(crate) fn release<P: DragPolicy<NodeId>>(
    drag: &mut DragController<NodeId, P>,
    tree: &mut Tree,
    at: Point,
) -> Vec<DragEvent<NodeId>> {
    drag.on_pointer_up(tree, &PointerInput::released(at, 32))
}

/// The mirror node announced by a promotion event batch.
pub(crate) fn mirror_of(events: &[DragEvent<NodeId>]) -> Option<NodeId> {
    events.iter().find_map(|e| match e {
        DragEvent::Cloned {
            clone,
            kind: CloneKind::Mirror,
            ..
        } => Some(*clone),
        _ => None,
    })
}

/// The copy node announced by a session-start event batch.
pub(crate) fn copy_of(events: &[DragEvent<NodeId>]) -> Option<NodeId> {
    events.iter().find_map(|e| match e {
        DragEvent::Cloned {
            clone,
            kind: CloneKind::Copy,
            ..
        } => Some(*clone),
        _ => None,
    })
}
