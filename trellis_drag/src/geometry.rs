// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry oracle: pure queries resolving where a pointer position lands.
//!
//! Three questions, all answered from [`TreeHost`] reads with no state of
//! their own, so for a fixed tree and pointer position every answer is
//! stable across repeated calls:
//!
//! - Which direct child of a container is the pointer inside
//!   ([`immediate_child`])?
//! - Given that child, which sibling should the dragged item be inserted
//!   before ([`insertion_reference`])? `None` means append.
//! - Which ancestor of the element behind the pointer is the drop target
//!   ([`drop_target`])? Acceptance is a caller concern, passed in as a
//!   predicate.

use kurbo::Point;

use crate::host::TreeHost;
use crate::options::Direction;

/// Walks up from `behind` and returns the first ancestor (or `behind`
/// itself) the `accepted` predicate approves, or `None` when the walk runs
/// off the tree.
pub fn drop_target<K, H>(
    host: &H,
    behind: K,
    mut accepted: impl FnMut(&H, K) -> bool,
) -> Option<K>
where
    K: Copy,
    H: TreeHost<K>,
{
    let mut target = Some(behind);
    while let Some(t) = target {
        if accepted(host, t) {
            return Some(t);
        }
        target = host.parent(t);
    }
    None
}

/// Returns the direct child of `container` that `descendant` sits inside.
///
/// Yields `Some(container)` itself when the pointer is directly over the
/// container (its padding, say, rather than any child), and `None` when
/// `descendant` is not inside `container` at all.
pub fn immediate_child<K, H>(host: &H, container: K, descendant: K) -> Option<K>
where
    K: Copy + PartialEq,
    H: TreeHost<K>,
{
    let mut cur = descendant;
    loop {
        if cur == container {
            return Some(container);
        }
        match host.parent(cur) {
            Some(p) if p == container => return Some(cur),
            Some(p) => cur = p,
            None => return None,
        }
    }
}

/// Resolves the insertion reference: the child of `container` the dragged
/// item should be inserted before, or `None` to append at the end.
///
/// With `child != container` the pointer is inside that child, and the
/// reference is the child itself or its next sibling, picked by comparing
/// the pointer against the child's box along `direction` (midpoint for a
/// single axis, nearest edge for [`Direction::Mixed`]).
///
/// With `child == container` the pointer is over the container but outside
/// every child; the children are scanned in document order for the first one
/// the pointer has not yet passed.
pub fn insertion_reference<K, H>(
    host: &H,
    container: K,
    child: K,
    point: Point,
    direction: Direction,
) -> Option<K>
where
    K: Copy + PartialEq,
    H: TreeHost<K>,
{
    if child != container {
        reference_inside(host, child, point, direction)
    } else {
        reference_outside(host, container, point, direction)
    }
}

fn reference_inside<K, H>(host: &H, child: K, point: Point, direction: Direction) -> Option<K>
where
    K: Copy + PartialEq,
    H: TreeHost<K>,
{
    let rect = host.bounds(child);
    let after = match direction {
        Direction::Horizontal => point.x > rect.x0 + rect.width() / 2.0,
        Direction::Vertical => point.y > rect.y0 + rect.height() / 2.0,
        Direction::Mixed => {
            let to_top = point.y - rect.y0;
            let to_left = point.x - rect.x0;
            let to_bottom = rect.y1 - point.y;
            let to_right = rect.x1 - point.x;
            let nearest = to_left.min(to_right).min(to_top).min(to_bottom);
            to_left == nearest || to_top == nearest
        }
    };
    if after { host.next_sibling(child) } else { Some(child) }
}

// The slower path: scan the children in document order for the first one the
// pointer has not passed yet. Works for any position over the container,
// including its padding.
fn reference_outside<K, H>(
    host: &H,
    container: K,
    point: Point,
    direction: Direction,
) -> Option<K>
where
    K: Copy,
    H: TreeHost<K>,
{
    for el in host.children(container) {
        let rect = host.bounds(el);
        let before = match direction {
            Direction::Horizontal => rect.x0 + rect.width() / 2.0 > point.x,
            Direction::Vertical => rect.y0 + rect.height() / 2.0 > point.y,
            Direction::Mixed => rect.x1 > point.x && rect.y1 > point.y,
        };
        if before {
            return Some(el);
        }
    }
    None
}
