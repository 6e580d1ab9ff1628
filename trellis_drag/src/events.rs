// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle notifications emitted by the drag controller.
//!
//! Controller entry points return the notifications raised by that call, in
//! emission order. Consumers route them into whatever observer mechanism
//! they use; the controller itself holds no subscriber state.

/// What kind of clone a [`DragEvent::Cloned`] notification announces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloneKind {
    /// A copy of the dragged item that will be inserted instead of moving
    /// the original (copy-drag mode).
    Copy,
    /// The floating mirror that follows the pointer for the duration of the
    /// drag.
    Mirror,
}

/// A drag lifecycle notification.
///
/// `item` is the node being dragged: the copy when copy-drag is active, the
/// original otherwise. `source` is always the container the drag started
/// from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEvent<K> {
    /// A drag session became active.
    Drag {
        /// The grabbed item (the original, even in copy mode).
        item: K,
        /// The container the item was grabbed from.
        source: K,
    },
    /// The session ended, by any terminal path. Always the last notification
    /// of a session that emitted [`DragEvent::Drag`].
    DragEnd {
        /// The dragged item.
        item: K,
    },
    /// A clone was created: the drag copy at session start, or the floating
    /// mirror when the drag becomes pointer-driven.
    Cloned {
        /// The newly created node.
        clone: K,
        /// The node it was cloned from.
        original: K,
        /// Which role the clone plays.
        kind: CloneKind,
    },
    /// The pointer entered a container that would accept the item.
    Over {
        /// The dragged item.
        item: K,
        /// The container entered.
        container: K,
        /// The source container.
        source: K,
    },
    /// The pointer left the container it was previously over.
    Out {
        /// The dragged item.
        item: K,
        /// The container left.
        container: K,
        /// The source container.
        source: K,
    },
    /// The item's shadow placement changed: it now sits at a new position in
    /// `container` while the drag is still in flight.
    Shadow {
        /// The dragged item.
        item: K,
        /// The container the item was placed in.
        container: K,
        /// The source container.
        source: K,
    },
    /// The session concluded without a committed move: a no-op round trip,
    /// a revert, or a discarded copy.
    Cancel {
        /// The dragged item.
        item: K,
        /// The source container.
        container: K,
        /// The source container (kept alongside `container` so all terminal
        /// notifications share one shape).
        source: K,
    },
    /// The item was removed from the tree (spill with removal enabled, or an
    /// explicit remove).
    Remove {
        /// The removed item.
        item: K,
        /// The item's parent after the removal, if it is somehow still
        /// attached.
        container: Option<K>,
        /// The source container.
        source: K,
    },
    /// The session committed a move.
    Drop {
        /// The dropped item.
        item: K,
        /// The container it landed in. `None` only for an unplaced copy
        /// committed nowhere (a spill that neither reverted nor cancelled).
        container: Option<K>,
        /// The source container.
        source: K,
        /// The item's next sibling after the drop, `None` when it landed
        /// last.
        sibling: Option<K>,
    },
}
