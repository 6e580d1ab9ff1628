// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container policy: the caller-supplied predicates that shape a drag.
//!
//! Every hook has a permissive default, so `DefaultPolicy` gives the common
//! behavior: anything inside a registered container is grabbable and every
//! container accepts every item. Hooks are consulted on every event they
//! gate; nothing is cached between moves, so a policy backed by dynamic
//! state takes effect immediately.

/// Predicates consulted by the drag controller.
///
/// Implementations should be cheap and deterministic for a given input;
/// the controller may call any of them several times per pointer move.
pub trait DragPolicy<K> {
    /// Whether `el` is a drop container, in addition to the controller's
    /// registered set. Default: `false` (registered set only).
    fn is_container(&self, _el: K) -> bool {
        false
    }

    /// Whether `item` may be picked up. `handle` is the node the press
    /// landed on (a drag handle inside the item), `sibling` the item's next
    /// sibling at grab time. Default: everything moves.
    fn moves(&self, _item: K, _source: K, _handle: K, _sibling: Option<K>) -> bool {
        true
    }

    /// Whether `target` accepts `item` at the candidate `reference` slot.
    /// Not consulted for dropping an item right back where it started; that
    /// is always allowed. Default: everything is accepted.
    fn accepts(&self, _item: K, _target: K, _source: K, _reference: Option<K>) -> bool {
        true
    }

    /// Whether `el` poisons a grab. Checked for every ancestor between the
    /// pressed node and the container while validating a grab; returning
    /// `true` anywhere on that path rejects the grab. Default: nothing does.
    fn invalid(&self, _el: K, _handle: K) -> bool {
        false
    }

    /// Whether grabbing `item` from `source` clones it instead of moving the
    /// original. ORed with [`Options::copy`](crate::Options::copy).
    /// Default: move the original.
    fn copy(&self, _item: K, _source: K) -> bool {
        false
    }
}

/// The all-defaults policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultPolicy;

impl<K> DragPolicy<K> for DefaultPolicy {}
