// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_tree --heading-base-level=0

//! Trellis Tree: a small generational document tree with box geometry.
//!
//! This crate is the reference host for the Trellis drag machinery. It stores
//! a hierarchy of nodes in document order, a world-space bounding box per
//! node, and a few flags, and answers the structural and spatial questions a
//! drag interaction needs:
//!
//! - Parent, siblings, and children in document order.
//! - Topmost node under a point, with document-order stacking
//!   ([`Tree::node_at_point`]), optionally ignoring one subtree.
//! - Structural mutation: [`Tree::insert_before`], [`Tree::detach`],
//!   [`Tree::remove`], and deep [`Tree::clone_subtree`].
//!
//! ## Not a layout engine
//!
//! This crate does not perform layout. Callers compute positions and sizes
//! with whatever layout system they choose and write the resulting
//! world-space boxes via [`Tree::set_bounds`]. Hit testing reads those boxes
//! as-is.
//!
//! ## Identity
//!
//! Nodes are addressed by [`NodeId`], a copyable generational handle. Stale
//! handles (freed and reused slots) never alias a live node; structural
//! queries on a stale handle return `None` and mutations are ignored.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use trellis_tree::Tree;
//!
//! let mut tree = Tree::new();
//! let list = tree.insert(None, Rect::new(0.0, 0.0, 100.0, 60.0));
//! let a = tree.insert(Some(list), Rect::new(0.0, 0.0, 100.0, 20.0));
//! let b = tree.insert(Some(list), Rect::new(0.0, 20.0, 100.0, 40.0));
//!
//! assert_eq!(tree.node_at_point(Point::new(50.0, 30.0), None), Some(b));
//!
//! // Move `b` in front of `a`.
//! tree.insert_before(list, b, Some(a));
//! assert_eq!(tree.children_of(list), &[b, a]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::Tree;
pub use types::{NodeFlags, NodeId};
