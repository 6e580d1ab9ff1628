// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_drag --heading-base-level=0

//! Trellis Drag: pointer-driven drag-and-drop reordering across containers.
//!
//! This crate interprets a stream of normalized pointer events into a drag
//! lifecycle: pick an element up, float a mirror under the pointer, shadow
//! the element's position through the live tree as the pointer crosses drop
//! targets, and commit (or revert) the move on release. It owns the hard
//! parts — grab validation, mouse/touch start disambiguation, drop-target
//! and insertion-reference resolution, copy semantics, axis locks, spill
//! policies — and delegates everything else.
//!
//! ## Design Philosophy
//!
//! - **The tree is yours.** The controller holds opaque handles to
//!   externally-owned nodes and reaches the tree only through the
//!   [`TreeHost`] capability trait: structural queries, box lookups, and the
//!   two mutations a drag is allowed (insert-before and detach, for the
//!   dragged item only).
//! - **Cosmetics are collaborators.** Mirror rendering, in-transit markers,
//!   focus clearing, and reflow transitions sit behind [`VisualHost`], most
//!   of it defaulted to no-ops.
//! - **Policy is a capability.** The caller predicates that shape a drag
//!   (`is_container`, `moves`, `accepts`, `invalid`, `copy`) form the
//!   [`DragPolicy`] trait with permissive defaults, consulted fresh on every
//!   event.
//! - **Events out, not callbacks in.** Every entry point returns the
//!   [`DragEvent`] notifications it raised, in order; wiring them into an
//!   observer mechanism is the host's business.
//!
//! ## Lifecycle
//!
//! `Idle → Pending → Active → Idle`. A press that validates into a grab is
//! pending until the gesture declares itself: mice promote once movement
//! beats the per-axis slide tolerance, touches promote when a hold survives
//! the scroll-detection window without movement. Active sessions re-resolve
//! their drop target on every move — nothing is cached across moves, so
//! dynamic policies and containers just work. Drop, cancel, remove, and
//! destroy all funnel into one cleanup that resets the controller.
//!
//! ## Minimal example
//!
//! With the `tree_adapter` feature (on by default), [`trellis_tree::Tree`]
//! works as a host out of the box:
//!
//! ```rust
//! # #[cfg(feature = "tree_adapter")]
//! # fn example() {
//! use kurbo::{Point, Rect};
//! use trellis_drag::{DragController, Options, PointerInput};
//! use trellis_tree::Tree;
//!
//! let mut tree = Tree::new();
//! let list = tree.insert(None, Rect::new(0.0, 0.0, 100.0, 60.0));
//! let a = tree.insert(Some(list), Rect::new(0.0, 0.0, 100.0, 20.0));
//! let b = tree.insert(Some(list), Rect::new(0.0, 20.0, 100.0, 40.0));
//!
//! let mut drag = DragController::new(vec![list], Options::default());
//!
//! // Press on `a`, slide past the tolerance, release below `b`'s midpoint.
//! drag.on_pointer_down(&tree, &PointerInput::mouse(Point::new(50.0, 10.0), 0).with_target(a));
//! drag.on_pointer_move(&mut tree, &PointerInput::mouse(Point::new(50.0, 35.0), 16));
//! drag.on_pointer_up(&mut tree, &PointerInput::released(Point::new(50.0, 35.0), 32));
//!
//! assert_eq!(tree.children_of(list), &[b, a]);
//! # }
//! ```
//!
//! See [`adapters::doc_tree`] for the full worked example including the
//! emitted notifications.
//!
//! ## Touch timers
//!
//! The only timed behavior is the touch hold. The controller stores a
//! deadline instead of owning a timer: after any event, ask
//! [`DragController::touch_timer_deadline`] and arrange to call
//! [`DragController::on_touch_timer`] then. Stale callbacks are ignored, so
//! a host can be sloppy about cancellation.
//!
//! ## Features
//!
//! - `tree_adapter` (default): host trait implementations for
//!   [`trellis_tree::Tree`].
//! - `std` (default) / `libm`: forwarded to Kurbo for `no_std` builds.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
mod controller;
mod events;
pub mod geometry;
mod host;
mod input;
mod options;
mod policy;

pub use controller::DragController;
pub use events::{CloneKind, DragEvent};
pub use host::{TreeHost, VisualHost};
pub use input::{Modifiers, PointerButtons, PointerInput, PointerSource};
pub use options::{Axis, Direction, Options};
pub use policy::{DefaultPolicy, DragPolicy};
