// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integration helpers for other Trellis crates.
//!
//! Modules in this file are behind feature flags so `trellis_drag` can
//! remain usable in contexts that do not depend on those crates.
//!
//! - [`doc_tree`] (`tree_adapter` feature): host capability implementations
//!   for a [`trellis_tree::Tree`].

#[cfg(feature = "tree_adapter")]
pub mod doc_tree;
