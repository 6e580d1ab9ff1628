// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controller configuration.

/// The layout axis used to resolve insertion references.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Children flow top to bottom; references resolve against vertical
    /// midpoints.
    #[default]
    Vertical,
    /// Children flow left to right; references resolve against horizontal
    /// midpoints.
    Horizontal,
    /// Children wrap in both directions; references resolve against the
    /// nearest box edge.
    Mixed,
}

/// Restricts mirror movement to one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Axis {
    /// The mirror follows the pointer freely.
    #[default]
    None,
    /// Horizontal movement only; the vertical coordinate stays pinned to the
    /// anchor of the container the item is currently in.
    X,
    /// Vertical movement only; the horizontal coordinate stays pinned.
    Y,
}

/// Behavior knobs for a [`DragController`](crate::DragController).
///
/// Captured once at construction. Every field has the conventional default;
/// `Options::default()` produces a plain move-drag in a vertical list with
/// mouse/touch disambiguation thresholds of 5 device-independent pixels and
/// a 500ms touch hold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Options<K> {
    /// Clone the item on grab instead of moving the original. ORed with the
    /// policy's per-grab `copy` predicate.
    pub copy: bool,
    /// Allow a copy to also reorder within its own source container. Without
    /// this, a copy that re-enters its source is discarded.
    pub copy_sort_source: bool,
    /// Snap the item back to its origin when released outside every
    /// accepting container.
    pub revert_on_spill: bool,
    /// Remove the item from the tree when released outside every accepting
    /// container. Takes precedence over a cancel, not over a legal drop.
    pub remove_on_spill: bool,
    /// Insertion-reference axis.
    pub direction: Direction,
    /// Mirror movement restriction.
    pub axis: Axis,
    /// Do not promote a mouse grab to a drag while the pointer is over a
    /// text-editable element, so text selection keeps working.
    pub ignore_input_text_selection: bool,
    /// Where the host should append the floating mirror. `None` means the
    /// host's default surface.
    pub mirror_container: Option<K>,
    /// Reflow transition time in milliseconds for siblings displaced by a
    /// shadow move within the same container. `0` disables the hook.
    pub animation_duration: u32,
    /// Touch movement tolerance, in pixels per axis, during the hold that
    /// precedes a touch drag. Movement beyond this aborts the grab as a
    /// scroll attempt.
    pub scroll_threshold_on_touch: f64,
    /// How long a touch must hold still before it promotes to a drag, in
    /// milliseconds.
    pub scroll_detection_timeout_ms: u64,
    /// Mouse movement tolerance in X before a grab promotes to a drag.
    pub slide_factor_x: f64,
    /// Mouse movement tolerance in Y before a grab promotes to a drag.
    pub slide_factor_y: f64,
}

impl<K> Default for Options<K> {
    fn default() -> Self {
        Self {
            copy: false,
            copy_sort_source: false,
            revert_on_spill: false,
            remove_on_spill: false,
            direction: Direction::default(),
            axis: Axis::default(),
            ignore_input_text_selection: true,
            mirror_container: None,
            animation_duration: 0,
            scroll_threshold_on_touch: 5.0,
            scroll_detection_timeout_ms: 500,
            slide_factor_x: 5.0,
            slide_factor_y: 5.0,
        }
    }
}
