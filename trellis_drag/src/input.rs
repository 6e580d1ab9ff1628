// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input model: the normalized event shape the controller consumes.
//!
//! The controller does not subscribe to anything. Hosts unify whatever raw
//! event streams they have (mouse, touch, pointer) into [`PointerInput`]
//! values and feed them to the controller entry points in dispatch order.
//! Timestamps are caller-supplied milliseconds from any monotonic origin;
//! they only ever get compared against each other.

use kurbo::Point;

bitflags::bitflags! {
    /// Pressed pointer buttons at the time of an event.
    ///
    /// For touch input, a finger on the surface counts as [`PointerButtons::PRIMARY`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        /// Left mouse button, or a touch contact.
        const PRIMARY   = 0b0000_0001;
        /// Right mouse button.
        const SECONDARY = 0b0000_0010;
        /// Middle mouse button.
        const AUXILIARY = 0b0000_0100;
    }
}

/// Keyboard modifiers held during a pointer event.
///
/// Only the modifiers that gate grab validation are carried; a press with
/// either of these held is never treated as a drag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Control key.
    pub ctrl: bool,
    /// Meta / command key.
    pub meta: bool,
}

/// The kind of device a pointer event came from.
///
/// The distinction matters only for start disambiguation: mouse drags start
/// on movement, touch drags start on a hold (immediate movement means the
/// user wants to scroll).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerSource {
    /// Mouse-like pointer: precise, hover-capable.
    Mouse,
    /// Touch-like pointer: a finger or stylus on a touchscreen.
    Touch,
}

/// One normalized pointer event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput<K> {
    /// Pointer position in document coordinates.
    pub position: Point,
    /// The node the event was delivered to. Only meaningful on press events;
    /// move and release resolve their targets by hit testing instead.
    pub target: Option<K>,
    /// Buttons held at event time.
    pub buttons: PointerButtons,
    /// Modifiers held at event time.
    pub modifiers: Modifiers,
    /// Originating device kind.
    pub source: PointerSource,
    /// Event timestamp in milliseconds.
    pub time_ms: u64,
}

impl<K> PointerInput<K> {
    /// A mouse event with the primary button held.
    pub fn mouse(position: Point, time_ms: u64) -> Self {
        Self {
            position,
            target: None,
            buttons: PointerButtons::PRIMARY,
            modifiers: Modifiers::default(),
            source: PointerSource::Mouse,
            time_ms,
        }
    }

    /// A touch event with one contact on the surface.
    pub fn touch(position: Point, time_ms: u64) -> Self {
        Self {
            source: PointerSource::Touch,
            ..Self::mouse(position, time_ms)
        }
    }

    /// A release event: same shape, no buttons held.
    pub fn released(position: Point, time_ms: u64) -> Self {
        Self {
            buttons: PointerButtons::empty(),
            ..Self::mouse(position, time_ms)
        }
    }

    /// Sets the delivery target (for press events).
    #[must_use]
    pub fn with_target(mut self, target: K) -> Self {
        self.target = Some(target);
        self
    }
}
