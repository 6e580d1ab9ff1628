// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag controller: grab validation, start disambiguation, and the
//! active session state machine.
//!
//! A session moves through `Idle → Pending → Active → Idle`. A press that
//! survives grab validation parks in `Pending` until the gesture declares
//! itself: mice promote on movement past the slide tolerance, touches
//! promote on a hold (immediate movement is a scroll and aborts the grab).
//! An active session resolves a drop target and insertion reference on every
//! move, shadow-moves the item through the live tree, and steers the
//! floating mirror. Every terminal path (drop, cancel, remove, destroy)
//! funnels through one cleanup that resets the controller for the next grab.
//!
//! Entry points return the lifecycle notifications they raised, in order;
//! see [`DragEvent`] for the vocabulary.

use alloc::vec::Vec;
use kurbo::{Point, Size, Vec2};

use crate::events::{CloneKind, DragEvent};
use crate::geometry;
use crate::host::{TreeHost, VisualHost};
use crate::input::{PointerButtons, PointerInput, PointerSource};
use crate::options::{Axis, Direction, Options};
use crate::policy::{DefaultPolicy, DragPolicy};

/// A validated press that has not yet declared itself a drag.
#[derive(Clone, Copy, Debug)]
struct PendingGrab<K> {
    item: K,
    source: K,
    origin: Point,
    source_kind: PointerSource,
    /// Touch grabs promote when this deadline passes without the finger
    /// moving; mouse grabs have no deadline.
    deadline: Option<u64>,
    /// Most recent pointer position seen while pending.
    last_position: Point,
}

/// State of one live drag, from activation to cleanup.
#[derive(Clone, Copy, Debug)]
struct Session<K> {
    /// The grabbed item (the original, even in copy mode).
    item: K,
    source: K,
    copy: Option<K>,
    mirror: Option<K>,
    /// The item's next sibling at grab time, for revert and no-op detection.
    initial_sibling: Option<K>,
    /// The item's next sibling at its current shadow placement.
    current_sibling: Option<K>,
    /// The dragged node's parent as of the previous move.
    current_parent: Option<K>,
    /// The container the pointer was last over, for over/out pairing.
    last_drop_target: Option<K>,
    /// Pointer offset into the item at grab time; the mirror origin is the
    /// pointer minus this.
    grab_offset: Vec2,
    /// Pinned coordinate source while an axis lock is active.
    axis_anchor: Point,
    /// Previous sort-axis pointer coordinate, for the displaced-sibling
    /// transition hook.
    last_sort_coord: f64,
}

/// Drag-and-drop controller over an externally-owned document tree.
///
/// One controller instance runs at most one session at a time; a press while
/// a mirrored session is live is ignored. The controller holds no reference
/// to the host — every entry point borrows it for the duration of the call,
/// so hosts stay free to be whatever they are between events.
#[derive(Clone, Debug)]
pub struct DragController<K, P = DefaultPolicy> {
    options: Options<K>,
    policy: P,
    containers: Vec<K>,
    dragging: bool,
    grabbed: Option<PendingGrab<K>>,
    session: Option<Session<K>>,
}

impl<K: Copy + PartialEq> DragController<K> {
    /// Creates a controller over the given container set with the default
    /// (allow-everything) policy.
    pub fn new(containers: Vec<K>, options: Options<K>) -> Self {
        Self::with_policy(containers, options, DefaultPolicy)
    }
}

impl<K: Copy + PartialEq, P: DragPolicy<K>> DragController<K, P> {
    /// Creates a controller with a custom [`DragPolicy`].
    pub fn with_policy(containers: Vec<K>, options: Options<K>, policy: P) -> Self {
        Self {
            options,
            policy,
            containers,
            dragging: false,
            grabbed: None,
            session: None,
        }
    }

    /// The configuration this controller was built with.
    pub fn options(&self) -> &Options<K> {
        &self.options
    }

    /// The registered container set.
    pub fn containers(&self) -> &[K] {
        &self.containers
    }

    /// Mutable access to the registered container set. Changes take effect
    /// on the next event; membership is re-evaluated on every move.
    pub fn containers_mut(&mut self) -> &mut Vec<K> {
        &mut self.containers
    }

    /// `true` while a drag session is active.
    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// When a touch grab is pending, the timestamp at which the host should
    /// call [`DragController::on_touch_timer`]. Re-check after every event;
    /// any path that abandons the pending grab clears it.
    pub fn touch_timer_deadline(&self) -> Option<u64> {
        self.grabbed.as_ref().and_then(|g| g.deadline)
    }

    /// Whether `el` is a drop container: registered, or approved by the
    /// policy's dynamic predicate.
    pub fn is_container(&self, el: K) -> bool {
        self.containers.iter().any(|&c| c == el) || self.policy.is_container(el)
    }

    /// Whether a press on `item` would start a drag right now.
    pub fn can_move<H: TreeHost<K>>(&self, host: &H, item: K) -> bool {
        self.can_start(host, item).is_some()
    }

    /// Feeds a press event. Starts grab validation; a validated grab enters
    /// the pending state and waits for the gesture to declare itself.
    ///
    /// No notification fires from here — an ignored press and a pending
    /// grab are indistinguishable until promotion.
    pub fn on_pointer_down<H: TreeHost<K>>(
        &mut self,
        host: &H,
        input: &PointerInput<K>,
    ) -> Vec<DragEvent<K>> {
        let events = Vec::new();
        // Devices that synthesize a mouse press for a touch gesture deliver
        // two presses for one physical gesture; the first accepted one wins.
        if self.grabbed.is_some() {
            return events;
        }
        if !input.buttons.contains(PointerButtons::PRIMARY)
            || input.modifiers.ctrl
            || input.modifiers.meta
        {
            return events;
        }
        let Some(target) = input.target else {
            return events;
        };
        let Some((item, source)) = self.can_start(host, target) else {
            return events;
        };
        let deadline = match input.source {
            PointerSource::Touch => Some(input.time_ms + self.options.scroll_detection_timeout_ms),
            PointerSource::Mouse => None,
        };
        self.grabbed = Some(PendingGrab {
            item,
            source,
            origin: input.position,
            source_kind: input.source,
            deadline,
            last_position: input.position,
        });
        events
    }

    /// Feeds a move event. Disambiguates a pending grab, or advances the
    /// active session: re-resolves the drop target and insertion reference,
    /// shadow-moves the item when the placement changed, and repositions the
    /// mirror.
    pub fn on_pointer_move<H: TreeHost<K> + VisualHost<K>>(
        &mut self,
        host: &mut H,
        input: &PointerInput<K>,
    ) -> Vec<DragEvent<K>> {
        if self.grabbed.is_some() {
            return self.disambiguate_move(host, input);
        }
        if self.dragging {
            return self.drag_move(host, input.position);
        }
        Vec::new()
    }

    /// Feeds a release event. A pending grab is abandoned; an active session
    /// resolves its terminal path from the release position: drop over an
    /// accepting container, otherwise remove or cancel per the spill
    /// options.
    pub fn on_pointer_up<H: TreeHost<K> + VisualHost<K>>(
        &mut self,
        host: &mut H,
        input: &PointerInput<K>,
    ) -> Vec<DragEvent<K>> {
        let mut events = Vec::new();
        self.grabbed = None;
        if !self.dragging {
            return events;
        }
        let Some(s) = self.session else {
            return events;
        };
        let item = s.copy.unwrap_or(s.item);
        let behind = host.node_at(input.position, s.mirror);
        let target = behind.and_then(|b| self.resolve_drop_target(host, b, input.position, &s));
        match target {
            Some(t)
                if (s.copy.is_some() && self.options.copy_sort_source)
                    || s.copy.is_none()
                    || t != s.source =>
            {
                self.drop_commit(host, item, Some(t), &mut events);
            }
            _ if self.options.remove_on_spill => self.remove_session(host, &mut events),
            _ => self.cancel_session(host, None, &mut events),
        }
        events
    }

    /// Promotes a held touch grab once its deadline has passed.
    ///
    /// The host arranges to call this at [`DragController::touch_timer_deadline`];
    /// a stale callback (the pending grab is gone, or a newer grab's deadline
    /// has not arrived yet) does nothing.
    pub fn on_touch_timer<H: TreeHost<K> + VisualHost<K>>(
        &mut self,
        host: &mut H,
        now_ms: u64,
    ) -> Vec<DragEvent<K>> {
        let due = self
            .grabbed
            .as_ref()
            .and_then(|g| g.deadline)
            .is_some_and(|deadline| now_ms >= deadline);
        if !due {
            return Vec::new();
        }
        let grab = self.grabbed.take().expect("deadline implies a pending grab");
        let mut events = Vec::new();
        self.promote(host, grab.item, grab.source, grab.last_position, &mut events);
        events
    }

    /// Starts a drag programmatically, bypassing pointer disambiguation.
    ///
    /// The session activates without a mirror: move events are inert and the
    /// drag is expected to finish via [`DragController::end`],
    /// [`DragController::cancel`], or [`DragController::remove`].
    pub fn start<H: TreeHost<K> + VisualHost<K>>(
        &mut self,
        host: &mut H,
        item: K,
    ) -> Vec<DragEvent<K>> {
        let mut events = Vec::new();
        if let Some((item, source)) = self.can_start(host, item) {
            self.start_session(host, item, source, &mut events);
        }
        events
    }

    /// Commits the active drag at its current placement.
    pub fn end<H: TreeHost<K> + VisualHost<K>>(&mut self, host: &mut H) -> Vec<DragEvent<K>> {
        let mut events = Vec::new();
        self.end_session(host, &mut events);
        events
    }

    /// Aborts the active drag, reverting per the `revert_on_spill` option.
    ///
    /// Safe to call in any state: with no active session it still tears down
    /// a pending grab and its timer, emitting nothing.
    pub fn cancel<H: TreeHost<K> + VisualHost<K>>(&mut self, host: &mut H) -> Vec<DragEvent<K>> {
        let mut events = Vec::new();
        self.cancel_session(host, None, &mut events);
        events
    }

    /// Aborts the active drag with an explicit revert decision, overriding
    /// the `revert_on_spill` option.
    pub fn cancel_with<H: TreeHost<K> + VisualHost<K>>(
        &mut self,
        host: &mut H,
        revert: bool,
    ) -> Vec<DragEvent<K>> {
        let mut events = Vec::new();
        self.cancel_session(host, Some(revert), &mut events);
        events
    }

    /// Detaches the dragged item from the tree and ends the session.
    ///
    /// Removing an unplaced copy is reported as a cancel — the clone never
    /// had a committed position to be removed from.
    pub fn remove<H: TreeHost<K> + VisualHost<K>>(&mut self, host: &mut H) -> Vec<DragEvent<K>> {
        let mut events = Vec::new();
        self.remove_session(host, &mut events);
        events
    }

    /// Tears the controller down: abandons any pending grab and resolves an
    /// active session as a spill (remove or cancel per the spill options).
    pub fn destroy<H: TreeHost<K> + VisualHost<K>>(&mut self, host: &mut H) -> Vec<DragEvent<K>> {
        let mut events = Vec::new();
        self.grabbed = None;
        if self.dragging {
            if self.options.remove_on_spill {
                self.remove_session(host, &mut events);
            } else {
                self.cancel_session(host, None, &mut events);
            }
        }
        events
    }

    // ---- grab validation ----

    /// Validates a press target into a `(item, source)` grab context: climb
    /// to the child of the nearest container, consulting `invalid` at every
    /// level, then ask `moves`.
    fn can_start<H: TreeHost<K>>(&self, host: &H, target: K) -> Option<(K, K)> {
        // One mirrored session at a time. A mirrorless (programmatic)
        // session does not block a pointer grab; promotion commits it first.
        if self.dragging && self.session.as_ref().is_some_and(|s| s.mirror.is_some()) {
            return None;
        }
        if self.is_container(target) {
            return None; // never drag a container itself
        }
        let handle = target;
        let mut item = target;
        loop {
            let parent = host.parent(item)?;
            if self.is_container(parent) {
                break;
            }
            if self.policy.invalid(item, handle) {
                return None;
            }
            item = parent;
        }
        let source = host.parent(item)?;
        if self.policy.invalid(item, handle) {
            return None;
        }
        if !self.policy.moves(item, source, handle, host.next_sibling(item)) {
            return None;
        }
        Some((item, source))
    }

    // ---- disambiguation ----

    fn disambiguate_move<H: TreeHost<K> + VisualHost<K>>(
        &mut self,
        host: &mut H,
        input: &PointerInput<K>,
    ) -> Vec<DragEvent<K>> {
        let mut events = Vec::new();
        let Some(grab) = &mut self.grabbed else {
            return events;
        };
        let delta_x = (input.position.x - grab.origin.x).abs();
        let delta_y = (input.position.y - grab.origin.y).abs();
        match grab.source_kind {
            PointerSource::Mouse => {
                if input.buttons.is_empty() {
                    // The release never arrived (text selection dragged out
                    // of an input, say); a button-less move is our only cue.
                    self.grabbed = None;
                    return events;
                }
                if delta_x <= self.options.slide_factor_x && delta_y <= self.options.slide_factor_y
                {
                    return events;
                }
                if self.options.ignore_input_text_selection
                    && host
                        .node_at(input.position, None)
                        .is_some_and(|el| host.is_text_input(el))
                {
                    return events;
                }
                let grab = self.grabbed.take().expect("pending grab checked above");
                self.promote(host, grab.item, grab.source, input.position, &mut events);
            }
            PointerSource::Touch => {
                if delta_x > self.options.scroll_threshold_on_touch
                    || delta_y > self.options.scroll_threshold_on_touch
                {
                    // The finger is moving: a scroll, not a drag.
                    self.grabbed = None;
                } else {
                    grab.last_position = input.position;
                }
            }
        }
        events
    }

    /// `Pending → Active`: commit any mirrorless session in flight, start
    /// the new session, render the mirror, and run one immediate move pass
    /// so the first real move event starts from resolved state.
    fn promote<H: TreeHost<K> + VisualHost<K>>(
        &mut self,
        host: &mut H,
        item: K,
        source: K,
        position: Point,
        events: &mut Vec<DragEvent<K>>,
    ) {
        self.end_session(host, events);
        self.start_session(host, item, source, events);
        let Some(s) = &mut self.session else { return };

        let rect = host.bounds(s.item);
        s.grab_offset = position - rect.origin();
        s.axis_anchor = rect.origin();
        s.last_sort_coord = match self.options.direction {
            Direction::Horizontal => position.x,
            Direction::Vertical | Direction::Mixed => position.y,
        };

        let in_transit = s.copy.unwrap_or(s.item);
        host.set_in_transit(in_transit, true);

        let mirror = host.create_mirror(s.item, rect, self.options.mirror_container);
        s.mirror = Some(mirror);
        let original = s.item;
        events.push(DragEvent::Cloned {
            clone: mirror,
            original,
            kind: CloneKind::Mirror,
        });

        let more = self.drag_move(host, position);
        events.extend(more);
    }

    fn start_session<H: TreeHost<K> + VisualHost<K>>(
        &mut self,
        host: &mut H,
        item: K,
        source: K,
        events: &mut Vec<DragEvent<K>>,
    ) {
        let copy = if self.options.copy || self.policy.copy(item, source) {
            let clone = host.clone_node(item);
            events.push(DragEvent::Cloned {
                clone,
                original: item,
                kind: CloneKind::Copy,
            });
            Some(clone)
        } else {
            None
        };

        let initial_sibling = host.next_sibling(item);
        self.session = Some(Session {
            item,
            source,
            copy,
            mirror: None,
            initial_sibling,
            current_sibling: initial_sibling,
            current_parent: None,
            last_drop_target: None,
            grab_offset: Vec2::ZERO,
            axis_anchor: host.bounds(item).origin(),
            last_sort_coord: 0.0,
        });

        // A finger held over a focused input pops selection UI on some
        // platforms; drop focus before the drag gets going.
        host.clear_focus();

        self.dragging = true;
        events.push(DragEvent::Drag { item, source });
    }

    // ---- the active-move pipeline ----

    fn drag_move<H: TreeHost<K> + VisualHost<K>>(
        &mut self,
        host: &mut H,
        position: Point,
    ) -> Vec<DragEvent<K>> {
        let mut events = Vec::new();
        let Some(s) = self.session else {
            return events;
        };
        let Some(mirror) = s.mirror else {
            // Programmatic sessions have no mirror and do not track moves.
            return events;
        };

        let item = s.copy.unwrap_or(s.item);
        let behind = host.node_at(position, Some(mirror));
        let mut drop_target =
            behind.and_then(|b| self.resolve_drop_target(host, b, position, &s));
        let changed = drop_target.is_some() && drop_target != s.last_drop_target;

        if changed || drop_target.is_none() {
            if let Some(old) = s.last_drop_target {
                events.push(DragEvent::Out {
                    item,
                    container: old,
                    source: s.source,
                });
            }
            if let Some(live) = &mut self.session {
                live.last_drop_target = drop_target;
            }
            if changed {
                events.push(DragEvent::Over {
                    item,
                    container: drop_target.expect("changed implies a resolved target"),
                    source: s.source,
                });
            }
        }

        let parent = host.parent(item);
        let moved_between = s.current_parent.is_some() && s.current_parent != parent;
        if let Some(live) = &mut self.session {
            live.current_parent = parent;
        }

        // A copy may not re-enter its own source unless source sorting is
        // on; it leaves the tree and the mirror keeps floating.
        if drop_target == Some(s.source) && s.copy.is_some() && !self.options.copy_sort_source {
            if parent.is_some() {
                host.detach(item);
            }
            return events;
        }

        let reference;
        let immediate = match drop_target {
            Some(t) => behind.and_then(|b| geometry::immediate_child(host, t, b)),
            None => None,
        };
        match immediate {
            Some(im) => {
                let target = drop_target.expect("immediate child implies a target");
                reference =
                    geometry::insertion_reference(host, target, im, position, self.options.direction);
            }
            None if self.options.revert_on_spill && s.copy.is_none() => {
                // Off every container: treat the origin as the implicit
                // target instead of leaving the item wherever it was.
                reference = s.initial_sibling;
                drop_target = Some(s.source);
            }
            None => {
                if s.copy.is_some() && parent.is_some() {
                    host.detach(item);
                }
                // No committed placement, but the mirror still follows the
                // pointer.
                let origin = self.pin_axis(position - s.grab_offset, s.axis_anchor);
                host.move_mirror(mirror, origin);
                return events;
            }
        }

        let next_of_item = host.next_sibling(item);
        if (reference.is_none() && changed)
            || (reference != Some(item) && reference != next_of_item)
        {
            let target = drop_target.expect("a placement always has a container");
            if let Some(live) = &mut self.session {
                live.current_sibling = reference;
            }
            self.shadow_move(host, target, item, reference, parent, position);
            events.push(DragEvent::Shadow {
                item,
                container: target,
                source: s.source,
            });
        }

        // When an axis lock is active and the item crossed into another
        // container, re-anchor the pinned coordinate there and match the
        // mirror to the new container's width.
        if moved_between && self.options.axis != Axis::None {
            if let Some(target) = drop_target {
                let rect = host.bounds(target);
                if let Some(live) = &mut self.session {
                    live.axis_anchor = rect.origin();
                }
                let height = host.bounds(mirror).height();
                host.resize_mirror(mirror, Size::new(rect.width(), height));
            }
        }

        let anchor = self.session.map_or(s.axis_anchor, |live| live.axis_anchor);
        let origin = self.pin_axis(position - s.grab_offset, anchor);
        host.move_mirror(mirror, origin);
        events
    }

    /// Performs the tree move for a shadow placement, driving the reflow
    /// transition hook for the displaced neighbor when enabled.
    fn shadow_move<H: TreeHost<K> + VisualHost<K>>(
        &mut self,
        host: &mut H,
        target: K,
        item: K,
        reference: Option<K>,
        parent: Option<K>,
        position: Point,
    ) {
        let millis = self.options.animation_duration;
        let sorting_in_place = parent == Some(target);
        if millis == 0 || !sorting_in_place {
            host.insert_before(target, item, reference);
            return;
        }

        let now_coord = match self.options.direction {
            Direction::Horizontal => position.x,
            Direction::Vertical | Direction::Mixed => position.y,
        };
        let prev_coord = self
            .session
            .as_ref()
            .map_or(now_coord, |s| s.last_sort_coord);
        if let Some(live) = &mut self.session {
            live.last_sort_coord = now_coord;
        }

        // Moving up/left displaces the reference itself; moving down/right
        // displaces the node in front of the landing slot.
        let siblings = host.children(target);
        let mover = if now_coord < prev_coord {
            reference
        } else {
            match reference {
                Some(r) => {
                    let at = siblings.iter().position(|&c| c == r);
                    at.and_then(|i| i.checked_sub(1))
                        .and_then(|i| siblings.get(i))
                        .copied()
                        .or(Some(r))
                }
                None => siblings.last().copied(),
            }
        };

        let item_rect = host.bounds(item);
        let mover_rect = mover.map(|m| host.bounds(m));
        host.insert_before(target, item, reference);
        if let (Some(m), Some(rect)) = (mover, mover_rect) {
            host.animate_shift(m, rect, millis);
            host.animate_shift(item, item_rect, millis);
        }
    }

    fn pin_axis(&self, origin: Point, anchor: Point) -> Point {
        match self.options.axis {
            Axis::None => origin,
            // Horizontal-only movement: the vertical coordinate is pinned.
            Axis::X => Point::new(origin.x, anchor.y),
            // Vertical-only movement: the horizontal coordinate is pinned.
            Axis::Y => Point::new(anchor.x, origin.y),
        }
    }

    // ---- target resolution ----

    /// Walks up from the element behind the pointer to the first container
    /// that either represents the item's original slot or accepts the
    /// candidate placement.
    fn resolve_drop_target<H: TreeHost<K>>(
        &self,
        host: &H,
        behind: K,
        position: Point,
        s: &Session<K>,
    ) -> Option<K> {
        geometry::drop_target(host, behind, |host, target| {
            if !self.is_container(target) {
                return false;
            }
            let Some(immediate) = geometry::immediate_child(host, target, behind) else {
                return false;
            };
            let reference =
                geometry::insertion_reference(host, target, immediate, position, self.options.direction);
            let initial = target == s.source && reference == s.initial_sibling;
            // Dropping the item right back where it came from is always
            // allowed; everything else asks the policy.
            initial || self.policy.accepts(s.item, target, s.source, reference)
        })
    }

    /// Whether `target` plus the current sibling equals the pre-drag
    /// placement.
    fn is_initial_placement<H: TreeHost<K>>(&self, host: &H, target: Option<K>) -> bool {
        let Some(s) = &self.session else {
            return false;
        };
        let sibling = if s.mirror.is_some() {
            s.current_sibling
        } else {
            host.next_sibling(s.copy.unwrap_or(s.item))
        };
        target == Some(s.source) && sibling == s.initial_sibling
    }

    // ---- terminal paths ----

    fn end_session<H: TreeHost<K> + VisualHost<K>>(
        &mut self,
        host: &mut H,
        events: &mut Vec<DragEvent<K>>,
    ) {
        if !self.dragging {
            return;
        }
        let Some(s) = self.session else {
            return;
        };
        let item = s.copy.unwrap_or(s.item);
        let parent = host.parent(item);
        self.drop_commit(host, item, parent, events);
    }

    fn drop_commit<H: TreeHost<K> + VisualHost<K>>(
        &mut self,
        host: &mut H,
        item: K,
        target: Option<K>,
        events: &mut Vec<DragEvent<K>>,
    ) {
        let Some(s) = self.session else {
            return;
        };
        if s.copy.is_some() && self.options.copy_sort_source && target == Some(s.source) {
            // The copy took the original's place in the source.
            host.detach(s.item);
        }
        if self.is_initial_placement(host, target) {
            events.push(DragEvent::Cancel {
                item,
                container: s.source,
                source: s.source,
            });
        } else {
            events.push(DragEvent::Drop {
                item,
                container: target,
                source: s.source,
                sibling: s.current_sibling,
            });
        }
        self.cleanup(host, events);
    }

    fn remove_session<H: TreeHost<K> + VisualHost<K>>(
        &mut self,
        host: &mut H,
        events: &mut Vec<DragEvent<K>>,
    ) {
        if !self.dragging {
            return;
        }
        let Some(s) = self.session else {
            return;
        };
        let item = s.copy.unwrap_or(s.item);
        if host.parent(item).is_some() {
            host.detach(item);
        }
        if s.copy.is_some() {
            // Removing a clone that never had a settled position is just an
            // aborted copy.
            events.push(DragEvent::Cancel {
                item,
                container: s.source,
                source: s.source,
            });
        } else {
            events.push(DragEvent::Remove {
                item,
                container: host.parent(item),
                source: s.source,
            });
        }
        self.cleanup(host, events);
    }

    fn cancel_session<H: TreeHost<K> + VisualHost<K>>(
        &mut self,
        host: &mut H,
        revert: Option<bool>,
        events: &mut Vec<DragEvent<K>>,
    ) {
        if !self.dragging {
            // No session, but pending-grab teardown still has to happen.
            self.cleanup(host, events);
            return;
        }
        let Some(s) = self.session else {
            return;
        };
        let reverts = revert.unwrap_or(self.options.revert_on_spill);
        let item = s.copy.unwrap_or(s.item);
        let parent = host.parent(item);
        let initial = self.is_initial_placement(host, parent);
        if !initial && reverts {
            match s.copy {
                // Nothing to revert a copy to; it simply goes away.
                Some(copy) => {
                    if parent.is_some() {
                        host.detach(copy);
                    }
                }
                None => host.insert_before(s.source, item, s.initial_sibling),
            }
        }
        if initial || reverts {
            events.push(DragEvent::Cancel {
                item,
                container: s.source,
                source: s.source,
            });
        } else {
            // A spill that neither reverts nor cancels commits in place.
            events.push(DragEvent::Drop {
                item,
                container: parent,
                source: s.source,
                sibling: s.current_sibling,
            });
        }
        self.cleanup(host, events);
    }

    /// Terminal teardown, exactly once per session and safe when idle:
    /// pending grab and timer dropped, mirror removed, in-transit marker
    /// stripped, final `out`/`dragend` emitted for sessions that reached
    /// Active, all fields reset.
    fn cleanup<H: TreeHost<K> + VisualHost<K>>(
        &mut self,
        host: &mut H,
        events: &mut Vec<DragEvent<K>>,
    ) {
        self.grabbed = None;
        let Some(s) = self.session.take() else {
            return;
        };
        let item = s.copy.unwrap_or(s.item);
        if let Some(mirror) = s.mirror {
            host.remove_mirror(mirror);
        }
        host.set_in_transit(item, false);
        if self.dragging {
            self.dragging = false;
            if let Some(last) = s.last_drop_target {
                events.push(DragEvent::Out {
                    item,
                    container: last,
                    source: s.source,
                });
            }
            events.push(DragEvent::DragEnd { item });
        }
    }
}
