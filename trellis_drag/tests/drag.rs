// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Active-session tests for the drag controller against the `trellis_tree`
//! host: reordering, cross-container moves, spill policies, copy semantics,
//! axis locks, manual control, and cleanup behavior.

mod common;

use common::{copy_of, drag_to, mirror_of, press, release, row_center, vertical_list};
use kurbo::{Point, Rect};
use trellis_drag::{Axis, DragController, DragEvent, DragPolicy, Options};
use trellis_tree::{NodeId, Tree};

/// Two registered vertical lists side by side: one populated, one empty.
fn two_lists(n: usize) -> (Tree, NodeId, NodeId, Vec<NodeId>) {
    let (mut tree, l1, items) = vertical_list(n);
    let l2 = tree.insert(None, Rect::new(200.0, 0.0, 300.0, 60.0));
    (tree, l1, l2, items)
}

#[test]
fn vertical_reorder_commits_with_resulting_sibling() {
    let (mut tree, list, items) = vertical_list(3);
    let (a, b, c) = (items[0], items[1], items[2]);
    let mut drag = DragController::new(vec![list], Options::default());

    assert!(press(&mut drag, &tree, a, row_center(0)).is_empty());

    // Just below `b`'s vertical midpoint: `a` shadows in front of `c`.
    let events = drag_to(&mut drag, &mut tree, Point::new(50.0, 31.0));
    let mirror = mirror_of(&events).unwrap();
    assert_eq!(
        events,
        vec![
            DragEvent::Drag { item: a, source: list },
            DragEvent::Cloned { clone: mirror, original: a, kind: trellis_drag::CloneKind::Mirror },
            DragEvent::Over { item: a, container: list, source: list },
            DragEvent::Shadow { item: a, container: list, source: list },
        ]
    );
    assert_eq!(tree.children_of(list), &[b, a, c]);

    let events = release(&mut drag, &mut tree, Point::new(50.0, 31.0));
    assert_eq!(
        events,
        vec![
            DragEvent::Drop { item: a, container: Some(list), source: list, sibling: Some(c) },
            DragEvent::Out { item: a, container: list, source: list },
            DragEvent::DragEnd { item: a },
        ]
    );
    assert_eq!(tree.children_of(list), &[b, a, c]);
    assert!(!drag.dragging());
    assert!(!tree.is_alive(mirror));
}

#[test]
fn no_op_round_trip_cancels_instead_of_dropping() {
    let (mut tree, list, items) = vertical_list(3);
    let a = items[0];
    let mut drag = DragController::new(vec![list], Options::default());

    press(&mut drag, &tree, a, row_center(0));
    // Enough to promote, not enough to change the placement.
    drag_to(&mut drag, &mut tree, Point::new(50.0, 17.0));
    assert!(drag.dragging());

    let events = release(&mut drag, &mut tree, Point::new(50.0, 17.0));
    assert_eq!(
        events,
        vec![
            DragEvent::Cancel { item: a, container: list, source: list },
            DragEvent::Out { item: a, container: list, source: list },
            DragEvent::DragEnd { item: a },
        ]
    );
    assert_eq!(tree.children_of(list), &[a, items[1], items[2]]);
}

#[test]
fn drop_into_empty_container() {
    let (mut tree, l1, l2, items) = two_lists(2);
    let (a, b) = (items[0], items[1]);
    let mut drag = DragController::new(vec![l1, l2], Options::default());

    press(&mut drag, &tree, a, row_center(0));
    let events = drag_to(&mut drag, &mut tree, Point::new(250.0, 10.0));
    assert!(events.contains(&DragEvent::Over { item: a, container: l2, source: l1 }));
    assert!(events.contains(&DragEvent::Shadow { item: a, container: l2, source: l1 }));
    assert_eq!(tree.children_of(l2), &[a]);

    let events = release(&mut drag, &mut tree, Point::new(250.0, 10.0));
    assert_eq!(
        events[0],
        DragEvent::Drop { item: a, container: Some(l2), source: l1, sibling: None }
    );
    assert_eq!(tree.children_of(l1), &[b]);
    assert_eq!(tree.children_of(l2), &[a]);
}

#[test]
fn out_fires_before_over_when_crossing_containers() {
    let (mut tree, l1, l2, items) = two_lists(2);
    let a = items[0];
    let mut drag = DragController::new(vec![l1, l2], Options::default());

    press(&mut drag, &tree, a, row_center(0));
    drag_to(&mut drag, &mut tree, Point::new(50.0, 17.0));

    let events = drag_to(&mut drag, &mut tree, Point::new(250.0, 10.0));
    assert_eq!(events[0], DragEvent::Out { item: a, container: l1, source: l1 });
    assert_eq!(events[1], DragEvent::Over { item: a, container: l2, source: l1 });

    // Off every container: only `out` fires.
    let events = drag_to(&mut drag, &mut tree, Point::new(500.0, 500.0));
    assert_eq!(events[0], DragEvent::Out { item: a, container: l2, source: l1 });
    assert!(!events.iter().any(|e| matches!(e, DragEvent::Over { .. })));
}

#[test]
fn remove_on_spill_detaches_the_item() {
    let (mut tree, list, items) = vertical_list(1);
    let a = items[0];
    let mut drag = DragController::new(
        vec![list],
        Options {
            remove_on_spill: true,
            ..Options::default()
        },
    );

    press(&mut drag, &tree, a, row_center(0));
    drag_to(&mut drag, &mut tree, Point::new(50.0, 17.0));
    drag_to(&mut drag, &mut tree, Point::new(500.0, 500.0));

    let events = release(&mut drag, &mut tree, Point::new(500.0, 500.0));
    assert_eq!(
        events,
        vec![
            DragEvent::Remove { item: a, container: None, source: list },
            DragEvent::DragEnd { item: a },
        ]
    );
    assert!(tree.children_of(list).is_empty());
    assert_eq!(tree.parent(a), None);
}

#[test]
fn revert_on_spill_snaps_back_to_origin() {
    let (mut tree, list, items) = vertical_list(2);
    let (a, b) = (items[0], items[1]);
    let mut drag = DragController::new(
        vec![list],
        Options {
            revert_on_spill: true,
            ..Options::default()
        },
    );

    press(&mut drag, &tree, a, row_center(0));
    drag_to(&mut drag, &mut tree, Point::new(50.0, 31.0));
    assert_eq!(tree.children_of(list), &[b, a]);

    // Off every container: the origin becomes the implicit target again.
    let events = drag_to(&mut drag, &mut tree, Point::new(500.0, 500.0));
    assert!(events.contains(&DragEvent::Shadow { item: a, container: list, source: list }));
    assert_eq!(tree.children_of(list), &[a, b]);

    let events = release(&mut drag, &mut tree, Point::new(500.0, 500.0));
    assert_eq!(events[0], DragEvent::Cancel { item: a, container: list, source: list });
    assert_eq!(tree.children_of(list), &[a, b]);
}

#[test]
fn explicit_cancel_reverts_a_shadowed_placement() {
    let (mut tree, list, items) = vertical_list(2);
    let (a, b) = (items[0], items[1]);
    let mut drag = DragController::new(vec![list], Options::default());

    press(&mut drag, &tree, a, row_center(0));
    drag_to(&mut drag, &mut tree, Point::new(50.0, 31.0));
    assert_eq!(tree.children_of(list), &[b, a]);

    let events = drag.cancel_with(&mut tree, true);
    assert_eq!(
        events,
        vec![
            DragEvent::Cancel { item: a, container: list, source: list },
            DragEvent::Out { item: a, container: list, source: list },
            DragEvent::DragEnd { item: a },
        ]
    );
    assert_eq!(tree.children_of(list), &[a, b]);
}

#[test]
fn cancel_without_revert_commits_the_spill_position() {
    let (mut tree, list, items) = vertical_list(2);
    let (a, b) = (items[0], items[1]);
    let mut drag = DragController::new(vec![list], Options::default());

    press(&mut drag, &tree, a, row_center(0));
    drag_to(&mut drag, &mut tree, Point::new(50.0, 31.0));
    assert_eq!(tree.children_of(list), &[b, a]);

    let events = drag.cancel(&mut tree);
    assert_eq!(
        events[0],
        DragEvent::Drop { item: a, container: Some(list), source: list, sibling: None }
    );
    assert_eq!(tree.children_of(list), &[b, a]);
}

#[test]
fn end_commits_at_the_current_placement() {
    let (mut tree, list, items) = vertical_list(3);
    let (a, b, c) = (items[0], items[1], items[2]);
    let mut drag = DragController::new(vec![list], Options::default());

    press(&mut drag, &tree, a, row_center(0));
    drag_to(&mut drag, &mut tree, Point::new(50.0, 31.0));

    let events = drag.end(&mut tree);
    assert_eq!(
        events[0],
        DragEvent::Drop { item: a, container: Some(list), source: list, sibling: Some(c) }
    );
    assert_eq!(tree.children_of(list), &[b, a, c]);
}

#[test]
fn copy_back_onto_source_discards_the_copy() {
    let (mut tree, list, items) = vertical_list(2);
    let (a, b) = (items[0], items[1]);
    let mut drag = DragController::new(
        vec![list],
        Options {
            copy: true,
            ..Options::default()
        },
    );

    press(&mut drag, &tree, a, row_center(0));
    let events = drag_to(&mut drag, &mut tree, Point::new(50.0, 17.0));
    let copy = copy_of(&events).unwrap();
    assert_ne!(copy, a);
    // The copy never enters its own source container.
    assert_eq!(tree.children_of(list), &[a, b]);

    let events = release(&mut drag, &mut tree, Point::new(50.0, 17.0));
    assert_eq!(
        events[0],
        DragEvent::Drop { item: copy, container: None, source: list, sibling: Some(b) }
    );
    assert_eq!(tree.children_of(list), &[a, b]);
    assert_eq!(tree.parent(copy), None);
}

#[test]
fn copy_into_another_container_keeps_the_original() {
    let (mut tree, l1, l2, items) = two_lists(1);
    let a = items[0];
    let mut drag = DragController::new(
        vec![l1, l2],
        Options {
            copy: true,
            ..Options::default()
        },
    );

    press(&mut drag, &tree, a, row_center(0));
    let events = drag_to(&mut drag, &mut tree, Point::new(250.0, 10.0));
    let copy = copy_of(&events).unwrap();
    assert!(events.contains(&DragEvent::Shadow { item: copy, container: l2, source: l1 }));
    assert_eq!(tree.children_of(l2), &[copy]);

    let events = release(&mut drag, &mut tree, Point::new(250.0, 10.0));
    assert_eq!(
        events[0],
        DragEvent::Drop { item: copy, container: Some(l2), source: l1, sibling: None }
    );
    assert_eq!(tree.children_of(l1), &[a]);
    assert_eq!(tree.children_of(l2), &[copy]);
}

#[test]
fn copy_sort_source_lets_the_copy_replace_the_original() {
    let (mut tree, list, items) = vertical_list(2);
    let (a, b) = (items[0], items[1]);
    let mut drag = DragController::new(
        vec![list],
        Options {
            copy: true,
            copy_sort_source: true,
            ..Options::default()
        },
    );

    press(&mut drag, &tree, a, row_center(0));
    let events = drag_to(&mut drag, &mut tree, Point::new(50.0, 31.0));
    let copy = copy_of(&events).unwrap();
    assert_eq!(tree.children_of(list), &[a, b, copy]);

    let events = release(&mut drag, &mut tree, Point::new(50.0, 31.0));
    assert_eq!(
        events[0],
        DragEvent::Drop { item: copy, container: Some(list), source: list, sibling: None }
    );
    // The copy took the original's place in the source.
    assert_eq!(tree.children_of(list), &[b, copy]);
    assert_eq!(tree.parent(a), None);
    assert!(tree.is_alive(a));
}

#[test]
fn axis_lock_pins_the_mirror_to_the_anchor() {
    let (mut tree, list, items) = vertical_list(2);
    let a = items[0];
    let mut drag = DragController::new(
        vec![list],
        Options {
            axis: Axis::X,
            ..Options::default()
        },
    );

    press(&mut drag, &tree, a, row_center(0));
    let events = drag_to(&mut drag, &mut tree, Point::new(70.0, 10.0));
    let mirror = mirror_of(&events).unwrap();
    assert_eq!(tree.bounds(mirror).unwrap().origin(), Point::new(0.0, 0.0));

    // Any amount of vertical pointer travel leaves the mirror's vertical
    // coordinate at the anchor recorded when the container was entered.
    drag_to(&mut drag, &mut tree, Point::new(80.0, 50.0));
    assert_eq!(tree.bounds(mirror).unwrap().origin(), Point::new(10.0, 0.0));
    drag_to(&mut drag, &mut tree, Point::new(95.0, 12.0));
    assert_eq!(tree.bounds(mirror).unwrap().origin(), Point::new(25.0, 0.0));

    release(&mut drag, &mut tree, Point::new(95.0, 12.0));
}

#[test]
fn axis_lock_reanchors_when_the_container_changes() {
    let (mut tree, l1, items) = vertical_list(2);
    let a = items[0];
    let l2 = tree.insert(None, Rect::new(200.0, 10.0, 320.0, 70.0));
    let mut drag = DragController::new(
        vec![l1, l2],
        Options {
            axis: Axis::X,
            ..Options::default()
        },
    );

    press(&mut drag, &tree, a, row_center(0));
    let events = drag_to(&mut drag, &mut tree, Point::new(70.0, 10.0));
    let mirror = mirror_of(&events).unwrap();

    // Cross into the second container; the item reparents on this move and
    // the anchor re-captures on the next one.
    drag_to(&mut drag, &mut tree, Point::new(250.0, 30.0));
    assert_eq!(tree.children_of(l2), &[a]);
    let events = drag_to(&mut drag, &mut tree, Point::new(255.0, 35.0));
    assert!(events.is_empty());

    let rect = tree.bounds(mirror).unwrap();
    // Pinned to the new container's vertical origin, resized to its width.
    assert_eq!(rect.origin(), Point::new(185.0, 10.0));
    assert_eq!(rect.width(), 120.0);
}

#[test]
fn active_session_rejects_further_grabs() {
    let (mut tree, list, items) = vertical_list(3);
    let (a, b) = (items[0], items[1]);
    let mut drag = DragController::new(vec![list], Options::default());

    press(&mut drag, &tree, a, row_center(0));
    drag_to(&mut drag, &mut tree, Point::new(50.0, 17.0));
    assert!(drag.dragging());

    // A second press while the mirrored session is live is ignored; no new
    // session starts and moves keep driving the first item.
    assert!(press(&mut drag, &tree, b, row_center(1)).is_empty());
    let events = drag_to(&mut drag, &mut tree, Point::new(50.0, 31.0));
    assert!(events.contains(&DragEvent::Shadow { item: a, container: list, source: list }));

    release(&mut drag, &mut tree, Point::new(50.0, 31.0));
    assert!(!drag.dragging());

    // After cleanup the controller accepts a fresh grab.
    press(&mut drag, &tree, b, row_center(0));
    let events = drag_to(&mut drag, &mut tree, Point::new(50.0, 31.0));
    assert!(events.iter().any(|e| matches!(e, DragEvent::Drag { item, .. } if *item == b)));
    release(&mut drag, &mut tree, Point::new(50.0, 31.0));
}

#[test]
fn terminal_calls_after_cleanup_are_inert() {
    let (mut tree, list, items) = vertical_list(3);
    let a = items[0];
    let mut drag = DragController::new(vec![list], Options::default());

    press(&mut drag, &tree, a, row_center(0));
    drag_to(&mut drag, &mut tree, Point::new(50.0, 31.0));
    release(&mut drag, &mut tree, Point::new(50.0, 31.0));

    let order: Vec<NodeId> = tree.children_of(list).to_vec();
    assert!(drag.cancel(&mut tree).is_empty());
    assert!(drag.remove(&mut tree).is_empty());
    assert!(release(&mut drag, &mut tree, Point::new(50.0, 31.0)).is_empty());
    assert_eq!(tree.children_of(list), order.as_slice());
}

#[test]
fn manual_start_and_end_round_trip() {
    let (mut tree, list, items) = vertical_list(2);
    let a = items[0];
    let mut drag = DragController::new(vec![list], Options::default());

    let events = drag.start(&mut tree, a);
    assert_eq!(events, vec![DragEvent::Drag { item: a, source: list }]);
    assert!(drag.dragging());

    // No mirror: moves are inert for a programmatic session.
    assert!(drag_to(&mut drag, &mut tree, Point::new(50.0, 31.0)).is_empty());
    assert_eq!(tree.children_of(list), &[a, items[1]]);

    let events = drag.end(&mut tree);
    assert_eq!(
        events,
        vec![
            DragEvent::Cancel { item: a, container: list, source: list },
            DragEvent::DragEnd { item: a },
        ]
    );
    assert!(!drag.dragging());
}

#[test]
fn pointer_grab_commits_a_running_manual_session() {
    let (mut tree, list, items) = vertical_list(3);
    let (a, b) = (items[0], items[1]);
    let mut drag = DragController::new(vec![list], Options::default());

    drag.start(&mut tree, a);
    // A mirrorless session does not block a pointer grab; promotion settles
    // the old session before the new one starts.
    press(&mut drag, &tree, b, row_center(1));
    let events = drag_to(&mut drag, &mut tree, Point::new(50.0, 51.0));
    assert_eq!(events[0], DragEvent::Cancel { item: a, container: list, source: list });
    assert_eq!(events[1], DragEvent::DragEnd { item: a });
    assert_eq!(events[2], DragEvent::Drag { item: b, source: list });

    release(&mut drag, &mut tree, Point::new(50.0, 51.0));
}

#[test]
fn destroy_aborts_an_active_session() {
    let (mut tree, list, items) = vertical_list(2);
    let (a, b) = (items[0], items[1]);
    let mut drag = DragController::new(vec![list], Options::default());

    press(&mut drag, &tree, a, row_center(0));
    let events = drag_to(&mut drag, &mut tree, Point::new(50.0, 31.0));
    let mirror = mirror_of(&events).unwrap();
    assert_eq!(tree.children_of(list), &[b, a]);

    let events = drag.destroy(&mut tree);
    // Without spill options the in-flight placement commits.
    assert_eq!(
        events[0],
        DragEvent::Drop { item: a, container: Some(list), source: list, sibling: None }
    );
    assert!(!drag.dragging());
    assert!(!tree.is_alive(mirror));
}

#[test]
fn animation_hooks_do_not_disturb_reordering() {
    let (mut tree, list, items) = vertical_list(3);
    let (a, b, c) = (items[0], items[1], items[2]);
    let mut drag = DragController::new(
        vec![list],
        Options {
            animation_duration: 150,
            ..Options::default()
        },
    );

    press(&mut drag, &tree, a, row_center(0));
    drag_to(&mut drag, &mut tree, Point::new(50.0, 31.0));
    assert_eq!(tree.children_of(list), &[b, a, c]);
    // Back up above `b`'s midpoint.
    drag_to(&mut drag, &mut tree, Point::new(50.0, 22.0));
    assert_eq!(tree.children_of(list), &[a, b, c]);

    release(&mut drag, &mut tree, Point::new(50.0, 22.0));
}

// ---- policy behavior ----

struct ListPolicy {
    blocked_item: Option<NodeId>,
    frozen_item: Option<NodeId>,
    rejecting_target: Option<NodeId>,
    dynamic_container: Option<NodeId>,
    copy_item: Option<NodeId>,
}

impl ListPolicy {
    fn none() -> Self {
        Self {
            blocked_item: None,
            frozen_item: None,
            rejecting_target: None,
            dynamic_container: None,
            copy_item: None,
        }
    }
}

impl DragPolicy<NodeId> for ListPolicy {
    fn is_container(&self, el: NodeId) -> bool {
        self.dynamic_container == Some(el)
    }

    fn moves(&self, item: NodeId, _source: NodeId, _handle: NodeId, _sibling: Option<NodeId>) -> bool {
        self.frozen_item != Some(item)
    }

    fn accepts(&self, _item: NodeId, target: NodeId, _source: NodeId, _reference: Option<NodeId>) -> bool {
        self.rejecting_target != Some(target)
    }

    fn invalid(&self, el: NodeId, _handle: NodeId) -> bool {
        self.blocked_item == Some(el)
    }

    fn copy(&self, item: NodeId, _source: NodeId) -> bool {
        self.copy_item == Some(item)
    }
}

#[test]
fn invalid_and_moves_policies_gate_grabs() {
    let (tree, list, items) = vertical_list(3);
    let (a, b, c) = (items[0], items[1], items[2]);

    let drag = DragController::with_policy(
        vec![list],
        Options::default(),
        ListPolicy {
            blocked_item: Some(a),
            frozen_item: Some(b),
            ..ListPolicy::none()
        },
    );

    assert!(!drag.can_move(&tree, a));
    assert!(!drag.can_move(&tree, b));
    assert!(drag.can_move(&tree, c));
    // The container itself is never grabbable.
    assert!(!drag.can_move(&tree, list));
}

#[test]
fn rejecting_target_is_skipped_and_release_over_it_spills() {
    let (mut tree, l1, l2, items) = two_lists(2);
    let a = items[0];
    let mut drag = DragController::with_policy(
        vec![l1, l2],
        Options::default(),
        ListPolicy {
            rejecting_target: Some(l2),
            ..ListPolicy::none()
        },
    );

    press(&mut drag, &tree, a, row_center(0));
    drag_to(&mut drag, &mut tree, Point::new(50.0, 17.0));
    let events = drag_to(&mut drag, &mut tree, Point::new(250.0, 10.0));
    assert!(!events.iter().any(|e| matches!(e, DragEvent::Over { container, .. } if *container == l2)));
    assert!(tree.children_of(l2).is_empty());

    let events = release(&mut drag, &mut tree, Point::new(250.0, 10.0));
    assert_eq!(events[0], DragEvent::Cancel { item: a, container: l1, source: l1 });
    assert_eq!(tree.children_of(l1), &[a, items[1]]);
}

#[test]
fn dynamic_container_predicate_works_without_registration() {
    let (mut tree, list, items) = vertical_list(2);
    let (a, b) = (items[0], items[1]);
    let mut drag = DragController::with_policy(
        Vec::new(),
        Options::default(),
        ListPolicy {
            dynamic_container: Some(list),
            ..ListPolicy::none()
        },
    );

    press(&mut drag, &tree, a, row_center(0));
    drag_to(&mut drag, &mut tree, Point::new(50.0, 31.0));
    release(&mut drag, &mut tree, Point::new(50.0, 31.0));
    assert_eq!(tree.children_of(list), &[b, a]);
}

#[test]
fn copy_policy_applies_per_grab() {
    let (mut tree, list, items) = vertical_list(2);
    let a = items[0];
    let mut drag = DragController::with_policy(
        vec![list],
        Options::default(),
        ListPolicy {
            copy_item: Some(a),
            ..ListPolicy::none()
        },
    );

    press(&mut drag, &tree, a, row_center(0));
    let events = drag_to(&mut drag, &mut tree, Point::new(50.0, 17.0));
    assert!(copy_of(&events).is_some());
    release(&mut drag, &mut tree, Point::new(50.0, 17.0));
}

#[test]
fn grab_climbs_from_a_handle_to_the_container_child() {
    let (mut tree, list, items) = vertical_list(2);
    let (a, b) = (items[0], items[1]);
    let handle = tree.insert(Some(a), Rect::new(5.0, 5.0, 15.0, 15.0));
    let mut drag = DragController::new(vec![list], Options::default());

    assert!(drag.can_move(&tree, handle));
    press(&mut drag, &tree, handle, Point::new(10.0, 10.0));
    let events = drag_to(&mut drag, &mut tree, Point::new(10.0, 31.0));
    assert!(events.contains(&DragEvent::Drag { item: a, source: list }));

    release(&mut drag, &mut tree, Point::new(10.0, 31.0));
    assert_eq!(tree.children_of(list), &[b, a]);
}

#[test]
fn registered_containers_can_change_between_events() {
    let (mut tree, l1, l2, items) = two_lists(1);
    let a = items[0];
    let mut drag = DragController::new(vec![l1], Options::default());

    press(&mut drag, &tree, a, row_center(0));
    drag_to(&mut drag, &mut tree, Point::new(50.0, 17.0));

    // Not registered yet: the second list does not resolve.
    let events = drag_to(&mut drag, &mut tree, Point::new(250.0, 10.0));
    assert!(!events.iter().any(|e| matches!(e, DragEvent::Over { container, .. } if *container == l2)));

    // Registration is picked up by the very next move.
    drag.containers_mut().push(l2);
    let events = drag_to(&mut drag, &mut tree, Point::new(250.0, 12.0));
    assert!(events.contains(&DragEvent::Over { item: a, container: l2, source: l1 }));

    release(&mut drag, &mut tree, Point::new(250.0, 12.0));
    assert_eq!(tree.children_of(l2), &[a]);
}
