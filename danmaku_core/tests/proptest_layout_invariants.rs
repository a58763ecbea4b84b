// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based invariant tests for slot allocation, motion planning, and
//! collision prediction.
//!
//! 1. Slots held at the same time in one column never overlap.
//! 2. plan, cancel, plan yields the same band and column.
//! 3. Scrolling plans are pure and match the speed formula.
//! 4. An admitted faster follower never reaches its leader before the
//!    leader leaves the stage.
//! 5. Opposite-direction overlaps are always rejected.

use danmaku_core::collision::{ActiveMotion, ActiveMotions, CandidateMotion, CollisionCoordinator};
use danmaku_core::id::ProcessId;
use danmaku_core::scrolling::ScrollingPlanner;
use danmaku_core::stacking::{StackingPlan, StackingPlanner};
use danmaku_core::stage::{Band, HorizontalDirection, Stage, VerticalDirection};
use danmaku_core::time::HostTime;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
enum Op {
    Plan(u16),
    Cancel(usize),
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        3 => (1_u16..=250).prop_map(Op::Plan),
        1 => any::<usize>().prop_map(Op::Cancel),
    ];
    proptest::collection::vec(op, 1..60)
}

fn direction() -> impl Strategy<Value = VerticalDirection> {
    prop_oneof![Just(VerticalDirection::Up), Just(VerticalDirection::Down)]
}

fn apply(planner: &mut StackingPlanner, held: &mut Vec<StackingPlan>, op: &Op) {
    match *op {
        Op::Plan(h) => held.push(planner.plan(f64::from(h))),
        Op::Cancel(i) if !held.is_empty() => {
            let mut plan = held.remove(i % held.len());
            planner.cancel(&mut plan);
        }
        Op::Cancel(_) => {}
    }
}

fn leader_motions(width: f64, speed: f64, band: Band) -> (ActiveMotions, f64) {
    let plan = ScrollingPlanner::new(HorizontalDirection::Left, 800.0)
        .with_speed(speed, 0.0)
        .plan(width);
    let motion = ActiveMotion::start(
        width,
        band.height(),
        band,
        plan,
        HorizontalDirection::Left,
        HostTime(0.0),
    )
    .unwrap();
    let mut motions = ActiveMotions::new();
    motions.insert(ProcessId::from_raw(0, 0), motion);
    (motions, plan.duration.millis())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. No overlap within a column
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn held_slots_never_overlap(direction in direction(), ops in ops()) {
        let mut planner = StackingPlanner::new(direction, &Stage::new(800.0, 600.0));
        let mut held = Vec::new();
        for op in &ops {
            apply(&mut planner, &mut held, op);
            for column in 0..planner.column_count() {
                let bands: Vec<Band> = planner.slots(column).map(|(_, band)| band).collect();
                for pair in bands.windows(2) {
                    prop_assert!(
                        !pair[0].overlaps(&pair[1]),
                        "column {} holds overlapping {:?} and {:?}",
                        column, pair[0], pair[1]
                    );
                    prop_assert!(pair[0].top_y <= pair[1].top_y, "column {} out of order", column);
                }
            }
        }
        prop_assert_eq!(planner.occupied(), held.len(), "every live plan holds one slot");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. plan, cancel, plan is stable
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn replanning_after_cancel_is_stable(
        direction in direction(),
        ops in ops(),
        h in 1_u16..=250,
    ) {
        let mut planner = StackingPlanner::new(direction, &Stage::new(800.0, 600.0));
        let mut held = Vec::new();
        for op in &ops {
            apply(&mut planner, &mut held, op);
        }
        let mut first = planner.plan(f64::from(h));
        prop_assert!(planner.cancel(&mut first), "first cancel frees the slot");
        prop_assert!(!planner.cancel(&mut first), "second cancel is a no-op");
        let second = planner.plan(f64::from(h));
        prop_assert_eq!(first.band, second.band);
        prop_assert_eq!(first.column, second.column);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Scrolling plans are pure
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scrolling_plan_is_pure(
        left in any::<bool>(),
        marquee in 100.0_f64..4000.0,
        width in 0.0_f64..2000.0,
    ) {
        let direction = if left { HorizontalDirection::Left } else { HorizontalDirection::Right };
        let planner = ScrollingPlanner::new(direction, marquee);
        let a = planner.plan(width);
        let b = planner.plan(width);
        prop_assert_eq!(a, b, "same input, same plan");

        let speed = ScrollingPlanner::DEFAULT_BASIC_SPEED
            + ScrollingPlanner::DEFAULT_EXTRA_SPEED_PER_PIXEL * width;
        prop_assert!((a.speed - speed).abs() < 1e-12, "speed grows with width");
        prop_assert!(
            (a.duration.millis() - (marquee + width) / speed).abs() < 1e-6,
            "duration covers the full travel"
        );
        let (from_x, to_x) = if left { (marquee, -width) } else { (-width, marquee) };
        prop_assert_eq!(a.from_x, from_x);
        prop_assert_eq!(a.to_x, to_x);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Admitted followers never catch their leader on stage
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn admitted_follower_stays_behind(
        leader_width in 10.0_f64..400.0,
        leader_speed in 0.05_f64..0.3,
        extra in 0.001_f64..0.3,
        follower_width in 10.0_f64..400.0,
        progress in 0.0_f64..1.0,
    ) {
        let band = Band::new(0.0, 30.0);
        let (motions, duration) = leader_motions(leader_width, leader_speed, band);
        let follower_speed = leader_speed + extra;
        let plan = ScrollingPlanner::new(HorizontalDirection::Left, 800.0)
            .with_speed(follower_speed, 0.0)
            .plan(follower_width);
        let candidate = CandidateMotion {
            width: follower_width,
            plan,
            direction: HorizontalDirection::Left,
        };
        let now = duration * progress;
        let coordinator = CollisionCoordinator::new(&motions, candidate, HostTime(now));

        if coordinator.admits(band) {
            // Gap shrinks linearly; checking when the leader finishes suffices.
            let remaining = duration - now;
            let leader_x = 800.0 - leader_speed * duration;
            let follower_x = 800.0 - follower_speed * remaining;
            prop_assert!(
                follower_x - (leader_x + leader_width) >= -1e-6,
                "follower at {} overlaps leader ending at {}",
                follower_x, leader_x + leader_width
            );
        }
        prop_assert!(
            coordinator.admits(Band::new(30.0, 60.0)),
            "bands that do not overlap the leader are always free"
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Opposite directions never share a band
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn opposite_direction_overlap_is_rejected(
        leader_width in 10.0_f64..400.0,
        speed in 0.05_f64..0.5,
        width in 10.0_f64..400.0,
        top in 0.0_f64..29.0,
    ) {
        let (motions, _) = leader_motions(leader_width, 0.1, Band::new(0.0, 30.0));
        let plan = ScrollingPlanner::new(HorizontalDirection::Right, 800.0)
            .with_speed(speed, 0.0)
            .plan(width);
        let candidate = CandidateMotion {
            width,
            plan,
            direction: HorizontalDirection::Right,
        };
        let coordinator = CollisionCoordinator::new(&motions, candidate, HostTime(0.0));
        prop_assert!(
            !coordinator.admits(Band::new(top, top + 20.0)),
            "band at {} overlaps an opposite-direction motion",
            top
        );
    }
}
