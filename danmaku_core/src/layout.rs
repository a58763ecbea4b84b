// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared layout state: planners, motions in flight, and the event queue.

use alloc::collections::vec_deque::Drain;

use crate::collision::{ActiveMotions, CandidateMotion, CollisionCoordinator};
use crate::event::{EventQueue, RenderEvent};
use crate::renderer::RendererConfig;
use crate::scrolling::ScrollingPlanner;
use crate::stacking::{StackingPlan, StackingPlanner};
use crate::stage::{HorizontalDirection, Stage, VerticalDirection};
use crate::time::HostTime;

/// One of the four independent stacking tracks.
///
/// Stationary and scrolling comments never compete for the same slots, and
/// each stacking direction has its own track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StackingLane {
    /// Stationary comments stacking from the bottom.
    Up,
    /// Stationary comments stacking from the top.
    Down,
    /// Scrolling comments stacking from the bottom.
    ScrollingUp,
    /// Scrolling comments stacking from the top.
    ScrollingDown,
}

impl StackingLane {
    /// All lanes, in index order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::ScrollingUp, Self::ScrollingDown];

    /// Lane for a comment stacking in `direction`.
    #[must_use]
    pub const fn select(direction: VerticalDirection, scrolling: bool) -> Self {
        match (direction, scrolling) {
            (VerticalDirection::Up, false) => Self::Up,
            (VerticalDirection::Down, false) => Self::Down,
            (VerticalDirection::Up, true) => Self::ScrollingUp,
            (VerticalDirection::Down, true) => Self::ScrollingDown,
        }
    }

    /// Stacking direction of the lane.
    #[must_use]
    pub const fn direction(self) -> VerticalDirection {
        match self {
            Self::Up | Self::ScrollingUp => VerticalDirection::Up,
            Self::Down | Self::ScrollingDown => VerticalDirection::Down,
        }
    }

    /// Returns a short label for logs and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::ScrollingUp => "scrolling-up",
            Self::ScrollingDown => "scrolling-down",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Layout state shared by every process of one renderer.
#[derive(Debug)]
pub struct Layout {
    stage: Stage,
    stacking: [StackingPlanner; 4],
    scrolling_left: ScrollingPlanner,
    scrolling_right: ScrollingPlanner,
    pub(crate) motions: ActiveMotions,
    events: EventQueue<RenderEvent>,
}

impl Layout {
    /// Creates empty planners for `stage`.
    #[must_use]
    pub fn new(stage: Stage, config: &RendererConfig) -> Self {
        let stacking = StackingLane::ALL.map(|lane| {
            StackingPlanner::new(lane.direction(), &stage)
                .with_max_columns(config.max_stacking_columns)
        });
        let scrolling = |direction| {
            ScrollingPlanner::new(direction, stage.width).with_speed(
                config.scrolling_basic_speed,
                config.scrolling_extra_speed_per_pixel,
            )
        };
        Self {
            stage,
            stacking,
            scrolling_left: scrolling(HorizontalDirection::Left),
            scrolling_right: scrolling(HorizontalDirection::Right),
            motions: ActiveMotions::new(),
            events: EventQueue::new(config.event_capacity),
        }
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Updates every planner for a new stage. Slots and motions already
    /// issued are unaffected.
    pub fn set_stage(&mut self, stage: Stage) {
        for planner in &mut self.stacking {
            planner.set_stage(&stage);
        }
        self.scrolling_left.marquee_width = stage.width;
        self.scrolling_right.marquee_width = stage.width;
        self.stage = stage;
    }

    /// Updates both scrolling planners. Plans already issued are unaffected.
    pub fn set_scrolling_speed(&mut self, basic_speed: f64, extra_speed_per_pixel: f64) {
        for planner in [&mut self.scrolling_left, &mut self.scrolling_right] {
            planner.basic_speed = basic_speed;
            planner.extra_speed_per_pixel = extra_speed_per_pixel;
        }
    }

    /// The stacking planner of `lane`.
    #[must_use]
    pub fn stacking(&self, lane: StackingLane) -> &StackingPlanner {
        &self.stacking[lane.index()]
    }

    pub(crate) fn stacking_mut(&mut self, lane: StackingLane) -> &mut StackingPlanner {
        &mut self.stacking[lane.index()]
    }

    /// Reserves a slot in `lane`.
    ///
    /// With a `candidate`, bands in the primary column are checked against
    /// the motions in flight as of `now`.
    pub(crate) fn plan_slot(
        &mut self,
        lane: StackingLane,
        block_height: f64,
        candidate: Option<CandidateMotion>,
        now: HostTime,
    ) -> StackingPlan {
        let planner = &mut self.stacking[lane.index()];
        match candidate {
            Some(candidate) => {
                let coordinator = CollisionCoordinator::new(&self.motions, candidate, now);
                planner.plan_filtered(block_height, |band| coordinator.admits(band))
            }
            None => planner.plan(block_height),
        }
    }

    /// The scrolling planner for `direction`.
    #[must_use]
    pub fn scrolling(&self, direction: HorizontalDirection) -> &ScrollingPlanner {
        match direction {
            HorizontalDirection::Left => &self.scrolling_left,
            HorizontalDirection::Right => &self.scrolling_right,
        }
    }

    /// Motions currently in flight.
    #[must_use]
    pub fn motions(&self) -> &ActiveMotions {
        &self.motions
    }

    pub(crate) fn push_event(&mut self, event: RenderEvent) {
        self.events.push(event);
    }

    /// Number of undrained events.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Events evicted from the full queue, or refused with recording off.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.events.dropped()
    }

    /// Takes every event recorded since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Drain<'_, RenderEvent> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_map_to_directions() {
        for lane in StackingLane::ALL {
            let scrolling = matches!(lane, StackingLane::ScrollingUp | StackingLane::ScrollingDown);
            assert_eq!(
                StackingLane::select(lane.direction(), scrolling),
                lane,
                "{} round-trips",
                lane.as_str()
            );
        }
    }

    #[test]
    fn lanes_are_independent() {
        let mut layout = Layout::new(Stage::default(), &RendererConfig::DEFAULT);
        let a = layout.stacking_mut(StackingLane::Down).plan(30.0);
        let b = layout.stacking_mut(StackingLane::ScrollingDown).plan(30.0);
        assert_eq!(a.band, b.band, "separate tracks share vertical space");
        assert_eq!(layout.stacking(StackingLane::Down).occupied(), 1);
        assert_eq!(layout.stacking(StackingLane::Up).occupied(), 0);
    }

    #[test]
    fn set_stage_reaches_every_planner() {
        let mut layout = Layout::new(Stage::default(), &RendererConfig::DEFAULT);
        layout.set_stage(Stage::new(1280.0, 720.0).with_margins(10.0, 0.0));
        assert_eq!(layout.stage().width, 1280.0);
        assert_eq!(layout.scrolling(HorizontalDirection::Left).plan(0.0).from_x, 1280.0);
        assert_eq!(layout.scrolling(HorizontalDirection::Right).plan(0.0).to_x, 1280.0);
        assert_eq!(layout.stacking_mut(StackingLane::Up).plan(20.0).bottom_y(), 720.0);
        assert_eq!(layout.stacking_mut(StackingLane::ScrollingDown).plan(20.0).top_y(), 10.0);
    }

    #[test]
    fn scrolling_speed_updates_both_planners() {
        let mut layout = Layout::new(Stage::default(), &RendererConfig::DEFAULT);
        layout.set_scrolling_speed(0.5, 0.0);
        assert_eq!(layout.scrolling(HorizontalDirection::Left).plan(100.0).speed, 0.5);
        assert_eq!(layout.scrolling(HorizontalDirection::Right).plan(100.0).speed, 0.5);
    }

    #[test]
    fn event_queue_honours_configured_capacity() {
        let config = RendererConfig::DEFAULT.with_event_capacity(0);
        let layout = Layout::new(Stage::default(), &config);
        assert_eq!(layout.events.capacity(), 0, "recording off");
        let layout = Layout::new(Stage::default(), &RendererConfig::DEFAULT);
        assert_eq!(layout.events.capacity(), RendererConfig::DEFAULT_EVENT_CAPACITY);
    }
}
