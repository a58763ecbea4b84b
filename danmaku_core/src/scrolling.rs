// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marquee motion planning.
//!
//! Wider content moves faster so that long comments do not linger:
//!
//! ```text
//! speed    = basic_speed + extra_speed_per_pixel × content_width   (px/ms)
//! distance = marquee_width + content_width
//! duration = distance / speed                                      (ms)
//! ```

use crate::stage::HorizontalDirection;
use crate::time::Duration;

/// An immutable horizontal motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollingPlan {
    /// X of the content's left edge when the motion starts.
    pub from_x: f64,
    /// X of the content's left edge when the motion ends.
    pub to_x: f64,
    /// Speed in px/ms. Always positive for positive speed settings.
    pub speed: f64,
    /// Time from `from_x` to `to_x`.
    pub duration: Duration,
}

impl ScrollingPlan {
    /// X of the content's left edge after `elapsed` of motion.
    ///
    /// Anything at or past the plan's duration is at `to_x`.
    #[must_use]
    pub fn x_at(&self, elapsed: Duration) -> f64 {
        if elapsed >= self.duration {
            return self.to_x;
        }
        let travelled = self.speed * elapsed.millis().max(0.0);
        if self.to_x < self.from_x {
            self.from_x - travelled
        } else {
            self.from_x + travelled
        }
    }
}

/// Computes scrolling plans for one direction.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollingPlanner {
    direction: HorizontalDirection,
    /// Width of the stage the content crosses.
    pub marquee_width: f64,
    /// Speed of zero-width content, in px/ms.
    pub basic_speed: f64,
    /// Additional speed per pixel of content width, in px/ms.
    pub extra_speed_per_pixel: f64,
}

impl ScrollingPlanner {
    /// Default [`basic_speed`](Self::basic_speed).
    pub const DEFAULT_BASIC_SPEED: f64 = 0.12;
    /// Default [`extra_speed_per_pixel`](Self::extra_speed_per_pixel).
    pub const DEFAULT_EXTRA_SPEED_PER_PIXEL: f64 = 0.0002;

    /// Creates a planner with the default speeds.
    #[must_use]
    pub fn new(direction: HorizontalDirection, marquee_width: f64) -> Self {
        Self {
            direction,
            marquee_width,
            basic_speed: Self::DEFAULT_BASIC_SPEED,
            extra_speed_per_pixel: Self::DEFAULT_EXTRA_SPEED_PER_PIXEL,
        }
    }

    /// Returns a copy with the given speeds.
    #[must_use]
    pub fn with_speed(mut self, basic_speed: f64, extra_speed_per_pixel: f64) -> Self {
        self.basic_speed = basic_speed;
        self.extra_speed_per_pixel = extra_speed_per_pixel;
        self
    }

    /// Direction of travel, fixed at construction.
    #[must_use]
    pub fn direction(&self) -> HorizontalDirection {
        self.direction
    }

    /// Plans a crossing for content of `content_width`.
    #[must_use]
    pub fn plan(&self, content_width: f64) -> ScrollingPlan {
        let (from_x, to_x) = match self.direction {
            HorizontalDirection::Left => (self.marquee_width, -content_width),
            HorizontalDirection::Right => (-content_width, self.marquee_width),
        };
        let distance = self.marquee_width + content_width;
        let speed = self.basic_speed + self.extra_speed_per_pixel * content_width;
        ScrollingPlan {
            from_x,
            to_x,
            speed,
            duration: Duration(distance / speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b) * (a - b) < 1e-12
    }

    #[test]
    fn leftward_plan() {
        let plan = ScrollingPlanner::new(HorizontalDirection::Left, 800.0).plan(100.0);
        assert_eq!(plan.from_x, 800.0);
        assert_eq!(plan.to_x, -100.0);
        assert!(close(plan.speed, 0.14), "speed was {}", plan.speed);
        assert!(
            close(plan.duration.millis(), 900.0 / 0.14),
            "duration was {:?}",
            plan.duration
        );
        assert!(
            (plan.duration.millis() - 6428.6) * (plan.duration.millis() - 6428.6) < 0.01,
            "duration rounds to 6428.6"
        );
    }

    #[test]
    fn rightward_plan() {
        let plan = ScrollingPlanner::new(HorizontalDirection::Right, 640.0)
            .with_speed(0.2, 0.0)
            .plan(60.0);
        assert_eq!(plan.from_x, -60.0);
        assert_eq!(plan.to_x, 640.0);
        assert!(close(plan.duration.millis(), 3500.0), "700px at 0.2px/ms");
    }

    #[test]
    fn settings_apply_to_later_plans_only() {
        let mut planner = ScrollingPlanner::new(HorizontalDirection::Left, 800.0);
        let before = planner.plan(50.0);
        planner.marquee_width = 400.0;
        planner.basic_speed = 1.0;
        let after = planner.plan(50.0);
        assert_eq!(before.from_x, 800.0, "issued plans never change");
        assert_eq!(after.from_x, 400.0);
        assert_eq!(planner.plan(50.0), after, "planning is pure");
    }

    #[test]
    fn x_at_interpolates_and_clamps() {
        let plan = ScrollingPlanner::new(HorizontalDirection::Left, 800.0)
            .with_speed(0.125, 0.0)
            .plan(200.0);
        assert_eq!(plan.duration, Duration(8000.0));
        assert_eq!(plan.x_at(Duration::ZERO), 800.0);
        assert_eq!(plan.x_at(Duration(4000.0)), 300.0);
        assert_eq!(plan.x_at(Duration(20_000.0)), -200.0);
    }
}
