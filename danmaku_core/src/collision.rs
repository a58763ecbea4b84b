// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Catch-up prediction between scrolling comments.
//!
//! Every motion in flight is tracked in [`ActiveMotions`]. Before a scrolling
//! comment takes a band in the primary stacking column, a
//! [`CollisionCoordinator`] checks the band against every active motion that
//! shares vertical space with it:
//!
//! - a motion travelling the other way will cross the candidate head-on, so
//!   the band is rejected;
//! - a motion at least as fast as the candidate can never be caught, so it is
//!   ignored;
//! - otherwise the candidate closes the gap at `candidate.speed -
//!   existing.speed`, and the band is rejected if the gap closes before the
//!   existing motion leaves the stage, or if the two already overlap at the
//!   entry edge.

use alloc::collections::BTreeMap;

use crate::error::Result;
use crate::id::ProcessId;
use crate::scrolling::ScrollingPlan;
use crate::stage::{Band, HorizontalDirection};
use crate::time::{Duration, HostTime};
use crate::timer::Countdown;

/// Live state of one motion in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveMotion {
    /// Content width.
    pub width: f64,
    /// Content height.
    pub height: f64,
    /// Vertical band the content occupies.
    pub band: Band,
    /// The motion being performed.
    pub plan: ScrollingPlan,
    /// Direction of travel.
    pub direction: HorizontalDirection,
    progress: Countdown,
}

impl ActiveMotion {
    /// Creates a motion that starts at `now`.
    pub fn start(
        width: f64,
        height: f64,
        band: Band,
        plan: ScrollingPlan,
        direction: HorizontalDirection,
        now: HostTime,
    ) -> Result<Self> {
        let mut progress = Countdown::new(plan.duration);
        progress.run(now)?;
        Ok(Self {
            width,
            height,
            band,
            plan,
            direction,
            progress,
        })
    }

    /// X of the content's left edge at `now`.
    #[must_use]
    pub fn current_x(&self, now: HostTime) -> f64 {
        self.plan.x_at(self.progress.elapsed(now))
    }

    /// Time until the motion reaches `to_x`.
    #[must_use]
    pub fn remaining(&self, now: HostTime) -> Duration {
        self.progress.remaining(now)
    }

    /// Time the motion has been running.
    #[must_use]
    pub fn elapsed(&self, now: HostTime) -> Duration {
        self.progress.elapsed(now)
    }

    /// Freezes progress.
    pub fn pause(&mut self, now: HostTime) -> Result<()> {
        self.progress.pause(now)
    }

    /// Resumes progress from where it was frozen.
    pub fn resume(&mut self, now: HostTime) -> Result<()> {
        self.progress.run(now)
    }
}

/// The set of motions currently in flight, keyed by process.
#[derive(Clone, Debug, Default)]
pub struct ActiveMotions {
    motions: BTreeMap<ProcessId, ActiveMotion>,
}

impl ActiveMotions {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the motion of `process`.
    pub fn insert(&mut self, process: ProcessId, motion: ActiveMotion) {
        self.motions.insert(process, motion);
    }

    /// Removes the motion of `process`, if any.
    pub fn remove(&mut self, process: ProcessId) -> Option<ActiveMotion> {
        self.motions.remove(&process)
    }

    /// Returns the motion of `process`.
    #[must_use]
    pub fn get(&self, process: ProcessId) -> Option<&ActiveMotion> {
        self.motions.get(&process)
    }

    /// Returns the motion of `process` mutably.
    pub fn get_mut(&mut self, process: ProcessId) -> Option<&mut ActiveMotion> {
        self.motions.get_mut(&process)
    }

    /// Number of motions in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.motions.len()
    }

    /// Returns `true` if nothing is moving.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.motions.is_empty()
    }

    /// Iterates motions in process order.
    pub fn iter(&self) -> impl Iterator<Item = (ProcessId, &ActiveMotion)> + '_ {
        self.motions.iter().map(|(id, motion)| (*id, motion))
    }

    /// Drops every motion.
    pub fn clear(&mut self) {
        self.motions.clear();
    }
}

/// A motion that has been planned but not started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidateMotion {
    /// Content width.
    pub width: f64,
    /// The planned motion.
    pub plan: ScrollingPlan,
    /// Direction of travel.
    pub direction: HorizontalDirection,
}

/// Outcome of checking one band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verdict {
    /// No motion in the band can be caught or crossed.
    Clear,
    /// A motion in the band travels the other way.
    OppositeDirection(ProcessId),
    /// The candidate would catch up with `with` after `collision_in`, before
    /// it leaves the stage. A zero `collision_in` means they already overlap.
    CatchUp {
        /// The motion that would be hit.
        with: ProcessId,
        /// Time until contact.
        collision_in: Duration,
    },
}

/// Checks candidate bands for a scrolling comment about to start.
#[derive(Clone, Copy, Debug)]
pub struct CollisionCoordinator<'a> {
    motions: &'a ActiveMotions,
    candidate: CandidateMotion,
    now: HostTime,
}

impl<'a> CollisionCoordinator<'a> {
    /// Creates a coordinator for `candidate` against `motions` as of `now`.
    #[must_use]
    pub fn new(motions: &'a ActiveMotions, candidate: CandidateMotion, now: HostTime) -> Self {
        Self {
            motions,
            candidate,
            now,
        }
    }

    /// Classifies `band` against every overlapping motion. Reports the first
    /// conflict in process order.
    #[must_use]
    pub fn verdict(&self, band: Band) -> Verdict {
        let candidate = &self.candidate;
        for (id, existing) in self.motions.iter() {
            if !existing.band.overlaps(&band) {
                continue;
            }
            if existing.direction != candidate.direction {
                return Verdict::OppositeDirection(id);
            }
            if existing.plan.speed >= candidate.plan.speed {
                continue;
            }

            let existing_x = existing.current_x(self.now);
            let gap = match candidate.direction {
                HorizontalDirection::Left => candidate.plan.from_x - (existing_x + existing.width),
                HorizontalDirection::Right => existing_x - (candidate.plan.from_x + candidate.width),
            };
            if gap < 0.0 {
                return Verdict::CatchUp {
                    with: id,
                    collision_in: Duration::ZERO,
                };
            }

            let collision_in = Duration(gap / (candidate.plan.speed - existing.plan.speed));
            if collision_in < existing.remaining(self.now) {
                return Verdict::CatchUp {
                    with: id,
                    collision_in,
                };
            }
        }
        Verdict::Clear
    }

    /// Returns `true` if the candidate may take `band`.
    #[must_use]
    pub fn admits(&self, band: Band) -> bool {
        match self.verdict(band) {
            Verdict::Clear => true,
            Verdict::OppositeDirection(with) => {
                tracing::trace!(
                    top_y = band.top_y,
                    bottom_y = band.bottom_y,
                    ?with,
                    "band rejected: opposite direction"
                );
                false
            }
            Verdict::CatchUp { with, collision_in } => {
                tracing::trace!(
                    top_y = band.top_y,
                    bottom_y = band.bottom_y,
                    ?with,
                    collision_in = collision_in.millis(),
                    "band rejected: would catch up"
                );
                false
            }
        }
    }
}
