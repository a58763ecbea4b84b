// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-comment rendering process.
//!
//! A [`CommentProcess`] walks one comment through its time on screen:
//!
//! ```text
//!   new ──► on_measured ──► arrange ──► commit ──┬──► start_motion (next tick)
//!                                                │        │
//!                                                │        ├──► inbound timer ──► slot released
//!                                                │        ▼
//!                                                │    motion finished ──┐
//!                                                │                      ├──► Finished
//!                                                └──► lifetime timer ───┘
//!
//!   Running ⇄ Paused at any point; cancel from either ──► Canceled
//! ```
//!
//! Measurement and arrangement each happen at most once. Arrangement reads
//! the comment's traits one by one: position and alignment give the initial
//! point, a scrolling trait plans a motion (and moves X to its start), and a
//! stacking trait reserves a slot, filtered for collisions when the comment
//! moves. Both terminal paths release the slot, the active-motion entry, and
//! every pending timer.

use alloc::rc::Rc;

use kurbo::{Point, Size};

use crate::collision::{ActiveMotion, CandidateMotion};
use crate::comment::{CommentRecord, HorizontalAlignment, VerticalAlignment};
use crate::error::{Error, Result};
use crate::event::{RenderEvent, RenderEventKind, SlotInfo};
use crate::host::{Host, MotionRequest, TimerId, TimerKind};
use crate::id::ProcessId;
use crate::layout::{Layout, StackingLane};
use crate::scrolling::ScrollingPlan;
use crate::stacking::StackingPlan;
use crate::stage::{Band, HorizontalDirection};
use crate::time::{Duration, HostTime};
use crate::timer::{Countdown, CountdownState};

/// Run state of a [`CommentProcess`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProcessState {
    /// Motion and timers advance.
    Running,
    /// Motion and timers are frozen.
    Paused,
    /// Stopped before completing. Terminal.
    Canceled,
    /// Completed naturally. Terminal.
    Finished,
}

impl ProcessState {
    /// Returns a short label for logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Canceled => "canceled",
            Self::Finished => "finished",
        }
    }

    /// Returns `true` for [`Canceled`](Self::Canceled) and
    /// [`Finished`](Self::Finished).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Canceled | Self::Finished)
    }
}

/// A planned scrolling motion and its direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollingMotion {
    /// Direction of travel.
    pub direction: HorizontalDirection,
    /// The planned motion.
    pub plan: ScrollingPlan,
}

/// A slot held in one stacking lane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotAssignment {
    /// The lane the slot was reserved in.
    pub lane: StackingLane,
    /// The reservation.
    pub plan: StackingPlan,
}

impl SlotAssignment {
    /// Lane, column, and band of the slot.
    #[must_use]
    pub fn info(&self) -> SlotInfo {
        SlotInfo {
            lane: self.lane,
            column: self.plan.column,
            band: self.plan.band,
        }
    }
}

/// Result of arranging a comment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrangement {
    /// Start position of the content's top-left corner.
    pub position: Point,
    /// Measured content size.
    pub size: Size,
    /// Motion, for comments with a scrolling trait.
    pub scrolling: Option<ScrollingMotion>,
    /// Slot, for comments with a stacking trait.
    pub slot: Option<SlotAssignment>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MotionPhase {
    None,
    Pending,
    Moving,
    Done,
}

/// The rendering process of one comment.
#[derive(Debug)]
pub struct CommentProcess {
    id: ProcessId,
    comment: Rc<CommentRecord>,
    state: ProcessState,
    size: Option<Size>,
    arrangement: Option<Arrangement>,
    committed: bool,
    motion: MotionPhase,
    lifetime: Option<Countdown>,
    inbound: Option<Countdown>,
}

impl CommentProcess {
    /// Creates a process that starts running, or paused if `paused`.
    #[must_use]
    pub fn new(id: ProcessId, comment: Rc<CommentRecord>, paused: bool) -> Self {
        Self {
            id,
            comment,
            state: if paused {
                ProcessState::Paused
            } else {
                ProcessState::Running
            },
            size: None,
            arrangement: None,
            committed: false,
            motion: MotionPhase::None,
            lifetime: None,
            inbound: None,
        }
    }

    /// Handle of this process.
    #[must_use]
    pub fn id(&self) -> ProcessId {
        self.id
    }

    /// The comment being rendered.
    #[must_use]
    pub fn comment(&self) -> &Rc<CommentRecord> {
        &self.comment
    }

    /// Current run state.
    #[must_use]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Measured size, once known.
    #[must_use]
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Arrangement, once made.
    #[must_use]
    pub fn arrangement(&self) -> Option<&Arrangement> {
        self.arrangement.as_ref()
    }

    /// The slot still held, if any.
    #[must_use]
    pub fn held_slot(&self) -> Option<SlotInfo> {
        self.arrangement
            .as_ref()
            .and_then(|a| a.slot.as_ref())
            .filter(|slot| !slot.plan.is_canceled())
            .map(SlotAssignment::info)
    }

    /// Returns `true` while a motion is waiting for the next tick.
    #[must_use]
    pub fn is_motion_pending(&self) -> bool {
        self.motion == MotionPhase::Pending
    }

    /// Returns `true` while a motion is in flight (running or paused).
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.motion == MotionPhase::Moving
    }

    /// Records the measured size.
    ///
    /// Returns `Ok(false)` if the size was already known; the first
    /// measurement wins. Returns [`Error::InvalidState`] once ended.
    pub fn on_measured(&mut self, size: Size) -> Result<bool> {
        self.ensure_live("measure")?;
        if self.size.is_some() {
            tracing::debug!(process = ?self.id, "duplicate measurement ignored");
            return Ok(false);
        }
        self.size = Some(size);
        Ok(true)
    }

    /// Computes the start position, motion plan, and slot.
    ///
    /// Returns [`Error::MissingDimensions`] before measurement and
    /// [`Error::InvalidState`] if already arranged or ended.
    pub fn arrange(&mut self, layout: &mut Layout, now: HostTime) -> Result<&Arrangement> {
        self.ensure_live("arrange")?;
        if self.arrangement.is_some() {
            return Err(Error::InvalidState {
                operation: "arrange",
                state: "arranged",
            });
        }
        let Some(size) = self.size else {
            return Err(Error::MissingDimensions {
                operation: "arrange",
            });
        };

        let comment = Rc::clone(&self.comment);
        let stage = *layout.stage();

        let mut x = match (comment.position_x(), comment.horizontal_alignment()) {
            (Some(x), _) => x,
            (None, Some(HorizontalAlignment::Left)) | (None, None) => 0.0,
            (None, Some(HorizontalAlignment::Center)) => (stage.width - size.width) / 2.0,
            (None, Some(HorizontalAlignment::Right)) => stage.width - size.width,
        };

        let scrolling = comment.scrolling_direction().map(|direction| ScrollingMotion {
            direction,
            plan: layout.scrolling(direction).plan(size.width),
        });
        if let Some(scrolling) = &scrolling {
            x = scrolling.plan.from_x;
        }

        let slot = comment.stacking_direction().map(|direction| {
            let lane = StackingLane::select(direction, scrolling.is_some());
            let candidate = scrolling.map(|s| CandidateMotion {
                width: size.width,
                plan: s.plan,
                direction: s.direction,
            });
            SlotAssignment {
                lane,
                plan: layout.plan_slot(lane, size.height, candidate, now),
            }
        });

        let y = match (&slot, comment.position_y(), comment.vertical_alignment()) {
            (Some(slot), _, _) => slot.plan.top_y(),
            (None, Some(y), _) => y,
            (None, None, Some(VerticalAlignment::Top) | None) => stage.body_top(),
            (None, None, Some(VerticalAlignment::Middle)) => (stage.height - size.height) / 2.0,
            (None, None, Some(VerticalAlignment::Bottom)) => stage.body_bottom() - size.height,
        };

        let arrangement = Arrangement {
            position: Point::new(x, y),
            size,
            scrolling,
            slot,
        };
        tracing::debug!(
            process = ?self.id,
            comment = ?comment.id(),
            x,
            y,
            lane = slot.map(|s| s.lane.as_str()),
            column = slot.map(|s| s.plan.column),
            "comment arranged"
        );
        self.emit(
            layout,
            now,
            RenderEventKind::Arranged {
                position: arrangement.position,
                size,
                slot: slot.as_ref().map(SlotAssignment::info),
                plan: scrolling.map(|s| s.plan),
            },
        );
        Ok(&*self.arrangement.insert(arrangement))
    }

    /// Snaps the content to its start position and starts the countdowns
    /// that do not wait for motion.
    ///
    /// Scrolling motions are left pending for [`start_motion`](Self::start_motion).
    /// Returns [`Error::MissingDimensions`] before arrangement and
    /// [`Error::InvalidState`] if already committed or ended.
    pub fn commit<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        self.ensure_live("commit")?;
        if self.committed {
            return Err(Error::InvalidState {
                operation: "commit",
                state: "committed",
            });
        }
        let Some(arrangement) = self.arrangement else {
            return Err(Error::MissingDimensions {
                operation: "commit",
            });
        };

        host.place(self.id, arrangement.position);
        self.committed = true;

        if arrangement.scrolling.is_some() {
            self.motion = MotionPhase::Pending;
        } else if let Some(lifetime) = self.comment.lifetime() {
            let mut countdown = Countdown::new(lifetime);
            if self.state == ProcessState::Running {
                let now = host.now();
                countdown.run(now)?;
                host.schedule(self.timer(TimerKind::Lifetime), countdown.remaining(now));
            }
            self.lifetime = Some(countdown);
        }
        Ok(())
    }

    /// Starts a pending motion.
    ///
    /// Returns `Ok(false)` if nothing is pending or the process is paused;
    /// the motion then waits for a later call. Returns
    /// [`Error::InvalidState`] once ended.
    pub fn start_motion<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        layout: &mut Layout,
    ) -> Result<bool> {
        self.ensure_live("start motion")?;
        if self.state != ProcessState::Running || self.motion != MotionPhase::Pending {
            return Ok(false);
        }
        let Some(arrangement) = self.arrangement else {
            return Err(Error::MissingDimensions {
                operation: "start motion",
            });
        };
        let Some(scrolling) = arrangement.scrolling else {
            return Ok(false);
        };

        let now = host.now();
        let size = arrangement.size;
        let plan = scrolling.plan;
        let band = arrangement.slot.map_or_else(
            || Band::new(arrangement.position.y, arrangement.position.y + size.height),
            |slot| slot.plan.band,
        );
        let motion = ActiveMotion::start(
            size.width,
            size.height,
            band,
            plan,
            scrolling.direction,
            now,
        )?;
        layout.motions.insert(self.id, motion);
        host.start_motion(
            self.id,
            MotionRequest {
                start_x: plan.from_x,
                end_x: plan.to_x,
                duration: plan.duration,
            },
        );
        self.motion = MotionPhase::Moving;

        if arrangement.slot.is_some() {
            let mut inbound = Countdown::new(Duration(size.width / plan.speed));
            inbound.run(now)?;
            host.schedule(self.timer(TimerKind::Inbound), inbound.remaining(now));
            self.inbound = Some(inbound);
        }

        tracing::debug!(
            process = ?self.id,
            from_x = plan.from_x,
            to_x = plan.to_x,
            duration = plan.duration.millis(),
            "motion started"
        );
        self.emit(layout, now, RenderEventKind::MotionStarted { plan });
        Ok(true)
    }

    /// Freezes motion and timers, keeping their progress.
    ///
    /// Returns [`Error::InvalidState`] unless running.
    pub fn pause<H: Host + ?Sized>(&mut self, host: &mut H, layout: &mut Layout) -> Result<()> {
        if self.state != ProcessState::Running {
            return Err(Error::InvalidState {
                operation: "pause",
                state: self.state.as_str(),
            });
        }
        let now = host.now();
        if self.motion == MotionPhase::Moving {
            if let Some(motion) = layout.motions.get_mut(self.id) {
                motion.pause(now)?;
            }
            host.pause_motion(self.id);
        }
        let id = self.id;
        for (kind, countdown) in self.countdowns_mut() {
            if countdown.state() == CountdownState::Running {
                countdown.pause(now)?;
                host.cancel(TimerId { process: id, kind });
            }
        }
        self.state = ProcessState::Paused;
        tracing::trace!(process = ?self.id, "process paused");
        self.emit(layout, now, RenderEventKind::Paused);
        Ok(())
    }

    /// Continues motion and timers from where they were frozen.
    ///
    /// Returns [`Error::InvalidState`] unless paused.
    pub fn resume<H: Host + ?Sized>(&mut self, host: &mut H, layout: &mut Layout) -> Result<()> {
        if self.state != ProcessState::Paused {
            return Err(Error::InvalidState {
                operation: "resume",
                state: self.state.as_str(),
            });
        }
        let now = host.now();
        if self.motion == MotionPhase::Moving {
            if let Some(motion) = layout.motions.get_mut(self.id) {
                motion.resume(now)?;
            }
            host.resume_motion(self.id);
        }
        let id = self.id;
        for (kind, countdown) in self.countdowns_mut() {
            if matches!(
                countdown.state(),
                CountdownState::Idle | CountdownState::Paused
            ) {
                countdown.run(now)?;
                host.schedule(TimerId { process: id, kind }, countdown.remaining(now));
            }
        }
        self.state = ProcessState::Running;
        tracing::trace!(process = ?self.id, "process resumed");
        self.emit(layout, now, RenderEventKind::Resumed);
        Ok(())
    }

    /// Stops the process, releasing its slot, motion, and timers.
    ///
    /// Returns `false` if the process had already ended.
    pub fn cancel<H: Host + ?Sized>(&mut self, host: &mut H, layout: &mut Layout) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.end(host, layout, ProcessState::Canceled);
        true
    }

    /// Handles the host reporting that the motion reached its end.
    ///
    /// Returns `true` if this finished the process.
    pub fn on_motion_finished<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        layout: &mut Layout,
    ) -> bool {
        if self.state.is_terminal() || self.motion != MotionPhase::Moving {
            return false;
        }
        layout.motions.remove(self.id);
        self.motion = MotionPhase::Done;
        self.end(host, layout, ProcessState::Finished);
        true
    }

    /// Handles a host timer firing.
    ///
    /// Returns `true` if the timer was live and acted upon.
    pub fn on_timer<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        layout: &mut Layout,
        kind: TimerKind,
    ) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        match kind {
            TimerKind::Lifetime => {
                if !self.lifetime.as_mut().is_some_and(Countdown::finish) {
                    return false;
                }
                self.end(host, layout, ProcessState::Finished);
            }
            TimerKind::Inbound => {
                if !self.inbound.as_mut().is_some_and(Countdown::finish) {
                    return false;
                }
                self.release_slot(layout, host.now());
            }
        }
        true
    }

    /// Current position of the content's top-left corner.
    ///
    /// Returns [`Error::MissingDimensions`] before arrangement.
    pub fn locate(&self, layout: &Layout, now: HostTime) -> Result<Point> {
        let Some(arrangement) = &self.arrangement else {
            return Err(Error::MissingDimensions {
                operation: "locate",
            });
        };
        let x = layout
            .motions
            .get(self.id)
            .map_or(arrangement.position.x, |motion| motion.current_x(now));
        Ok(Point::new(x, arrangement.position.y))
    }

    fn end<H: Host + ?Sized>(&mut self, host: &mut H, layout: &mut Layout, state: ProcessState) {
        let now = host.now();
        self.release_slot(layout, now);

        if self.motion == MotionPhase::Moving {
            layout.motions.remove(self.id);
            host.cancel_motion(self.id);
        }
        self.motion = MotionPhase::Done;

        let id = self.id;
        for (kind, countdown) in self.countdowns_mut() {
            if countdown.cancel(now) {
                host.cancel(TimerId { process: id, kind });
            }
        }

        host.detach(self.id);
        self.state = state;
        tracing::debug!(process = ?self.id, state = state.as_str(), "process ended");
        let kind = match state {
            ProcessState::Finished => RenderEventKind::Finished,
            _ => RenderEventKind::Canceled,
        };
        self.emit(layout, now, kind);
    }

    fn release_slot(&mut self, layout: &mut Layout, now: HostTime) {
        let Some(slot) = self.arrangement.as_mut().and_then(|a| a.slot.as_mut()) else {
            return;
        };
        if !layout.stacking_mut(slot.lane).cancel(&mut slot.plan) {
            return;
        }
        let slot = slot.info();
        self.emit(layout, now, RenderEventKind::SlotReleased { slot });
    }

    fn countdowns_mut(&mut self) -> impl Iterator<Item = (TimerKind, &mut Countdown)> {
        [
            (TimerKind::Lifetime, self.lifetime.as_mut()),
            (TimerKind::Inbound, self.inbound.as_mut()),
        ]
        .into_iter()
        .filter_map(|(kind, countdown)| countdown.map(|c| (kind, c)))
    }

    fn timer(&self, kind: TimerKind) -> TimerId {
        TimerId {
            process: self.id,
            kind,
        }
    }

    fn ensure_live(&self, operation: &'static str) -> Result<()> {
        if self.state.is_terminal() {
            return Err(Error::InvalidState {
                operation,
                state: self.state.as_str(),
            });
        }
        Ok(())
    }

    fn emit(&self, layout: &mut Layout, at: HostTime, kind: RenderEventKind) {
        layout.push_event(RenderEvent {
            at,
            process: self.id,
            comment: self.comment.id(),
            kind,
        });
    }
}
