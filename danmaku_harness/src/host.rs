// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic host driven by a manual clock.
//!
//! [`VirtualHost`] implements every host trait of `danmaku_core`. It
//! measures text with fixed [`TextMetrics`], tracks motions and timers
//! against its own clock, and logs each call. Nothing is delivered back to
//! the renderer on its own: [`Simulation`](crate::sim::Simulation) polls the
//! host for due callbacks.

use std::collections::BTreeMap;

use danmaku_core::comment::CommentRecord;
use danmaku_core::host::{
    AnimationDriver, Clock, MeasurementHost, MotionRequest, TimerHost, TimerId,
};
use danmaku_core::id::ProcessId;
use danmaku_core::time::{Duration, HostTime};
use danmaku_core::{Point, Size};

/// Fixed text measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// Advance of one character, as a fraction of the font size.
    pub glyph_advance: f64,
    /// Line height, as a multiple of the font size.
    pub line_height: f64,
}

impl TextMetrics {
    /// Half-em advance, 1.5 em lines.
    pub const DEFAULT: Self = Self {
        glyph_advance: 0.5,
        line_height: 1.5,
    };

    /// Measured size of `comment`. Comments without text measure as zero.
    #[must_use]
    pub fn measure(&self, comment: &CommentRecord) -> Size {
        let Some(text) = comment.text() else {
            return Size::ZERO;
        };
        let chars = text.text.chars().count() as f64;
        Size::new(
            chars * text.font_size * self.glyph_advance,
            text.font_size * self.line_height,
        )
    }
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One call received from the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostCall {
    /// Measurement requested.
    Measure(ProcessId),
    /// Content placed.
    Place(ProcessId, Point),
    /// Motion started.
    StartMotion(ProcessId, MotionRequest),
    /// Motion frozen.
    PauseMotion(ProcessId),
    /// Motion continued.
    ResumeMotion(ProcessId),
    /// Motion dropped.
    CancelMotion(ProcessId),
    /// Content removed.
    Detach(ProcessId),
    /// Timer armed.
    Schedule(TimerId, Duration),
    /// Timer disarmed.
    CancelTimer(TimerId),
}

/// A motion as the host animates it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VirtualMotion {
    /// What the engine asked for.
    pub request: MotionRequest,
    elapsed_before: Duration,
    resumed_at: Option<HostTime>,
}

impl VirtualMotion {
    fn elapsed(&self, now: HostTime) -> Duration {
        match self.resumed_at {
            Some(at) => self.elapsed_before + now.saturating_duration_since(at),
            None => self.elapsed_before,
        }
    }

    /// Left edge at `now`.
    #[must_use]
    pub fn x_at(&self, now: HostTime) -> f64 {
        let duration = self.request.duration.millis();
        if duration <= 0.0 {
            return self.request.end_x;
        }
        let t = (self.elapsed(now).millis() / duration).clamp(0.0, 1.0);
        self.request.start_x + (self.request.end_x - self.request.start_x) * t
    }

    /// When the motion completes, or `None` while frozen.
    #[must_use]
    pub fn due(&self) -> Option<HostTime> {
        self.resumed_at
            .map(|at| at + self.request.duration.saturating_sub(self.elapsed_before))
    }

    /// Returns `true` while frozen.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.resumed_at.is_none()
    }
}

/// A callback the host owes the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Due {
    /// A timer expired.
    Timer(TimerId),
    /// A motion reached its end.
    MotionFinished(ProcessId),
}

/// Deterministic host with a manual clock.
#[derive(Clone, Debug, Default)]
pub struct VirtualHost {
    now: HostTime,
    metrics: TextMetrics,
    measurements: Vec<(ProcessId, Size)>,
    placed: BTreeMap<ProcessId, Point>,
    motions: BTreeMap<ProcessId, VirtualMotion>,
    timers: BTreeMap<TimerId, HostTime>,
    calls: Vec<HostCall>,
}

impl VirtualHost {
    /// Creates a host at time zero with default metrics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the text metrics.
    #[must_use]
    pub fn with_metrics(mut self, metrics: TextMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Text metrics in use.
    #[must_use]
    pub fn metrics(&self) -> &TextMetrics {
        &self.metrics
    }

    /// Moves the clock to `now`. Time never goes backwards.
    pub fn set_now(&mut self, now: HostTime) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Content currently attached, with its placed position.
    #[must_use]
    pub fn attached(&self) -> &BTreeMap<ProcessId, Point> {
        &self.placed
    }

    /// Motions the host is animating.
    #[must_use]
    pub fn motions(&self) -> &BTreeMap<ProcessId, VirtualMotion> {
        &self.motions
    }

    /// Armed timers and their deadlines.
    #[must_use]
    pub fn timers(&self) -> &BTreeMap<TimerId, HostTime> {
        &self.timers
    }

    /// Where the host draws `process` right now.
    #[must_use]
    pub fn position(&self, process: ProcessId) -> Option<Point> {
        let placed = *self.placed.get(&process)?;
        Some(match self.motions.get(&process) {
            Some(motion) => Point::new(motion.x_at(self.now), placed.y),
            None => placed,
        })
    }

    /// Every call received, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Takes the call log.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// Takes the pending measurements.
    pub fn take_measurements(&mut self) -> Vec<(ProcessId, Size)> {
        std::mem::take(&mut self.measurements)
    }

    /// The earliest timer or motion completion at or before `until`.
    ///
    /// Timers win ties against motions; ties within a kind go by process.
    #[must_use]
    pub fn next_due(&self, until: HostTime) -> Option<(HostTime, Due)> {
        let timers = self
            .timers
            .iter()
            .map(|(timer, at)| (*at, 0, Due::Timer(*timer)));
        let motions = self
            .motions
            .iter()
            .filter_map(|(process, motion)| Some((motion.due()?, 1, Due::MotionFinished(*process))));
        timers
            .chain(motions)
            .filter(|(at, _, _)| *at <= until)
            .min_by(|a, b| a.0.millis().total_cmp(&b.0.millis()).then(a.1.cmp(&b.1)))
            .map(|(at, _, due)| (at, due))
    }

    /// Forgets a callback that is about to be delivered.
    pub fn consume(&mut self, due: Due) {
        match due {
            Due::Timer(timer) => {
                self.timers.remove(&timer);
            }
            Due::MotionFinished(process) => {
                if let Some(motion) = self.motions.remove(&process) {
                    if let Some(placed) = self.placed.get_mut(&process) {
                        placed.x = motion.request.end_x;
                    }
                }
            }
        }
    }
}

impl Clock for VirtualHost {
    fn now(&self) -> HostTime {
        self.now
    }
}

impl MeasurementHost for VirtualHost {
    fn request_measure(&mut self, process: ProcessId, comment: &CommentRecord) {
        self.calls.push(HostCall::Measure(process));
        self.measurements.push((process, self.metrics.measure(comment)));
    }
}

impl AnimationDriver for VirtualHost {
    fn place(&mut self, process: ProcessId, position: Point) {
        self.calls.push(HostCall::Place(process, position));
        self.placed.insert(process, position);
    }

    fn start_motion(&mut self, process: ProcessId, motion: MotionRequest) {
        self.calls.push(HostCall::StartMotion(process, motion));
        self.motions.insert(
            process,
            VirtualMotion {
                request: motion,
                elapsed_before: Duration::ZERO,
                resumed_at: Some(self.now),
            },
        );
    }

    fn pause_motion(&mut self, process: ProcessId) {
        self.calls.push(HostCall::PauseMotion(process));
        let now = self.now;
        if let Some(motion) = self.motions.get_mut(&process) {
            motion.elapsed_before = motion.elapsed(now);
            motion.resumed_at = None;
        }
    }

    fn resume_motion(&mut self, process: ProcessId) {
        self.calls.push(HostCall::ResumeMotion(process));
        let now = self.now;
        if let Some(motion) = self.motions.get_mut(&process) {
            if motion.resumed_at.is_none() {
                motion.resumed_at = Some(now);
            }
        }
    }

    fn cancel_motion(&mut self, process: ProcessId) {
        self.calls.push(HostCall::CancelMotion(process));
        self.motions.remove(&process);
    }

    fn detach(&mut self, process: ProcessId) {
        self.calls.push(HostCall::Detach(process));
        self.placed.remove(&process);
        self.motions.remove(&process);
    }
}

impl TimerHost for VirtualHost {
    fn schedule(&mut self, timer: TimerId, after: Duration) {
        self.calls.push(HostCall::Schedule(timer, after));
        self.timers.insert(timer, self.now + after);
    }

    fn cancel(&mut self, timer: TimerId) {
        self.calls.push(HostCall::CancelTimer(timer));
        self.timers.remove(&timer);
    }
}
