// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for platform integrations.
//!
//! The engine never paints, measures text, or owns a timer. A *host* (a DOM
//! overlay, a GPU compositor, or the virtual host in `danmaku_harness`)
//! provides the following pieces:
//!
//! - **Clock**: [`Clock::now`] reads a monotonic millisecond clock. Every
//!   engine decision that depends on motion progress reads it once.
//!
//! - **Measurement**: [`MeasurementHost::request_measure`] asks for the
//!   rendered size of a comment. The answer arrives later through
//!   [`Renderer::on_measured`](crate::renderer::Renderer::on_measured).
//!
//! - **Animation**: [`AnimationDriver`] snaps content to a position and runs
//!   linear horizontal motions. Completion is reported exactly once through
//!   [`Renderer::on_motion_finished`](crate::renderer::Renderer::on_motion_finished).
//!
//! - **Timers**: [`TimerHost`] schedules one-shot wake-ups keyed by
//!   [`TimerId`]. Expiry is reported through
//!   [`Renderer::on_timer_fired`](crate::renderer::Renderer::on_timer_fired).
//!   Pausing a timer is expressed as [`TimerHost::cancel`] followed later by
//!   a fresh [`TimerHost::schedule`] of the remaining time.
//!
//! Callbacks for a process that has already ended are ignored, so hosts do
//! not need to track cancellation precisely.
//!
//! # Callback loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(host: &mut MyHost, renderer: &mut Renderer) {
//!     for (process, size) in host.take_measurements() {
//!         renderer.on_measured(host, process, size)?;
//!     }
//!     renderer.tick(host);
//!     for process in host.take_finished_motions() {
//!         renderer.on_motion_finished(host, process);
//!     }
//!     for timer in host.take_due_timers() {
//!         renderer.on_timer_fired(host, timer);
//!     }
//! }
//! ```

use kurbo::Point;

use crate::comment::CommentRecord;
use crate::id::ProcessId;
use crate::time::{Duration, HostTime};

/// Reads the host's monotonic clock.
pub trait Clock {
    /// Current time in milliseconds.
    fn now(&self) -> HostTime;
}

/// Measures rendered comment content.
pub trait MeasurementHost {
    /// Requests the size of `comment` as it will be drawn for `process`.
    fn request_measure(&mut self, process: ProcessId, comment: &CommentRecord);
}

/// A linear horizontal motion handed to the [`AnimationDriver`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionRequest {
    /// X where the motion starts.
    pub start_x: f64,
    /// X where the motion ends.
    pub end_x: f64,
    /// Time from `start_x` to `end_x`.
    pub duration: Duration,
}

/// Moves comment content on screen.
pub trait AnimationDriver {
    /// Makes the content visible at `position` with no motion.
    fn place(&mut self, process: ProcessId, position: Point);

    /// Starts a motion from the placed position.
    fn start_motion(&mut self, process: ProcessId, motion: MotionRequest);

    /// Freezes the motion where it is.
    fn pause_motion(&mut self, process: ProcessId);

    /// Continues a frozen motion over its remaining time.
    fn resume_motion(&mut self, process: ProcessId);

    /// Stops the motion for good. No completion is reported afterwards.
    fn cancel_motion(&mut self, process: ProcessId);

    /// Removes the content from the surface.
    fn detach(&mut self, process: ProcessId);
}

/// Which countdown of a process a timer belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    /// Ends a stationary comment.
    Lifetime,
    /// Frees the slot of a scrolling comment once it has fully entered.
    Inbound,
}

impl TimerKind {
    /// Returns a short label for logs and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lifetime => "lifetime",
            Self::Inbound => "inbound",
        }
    }
}

/// Key of a host timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId {
    /// Owning process.
    pub process: ProcessId,
    /// Which countdown fires.
    pub kind: TimerKind,
}

/// Schedules one-shot wake-ups.
pub trait TimerHost {
    /// Fires `timer` after `after` has elapsed, replacing any pending wake-up
    /// with the same key.
    fn schedule(&mut self, timer: TimerId, after: Duration);

    /// Drops a pending wake-up. Unknown keys are ignored.
    fn cancel(&mut self, timer: TimerId);
}

/// Everything the engine needs from a host.
pub trait Host: Clock + MeasurementHost + AnimationDriver + TimerHost {}

impl<T> Host for T where T: Clock + MeasurementHost + AnimationDriver + TimerHost + ?Sized {}
