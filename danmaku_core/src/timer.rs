// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pausable countdowns with elapsed-time accounting.
//!
//! A [`Countdown`] does not own a host timer. It records when it was last
//! started and how much time had already elapsed before that, so progress
//! survives any number of pause/resume cycles. Callers pass the current
//! [`HostTime`] into every operation; the actual wake-up is scheduled by the
//! caller through [`TimerHost`](crate::host::TimerHost) using
//! [`Countdown::remaining`].

use crate::error::{Error, Result};
use crate::time::{Duration, HostTime};

/// Lifecycle state of a [`Countdown`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CountdownState {
    /// Created but never started.
    Idle,
    /// Time is accruing.
    Running,
    /// Time is frozen at the captured elapsed value.
    Paused,
    /// Stopped before completion. Terminal.
    Canceled,
    /// Ran for its full duration. Terminal.
    Finished,
}

impl CountdownState {
    /// Returns a short label for logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
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

/// A fixed-length span of host time that can be paused and resumed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Countdown {
    duration: Duration,
    state: CountdownState,
    started_at: Option<HostTime>,
    elapsed_before: Duration,
}

impl Countdown {
    /// Creates an idle countdown.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            state: CountdownState::Idle,
            started_at: None,
            elapsed_before: Duration::ZERO,
        }
    }

    /// Total length of the countdown.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> CountdownState {
        self.state
    }

    /// Time accrued so far, clamped to `[0, duration]`.
    #[must_use]
    pub fn elapsed(&self, now: HostTime) -> Duration {
        let mut elapsed = self.elapsed_before;
        if let Some(started_at) = self.started_at {
            elapsed = elapsed + now.saturating_duration_since(started_at);
        }
        elapsed.min(self.duration)
    }

    /// Time left before the countdown is due.
    #[must_use]
    pub fn remaining(&self, now: HostTime) -> Duration {
        self.duration.saturating_sub(self.elapsed(now))
    }

    /// Returns `true` once a running countdown has accrued its full duration.
    #[must_use]
    pub fn is_due(&self, now: HostTime) -> bool {
        self.state == CountdownState::Running && self.remaining(now).is_zero()
    }

    /// Starts or resumes the countdown. Running again is a no-op.
    ///
    /// Returns [`Error::InvalidState`] from a terminal state.
    pub fn run(&mut self, now: HostTime) -> Result<()> {
        match self.state {
            CountdownState::Running => Ok(()),
            CountdownState::Idle | CountdownState::Paused => {
                self.started_at = Some(now);
                self.state = CountdownState::Running;
                Ok(())
            }
            state => Err(Error::InvalidState {
                operation: "run countdown",
                state: state.as_str(),
            }),
        }
    }

    /// Freezes the countdown at its current elapsed value. Pausing again is a
    /// no-op.
    ///
    /// Returns [`Error::InvalidState`] unless running or paused.
    pub fn pause(&mut self, now: HostTime) -> Result<()> {
        match self.state {
            CountdownState::Paused => Ok(()),
            CountdownState::Running => {
                self.elapsed_before = self.elapsed(now);
                self.started_at = None;
                self.state = CountdownState::Paused;
                Ok(())
            }
            state => Err(Error::InvalidState {
                operation: "pause countdown",
                state: state.as_str(),
            }),
        }
    }

    /// Stops the countdown for good, keeping the elapsed value.
    ///
    /// Returns `false` if it was already terminal.
    pub fn cancel(&mut self, now: HostTime) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.elapsed_before = self.elapsed(now);
        self.started_at = None;
        self.state = CountdownState::Canceled;
        true
    }

    /// Marks a running countdown as complete.
    ///
    /// Returns `false` unless the countdown was running; a late wake-up for a
    /// paused or canceled countdown is ignored.
    pub fn finish(&mut self) -> bool {
        if self.state != CountdownState::Running {
            return false;
        }
        self.elapsed_before = self.duration;
        self.started_at = None;
        self.state = CountdownState::Finished;
        true
    }
}
