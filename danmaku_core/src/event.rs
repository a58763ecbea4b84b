// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine events reported through
//! [`Renderer::drain_events`](crate::renderer::Renderer::drain_events).
//!
//! Every lifecycle transition of a process is recorded with the host time it
//! happened at. Orchestrators use the queue to react to finished comments;
//! `danmaku_debug` turns it into logs and traces.
//!
//! Queues are bounded. Once an [`EventQueue`] is full, each new event
//! evicts the oldest one, so a host that never drains keeps a fixed
//! footprint. A capacity of zero turns recording off.

use alloc::collections::VecDeque;
use alloc::collections::vec_deque::Drain;
use core::fmt;

use kurbo::{Point, Size};

use crate::comment::CommentId;
use crate::id::ProcessId;
use crate::layout::StackingLane;
use crate::scrolling::ScrollingPlan;
use crate::stage::Band;
use crate::time::HostTime;

/// Where a slot was reserved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotInfo {
    /// Stacking track.
    pub lane: StackingLane,
    /// Column within the track.
    pub column: usize,
    /// Reserved band.
    pub band: Band,
}

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderEventKind {
    /// The comment was measured, positioned, and snapped to its start.
    Arranged {
        /// Start position of the content's top-left corner.
        position: Point,
        /// Measured content size.
        size: Size,
        /// Reserved slot, for stacking-capable comments.
        slot: Option<SlotInfo>,
        /// Planned motion, for scrolling comments.
        plan: Option<ScrollingPlan>,
    },
    /// A scrolling motion started.
    MotionStarted {
        /// The motion.
        plan: ScrollingPlan,
    },
    /// A slot became free while the comment stayed on screen, or as part of
    /// the comment ending.
    SlotReleased {
        /// The released slot.
        slot: SlotInfo,
    },
    /// Motion and timers were frozen.
    Paused,
    /// Motion and timers continued.
    Resumed,
    /// The process was stopped before completing. Terminal.
    Canceled,
    /// The process completed naturally. Terminal.
    Finished,
}

impl RenderEventKind {
    /// Returns a short label for logs and traces.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Arranged { .. } => "arranged",
            Self::MotionStarted { .. } => "motion-started",
            Self::SlotReleased { .. } => "slot-released",
            Self::Paused => "paused",
            Self::Resumed => "resumed",
            Self::Canceled => "canceled",
            Self::Finished => "finished",
        }
    }

    /// Returns `true` for the events that end a process.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Canceled | Self::Finished)
    }
}

/// One recorded transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderEvent {
    /// Host time of the transition.
    pub at: HostTime,
    /// The process it happened to.
    pub process: ProcessId,
    /// The comment the process renders.
    pub comment: CommentId,
    /// What happened.
    pub kind: RenderEventKind,
}

/// Bounded FIFO of events that evicts the oldest entry when full.
#[derive(Clone)]
pub struct EventQueue<T> {
    events: VecDeque<T>,
    capacity: usize,
    dropped: u64,
}

impl<T> EventQueue<T> {
    /// Creates an empty queue holding at most `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity,
            dropped: 0,
        }
    }

    /// Maximum number of undrained events.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of undrained events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing is waiting to be drained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events evicted or refused since the queue was created.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Appends `event`, evicting the oldest event if the queue is full.
    pub fn push(&mut self, event: T) {
        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
            if self.dropped == 0 {
                tracing::warn!(
                    capacity = self.capacity,
                    "event queue full, dropping oldest events until drained"
                );
            }
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Takes every queued event, oldest first.
    pub fn drain(&mut self) -> Drain<'_, T> {
        self.events.drain(..)
    }
}

impl<T> fmt::Debug for EventQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventQueue")
            .field("len", &self.events.len())
            .field("capacity", &self.capacity)
            .field("dropped", &self.dropped)
            .finish_non_exhaustive()
    }
}
