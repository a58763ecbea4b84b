// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording host used by unit tests.

use alloc::vec::Vec;

use kurbo::Point;

use crate::comment::CommentRecord;
use crate::host::{AnimationDriver, Clock, MeasurementHost, MotionRequest, TimerHost, TimerId};
use crate::id::ProcessId;
use crate::time::{Duration, HostTime};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum HostOp {
    Measure(ProcessId),
    Place(ProcessId, Point),
    StartMotion(ProcessId, MotionRequest),
    PauseMotion(ProcessId),
    ResumeMotion(ProcessId),
    CancelMotion(ProcessId),
    Detach(ProcessId),
    Schedule(TimerId, Duration),
    CancelTimer(TimerId),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
    pub(crate) now: HostTime,
    pub(crate) ops: Vec<HostOp>,
}

impl RecordingHost {
    pub(crate) fn at(millis: f64) -> Self {
        Self {
            now: HostTime(millis),
            ops: Vec::new(),
        }
    }

    pub(crate) fn advance(&mut self, millis: f64) {
        self.now = HostTime(self.now.0 + millis);
    }

    pub(crate) fn take(&mut self) -> Vec<HostOp> {
        core::mem::take(&mut self.ops)
    }
}

impl Clock for RecordingHost {
    fn now(&self) -> HostTime {
        self.now
    }
}

impl MeasurementHost for RecordingHost {
    fn request_measure(&mut self, process: ProcessId, _comment: &CommentRecord) {
        self.ops.push(HostOp::Measure(process));
    }
}

impl AnimationDriver for RecordingHost {
    fn place(&mut self, process: ProcessId, position: Point) {
        self.ops.push(HostOp::Place(process, position));
    }

    fn start_motion(&mut self, process: ProcessId, motion: MotionRequest) {
        self.ops.push(HostOp::StartMotion(process, motion));
    }

    fn pause_motion(&mut self, process: ProcessId) {
        self.ops.push(HostOp::PauseMotion(process));
    }

    fn resume_motion(&mut self, process: ProcessId) {
        self.ops.push(HostOp::ResumeMotion(process));
    }

    fn cancel_motion(&mut self, process: ProcessId) {
        self.ops.push(HostOp::CancelMotion(process));
    }

    fn detach(&mut self, process: ProcessId) {
        self.ops.push(HostOp::Detach(process));
    }
}

impl TimerHost for RecordingHost {
    fn schedule(&mut self, timer: TimerId, after: Duration) {
        self.ops.push(HostOp::Schedule(timer, after));
    }

    fn cancel(&mut self, timer: TimerId) {
        self.ops.push(HostOp::CancelTimer(timer));
    }
}
