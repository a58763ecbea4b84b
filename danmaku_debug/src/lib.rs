// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for danmaku engine
//! events.
//!
//! The engine queues [`RenderEvent`]s and [`PoolEvent`]s; drain them into
//! any [`EventSink`]:
//!
//! - [`pretty::PrettyPrinter`]: human-readable one-line-per-event output.
//! - [`recorder::EventRecorder`]: in-memory recording for assertions and
//!   later export.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from a
//!   recording, one track per stacking column.

use danmaku_core::event::RenderEvent;
use danmaku_core::pool::PoolEvent;

pub mod chrome;
pub mod pretty;
pub mod recorder;

/// Receives engine events.
pub trait EventSink {
    /// Called once per renderer event, in the order they happened.
    fn on_render_event(&mut self, event: &RenderEvent);

    /// Called once per pool mutation. Ignored by default.
    fn on_pool_event(&mut self, event: &PoolEvent) {
        let _ = event;
    }
}

/// An [`EventSink`] that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn on_render_event(&mut self, event: &RenderEvent) {
        let _ = event;
    }
}

/// Feeds every event of `events` to `sink`, returning how many were fed.
pub fn forward<I, S>(events: I, sink: &mut S) -> usize
where
    I: IntoIterator<Item = RenderEvent>,
    S: EventSink + ?Sized,
{
    let mut count = 0;
    for event in events {
        sink.on_render_event(&event);
        count += 1;
    }
    count
}
