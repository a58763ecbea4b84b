// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`EventRecorder`] implements [`EventSink`] and keeps every event it
//! receives. Pool mutations are kept separately since they carry no host
//! time.

use std::collections::{BTreeMap, BTreeSet};

use danmaku_core::event::{RenderEvent, RenderEventKind};
use danmaku_core::id::ProcessId;
use danmaku_core::pool::PoolEvent;

use crate::EventSink;

/// An [`EventSink`] that stores events in arrival order.
#[derive(Clone, Debug, Default)]
pub struct EventRecorder {
    events: Vec<RenderEvent>,
    pool_events: Vec<PoolEvent>,
}

impl EventRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded renderer events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    /// Recorded pool mutations, oldest first.
    #[must_use]
    pub fn pool_events(&self) -> &[PoolEvent] {
        &self.pool_events
    }

    /// Number of recorded renderer events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if no renderer event was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
        self.pool_events.clear();
    }

    /// Consumes the recorder and returns the renderer events.
    #[must_use]
    pub fn into_events(self) -> Vec<RenderEvent> {
        self.events
    }

    /// Events of one process.
    pub fn for_process(&self, process: ProcessId) -> impl Iterator<Item = &RenderEvent> + '_ {
        self.events.iter().filter(move |e| e.process == process)
    }

    /// Number of events per [`RenderEventKind::name`].
    #[must_use]
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for event in &self.events {
            *counts.entry(event.kind.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Processes that were arranged but have not ended.
    #[must_use]
    pub fn unfinished(&self) -> Vec<ProcessId> {
        let mut open = BTreeSet::new();
        for event in &self.events {
            match event.kind {
                RenderEventKind::Arranged { .. } => {
                    open.insert(event.process);
                }
                kind if kind.is_terminal() => {
                    open.remove(&event.process);
                }
                _ => {}
            }
        }
        open.into_iter().collect()
    }
}

impl EventSink for EventRecorder {
    fn on_render_event(&mut self, event: &RenderEvent) {
        self.events.push(*event);
    }

    fn on_pool_event(&mut self, event: &PoolEvent) {
        self.pool_events.push(*event);
    }
}
