// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable event output.
//!
//! [`PrettyPrinter`] implements [`EventSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Times are
//! host milliseconds.

use std::io::Write;

use danmaku_core::event::{RenderEvent, RenderEventKind, SlotInfo};
use danmaku_core::pool::PoolEvent;

use crate::EventSink;

/// Writes human-readable event lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrinter<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrinter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrinter").finish_non_exhaustive()
    }
}

impl PrettyPrinter {
    /// Creates a printer that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a printer that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrinter<W> {
    /// Creates a printer that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the printer and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn slot_label(slot: &SlotInfo) -> String {
    format!(
        "{}/{} [{:.1}, {:.1})",
        slot.lane.as_str(),
        slot.column,
        slot.band.top_y,
        slot.band.bottom_y
    )
}

impl<W: Write> EventSink for PrettyPrinter<W> {
    fn on_render_event(&mut self, e: &RenderEvent) {
        let head = format!(
            "[{}] t={:.1}ms process={:?} comment={}",
            e.kind.name(),
            e.at.millis(),
            e.process,
            e.comment.0,
        );
        let _ = match &e.kind {
            RenderEventKind::Arranged {
                position,
                size,
                slot,
                plan,
            } => {
                let slot = slot.as_ref().map_or_else(|| "-".to_owned(), slot_label);
                let speed = plan.map_or_else(|| "-".to_owned(), |p| format!("{:.3}px/ms", p.speed));
                writeln!(
                    self.writer,
                    "{head} at=({:.1}, {:.1}) size={:.1}x{:.1} slot={slot} speed={speed}",
                    position.x, position.y, size.width, size.height,
                )
            }
            RenderEventKind::MotionStarted { plan } => writeln!(
                self.writer,
                "{head} from={:.1} to={:.1} duration={:.1}ms",
                plan.from_x,
                plan.to_x,
                plan.duration.millis(),
            ),
            RenderEventKind::SlotReleased { slot } => {
                writeln!(self.writer, "{head} slot={}", slot_label(slot))
            }
            RenderEventKind::Paused
            | RenderEventKind::Resumed
            | RenderEventKind::Canceled
            | RenderEventKind::Finished => writeln!(self.writer, "{head}"),
        };
    }

    fn on_pool_event(&mut self, e: &PoolEvent) {
        let _ = match e {
            PoolEvent::Loaded { count } => writeln!(self.writer, "[pool:loaded] count={count}"),
            PoolEvent::Added { index, comment } => {
                writeln!(self.writer, "[pool:added] index={index} comment={}", comment.0)
            }
            PoolEvent::Removed { index, comment } => {
                writeln!(self.writer, "[pool:removed] index={index} comment={}", comment.0)
            }
            PoolEvent::Cleared { count } => writeln!(self.writer, "[pool:cleared] count={count}"),
            PoolEvent::FilterAdded(id) => writeln!(self.writer, "[pool:filter-added] {id:?}"),
            PoolEvent::FilterRemoved(id) => writeln!(self.writer, "[pool:filter-removed] {id:?}"),
        };
    }
}
