// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads events recorded by an
//! [`EventRecorder`](super::recorder::EventRecorder) and writes
//! [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Each stacking column of each lane gets its own track (`tid`), named with
//! a metadata event; comments without a slot share track 0. A comment's time
//! on screen is one complete (`"X"`) event on its track, from arrangement to
//! its terminal event or the last recorded event. Everything else is an
//! instant on the same track.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde_json::{Value, json};

use danmaku_core::event::{RenderEvent, RenderEventKind};
use danmaku_core::id::ProcessId;
use danmaku_core::layout::StackingLane;
use danmaku_core::time::HostTime;

const PID: u32 = 1;

struct Span {
    tid: u64,
    start: HostTime,
    comment: u64,
    args: Value,
}

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(events: &[RenderEvent], writer: &mut dyn Write) -> io::Result<()> {
    let mut tracks: BTreeMap<(StackingLane, usize), u64> = BTreeMap::new();
    let mut open: BTreeMap<ProcessId, Span> = BTreeMap::new();
    let mut out: Vec<Value> = vec![thread_name(0, "unslotted")];
    let end_of_trace = events.last().map_or(HostTime(0.0), |e| e.at);

    for e in events {
        match &e.kind {
            RenderEventKind::Arranged {
                position,
                size,
                slot,
                plan,
            } => {
                let tid = match slot {
                    Some(slot) => {
                        let next = tracks.len() as u64 + 1;
                        *tracks.entry((slot.lane, slot.column)).or_insert_with(|| {
                            out.push(thread_name(
                                next,
                                &format!("{} col {}", slot.lane.as_str(), slot.column),
                            ));
                            next
                        })
                    }
                    None => 0,
                };
                open.insert(
                    e.process,
                    Span {
                        tid,
                        start: e.at,
                        comment: e.comment.0,
                        args: json!({
                            "x": position.x,
                            "y": position.y,
                            "width": size.width,
                            "height": size.height,
                            "speed": plan.map(|p| p.speed),
                        }),
                    },
                );
            }
            kind if kind.is_terminal() => {
                if let Some(span) = open.remove(&e.process) {
                    out.push(complete(&span, e.at, kind.name()));
                }
            }
            kind => {
                let tid = open.get(&e.process).map_or(0, |span| span.tid);
                out.push(json!({
                    "ph": "i",
                    "name": kind.name(),
                    "cat": "Comment",
                    "ts": millis_to_us(e.at),
                    "pid": PID,
                    "tid": tid,
                    "s": "t",
                    "args": {
                        "comment": e.comment.0,
                    }
                }));
            }
        }
    }

    for span in open.values() {
        out.push(complete(span, end_of_trace, "unfinished"));
    }

    serde_json::to_writer_pretty(writer, &out)?;
    Ok(())
}

fn thread_name(tid: u64, name: &str) -> Value {
    json!({
        "ph": "M",
        "name": "thread_name",
        "pid": PID,
        "tid": tid,
        "args": { "name": name }
    })
}

fn complete(span: &Span, end: HostTime, outcome: &str) -> Value {
    json!({
        "ph": "X",
        "name": format!("comment {}", span.comment),
        "cat": "Comment",
        "ts": millis_to_us(span.start),
        "dur": millis_to_us(end) - millis_to_us(span.start),
        "pid": PID,
        "tid": span.tid,
        "args": {
            "layout": span.args,
            "outcome": outcome,
        }
    })
}

fn millis_to_us(t: HostTime) -> f64 {
    t.millis() * 1000.0
}
