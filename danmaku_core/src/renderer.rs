// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The renderer: owner of the layout and every comment process.
//!
//! A [`Renderer`] turns comments into processes and routes host callbacks
//! to them. Processes live in a table addressed by generational
//! [`ProcessId`] handles; a process that ends is removed immediately and its
//! slot recycled through a free list, so callbacks that arrive afterwards
//! (a late measurement, a timer the host failed to cancel) carry a stale
//! generation and are dropped.
//!
//! ```text
//!             run             pause
//!   Idle ───────────► Running ─────► Paused
//!    ▲                  │  ▲   run     │
//!    │     stop         │  └───────────┘
//!    └──────────────────┴──────────────┘
//!   any non-destroyed state ──destroy──► Destroyed
//! ```

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::collections::vec_deque::Drain;
use alloc::vec::Vec;
use core::num::NonZeroUsize;

use kurbo::{Point, Size};

use crate::comment::{CommentId, CommentRecord};
use crate::error::{Error, Result};
use crate::event::{RenderEvent, SlotInfo};
use crate::host::{Host, TimerId};
use crate::id::ProcessId;
use crate::layout::Layout;
use crate::lifecycle::{CommentProcess, ProcessState};
use crate::scrolling::ScrollingPlanner;
use crate::stage::Stage;
use crate::time::HostTime;

/// Configuration for the [`Renderer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RendererConfig {
    /// Speed of zero-width scrolling content, in px/ms.
    pub scrolling_basic_speed: f64,
    /// Additional scrolling speed per pixel of content width, in px/ms.
    pub scrolling_extra_speed_per_pixel: f64,
    /// Cap on stacking columns per lane. `None` opens columns as needed.
    pub max_stacking_columns: Option<NonZeroUsize>,
    /// Undrained events kept before the oldest is evicted. Zero turns event
    /// recording off.
    pub event_capacity: usize,
}

impl RendererConfig {
    /// Event queue capacity of [`RendererConfig::DEFAULT`].
    pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

    /// Default speeds, unbounded columns, 1024 queued events.
    pub const DEFAULT: Self = Self {
        scrolling_basic_speed: ScrollingPlanner::DEFAULT_BASIC_SPEED,
        scrolling_extra_speed_per_pixel: ScrollingPlanner::DEFAULT_EXTRA_SPEED_PER_PIXEL,
        max_stacking_columns: None,
        event_capacity: Self::DEFAULT_EVENT_CAPACITY,
    };

    /// Returns a copy with at most `max` stacking columns per lane.
    #[must_use]
    pub const fn with_max_stacking_columns(mut self, max: NonZeroUsize) -> Self {
        self.max_stacking_columns = Some(max);
        self
    }

    /// Returns a copy keeping at most `capacity` undrained events.
    #[must_use]
    pub const fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Run state of a [`Renderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RendererState {
    /// Created or stopped; nothing is rendering.
    Idle,
    /// Processes advance.
    Running,
    /// Every process is frozen.
    Paused,
    /// Torn down. Terminal.
    Destroyed,
}

impl RendererState {
    /// Returns a short label for logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Destroyed => "destroyed",
        }
    }
}

/// Point-in-time view of one process.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessSnapshot {
    /// The process.
    pub process: ProcessId,
    /// The comment it renders.
    pub comment: CommentId,
    /// Run state.
    pub state: ProcessState,
    /// Current top-left corner, once arranged.
    pub position: Option<Point>,
    /// Measured size, once known.
    pub size: Option<Size>,
    /// Slot still held.
    pub slot: Option<SlotInfo>,
    /// Whether a motion is in flight.
    pub moving: bool,
}

/// Generational storage for live processes.
#[derive(Debug, Default)]
struct ProcessTable {
    slots: Vec<Option<CommentProcess>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    len: u32,
}

impl ProcessTable {
    fn insert_with(&mut self, make: impl FnOnce(ProcessId) -> CommentProcess) -> ProcessId {
        let idx = if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.slots.push(None);
            self.generation.push(0);
            idx
        };
        let id = ProcessId {
            idx,
            generation: self.generation[idx as usize],
        };
        self.slots[idx as usize] = Some(make(id));
        id
    }

    fn is_current(&self, id: ProcessId) -> bool {
        id.idx < self.len && self.generation[id.idx as usize] == id.generation
    }

    fn get(&self, id: ProcessId) -> Option<&CommentProcess> {
        if !self.is_current(id) {
            return None;
        }
        self.slots[id.idx as usize].as_ref()
    }

    fn get_mut(&mut self, id: ProcessId) -> Option<&mut CommentProcess> {
        if !self.is_current(id) {
            return None;
        }
        self.slots[id.idx as usize].as_mut()
    }

    fn remove(&mut self, id: ProcessId) -> Option<CommentProcess> {
        if !self.is_current(id) {
            return None;
        }
        let process = self.slots[id.idx as usize].take()?;
        // Bump generation so old handles immediately fail validation.
        self.generation[id.idx as usize] += 1;
        self.free_list.push(id.idx);
        Some(process)
    }

    fn iter(&self) -> impl Iterator<Item = &CommentProcess> + '_ {
        self.slots.iter().flatten()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut CommentProcess> + '_ {
        self.slots.iter_mut().flatten()
    }

    fn ids(&self) -> Vec<ProcessId> {
        self.iter().map(CommentProcess::id).collect()
    }

    fn count(&self) -> usize {
        self.iter().count()
    }
}

/// Lays out comments and drives their processes.
#[derive(Debug)]
pub struct Renderer {
    state: RendererState,
    config: RendererConfig,
    layout: Layout,
    processes: ProcessTable,
    by_comment: BTreeMap<CommentId, ProcessId>,
}

impl Renderer {
    /// Creates an idle renderer for `stage`.
    #[must_use]
    pub fn new(stage: Stage, config: RendererConfig) -> Self {
        Self {
            state: RendererState::Idle,
            config,
            layout: Layout::new(stage, &config),
            processes: ProcessTable::default(),
            by_comment: BTreeMap::new(),
        }
    }

    /// Current run state.
    #[must_use]
    pub fn state(&self) -> RendererState {
        self.state
    }

    /// Configuration the renderer was created with.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> &Stage {
        self.layout.stage()
    }

    /// Planners and motions, for inspection.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn invalid(&self, operation: &'static str) -> Error {
        Error::InvalidState {
            operation,
            state: self.state.as_str(),
        }
    }

    // -- Lifecycle API --

    /// Starts rendering, or resumes every process when paused.
    pub fn run<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        match self.state {
            RendererState::Idle => {}
            RendererState::Paused => {
                for process in self.processes.iter_mut() {
                    if process.state() == ProcessState::Paused {
                        process.resume(host, &mut self.layout)?;
                    }
                }
            }
            _ => return Err(self.invalid("run")),
        }
        self.state = RendererState::Running;
        tracing::debug!("renderer running");
        Ok(())
    }

    /// Pauses every running process.
    pub fn pause<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        if self.state != RendererState::Running {
            return Err(self.invalid("pause"));
        }
        for process in self.processes.iter_mut() {
            if process.state() == ProcessState::Running {
                process.pause(host, &mut self.layout)?;
            }
        }
        self.state = RendererState::Paused;
        tracing::debug!(processes = self.processes.count(), "renderer paused");
        Ok(())
    }

    /// Cancels every process and returns to idle.
    pub fn stop<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        if !matches!(self.state, RendererState::Running | RendererState::Paused) {
            return Err(self.invalid("stop"));
        }
        self.cancel_all(host);
        self.state = RendererState::Idle;
        tracing::debug!("renderer stopped");
        Ok(())
    }

    /// Cancels every process and tears the renderer down for good.
    pub fn destroy<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        if self.state == RendererState::Destroyed {
            return Err(self.invalid("destroy"));
        }
        self.cancel_all(host);
        self.state = RendererState::Destroyed;
        tracing::debug!("renderer destroyed");
        Ok(())
    }

    /// Resizes the stage. Comments already on screen keep their layout.
    pub fn set_stage(&mut self, stage: Stage) -> Result<()> {
        if self.state == RendererState::Destroyed {
            return Err(self.invalid("set stage"));
        }
        tracing::debug!(width = stage.width, height = stage.height, "stage resized");
        self.layout.set_stage(stage);
        Ok(())
    }

    /// Changes scrolling speeds for comments arranged from now on.
    pub fn set_scrolling_speed(
        &mut self,
        basic_speed: f64,
        extra_speed_per_pixel: f64,
    ) -> Result<()> {
        if self.state == RendererState::Destroyed {
            return Err(self.invalid("set scrolling speed"));
        }
        self.config.scrolling_basic_speed = basic_speed;
        self.config.scrolling_extra_speed_per_pixel = extra_speed_per_pixel;
        self.layout
            .set_scrolling_speed(basic_speed, extra_speed_per_pixel);
        Ok(())
    }

    // -- Rendering API --

    /// Starts rendering `comment` and asks the host to measure it.
    ///
    /// The new process starts paused if the renderer is paused. Rendering a
    /// comment that is already on screen returns its existing process.
    pub fn render_comment<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        comment: impl Into<Rc<CommentRecord>>,
    ) -> Result<ProcessId> {
        let paused = match self.state {
            RendererState::Running => false,
            RendererState::Paused => true,
            _ => return Err(self.invalid("render comment")),
        };
        let comment = comment.into();
        if let Some(&existing) = self.by_comment.get(&comment.id()) {
            return Ok(existing);
        }

        let id = self
            .processes
            .insert_with(|id| CommentProcess::new(id, Rc::clone(&comment), paused));
        self.by_comment.insert(comment.id(), id);
        tracing::debug!(process = ?id, comment = ?comment.id(), paused, "rendering comment");
        host.request_measure(id, &comment);
        Ok(id)
    }

    /// Cancels the process rendering `comment`.
    ///
    /// Returns `false` if the comment was not rendering.
    pub fn unrender_comment<H: Host + ?Sized>(&mut self, host: &mut H, comment: CommentId) -> bool {
        let Some(&id) = self.by_comment.get(&comment) else {
            return false;
        };
        if let Some(process) = self.processes.get_mut(id) {
            process.cancel(host, &mut self.layout);
        }
        self.retire(id);
        true
    }

    /// Returns `true` if `comment` has a live process.
    #[must_use]
    pub fn is_comment_rendering(&self, comment: CommentId) -> bool {
        self.by_comment.contains_key(&comment)
    }

    /// Comments with a live process, in process-slot order.
    pub fn rendering_comments(&self) -> impl Iterator<Item = &Rc<CommentRecord>> + '_ {
        self.processes.iter().map(CommentProcess::comment)
    }

    /// Number of live processes.
    #[must_use]
    pub fn rendering_count(&self) -> usize {
        self.by_comment.len()
    }

    /// The live process rendering `comment`.
    #[must_use]
    pub fn process_of(&self, comment: CommentId) -> Option<ProcessId> {
        self.by_comment.get(&comment).copied()
    }

    /// A live process.
    #[must_use]
    pub fn process(&self, process: ProcessId) -> Option<&CommentProcess> {
        self.processes.get(process)
    }

    /// Run state of a live process; `None` once it has ended.
    #[must_use]
    pub fn process_state(&self, process: ProcessId) -> Option<ProcessState> {
        self.processes.get(process).map(CommentProcess::state)
    }

    /// Current top-left corner of a live, arranged process.
    #[must_use]
    pub fn locate(&self, process: ProcessId, now: HostTime) -> Option<Point> {
        self.processes
            .get(process)?
            .locate(&self.layout, now)
            .ok()
    }

    /// Views of every live process as of `now`.
    #[must_use]
    pub fn snapshot(&self, now: HostTime) -> Vec<ProcessSnapshot> {
        self.processes
            .iter()
            .map(|p| ProcessSnapshot {
                process: p.id(),
                comment: p.comment().id(),
                state: p.state(),
                position: p.locate(&self.layout, now).ok(),
                size: p.size(),
                slot: p.held_slot(),
                moving: p.is_moving(),
            })
            .collect()
    }

    /// Takes every event recorded since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Drain<'_, RenderEvent> {
        self.layout.drain_events()
    }

    /// Number of undrained events.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.layout.pending_events()
    }

    // -- Host callbacks --

    /// Delivers the measured size of a process and arranges it.
    ///
    /// Stale handles and repeated measurements are ignored.
    pub fn on_measured<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        process: ProcessId,
        size: Size,
    ) -> Result<()> {
        let Some(p) = self.processes.get_mut(process) else {
            tracing::trace!(?process, "measurement for ended process ignored");
            return Ok(());
        };
        if !p.on_measured(size)? {
            return Ok(());
        }
        let now = host.now();
        p.arrange(&mut self.layout, now)?;
        p.commit(host)
    }

    /// Starts the motions that were arranged since the last tick.
    ///
    /// Does nothing unless running. Returns how many motions started.
    pub fn tick<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<usize> {
        if self.state != RendererState::Running {
            return Ok(0);
        }
        let mut started = 0;
        for process in self.processes.iter_mut() {
            if process.start_motion(host, &mut self.layout)? {
                started += 1;
            }
        }
        Ok(started)
    }

    /// Handles the host reporting that a motion reached its end.
    ///
    /// Returns `true` if this finished a live process.
    pub fn on_motion_finished<H: Host + ?Sized>(&mut self, host: &mut H, process: ProcessId) -> bool {
        let Some(p) = self.processes.get_mut(process) else {
            tracing::trace!(?process, "motion completion for ended process ignored");
            return false;
        };
        if !p.on_motion_finished(host, &mut self.layout) {
            return false;
        }
        self.retire(process);
        true
    }

    /// Handles a host timer firing.
    ///
    /// Returns `true` if the timer belonged to a live countdown.
    pub fn on_timer_fired<H: Host + ?Sized>(&mut self, host: &mut H, timer: TimerId) -> bool {
        let Some(p) = self.processes.get_mut(timer.process) else {
            tracing::trace!(?timer, "timer for ended process ignored");
            return false;
        };
        if !p.on_timer(host, &mut self.layout, timer.kind) {
            return false;
        }
        if p.state().is_terminal() {
            self.retire(timer.process);
        }
        true
    }

    fn cancel_all<H: Host + ?Sized>(&mut self, host: &mut H) {
        for id in self.processes.ids() {
            if let Some(process) = self.processes.get_mut(id) {
                process.cancel(host, &mut self.layout);
            }
            self.retire(id);
        }
    }

    fn retire(&mut self, id: ProcessId) {
        if let Some(process) = self.processes.remove(id) {
            self.by_comment.remove(&process.comment().id());
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::event::RenderEventKind;
    use crate::host::TimerKind;
    use crate::layout::StackingLane;
    use crate::stage::Band;
    use crate::testing::{HostOp, RecordingHost};

    fn running() -> (Renderer, RecordingHost) {
        let mut host = RecordingHost::default();
        let mut renderer = Renderer::new(Stage::default(), RendererConfig::DEFAULT);
        renderer.run(&mut host).unwrap();
        (renderer, host)
    }

    fn stacking(id: u64) -> CommentRecord {
        CommentRecord::stacking(CommentId(id), 0.0, "hold").build()
    }

    fn scrolling(id: u64) -> CommentRecord {
        CommentRecord::scrolling(CommentId(id), 0.0, "scroll").build()
    }

    #[test]
    fn render_requires_running_or_paused() {
        let mut host = RecordingHost::default();
        let mut renderer = Renderer::new(Stage::default(), RendererConfig::DEFAULT);
        assert_eq!(
            renderer.render_comment(&mut host, stacking(1)),
            Err(Error::InvalidState {
                operation: "render comment",
                state: "idle"
            })
        );
        renderer.run(&mut host).unwrap();
        renderer.pause(&mut host).unwrap();
        let id = renderer.render_comment(&mut host, stacking(1)).unwrap();
        assert_eq!(renderer.process_state(id), Some(ProcessState::Paused));
    }

    #[test]
    fn rendering_twice_returns_the_same_process() {
        let (mut renderer, mut host) = running();
        let a = renderer.render_comment(&mut host, stacking(1)).unwrap();
        let b = renderer.render_comment(&mut host, stacking(1)).unwrap();
        assert_eq!(a, b);
        assert_eq!(renderer.rendering_count(), 1);
        assert_eq!(host.take(), vec![HostOp::Measure(a)], "measured once");
    }

    #[test]
    fn stacking_flow() {
        let (mut renderer, mut host) = running();
        let a = renderer.render_comment(&mut host, stacking(1)).unwrap();
        let b = renderer.render_comment(&mut host, stacking(2)).unwrap();
        renderer.on_measured(&mut host, a, Size::new(100.0, 30.0)).unwrap();
        renderer.on_measured(&mut host, b, Size::new(100.0, 30.0)).unwrap();

        let slots: Vec<_> = renderer
            .snapshot(host.now)
            .iter()
            .map(|s| s.slot.unwrap().band)
            .collect();
        assert_eq!(slots, vec![Band::new(0.0, 30.0), Band::new(30.0, 60.0)]);

        host.advance(5000.0);
        let timer = TimerId {
            process: a,
            kind: TimerKind::Lifetime,
        };
        assert!(renderer.on_timer_fired(&mut host, timer), "lifetime ends a");
        assert!(!renderer.is_comment_rendering(CommentId(1)), "a retired");
        assert!(
            !renderer.on_timer_fired(&mut host, timer),
            "repeat timer is stale"
        );
        assert_eq!(renderer.rendering_count(), 1);
        assert_eq!(
            renderer.layout().stacking(StackingLane::Down).occupied(),
            1,
            "a's slot released"
        );
    }

    #[test]
    fn scrolling_motion_starts_on_tick() {
        let (mut renderer, mut host) = running();
        let id = renderer.render_comment(&mut host, scrolling(1)).unwrap();
        renderer.on_measured(&mut host, id, Size::new(100.0, 20.0)).unwrap();
        assert_eq!(renderer.locate(id, host.now), Some(Point::new(800.0, 0.0)));
        assert!(renderer.layout().motions().is_empty(), "not started yet");

        assert_eq!(renderer.tick(&mut host).unwrap(), 1);
        assert_eq!(renderer.tick(&mut host).unwrap(), 0, "starts once");
        assert_eq!(renderer.layout().motions().len(), 1);

        host.advance(10_000.0);
        assert!(renderer.on_motion_finished(&mut host, id), "finishes");
        assert!(renderer.layout().motions().is_empty(), "motion removed");
        assert_eq!(renderer.rendering_count(), 0);

        let kinds: Vec<_> = renderer.drain_events().map(|e| e.kind.name()).collect();
        assert_eq!(
            kinds,
            vec!["arranged", "motion-started", "slot-released", "finished"]
        );
    }

    #[test]
    fn stale_callbacks_are_ignored() {
        let (mut renderer, mut host) = running();
        let old = renderer.render_comment(&mut host, stacking(1)).unwrap();
        assert!(renderer.unrender_comment(&mut host, CommentId(1)), "unrendered");
        assert!(!renderer.unrender_comment(&mut host, CommentId(1)), "only once");

        let new = renderer.render_comment(&mut host, stacking(2)).unwrap();
        assert_eq!(new.index(), old.index(), "slot reused");
        assert_ne!(new.generation(), old.generation(), "generation bumped");

        renderer.on_measured(&mut host, old, Size::new(10.0, 10.0)).unwrap();
        assert!(
            renderer.process(new).unwrap().size().is_none(),
            "stale measurement did not reach the new process"
        );
        assert!(!renderer.on_motion_finished(&mut host, old), "stale");
        assert_eq!(renderer.process_state(old), None);
    }

    #[test]
    fn pause_and_run_cascade_to_processes() {
        let (mut renderer, mut host) = running();
        let id = renderer.render_comment(&mut host, scrolling(1)).unwrap();
        renderer.on_measured(&mut host, id, Size::new(100.0, 20.0)).unwrap();
        renderer.tick(&mut host).unwrap();

        host.advance(1000.0);
        renderer.pause(&mut host).unwrap();
        assert_eq!(renderer.process_state(id), Some(ProcessState::Paused));
        let paused_at = renderer.locate(id, host.now);

        host.advance(3000.0);
        assert_eq!(renderer.tick(&mut host).unwrap(), 0, "paused renderer idles");
        renderer.run(&mut host).unwrap();
        assert_eq!(renderer.process_state(id), Some(ProcessState::Running));
        assert_eq!(renderer.locate(id, host.now), paused_at, "no jump");
        assert_eq!(
            renderer.run(&mut host),
            Err(Error::InvalidState {
                operation: "run",
                state: "running"
            })
        );
    }

    #[test]
    fn stop_cancels_everything() {
        let (mut renderer, mut host) = running();
        for i in 0..3 {
            let id = renderer.render_comment(&mut host, scrolling(i)).unwrap();
            renderer.on_measured(&mut host, id, Size::new(50.0, 20.0)).unwrap();
        }
        renderer.tick(&mut host).unwrap();
        renderer.drain_events().for_each(drop);

        renderer.stop(&mut host).unwrap();
        assert_eq!(renderer.state(), RendererState::Idle);
        assert_eq!(renderer.rendering_count(), 0);
        assert!(renderer.layout().motions().is_empty(), "motions released");
        assert_eq!(
            renderer
                .layout()
                .stacking(StackingLane::ScrollingDown)
                .occupied(),
            0
        );
        let canceled = renderer
            .drain_events()
            .filter(|e| e.kind == RenderEventKind::Canceled)
            .count();
        assert_eq!(canceled, 3);
    }

    #[test]
    fn destroyed_renderer_rejects_everything() {
        let (mut renderer, mut host) = running();
        renderer.destroy(&mut host).unwrap();
        assert!(renderer.run(&mut host).is_err(), "cannot run");
        assert!(renderer.destroy(&mut host).is_err(), "cannot destroy twice");
        assert!(
            renderer.set_stage(Stage::new(10.0, 10.0)).is_err(),
            "cannot resize"
        );
        assert_eq!(
            renderer.set_scrolling_speed(0.5, 0.0),
            Err(Error::InvalidState {
                operation: "set scrolling speed",
                state: "destroyed"
            }),
            "cannot change speed"
        );
        assert_eq!(
            renderer.config().scrolling_basic_speed,
            ScrollingPlanner::DEFAULT_BASIC_SPEED,
            "config untouched"
        );
        assert!(
            renderer.render_comment(&mut host, stacking(1)).is_err(),
            "cannot render"
        );
    }

    #[test]
    fn set_stage_and_speed_apply_to_new_comments() {
        let (mut renderer, mut host) = running();
        renderer.set_stage(Stage::new(400.0, 300.0)).unwrap();
        renderer.set_scrolling_speed(0.25, 0.0).unwrap();
        let id = renderer.render_comment(&mut host, scrolling(1)).unwrap();
        renderer.on_measured(&mut host, id, Size::new(100.0, 20.0)).unwrap();
        let plan = renderer
            .process(id)
            .unwrap()
            .arrangement()
            .unwrap()
            .scrolling
            .unwrap()
            .plan;
        assert_eq!(plan.from_x, 400.0);
        assert_eq!(plan.speed, 0.25);
        assert_eq!(renderer.config().scrolling_basic_speed, 0.25);
    }

    #[test]
    fn column_cap_from_config() {
        let mut host = RecordingHost::default();
        let config = RendererConfig::DEFAULT.with_max_stacking_columns(NonZeroUsize::MIN);
        let mut renderer = Renderer::new(Stage::new(800.0, 60.0), config);
        renderer.run(&mut host).unwrap();
        for i in 0..3 {
            let id = renderer.render_comment(&mut host, stacking(i)).unwrap();
            renderer.on_measured(&mut host, id, Size::new(10.0, 30.0)).unwrap();
        }
        let planner = renderer.layout().stacking(StackingLane::Down);
        assert_eq!(planner.column_count(), 1, "capped at one column");
        assert_eq!(planner.occupied(), 3);
    }

    #[test]
    fn undrained_events_stay_bounded() {
        let mut host = RecordingHost::default();
        let config = RendererConfig::DEFAULT.with_event_capacity(4);
        let mut renderer = Renderer::new(Stage::default(), config);
        renderer.run(&mut host).unwrap();
        for i in 0..10 {
            let id = renderer.render_comment(&mut host, stacking(i)).unwrap();
            renderer.on_measured(&mut host, id, Size::new(10.0, 10.0)).unwrap();
            renderer.unrender_comment(&mut host, CommentId(i));
        }
        assert_eq!(renderer.pending_events(), 4, "capped at capacity");
        assert_eq!(renderer.layout().dropped_events(), 26, "older events evicted");
        let last = renderer.drain_events().last().unwrap();
        assert_eq!(last.comment, CommentId(9), "newest kept");
        assert_eq!(last.kind, RenderEventKind::Canceled);
    }
}
