// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtual-time driver for a renderer and a [`VirtualHost`].
//!
//! [`Simulation::advance`] moves the clock in jumps from one due callback to
//! the next, so every timer and motion completion is delivered at its exact
//! deadline regardless of step size. After each delivery the simulation
//! settles: pending measurements are answered and the renderer is ticked so
//! freshly arranged motions start at the same instant.

use std::rc::Rc;

use danmaku_core::comment::CommentRecord;
use danmaku_core::host::Clock;
use danmaku_core::id::ProcessId;
use danmaku_core::renderer::{Renderer, RendererConfig};
use danmaku_core::stage::Stage;
use danmaku_core::time::HostTime;
use danmaku_core::{Point, Result};

use crate::host::{Due, VirtualHost};

/// A renderer and its host, stepped together.
#[derive(Debug)]
pub struct Simulation {
    /// The engine under test.
    pub renderer: Renderer,
    /// The host it talks to.
    pub host: VirtualHost,
}

impl Simulation {
    /// Creates a running renderer on `stage` with a fresh host.
    pub fn new(stage: Stage, config: RendererConfig) -> Result<Self> {
        Self::with_host(stage, config, VirtualHost::new())
    }

    /// Creates a running renderer on `stage` talking to `host`.
    pub fn with_host(stage: Stage, config: RendererConfig, mut host: VirtualHost) -> Result<Self> {
        let mut renderer = Renderer::new(stage, config);
        renderer.run(&mut host)?;
        Ok(Self { renderer, host })
    }

    /// Current host time.
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.host.now()
    }

    /// Renders `comment` and settles, so it is arranged and moving on return.
    pub fn render(&mut self, comment: impl Into<Rc<CommentRecord>>) -> Result<ProcessId> {
        let process = self.renderer.render_comment(&mut self.host, comment)?;
        self.settle()?;
        Ok(process)
    }

    /// Answers pending measurements and starts pending motions.
    ///
    /// Returns how many motions started.
    pub fn settle(&mut self) -> Result<usize> {
        for (process, size) in self.host.take_measurements() {
            self.renderer.on_measured(&mut self.host, process, size)?;
        }
        self.renderer.tick(&mut self.host)
    }

    /// Moves the clock forward by `millis`, delivering every callback that
    /// falls due on the way.
    ///
    /// Returns how many callbacks were delivered.
    pub fn advance(&mut self, millis: f64) -> Result<usize> {
        let target = HostTime(self.now().millis() + millis.max(0.0));
        self.advance_to(target)
    }

    /// Moves the clock forward to `target`.
    pub fn advance_to(&mut self, target: HostTime) -> Result<usize> {
        let mut delivered = 0;
        self.settle()?;
        while let Some((at, due)) = self.host.next_due(target) {
            self.host.set_now(at);
            self.host.consume(due);
            self.deliver(due);
            delivered += 1;
            self.settle()?;
        }
        self.host.set_now(target);
        self.settle()?;
        tracing::trace!(now = target.millis(), delivered, "simulation advanced");
        Ok(delivered)
    }

    fn deliver(&mut self, due: Due) {
        match due {
            Due::Timer(timer) => {
                self.renderer.on_timer_fired(&mut self.host, timer);
            }
            Due::MotionFinished(process) => {
                self.renderer.on_motion_finished(&mut self.host, process);
            }
        }
    }

    /// Where the host draws `process` now.
    #[must_use]
    pub fn position(&self, process: ProcessId) -> Option<Point> {
        self.host.position(process)
    }
}
