// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference orchestrator feeding a renderer from a comment pool.
//!
//! A [`Player`] follows a media clock. Each [`update`](Player::update)
//! renders the pool's comments whose time falls between the previous media
//! time and the new one, up to a cap on simultaneous comments. Moving
//! backwards, or forward by more than the seek threshold, is treated as a
//! seek: everything on screen is unrendered and the window restarts from the
//! new time.
//!
//! Every update drains the renderer's and the pool's event queues, handing
//! the events to an [`EventSink`] or dropping them.

use danmaku_core::error::{Error, Result};
use danmaku_core::host::Host;
use danmaku_core::pool::CommentPool;
use danmaku_core::renderer::{Renderer, RendererState};
use danmaku_core::stage::Stage;
use danmaku_debug::{EventSink, NoopSink};

/// Configuration for a [`Player`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerConfig {
    /// Upper bound on comments rendering at once.
    pub max_rendering_comments: usize,
    /// Forward jump in media time, in ms, beyond which an update counts as a
    /// seek.
    pub seek_threshold: f64,
}

impl PlayerConfig {
    /// 80 comments, 1 s seek threshold.
    pub const DEFAULT: Self = Self {
        max_rendering_comments: 80,
        seek_threshold: 1000.0,
    };
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Playback state of a [`Player`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerState {
    /// Not started, or stopped.
    Idle,
    /// Following the media clock.
    Playing,
    /// Frozen with comments on screen.
    Paused,
}

impl PlayerState {
    /// Returns a short label for logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

/// Drives a [`Renderer`] from a [`CommentPool`] and a media clock.
#[derive(Debug)]
pub struct Player {
    config: PlayerConfig,
    state: PlayerState,
    pool: CommentPool,
    media_time: Option<f64>,
}

impl Player {
    /// Creates an idle player over `pool`.
    #[must_use]
    pub fn new(pool: CommentPool, config: PlayerConfig) -> Self {
        Self {
            config,
            state: PlayerState::Idle,
            pool,
            media_time: None,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Current playback state.
    #[must_use]
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// The comment source.
    #[must_use]
    pub fn pool(&self) -> &CommentPool {
        &self.pool
    }

    /// The comment source, for loading and filtering.
    pub fn pool_mut(&mut self) -> &mut CommentPool {
        &mut self.pool
    }

    /// Media time of the last update.
    #[must_use]
    pub fn media_time(&self) -> Option<f64> {
        self.media_time
    }

    fn invalid(&self, operation: &'static str) -> Error {
        Error::InvalidState {
            operation,
            state: self.state.as_str(),
        }
    }

    /// Starts or resumes playback.
    pub fn play<H: Host + ?Sized>(&mut self, renderer: &mut Renderer, host: &mut H) -> Result<()> {
        if self.state == PlayerState::Playing {
            return Err(self.invalid("play"));
        }
        if matches!(renderer.state(), RendererState::Idle | RendererState::Paused) {
            renderer.run(host)?;
        }
        self.state = PlayerState::Playing;
        tracing::debug!(media_time = self.media_time, "player playing");
        Ok(())
    }

    /// Freezes playback and every comment on screen.
    pub fn pause<H: Host + ?Sized>(&mut self, renderer: &mut Renderer, host: &mut H) -> Result<()> {
        if self.state != PlayerState::Playing {
            return Err(self.invalid("pause"));
        }
        if renderer.state() == RendererState::Running {
            renderer.pause(host)?;
        }
        self.state = PlayerState::Paused;
        tracing::debug!(media_time = self.media_time, "player paused");
        Ok(())
    }

    /// Stops playback, clearing the screen and forgetting the media time.
    pub fn stop<H: Host + ?Sized>(&mut self, renderer: &mut Renderer, host: &mut H) -> Result<()> {
        if self.state == PlayerState::Idle {
            return Err(self.invalid("stop"));
        }
        if matches!(renderer.state(), RendererState::Running | RendererState::Paused) {
            renderer.stop(host)?;
        }
        self.state = PlayerState::Idle;
        self.media_time = None;
        tracing::debug!("player stopped");
        Ok(())
    }

    /// Resizes the renderer's stage.
    pub fn resize(&mut self, renderer: &mut Renderer, stage: Stage) -> Result<()> {
        renderer.set_stage(stage)
    }

    /// Follows the media clock to `media_time`, discarding engine events.
    ///
    /// Does nothing unless playing. The first update after play, stop, or a
    /// seek only records the time. Returns how many comments started
    /// rendering.
    pub fn update<H: Host + ?Sized>(
        &mut self,
        renderer: &mut Renderer,
        host: &mut H,
        media_time: f64,
    ) -> Result<usize> {
        self.update_with_sink(renderer, host, media_time, &mut NoopSink)
    }

    /// Like [`update`](Self::update), feeding every queued renderer and pool
    /// event to `sink`.
    pub fn update_with_sink<H, S>(
        &mut self,
        renderer: &mut Renderer,
        host: &mut H,
        media_time: f64,
        sink: &mut S,
    ) -> Result<usize>
    where
        H: Host + ?Sized,
        S: EventSink + ?Sized,
    {
        let rendered = self.follow(renderer, host, media_time);
        for event in self.pool.drain_events() {
            sink.on_pool_event(&event);
        }
        for event in renderer.drain_events() {
            sink.on_render_event(&event);
        }
        rendered
    }

    fn follow<H: Host + ?Sized>(
        &mut self,
        renderer: &mut Renderer,
        host: &mut H,
        media_time: f64,
    ) -> Result<usize> {
        if self.state != PlayerState::Playing {
            return Ok(0);
        }
        let Some(previous) = self.media_time.replace(media_time) else {
            return Ok(0);
        };

        if media_time < previous || media_time - previous > self.config.seek_threshold {
            let on_screen: Vec<_> = renderer.rendering_comments().map(|c| c.id()).collect();
            for comment in &on_screen {
                renderer.unrender_comment(host, *comment);
            }
            tracing::debug!(
                from = previous,
                to = media_time,
                cleared = on_screen.len(),
                "seek detected"
            );
            return Ok(0);
        }

        let room = self
            .config
            .max_rendering_comments
            .saturating_sub(renderer.rendering_count());
        let mut rendered = 0;
        for comment in self.pool.get_by_time(previous, media_time, room) {
            if !renderer.is_comment_rendering(comment.id()) {
                renderer.render_comment(host, comment)?;
                rendered += 1;
            }
        }
        if rendered > 0 {
            tracing::trace!(from = previous, to = media_time, rendered, "comments rendered");
        }
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use danmaku_core::comment::{CommentId, CommentRecord};
    use danmaku_core::pool::PoolEvent;
    use danmaku_core::renderer::RendererConfig;
    use danmaku_debug::recorder::EventRecorder;

    use super::*;
    use crate::host::VirtualHost;

    fn setup(times: &[f64], config: PlayerConfig) -> (Player, Renderer, VirtualHost) {
        let mut pool = CommentPool::new();
        pool.load(times.iter().enumerate().map(|(i, t)| {
            CommentRecord::stacking(CommentId(i as u64), *t, "c").build()
        }));
        (
            Player::new(pool, config),
            Renderer::new(Stage::default(), RendererConfig::DEFAULT),
            VirtualHost::new(),
        )
    }

    #[test]
    fn renders_window_between_updates() {
        let (mut player, mut renderer, mut host) = setup(&[0.0, 10.0, 20.0, 40.0], PlayerConfig::DEFAULT);
        player.play(&mut renderer, &mut host).unwrap();
        assert_eq!(player.update(&mut renderer, &mut host, 0.0).unwrap(), 0, "baseline");
        assert_eq!(player.update(&mut renderer, &mut host, 20.0).unwrap(), 2, "0 and 10");
        assert_eq!(player.update(&mut renderer, &mut host, 41.0).unwrap(), 2, "20 and 40");
        assert_eq!(renderer.rendering_count(), 4);
    }

    #[test]
    fn cap_limits_rendering() {
        let config = PlayerConfig {
            max_rendering_comments: 2,
            ..PlayerConfig::DEFAULT
        };
        let (mut player, mut renderer, mut host) = setup(&[1.0, 2.0, 3.0], config);
        player.play(&mut renderer, &mut host).unwrap();
        player.update(&mut renderer, &mut host, 0.0).unwrap();
        assert_eq!(player.update(&mut renderer, &mut host, 10.0).unwrap(), 2, "capped");
        assert_eq!(player.update(&mut renderer, &mut host, 20.0).unwrap(), 0, "still full");
    }

    #[test]
    fn seeks_clear_the_screen() {
        let (mut player, mut renderer, mut host) = setup(&[5.0, 3000.0], PlayerConfig::DEFAULT);
        player.play(&mut renderer, &mut host).unwrap();
        player.update(&mut renderer, &mut host, 0.0).unwrap();
        player.update(&mut renderer, &mut host, 10.0).unwrap();
        assert_eq!(renderer.rendering_count(), 1);

        assert_eq!(player.update(&mut renderer, &mut host, 2500.0).unwrap(), 0, "jump");
        assert_eq!(renderer.rendering_count(), 0, "cleared by forward seek");
        assert_eq!(player.update(&mut renderer, &mut host, 3100.0).unwrap(), 1, "window resumes");

        player.update(&mut renderer, &mut host, 100.0).unwrap();
        assert_eq!(renderer.rendering_count(), 0, "cleared by backward seek");
    }

    #[test]
    fn transitions() {
        let (mut player, mut renderer, mut host) = setup(&[5.0], PlayerConfig::DEFAULT);
        assert!(player.pause(&mut renderer, &mut host).is_err(), "idle cannot pause");
        player.play(&mut renderer, &mut host).unwrap();
        assert!(player.play(&mut renderer, &mut host).is_err(), "already playing");

        player.update(&mut renderer, &mut host, 0.0).unwrap();
        player.pause(&mut renderer, &mut host).unwrap();
        assert_eq!(renderer.state(), RendererState::Paused);
        assert_eq!(player.update(&mut renderer, &mut host, 10.0).unwrap(), 0, "paused");

        player.play(&mut renderer, &mut host).unwrap();
        assert_eq!(renderer.state(), RendererState::Running);
        player.stop(&mut renderer, &mut host).unwrap();
        assert_eq!(renderer.state(), RendererState::Idle);
        assert_eq!(player.media_time(), None, "forgotten");

        player
            .resize(&mut renderer, Stage::new(1280.0, 720.0))
            .unwrap();
        assert_eq!(renderer.stage().width, 1280.0);
    }

    #[test]
    fn updates_drain_engine_events() {
        let (mut player, mut renderer, mut host) = setup(&[1.0, 2.0], PlayerConfig::DEFAULT);
        let mut recorder = EventRecorder::new();
        player.play(&mut renderer, &mut host).unwrap();
        player
            .update_with_sink(&mut renderer, &mut host, 0.0, &mut recorder)
            .unwrap();
        assert_eq!(
            recorder.pool_events(),
            &[PoolEvent::Loaded { count: 2 }],
            "pool events forwarded"
        );
        assert_eq!(player.pool().pending_events(), 0, "pool queue drained");

        player.update(&mut renderer, &mut host, 10.0).unwrap();
        for (process, size) in host.take_measurements() {
            renderer.on_measured(&mut host, process, size).unwrap();
        }
        assert_eq!(renderer.pending_events(), 2, "two arrangements queued");
        player.stop(&mut renderer, &mut host).unwrap();
        player.play(&mut renderer, &mut host).unwrap();
        player.update(&mut renderer, &mut host, 0.0).unwrap();
        assert_eq!(renderer.pending_events(), 0, "discarded by a plain update");
    }
}
