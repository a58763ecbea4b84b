// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic virtual-time host, player, and collision audit for
//! `danmaku_core`.
//!
//! - [`host::VirtualHost`]: implements every host trait against a manual
//!   clock, with fixed [`host::TextMetrics`].
//! - [`sim::Simulation`]: pairs a renderer with a virtual host and delivers
//!   timers and motion completions at their exact deadlines.
//! - [`player::Player`]: feeds a renderer from a comment pool as media time
//!   advances, clearing the screen on seeks.
//! - [`audit::CollisionAudit`]: flags moving comments that overlap.
//! - [`logging::install_logging`]: `tracing` output for tests and demos.

pub mod audit;
pub mod host;
pub mod logging;
pub mod player;
pub mod sim;

pub use logging::install_logging;
