// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout and motion-collision scheduling for time-addressed comment overlays.
//!
//! `danmaku_core` decides where each comment of a danmaku overlay appears,
//! how it moves, and when it leaves. It owns no drawing surface: the host
//! measures content, moves it, and fires timers, and reports back through
//! callbacks. The crate is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   CommentPool::get_by_time() ──► Renderer::render_comment()
//!                                          │
//!                                          ▼
//!                         host measures ──► Renderer::on_measured()
//!                                          │  arrange: StackingPlanner + ScrollingPlanner
//!                                          │           filtered by CollisionCoordinator
//!                                          ▼
//!                                   commit: place, lifetime timer
//!                                          │
//!                Renderer::tick() ◄────────┘
//!                    │ start pending motions, inbound timers
//!                    ▼
//!   on_timer_fired() / on_motion_finished() ──► slot released, process ends
//! ```
//!
//! **[`comment`]**: Comment records built from optional traits (text,
//! position, alignment, stacking, scrolling, lifetime).
//!
//! **[`pool`]**: Time-sorted comment storage with range queries and
//! composable filters.
//!
//! **[`stacking`]**: Vertical slot allocation in columns of non-overlapping
//! bands, with cancel and reuse.
//!
//! **[`scrolling`]**: Horizontal motion plans whose speed grows with
//! content width.
//!
//! **[`collision`]**: Catch-up prediction between a candidate motion and the
//! motions already in flight.
//!
//! **[`timer`]**: Pausable countdowns measured against host time.
//!
//! **[`lifecycle`]**: The per-comment process: measure, arrange, commit,
//! move, end.
//!
//! **[`renderer`]**: Run state, process table, and host callback routing.
//!
//! **[`host`]**: The traits a host implements to measure, animate, and time
//! comments.
//!
//! **[`event`]**: Transitions recorded for diagnostics.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod collision;
pub mod comment;
pub mod error;
pub mod event;
pub mod host;
pub mod id;
pub mod layout;
pub mod lifecycle;
pub mod pool;
pub mod renderer;
pub mod scrolling;
pub mod stacking;
pub mod stage;
pub mod time;
pub mod timer;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use kurbo::{Point, Size};
