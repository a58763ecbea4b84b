// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine error type.
//!
//! Every error the engine reports is a contract violation by the caller or
//! the host: an operation requested in a state that forbids it, or a stage
//! of the comment lifecycle invoked before the stage it depends on. None of
//! them are retried; they propagate synchronously to the offending caller.

/// Errors reported by the engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The operation is not allowed in the current state, e.g. pausing a
    /// process that is already paused or running a destroyed renderer.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        /// The rejected operation.
        operation: &'static str,
        /// The state the target was in.
        state: &'static str,
    },
    /// A lifecycle stage ran before the stage it depends on: arrangement
    /// before measurement, or commit before arrangement.
    #[error("cannot {operation} before dimensions are known")]
    MissingDimensions {
        /// The rejected operation.
        operation: &'static str,
    },
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
