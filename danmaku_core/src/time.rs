// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host time and durations in milliseconds.
//!
//! [`HostTime`] is a point on the host's monotonic wall clock, as reported by
//! [`Clock::now`](crate::host::Clock::now). [`Duration`] is a span in the same
//! unit. Both are thin `f64` wrappers: motion durations are derived from
//! pixel distances divided by speeds and are rarely whole milliseconds.
//!
//! Arithmetic on these types never produces negative durations through the
//! `saturating_*` helpers; the plain operators are provided for cases where
//! the caller already knows the ordering.

use core::fmt;
use core::ops::{Add, Sub};

/// A point in time on the host's monotonic clock, in milliseconds.
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct HostTime(pub f64);

impl HostTime {
    /// The clock origin.
    pub const ZERO: Self = Self(0.0);

    /// Returns the raw millisecond value.
    #[inline]
    #[must_use]
    pub const fn millis(self) -> f64 {
        self.0
    }

    /// Returns the duration between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration((self.0 - earlier.0).max(0.0))
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Duration) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({}ms)", self.0)
    }
}

/// A span of time in milliseconds.
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Duration(pub f64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0.0);

    /// Creates a duration from a millisecond value.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: f64) -> Self {
        Self(millis)
    }

    /// Returns the raw millisecond value.
    #[inline]
    #[must_use]
    pub const fn millis(self) -> f64 {
        self.0
    }

    /// Saturating subtraction; never goes below zero.
    #[inline]
    #[must_use]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self((self.0 - rhs.0).max(0.0))
    }

    /// Returns the smaller of two durations.
    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// Returns `true` if this duration is zero or negative.
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 <= 0.0
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Duration {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({}ms)", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_arithmetic() {
        let a = Duration(100.0);
        let b = Duration(30.0);
        assert_eq!((a + b).millis(), 130.0);
        assert_eq!((a - b).millis(), 70.0);
        assert_eq!(a.saturating_sub(Duration(200.0)), Duration::ZERO);
        assert_eq!(a.min(b), b);
        assert!(Duration::ZERO.is_zero(), "zero duration");
        assert!(!b.is_zero(), "positive duration");
    }

    #[test]
    fn host_time_duration_ops() {
        let t = HostTime(1000.0);
        let d = Duration(200.0);
        assert_eq!((t + d).millis(), 1200.0);
        assert_eq!((t - d).millis(), 800.0);
        assert_eq!(t - HostTime(250.0), Duration(750.0));
        assert_eq!(
            t.saturating_duration_since(HostTime(1500.0)),
            Duration::ZERO
        );
        assert_eq!(
            t.saturating_duration_since(HostTime(400.0)),
            Duration(600.0)
        );
    }
}
