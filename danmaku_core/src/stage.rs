// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage geometry and the direction enums shared by both planners.

/// The rectangular surface comments are laid out on.
///
/// The *body* used for stacking is the vertical span between the top and
/// bottom margins: `[margin_top, height - margin_bottom)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stage {
    /// Surface width in pixels.
    pub width: f64,
    /// Surface height in pixels.
    pub height: f64,
    /// Space reserved at the top of the surface.
    pub margin_top: f64,
    /// Space reserved at the bottom of the surface.
    pub margin_bottom: f64,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Stage {
    /// Creates a stage with zero margins.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin_top: 0.0,
            margin_bottom: 0.0,
        }
    }

    /// Returns a copy with the given top and bottom margins.
    #[must_use]
    pub const fn with_margins(mut self, margin_top: f64, margin_bottom: f64) -> Self {
        self.margin_top = margin_top;
        self.margin_bottom = margin_bottom;
        self
    }

    /// Top edge of the stacking body.
    #[inline]
    #[must_use]
    pub fn body_top(&self) -> f64 {
        self.margin_top
    }

    /// Bottom edge of the stacking body.
    #[inline]
    #[must_use]
    pub fn body_bottom(&self) -> f64 {
        self.height - self.margin_bottom
    }

    /// Height of the stacking body.
    #[inline]
    #[must_use]
    pub fn body_height(&self) -> f64 {
        self.height - self.margin_top - self.margin_bottom
    }
}

/// A half-open vertical interval `[top_y, bottom_y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    /// Inclusive top edge.
    pub top_y: f64,
    /// Exclusive bottom edge.
    pub bottom_y: f64,
}

impl Band {
    /// Creates a band from its edges.
    #[inline]
    #[must_use]
    pub const fn new(top_y: f64, bottom_y: f64) -> Self {
        Self { top_y, bottom_y }
    }

    /// Height of the band.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom_y - self.top_y
    }

    /// Returns `true` if the two bands share any vertical space.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.top_y < other.bottom_y && other.top_y < self.bottom_y
    }
}

/// Which edge of the body a stacking planner fills from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VerticalDirection {
    /// Fill from the bottom edge upwards.
    Up,
    /// Fill from the top edge downwards.
    #[default]
    Down,
}

impl VerticalDirection {
    /// Returns a short label for logs and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Which way a scrolling comment travels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HorizontalDirection {
    /// Enter at the right edge and leave through the left edge.
    #[default]
    Left,
    /// Enter at the left edge and leave through the right edge.
    Right,
}

impl HorizontalDirection {
    /// Returns a short label for logs and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}
