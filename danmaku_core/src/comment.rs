// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Comment records and their capability traits.
//!
//! A [`CommentRecord`] is an immutable value: one comment instance with an
//! identity, a media time, and a set of independent, optional traits. The
//! familiar comment kinds are just trait bundles:
//!
//! | Kind        | Traits                                              |
//! |-------------|-----------------------------------------------------|
//! | Stacking    | text, horizontal alignment, stacking, lifetime      |
//! | Scrolling   | text, stacking, scrolling                           |
//! | Positioning | text, position X, position Y, lifetime              |
//!
//! Arrangement never looks at a kind tag. It checks for each trait on its
//! own, so a record carrying, say, position X plus scrolling composes without
//! any new type. [`CommentRecord::kind`] exists for diagnostics only.

use alloc::string::String;
use core::fmt;

use crate::stage::{HorizontalDirection, VerticalDirection};
use crate::time::Duration;

/// Stable identity of a comment; the tiebreaker when two comments share a
/// media time.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CommentId(pub u64);

impl fmt::Debug for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommentId({})", self.0)
    }
}

/// Text content and its visual traits.
#[derive(Clone, Debug, PartialEq)]
pub struct TextTrait {
    /// The comment body.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// CSS-style colour string.
    pub font_color: String,
}

impl TextTrait {
    /// Creates a text trait with the default font size and colour.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: 20.0,
            font_color: String::from("#000"),
        }
    }
}

/// Horizontal placement of a stationary comment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlignment {
    /// Flush with the left edge.
    Left,
    /// Centered on the stage.
    #[default]
    Center,
    /// Flush with the right edge.
    Right,
}

/// Vertical placement used when no slot is allocated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlignment {
    /// Flush with the top of the body.
    Top,
    /// Centered on the stage.
    #[default]
    Middle,
    /// Flush with the bottom of the body.
    Bottom,
}

/// The trait bundle a record matches, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// Held at a fixed horizontal position in a stacked slot.
    Stacking,
    /// Moving across the stage in a stacked slot.
    Scrolling,
    /// Held at an absolute position.
    Positioning,
    /// Some other combination of traits.
    Custom,
}

/// One comment instance. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct CommentRecord {
    id: CommentId,
    time: f64,
    opacity: f64,
    is_own: bool,
    text: Option<TextTrait>,
    position_x: Option<f64>,
    position_y: Option<f64>,
    horizontal_alignment: Option<HorizontalAlignment>,
    vertical_alignment: Option<VerticalAlignment>,
    stacking: Option<VerticalDirection>,
    scrolling: Option<HorizontalDirection>,
    lifetime: Option<Duration>,
}

impl CommentRecord {
    /// Starts a record with no traits.
    #[must_use]
    pub fn builder(id: CommentId, time: f64) -> CommentBuilder {
        CommentBuilder::new(id, time)
    }

    /// Starts a stacking comment: centered, stacking down, 5 s lifetime.
    #[must_use]
    pub fn stacking(id: CommentId, time: f64, text: impl Into<String>) -> CommentBuilder {
        CommentBuilder::new(id, time)
            .text(TextTrait::new(text))
            .horizontal_alignment(HorizontalAlignment::default())
            .stacking(VerticalDirection::default())
            .lifetime(Duration(5000.0))
    }

    /// Starts a scrolling comment: stacking down, scrolling left.
    #[must_use]
    pub fn scrolling(id: CommentId, time: f64, text: impl Into<String>) -> CommentBuilder {
        CommentBuilder::new(id, time)
            .text(TextTrait::new(text))
            .stacking(VerticalDirection::default())
            .scrolling(HorizontalDirection::default())
    }

    /// Starts a positioning comment at `(x, y)` with a 5 s lifetime.
    #[must_use]
    pub fn positioning(
        id: CommentId,
        time: f64,
        text: impl Into<String>,
        x: f64,
        y: f64,
    ) -> CommentBuilder {
        CommentBuilder::new(id, time)
            .text(TextTrait::new(text))
            .position(x, y)
            .lifetime(Duration(5000.0))
    }

    /// Identity of this record.
    #[must_use]
    pub fn id(&self) -> CommentId {
        self.id
    }

    /// Media time in milliseconds.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Opacity in `0.0..=1.0`.
    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Whether the comment was posted by the local viewer.
    #[must_use]
    pub fn is_own(&self) -> bool {
        self.is_own
    }

    /// Text trait, if present.
    #[must_use]
    pub fn text(&self) -> Option<&TextTrait> {
        self.text.as_ref()
    }

    /// Absolute X position, if present.
    #[must_use]
    pub fn position_x(&self) -> Option<f64> {
        self.position_x
    }

    /// Absolute Y position, if present.
    #[must_use]
    pub fn position_y(&self) -> Option<f64> {
        self.position_y
    }

    /// Horizontal alignment, if present.
    #[must_use]
    pub fn horizontal_alignment(&self) -> Option<HorizontalAlignment> {
        self.horizontal_alignment
    }

    /// Vertical alignment, if present.
    #[must_use]
    pub fn vertical_alignment(&self) -> Option<VerticalAlignment> {
        self.vertical_alignment
    }

    /// Stacking direction, if the comment takes a vertical slot.
    #[must_use]
    pub fn stacking_direction(&self) -> Option<VerticalDirection> {
        self.stacking
    }

    /// Scrolling direction, if the comment moves.
    #[must_use]
    pub fn scrolling_direction(&self) -> Option<HorizontalDirection> {
        self.scrolling
    }

    /// How long a stationary comment stays on screen.
    #[must_use]
    pub fn lifetime(&self) -> Option<Duration> {
        self.lifetime
    }

    /// Classifies the trait combination.
    #[must_use]
    pub fn kind(&self) -> CommentKind {
        let text = self.text.is_some();
        if text && self.stacking.is_some() && self.scrolling.is_some() {
            CommentKind::Scrolling
        } else if text
            && self.horizontal_alignment.is_some()
            && self.stacking.is_some()
            && self.lifetime.is_some()
        {
            CommentKind::Stacking
        } else if text
            && self.position_x.is_some()
            && self.position_y.is_some()
            && self.lifetime.is_some()
        {
            CommentKind::Positioning
        } else {
            CommentKind::Custom
        }
    }
}

/// Builder for [`CommentRecord`].
#[derive(Clone, Debug)]
pub struct CommentBuilder {
    record: CommentRecord,
}

impl CommentBuilder {
    /// Starts a record with no traits, full opacity, not own.
    #[must_use]
    pub fn new(id: CommentId, time: f64) -> Self {
        Self {
            record: CommentRecord {
                id,
                time,
                opacity: 1.0,
                is_own: false,
                text: None,
                position_x: None,
                position_y: None,
                horizontal_alignment: None,
                vertical_alignment: None,
                stacking: None,
                scrolling: None,
                lifetime: None,
            },
        }
    }

    /// Sets the opacity.
    #[must_use]
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.record.opacity = opacity;
        self
    }

    /// Marks the comment as posted by the local viewer.
    #[must_use]
    pub fn own(mut self, is_own: bool) -> Self {
        self.record.is_own = is_own;
        self
    }

    /// Adds the text trait.
    #[must_use]
    pub fn text(mut self, text: TextTrait) -> Self {
        self.record.text = Some(text);
        self
    }

    /// Sets the font size of the text trait, adding one if absent.
    #[must_use]
    pub fn font_size(mut self, font_size: f64) -> Self {
        self.record
            .text
            .get_or_insert_with(|| TextTrait::new(String::new()))
            .font_size = font_size;
        self
    }

    /// Adds both position traits.
    #[must_use]
    pub fn position(mut self, x: f64, y: f64) -> Self {
        self.record.position_x = Some(x);
        self.record.position_y = Some(y);
        self
    }

    /// Adds the position X trait.
    #[must_use]
    pub fn position_x(mut self, x: f64) -> Self {
        self.record.position_x = Some(x);
        self
    }

    /// Adds the position Y trait.
    #[must_use]
    pub fn position_y(mut self, y: f64) -> Self {
        self.record.position_y = Some(y);
        self
    }

    /// Adds the horizontal alignment trait.
    #[must_use]
    pub fn horizontal_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.record.horizontal_alignment = Some(alignment);
        self
    }

    /// Adds the vertical alignment trait.
    #[must_use]
    pub fn vertical_alignment(mut self, alignment: VerticalAlignment) -> Self {
        self.record.vertical_alignment = Some(alignment);
        self
    }

    /// Adds the stacking trait.
    #[must_use]
    pub fn stacking(mut self, direction: VerticalDirection) -> Self {
        self.record.stacking = Some(direction);
        self
    }

    /// Adds the scrolling trait.
    #[must_use]
    pub fn scrolling(mut self, direction: HorizontalDirection) -> Self {
        self.record.scrolling = Some(direction);
        self
    }

    /// Adds the lifetime trait.
    #[must_use]
    pub fn lifetime(mut self, lifetime: Duration) -> Self {
        self.record.lifetime = Some(lifetime);
        self
    }

    /// Finishes the record.
    #[must_use]
    pub fn build(self) -> CommentRecord {
        self.record
    }
}
