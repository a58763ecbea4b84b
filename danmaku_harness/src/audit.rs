// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlap detection between moving comments.
//!
//! [`CollisionAudit`] samples a renderer's snapshot and records every pair
//! of moving comments whose boxes intersect with positive area.

use danmaku_core::comment::CommentId;
use danmaku_core::renderer::{ProcessSnapshot, Renderer};
use danmaku_core::time::HostTime;

/// Two moving comments seen overlapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overlap {
    /// When the overlap was sampled.
    pub at: HostTime,
    /// The comment with the lower process id.
    pub first: CommentId,
    /// The other comment.
    pub second: CommentId,
}

/// Accumulates overlaps over many samples.
#[derive(Clone, Debug, Default)]
pub struct CollisionAudit {
    samples: usize,
    overlaps: Vec<Overlap>,
}

fn bounds(snapshot: &ProcessSnapshot) -> Option<(f64, f64, f64, f64)> {
    let position = snapshot.position?;
    let size = snapshot.size?;
    Some((
        position.x,
        position.y,
        position.x + size.width,
        position.y + size.height,
    ))
}

impl CollisionAudit {
    /// Creates an empty audit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks every pair of moving comments as of `now`.
    ///
    /// Returns how many overlapping pairs this sample found.
    pub fn sample(&mut self, renderer: &Renderer, now: HostTime) -> usize {
        self.samples += 1;
        let moving: Vec<_> = renderer
            .snapshot(now)
            .into_iter()
            .filter(|s| s.moving)
            .filter_map(|s| Some((s.comment, bounds(&s)?)))
            .collect();

        let before = self.overlaps.len();
        for (i, (a, (ax0, ay0, ax1, ay1))) in moving.iter().enumerate() {
            for (b, (bx0, by0, bx1, by1)) in &moving[i + 1..] {
                if ax0 < bx1 && bx0 < ax1 && ay0 < by1 && by0 < ay1 {
                    tracing::warn!(?a, ?b, at = now.millis(), "moving comments overlap");
                    self.overlaps.push(Overlap {
                        at: now,
                        first: *a,
                        second: *b,
                    });
                }
            }
        }
        self.overlaps.len() - before
    }

    /// Number of samples taken.
    #[must_use]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Every overlap seen, in sampling order.
    #[must_use]
    pub fn overlaps(&self) -> &[Overlap] {
        &self.overlaps
    }

    /// Returns `true` if no overlap was seen.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.overlaps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use danmaku_core::comment::{CommentRecord, TextTrait};
    use danmaku_core::renderer::RendererConfig;
    use danmaku_core::stage::{HorizontalDirection, Stage};

    use super::*;
    use crate::sim::Simulation;

    #[test]
    fn flags_crossing_comments() {
        let mut sim = Simulation::new(Stage::default(), RendererConfig::DEFAULT).unwrap();
        // Without a stacking trait both run along the top edge.
        for (id, direction) in [(1, HorizontalDirection::Left), (2, HorizontalDirection::Right)] {
            sim.render(
                CommentRecord::builder(CommentId(id), 0.0)
                    .text(TextTrait::new("crossing"))
                    .scrolling(direction)
                    .build(),
            )
            .unwrap();
        }
        let mut audit = CollisionAudit::new();
        assert_eq!(audit.sample(&sim.renderer, sim.now()), 0, "still apart");
        sim.advance(3500.0).unwrap();
        assert_eq!(audit.sample(&sim.renderer, sim.now()), 1, "meeting mid-stage");
        assert!(!audit.is_clean(), "overlap recorded");
        assert_eq!(audit.samples(), 2);
    }
}
