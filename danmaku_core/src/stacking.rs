// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exclusive vertical slot allocation with overflow columns.
//!
//! A [`StackingPlanner`] hands out non-overlapping vertical bands inside the
//! stage body. Bands are packed first-fit from the stacking origin: the top
//! edge for [`VerticalDirection::Down`], the bottom edge for
//! [`VerticalDirection::Up`]. When no gap in a column is tall enough, the
//! search moves to the next column; when every column is full, a new one is
//! opened. Columns are parallel tracks: two slots in different columns may
//! share vertical space.
//!
//! Only column 0 consults the caller's filter. The filter sees candidate
//! bands stepped in block-height increments from the origin side of each gap,
//! so a scrolling comment can skip a band where it would catch up with a
//! comment already in flight and still land in the primary column.
//!
//! Every slot is identified by a [`SlotId`] issued at allocation. Release is
//! by identity, so a stale or repeated release never frees another slot.

use alloc::vec::Vec;
use core::num::NonZeroUsize;

use crate::id::SlotId;
use crate::stage::{Band, Stage, VerticalDirection};

/// One allocation returned by [`StackingPlanner::plan`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackingPlan {
    /// The reserved band.
    pub band: Band,
    /// Column the band lives in; `0` is the primary column.
    pub column: usize,
    /// Token used to release the band.
    pub slot: SlotId,
    canceled: bool,
}

impl StackingPlan {
    /// Top edge of the reserved band.
    #[inline]
    #[must_use]
    pub fn top_y(&self) -> f64 {
        self.band.top_y
    }

    /// Bottom edge of the reserved band.
    #[inline]
    #[must_use]
    pub fn bottom_y(&self) -> f64 {
        self.band.bottom_y
    }

    /// Returns `true` once [`StackingPlanner::cancel`] released this plan.
    #[inline]
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.canceled
    }
}

#[derive(Clone, Copy, Debug)]
struct Row {
    slot: SlotId,
    band: Band,
}

/// Allocates exclusive vertical bands in one stacking direction.
#[derive(Clone, Debug)]
pub struct StackingPlanner {
    direction: VerticalDirection,
    height: f64,
    margin_top: f64,
    margin_bottom: f64,
    max_columns: Option<NonZeroUsize>,
    /// Rows of each column, sorted by `top_y`.
    columns: Vec<Vec<Row>>,
    next_slot: u64,
}

impl StackingPlanner {
    /// Creates an empty planner for `stage` with unbounded columns.
    #[must_use]
    pub fn new(direction: VerticalDirection, stage: &Stage) -> Self {
        Self {
            direction,
            height: stage.height,
            margin_top: stage.margin_top,
            margin_bottom: stage.margin_bottom,
            max_columns: None,
            columns: Vec::new(),
            next_slot: 0,
        }
    }

    /// Caps the number of columns.
    ///
    /// Once every column up to the cap is full, further blocks are placed in
    /// the last column at the stacking origin, overlapping what is there.
    #[must_use]
    pub fn with_max_columns(mut self, max_columns: Option<NonZeroUsize>) -> Self {
        self.max_columns = max_columns;
        self
    }

    /// Stacking direction, fixed at construction.
    #[must_use]
    pub fn direction(&self) -> VerticalDirection {
        self.direction
    }

    /// Updates the container height and margins.
    ///
    /// Existing slots keep their bands; new allocations use the new body.
    pub fn set_stage(&mut self, stage: &Stage) {
        self.height = stage.height;
        self.margin_top = stage.margin_top;
        self.margin_bottom = stage.margin_bottom;
    }

    /// Number of columns opened so far.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of slots currently held across all columns.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// Held slots of one column, in `top_y` order.
    pub fn slots(&self, column: usize) -> impl Iterator<Item = (SlotId, Band)> + '_ {
        self.columns
            .get(column)
            .into_iter()
            .flatten()
            .map(|row| (row.slot, row.band))
    }

    /// Reserves a band of `block_height` with no filter.
    pub fn plan(&mut self, block_height: f64) -> StackingPlan {
        self.allocate(block_height, None::<fn(Band) -> bool>)
    }

    /// Reserves a band of `block_height`, letting `filter` veto candidate
    /// bands in column 0.
    pub fn plan_filtered<F>(&mut self, block_height: f64, filter: F) -> StackingPlan
    where
        F: FnMut(Band) -> bool,
    {
        self.allocate(block_height, Some(filter))
    }

    /// Releases the plan's band. Idempotent.
    ///
    /// Returns `true` if this call freed the band.
    pub fn cancel(&mut self, plan: &mut StackingPlan) -> bool {
        if plan.canceled {
            return false;
        }
        plan.canceled = true;
        self.release(plan.slot)
    }

    /// Releases a slot by token.
    ///
    /// Returns `false` if the slot is not held (already released, or issued
    /// by another planner).
    pub fn release(&mut self, slot: SlotId) -> bool {
        for (column, rows) in self.columns.iter_mut().enumerate() {
            if let Some(idx) = rows.iter().position(|row| row.slot == slot) {
                let row = rows.remove(idx);
                tracing::trace!(
                    direction = self.direction.as_str(),
                    ?slot,
                    column,
                    top_y = row.band.top_y,
                    bottom_y = row.band.bottom_y,
                    "slot released"
                );
                return true;
            }
        }
        false
    }

    fn body(&self) -> (f64, f64) {
        (self.margin_top, self.height - self.margin_bottom)
    }

    /// Band of `block_height` flush with the stacking origin.
    fn origin_band(&self, block_height: f64) -> Band {
        let (min_y, max_y) = self.body();
        match self.direction {
            VerticalDirection::Down => Band::new(min_y, min_y + block_height),
            VerticalDirection::Up => Band::new(max_y - block_height, max_y),
        }
    }

    fn allocate<F>(&mut self, block_height: f64, mut filter: Option<F>) -> StackingPlan
    where
        F: FnMut(Band) -> bool,
    {
        let (min_y, max_y) = self.body();
        let giant = block_height >= max_y - min_y;

        let mut column = 0;
        let band = loop {
            if column == self.columns.len() {
                if self
                    .max_columns
                    .is_some_and(|max| self.columns.len() >= max.get())
                {
                    column = self.columns.len() - 1;
                    let band = self.origin_band(block_height);
                    tracing::warn!(
                        direction = self.direction.as_str(),
                        column,
                        block_height,
                        "all stacking columns full, overlapping last column"
                    );
                    break band;
                }
                self.columns.push(Vec::new());
            }

            let rows = &self.columns[column];
            let found = if giant {
                rows.is_empty().then(|| self.origin_band(block_height))
            } else {
                let filter = if column == 0 { filter.as_mut() } else { None };
                self.scan_column(rows, block_height, filter)
            };

            if let Some(band) = found {
                break band;
            }
            column += 1;
        };

        let slot = SlotId(self.next_slot);
        self.next_slot += 1;

        let rows = &mut self.columns[column];
        let idx = rows.partition_point(|row| row.band.top_y <= band.top_y);
        rows.insert(idx, Row { slot, band });

        tracing::debug!(
            direction = self.direction.as_str(),
            ?slot,
            column,
            top_y = band.top_y,
            bottom_y = band.bottom_y,
            "slot allocated"
        );

        StackingPlan {
            band,
            column,
            slot,
            canceled: false,
        }
    }

    /// Finds the first acceptable band in one column, scanning gaps from the
    /// stacking origin.
    fn scan_column<F>(&self, rows: &[Row], block_height: f64, mut filter: Option<F>) -> Option<Band>
    where
        F: FnMut(Band) -> bool,
    {
        let (min_y, max_y) = self.body();
        match self.direction {
            VerticalDirection::Down => {
                let mut cursor = min_y;
                for row in rows {
                    if row.band.top_y >= max_y {
                        break;
                    }
                    if row.band.top_y - cursor >= block_height {
                        let found = self.scan_gap(
                            cursor,
                            row.band.top_y,
                            block_height,
                            filter.as_mut(),
                        );
                        if found.is_some() {
                            return found;
                        }
                    }
                    cursor = cursor.max(row.band.bottom_y);
                }
                if max_y - cursor >= block_height {
                    return self.scan_gap(cursor, max_y, block_height, filter);
                }
            }
            VerticalDirection::Up => {
                let mut cursor = max_y;
                for row in rows.iter().rev() {
                    if row.band.bottom_y <= min_y {
                        break;
                    }
                    if cursor - row.band.bottom_y >= block_height {
                        let found = self.scan_gap(
                            row.band.bottom_y,
                            cursor,
                            block_height,
                            filter.as_mut(),
                        );
                        if found.is_some() {
                            return found;
                        }
                    }
                    cursor = cursor.min(row.band.top_y);
                }
                if cursor - min_y >= block_height {
                    return self.scan_gap(min_y, cursor, block_height, filter);
                }
            }
        }
        None
    }

    /// Picks a band inside the free gap `[lo, hi)`.
    ///
    /// Without a filter the band is flush with the origin side of the gap.
    /// With one, sub-bands are tried in block-height steps from that side.
    fn scan_gap<F>(&self, lo: f64, hi: f64, block_height: f64, filter: Option<F>) -> Option<Band>
    where
        F: FnMut(Band) -> bool,
    {
        let Some(mut filter) = filter.filter(|_| block_height > 0.0) else {
            return Some(match self.direction {
                VerticalDirection::Down => Band::new(lo, lo + block_height),
                VerticalDirection::Up => Band::new(hi - block_height, hi),
            });
        };

        match self.direction {
            VerticalDirection::Down => {
                let mut top_y = lo;
                while top_y + block_height <= hi {
                    let band = Band::new(top_y, top_y + block_height);
                    if filter(band) {
                        return Some(band);
                    }
                    top_y += block_height;
                }
            }
            VerticalDirection::Up => {
                let mut bottom_y = hi;
                while bottom_y - block_height >= lo {
                    let band = Band::new(bottom_y - block_height, bottom_y);
                    if filter(band) {
                        return Some(band);
                    }
                    bottom_y -= block_height;
                }
            }
        }
        None
    }
}
