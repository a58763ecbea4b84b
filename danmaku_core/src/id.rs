// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Process, slot, and filter identity types.

use core::fmt;

/// A handle to a rendering process in a [`Renderer`](crate::renderer::Renderer).
///
/// Contains both a slot index and a generation counter so that host
/// callbacks arriving after a process ended can be detected once the slot is
/// reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId {
    /// Slot index into the renderer's process table.
    pub(crate) idx: u32,
    /// Generation counter; must match the table's generation for this slot.
    pub(crate) generation: u32,
}

impl ProcessId {
    /// Builds a handle from raw parts.
    ///
    /// Intended for hosts and tests that need to fabricate identifiers; a
    /// handle built this way is only meaningful to a renderer that issued
    /// the same pair.
    #[inline]
    #[must_use]
    pub const fn from_raw(idx: u32, generation: u32) -> Self {
        Self { idx, generation }
    }

    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcessId({}@gen{})", self.idx, self.generation)
    }
}

/// Identity of one slot reservation in a
/// [`StackingPlanner`](crate::stacking::StackingPlanner).
///
/// Issued at allocation and never reused by the issuing planner, so releasing
/// by token never frees somebody else's reservation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(pub(crate) u64);

impl SlotId {
    /// Returns the raw token value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotId({})", self.0)
    }
}

/// Handle to a filter installed on a [`CommentPool`](crate::pool::CommentPool).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilterId(pub(crate) u64);

impl fmt::Debug for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilterId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    #[test]
    fn debug_formats() {
        assert_eq!(
            format!("{:?}", ProcessId::from_raw(3, 7)),
            "ProcessId(3@gen7)"
        );
        assert_eq!(format!("{:?}", SlotId(9)), "SlotId(9)");
        assert_eq!(format!("{:?}", FilterId(2)), "FilterId(2)");
    }

    #[test]
    fn process_ids_order_by_index_then_generation() {
        let a = ProcessId::from_raw(1, 5);
        let b = ProcessId::from_raw(2, 0);
        let c = ProcessId::from_raw(2, 1);
        assert!(a < b, "lower index sorts first");
        assert!(b < c, "same index sorts by generation");
        assert_eq!(c.index(), 2);
        assert_eq!(c.generation(), 1);
    }
}
