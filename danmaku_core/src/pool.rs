// Copyright 2026 the Danmaku Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-ordered comment storage with filters.
//!
//! Records are kept sorted by `(time, id)`. Bulk loads sort once; single
//! additions binary-search their position. Range queries walk forward from
//! the first record at or after the window start and apply every installed
//! filter; all filters must accept a record for it to be returned.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::collections::vec_deque::Drain;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use crate::comment::{CommentId, CommentRecord};
use crate::event::EventQueue;
use crate::id::FilterId;

/// A predicate over comments. `true` keeps the comment.
pub type CommentFilter = Box<dyn Fn(&CommentRecord) -> bool>;

/// A mutation of a [`CommentPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolEvent {
    /// A bulk load inserted `count` records.
    Loaded {
        /// Number of records loaded.
        count: usize,
    },
    /// One record was inserted at `index`.
    Added {
        /// Sorted position of the record.
        index: usize,
        /// The record.
        comment: CommentId,
    },
    /// One record was removed from `index`.
    Removed {
        /// Former position of the record.
        index: usize,
        /// The record.
        comment: CommentId,
    },
    /// Every record was removed.
    Cleared {
        /// Number of records removed.
        count: usize,
    },
    /// A filter was installed.
    FilterAdded(FilterId),
    /// A filter was removed.
    FilterRemoved(FilterId),
}

fn order(a: &CommentRecord, b: &CommentRecord) -> Ordering {
    a.time()
        .total_cmp(&b.time())
        .then_with(|| a.id().cmp(&b.id()))
}

/// Sorted comment storage.
pub struct CommentPool {
    comments: Vec<Rc<CommentRecord>>,
    filters: Vec<(FilterId, CommentFilter)>,
    next_filter: u64,
    events: EventQueue<PoolEvent>,
}

impl Default for CommentPool {
    fn default() -> Self {
        Self::with_event_capacity(Self::DEFAULT_EVENT_CAPACITY)
    }
}

impl fmt::Debug for CommentPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentPool")
            .field("comments", &self.comments.len())
            .field(
                "filters",
                &self.filters.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            )
            .field("next_filter", &self.next_filter)
            .field("events", &self.events)
            .finish()
    }
}

impl CommentPool {
    /// Undrained mutation events kept by [`CommentPool::new`].
    pub const DEFAULT_EVENT_CAPACITY: usize = 256;

    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty pool keeping at most `capacity` undrained events.
    /// Zero turns event recording off.
    #[must_use]
    pub fn with_event_capacity(capacity: usize) -> Self {
        Self {
            comments: Vec::new(),
            filters: Vec::new(),
            next_filter: 0,
            events: EventQueue::new(capacity),
        }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// Returns `true` if the pool holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Every record, in `(time, id)` order, ignoring filters.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<CommentRecord>> + '_ {
        self.comments.iter()
    }

    /// Inserts many records and restores sorted order.
    pub fn load<I>(&mut self, records: I)
    where
        I: IntoIterator,
        I::Item: Into<Rc<CommentRecord>>,
    {
        let before = self.comments.len();
        self.comments.extend(records.into_iter().map(Into::into));
        self.comments.sort_by(|a, b| order(a, b));
        let count = self.comments.len() - before;
        tracing::debug!(count, total = self.comments.len(), "comments loaded");
        self.events.push(PoolEvent::Loaded { count });
    }

    /// Inserts one record at its sorted position and returns that position.
    pub fn add(&mut self, record: impl Into<Rc<CommentRecord>>) -> usize {
        let record = record.into();
        let index = self
            .comments
            .partition_point(|c| order(c, &record) != Ordering::Greater);
        let comment = record.id();
        self.comments.insert(index, record);
        self.events.push(PoolEvent::Added { index, comment });
        index
    }

    fn position(&self, record: &CommentRecord) -> Option<usize> {
        self.comments
            .binary_search_by(|c| order(c, record))
            .ok()
    }

    /// Returns `true` if a record with the same time and id is stored.
    #[must_use]
    pub fn has(&self, record: &CommentRecord) -> bool {
        self.position(record).is_some()
    }

    /// Removes the record with the same time and id.
    pub fn remove(&mut self, record: &CommentRecord) -> Option<Rc<CommentRecord>> {
        let index = self.position(record)?;
        let removed = self.comments.remove(index);
        self.events.push(PoolEvent::Removed {
            index,
            comment: removed.id(),
        });
        Some(removed)
    }

    /// Removes every record. Filters stay installed.
    pub fn clear(&mut self) {
        let count = self.comments.len();
        self.comments.clear();
        self.events.push(PoolEvent::Cleared { count });
    }

    /// Records with `start <= time < end` that pass every filter, in order,
    /// at most `limit` of them.
    #[must_use]
    pub fn get_by_time(&self, start: f64, end: f64, limit: usize) -> Vec<Rc<CommentRecord>> {
        let first = self.comments.partition_point(|c| c.time() < start);
        self.comments[first..]
            .iter()
            .take_while(|c| c.time() < end)
            .filter(|c| self.passes(c))
            .take(limit)
            .cloned()
            .collect()
    }

    fn passes(&self, record: &CommentRecord) -> bool {
        self.filters.iter().all(|(_, filter)| filter(record))
    }

    /// Installs a filter and returns its handle.
    pub fn add_filter(&mut self, filter: impl Fn(&CommentRecord) -> bool + 'static) -> FilterId {
        let id = FilterId(self.next_filter);
        self.next_filter += 1;
        self.filters.push((id, Box::new(filter)));
        self.events.push(PoolEvent::FilterAdded(id));
        id
    }

    /// Returns `true` if the filter is installed.
    #[must_use]
    pub fn has_filter(&self, id: FilterId) -> bool {
        self.filters.iter().any(|(f, _)| *f == id)
    }

    /// Removes a filter. Returns `false` if it was not installed.
    pub fn remove_filter(&mut self, id: FilterId) -> bool {
        let Some(index) = self.filters.iter().position(|(f, _)| *f == id) else {
            return false;
        };
        self.filters.remove(index);
        self.events.push(PoolEvent::FilterRemoved(id));
        true
    }

    /// Removes every filter.
    pub fn clear_filters(&mut self) {
        for (id, _) in self.filters.drain(..) {
            self.events.push(PoolEvent::FilterRemoved(id));
        }
    }

    /// Number of undrained events.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Takes every event recorded since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Drain<'_, PoolEvent> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn record(id: u64, time: f64) -> CommentRecord {
        CommentRecord::scrolling(CommentId(id), time, "c").build()
    }

    fn ids(records: &[Rc<CommentRecord>]) -> Vec<u64> {
        records.iter().map(|c| c.id().0).collect()
    }

    #[test]
    fn load_sorts_by_time_then_id() {
        let mut pool = CommentPool::new();
        pool.load([record(3, 20.0), record(2, 10.0), record(1, 20.0)]);
        let all: Vec<_> = pool.iter().map(|c| c.id().0).collect();
        assert_eq!(all, vec![2, 1, 3]);
        assert_eq!(pool.drain_events().collect::<Vec<_>>(), vec![PoolEvent::Loaded { count: 3 }]);
    }

    #[test]
    fn add_keeps_order() {
        let mut pool = CommentPool::new();
        pool.load([record(1, 0.0), record(2, 100.0)]);
        assert_eq!(pool.add(record(3, 50.0)), 1);
        assert_eq!(pool.add(record(0, 100.0)), 2, "id breaks the time tie");
        assert_eq!(pool.add(record(9, 500.0)), 4);
        assert_eq!(pool.len(), 5);
    }

    #[test]
    fn window_is_half_open() {
        let mut pool = CommentPool::new();
        pool.load([record(1, 0.0), record(2, 100.0), record(3, 200.0)]);
        assert_eq!(ids(&pool.get_by_time(0.0, 100.0, usize::MAX)), vec![1]);
        assert_eq!(ids(&pool.get_by_time(100.0, 201.0, usize::MAX)), vec![2, 3]);
        assert!(pool.get_by_time(201.0, 1000.0, usize::MAX).is_empty(), "past the end");
    }

    #[test]
    fn limit_stops_the_scan() {
        let mut pool = CommentPool::new();
        pool.load((0..10).map(|i| record(i, 5.0)));
        assert_eq!(ids(&pool.get_by_time(0.0, 10.0, 3)), vec![0, 1, 2]);
        assert!(pool.get_by_time(0.0, 10.0, 0).is_empty(), "zero limit");
    }

    #[test]
    fn filters_are_anded() {
        let mut pool = CommentPool::new();
        pool.load((0..6).map(|i| record(i, i as f64)));
        let even = pool.add_filter(|c| c.id().0 % 2 == 0);
        let _small = pool.add_filter(|c| c.id().0 < 4);
        assert_eq!(ids(&pool.get_by_time(0.0, 10.0, usize::MAX)), vec![0, 2]);

        assert!(pool.has_filter(even), "installed");
        assert!(pool.remove_filter(even), "removed");
        assert!(!pool.remove_filter(even), "already gone");
        assert_eq!(ids(&pool.get_by_time(0.0, 10.0, usize::MAX)), vec![0, 1, 2, 3]);

        pool.clear_filters();
        assert_eq!(pool.get_by_time(0.0, 10.0, usize::MAX).len(), 6);
    }

    #[test]
    fn remove_and_has_use_identity() {
        let mut pool = CommentPool::new();
        pool.load([record(1, 10.0), record(2, 10.0)]);
        assert!(pool.has(&record(2, 10.0)), "same time and id");
        assert!(!pool.has(&record(2, 11.0)), "different time");
        assert_eq!(pool.remove(&record(1, 10.0)).map(|c| c.id()), Some(CommentId(1)));
        assert!(pool.remove(&record(1, 10.0)).is_none(), "removed once");
        pool.clear();
        assert!(pool.is_empty(), "cleared");
    }

    #[test]
    fn mutations_are_reported() {
        let mut pool = CommentPool::new();
        pool.add(record(1, 0.0));
        pool.remove(&record(1, 0.0));
        let f = pool.add_filter(|_| true);
        pool.clear_filters();
        pool.clear();
        assert_eq!(
            pool.drain_events().collect::<Vec<_>>(),
            vec![
                PoolEvent::Added {
                    index: 0,
                    comment: CommentId(1)
                },
                PoolEvent::Removed {
                    index: 0,
                    comment: CommentId(1)
                },
                PoolEvent::FilterAdded(f),
                PoolEvent::FilterRemoved(f),
                PoolEvent::Cleared { count: 0 },
            ]
        );
        assert_eq!(pool.drain_events().count(), 0, "drained");
    }

    #[test]
    fn undrained_events_are_bounded() {
        let mut pool = CommentPool::with_event_capacity(2);
        for i in 0..5 {
            pool.add(record(i, i as f64));
        }
        assert_eq!(pool.pending_events(), 2, "capped");
        assert_eq!(
            pool.drain_events().collect::<Vec<_>>(),
            vec![
                PoolEvent::Added {
                    index: 3,
                    comment: CommentId(3)
                },
                PoolEvent::Added {
                    index: 4,
                    comment: CommentId(4)
                },
            ],
            "newest kept"
        );

        let mut silent = CommentPool::with_event_capacity(0);
        silent.load([record(1, 0.0)]);
        assert_eq!(silent.pending_events(), 0, "recording off");
        assert_eq!(silent.len(), 1, "storage unaffected");
    }
}
