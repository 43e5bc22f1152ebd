//! Ordered interval index: the per-pilot and global collections of
//! non-overlapping time intervals.
//!
//! Intervals are stored sorted by `start`. Overlapping intervals are not
//! allowed within one index; flights and videos live in separate indices so
//! a flight and a video may coexist at the same instant.

use crate::core::interval::{EntityRef, Interval};
use crate::core::time::Time;

/// Error type for index operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverlapError {
    #[error("interval for {payload:?} overlaps an existing interval in the index")]
    Overlap { payload: EntityRef },
}

/// Result of a point lookup.
///
/// `Found(i)` is the index of the interval containing the queried time.
/// `NotFound(i)` carries the insertion point: the index of the first
/// interval whose `start` is strictly after the queried time. The seek
/// engine's boundary logic depends on recovering that exact position, not
/// just on a containment boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexLookup {
    Found(usize),
    NotFound(usize),
}

impl IndexLookup {
    pub fn is_found(self) -> bool {
        matches!(self, IndexLookup::Found(_))
    }
}

/// An ordered collection of non-overlapping intervals.
#[derive(Debug, Clone, Default)]
pub struct IntervalIndex {
    intervals: Vec<Interval>,
}

impl IntervalIndex {
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }

    /// Insert an interval, keeping the index sorted by `start`.
    ///
    /// Returns `Err(OverlapError)` if the new interval's `[start, stop)`
    /// span intersects any existing interval's. The index is unchanged on
    /// conflict; callers log and continue rather than abort.
    pub fn insert(&mut self, interval: Interval) -> Result<(), OverlapError> {
        let pos = self
            .intervals
            .partition_point(|existing| existing.start <= interval.start);

        if pos > 0 && self.intervals[pos - 1].overlaps(&interval) {
            return Err(OverlapError::Overlap {
                payload: interval.payload,
            });
        }
        if pos < self.intervals.len() && self.intervals[pos].overlaps(&interval) {
            return Err(OverlapError::Overlap {
                payload: interval.payload,
            });
        }

        self.intervals.insert(pos, interval);
        Ok(())
    }

    /// Remove the interval whose payload matches.
    ///
    /// Returns the removed interval, or `None` if no interval carries the
    /// payload. Absence is not an error; removal is idempotent.
    pub fn remove_by_payload(&mut self, payload: EntityRef) -> Option<Interval> {
        let pos = self
            .intervals
            .iter()
            .position(|interval| interval.payload == payload)?;
        Some(self.intervals.remove(pos))
    }

    /// Binary-search point lookup.
    ///
    /// Returns `Found` with the containing interval's index, or `NotFound`
    /// with the index of the first interval strictly after `time`.
    pub fn find(&self, time: Time) -> IndexLookup {
        let pos = self
            .intervals
            .partition_point(|interval| interval.start <= time);
        if pos > 0 && self.intervals[pos - 1].contains(time) {
            IndexLookup::Found(pos - 1)
        } else {
            IndexLookup::NotFound(pos)
        }
    }

    /// Payload of the interval containing `time`, if any.
    pub fn payload_at(&self, time: Time) -> Option<EntityRef> {
        match self.find(time) {
            IndexLookup::Found(i) => Some(self.intervals[i].payload),
            IndexLookup::NotFound(_) => None,
        }
    }

    /// Build a new index containing clones of every interval from the given
    /// indices.
    ///
    /// Clones are independent values carrying the same payload reference.
    /// The merged view is sorted by `start`; equal starts keep the order of
    /// the source indices (stable sort), so merge output is deterministic.
    /// Overlap validation is intentionally skipped here: intervals from
    /// different owners may cover the same span, and `find` returns the
    /// first match in sort order.
    pub fn merge<'a, I>(sources: I) -> IntervalIndex
    where
        I: IntoIterator<Item = &'a IntervalIndex>,
    {
        let mut intervals: Vec<Interval> = sources
            .into_iter()
            .flat_map(|index| index.intervals.iter().cloned())
            .collect();
        intervals.sort_by_key(|interval| interval.start);
        IntervalIndex { intervals }
    }

    pub fn get(&self, index: usize) -> &Interval {
        &self.intervals[index]
    }

    pub fn first(&self) -> Option<&Interval> {
        self.intervals.first()
    }

    pub fn last(&self) -> Option<&Interval> {
        self.intervals.last()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }
}
