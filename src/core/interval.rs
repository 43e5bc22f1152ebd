//! Interval data structure: a time span on the shared timeline carrying a
//! reference to the flight or video it covers.

use crate::core::time::Time;

/// Unique identifier for a flight or video entity
pub type EntityId = u64;

/// Payload reference carried by an interval.
///
/// A tagged reference rather than a trait object: the resolver and
/// synchronizer branch on the kind every tick, and payload identity (not
/// positional index) is the sole identity used in comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Flight(EntityId),
    Video(EntityId),
}

impl EntityRef {
    /// The underlying entity id, regardless of kind.
    pub fn id(self) -> EntityId {
        match self {
            EntityRef::Flight(id) | EntityRef::Video(id) => id,
        }
    }
}

/// A time interval with an attached payload.
///
/// Half-open `[start, stop)` by default; `stop_included` closes the upper
/// edge where a payload's last instant must remain active.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub start: Time,
    pub stop: Time,
    pub stop_included: bool,
    pub payload: EntityRef,
}

impl Interval {
    /// Create a half-open interval. `start <= stop` is required.
    pub fn new(start: Time, stop: Time, payload: EntityRef) -> Self {
        debug_assert!(start <= stop);
        Self {
            start,
            stop,
            stop_included: false,
            payload,
        }
    }

    /// Create an interval whose stop edge is included.
    pub fn new_closed(start: Time, stop: Time, payload: EntityRef) -> Self {
        debug_assert!(start <= stop);
        Self {
            start,
            stop,
            stop_included: true,
            payload,
        }
    }

    /// Check whether a timestamp falls within this interval.
    pub fn contains(&self, time: Time) -> bool {
        if time < self.start {
            return false;
        }
        if self.stop_included {
            time <= self.stop
        } else {
            time < self.stop
        }
    }

    /// Span of the interval in nanoseconds.
    pub fn duration(&self) -> Time {
        self.stop - self.start
    }

    /// Check whether this interval's `[start, stop)` span intersects
    /// another's. Touching edges do not count as overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        !(self.stop <= other.start || other.stop <= self.start)
    }
}
