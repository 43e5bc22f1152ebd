//! Core types for the synchronization engine.
//!
//! This module provides the fundamental data structures: time
//! representation, geographic points, intervals and their ordered indices,
//! pilots, and the timeline membership that feeds the merged global view.
//! All time values are in nanoseconds (i64).

pub mod geo;
pub mod index;
pub mod interval;
pub mod pilot;
pub mod time;
pub mod timeline;

// Re-export core data structures for easier access.
pub use geo::GeoPoint;
pub use index::{IndexLookup, IntervalIndex, OverlapError};
pub use interval::{EntityId, EntityRef, Interval};
pub use pilot::{Pilot, PilotId, PilotRoster, ANY_PILOT};
pub use time::{Time, Timestamp, EDGE_EPSILON, ZERO};
pub use timeline::{LoadError, Timeline};
