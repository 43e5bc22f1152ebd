//! Time representation using nanoseconds for sample-accurate timeline math.
//! Absolute timestamps (flight fixes, video start times) are nanoseconds
//! since the Unix epoch; durations are plain nanosecond spans.

/// Time in nanoseconds.
/// This is the core time representation throughout the engine.
pub type Time = i64;

/// Time constants for conversions
pub mod constants {
    use super::Time;

    pub const NANOS_PER_SECOND: Time = 1_000_000_000;
    pub const NANOS_PER_MILLI: Time = 1_000_000;
    pub const NANOS_PER_MICRO: Time = 1_000;
}

/// Tolerance used when comparing timestamps at interval edges.
///
/// Absorbs f64 conversion jitter and sample granularity so a position that
/// lands "on" a boundary after a snap or an epsilon-close step is treated as
/// exactly on it. Tunable constant, well below the 1 s cadence of typical
/// flight-log fixes.
pub const EDGE_EPSILON: Time = constants::NANOS_PER_MILLI;

/// Convert seconds (f64) to nanoseconds (i64)
#[inline]
pub fn from_seconds(seconds: f64) -> Time {
    (seconds * constants::NANOS_PER_SECOND as f64) as Time
}

/// Convert nanoseconds (i64) to seconds (f64)
#[inline]
pub fn to_seconds(nanos: Time) -> f64 {
    nanos as f64 / constants::NANOS_PER_SECOND as f64
}

/// Convert milliseconds to nanoseconds
#[inline]
pub fn from_millis(millis: i64) -> Time {
    millis * constants::NANOS_PER_MILLI
}

/// Convert nanoseconds to milliseconds
#[inline]
pub fn to_millis(nanos: Time) -> i64 {
    nanos / constants::NANOS_PER_MILLI
}

/// Check whether two timestamps coincide within [`EDGE_EPSILON`].
#[inline]
pub fn edges_touch(a: Time, b: Time) -> bool {
    (a - b).abs() <= EDGE_EPSILON
}

/// Time zero constant
pub const ZERO: Time = 0;

/// Type alias used where a value is specifically a point in time rather
/// than a span.
pub type Timestamp = Time;

/// Format a time span as HH:MM:SS.mmm (used in warnings and debug output)
pub fn format_time(nanos: Time) -> String {
    let total_seconds = to_seconds(nanos);
    let hours = (total_seconds / 3600.0).floor() as i64;
    let minutes = ((total_seconds % 3600.0) / 60.0).floor() as i64;
    let seconds = (total_seconds % 60.0).floor() as i64;
    let millis = to_millis(nanos) % 1000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}
