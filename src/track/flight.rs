//! Flight payload: an ordered position track placed on the shared timeline.

use crate::core::geo::GeoPoint;
use crate::core::interval::{EntityId, EntityRef, Interval};
use crate::core::pilot::PilotId;
use crate::core::time::Time;
use crate::track::smoother::{TrackSmoother, DEFAULT_WINDOW};

/// Error type for flight ingestion
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlightError {
    #[error("flight '{name}' has no position fixes")]
    EmptyTrack { name: String },
    #[error("flight '{name}' fixes are not in chronological order")]
    NotChronological { name: String },
}

/// One position fix from a parsed flight log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightFix {
    pub timestamp: Time,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// A parsed flight record handed in by the loading collaborator.
#[derive(Debug, Clone)]
pub struct FlightRecord {
    pub name: String,
    pub fixes: Vec<FlightFix>,
}

/// A timestamped position sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSample {
    pub time: Time,
    pub position: GeoPoint,
}

/// A flight on the timeline: the raw track plus the smoothed
/// camera-tracking trajectory derived from it.
#[derive(Debug, Clone)]
pub struct Flight {
    pub id: EntityId,
    pub name: String,
    pub owner: PilotId,
    pub samples: Vec<TrackSample>,
    pub smoothed_samples: Vec<TrackSample>,
    pub interval: Interval,
}

impl Flight {
    /// Build a flight from a parsed record.
    ///
    /// The interval's start/stop equal the first/last fix time. Fixes must
    /// be non-empty and chronological; the loader is expected to hand them
    /// over in log order.
    pub fn from_record(id: EntityId, owner: PilotId, record: FlightRecord) -> Result<Self, FlightError> {
        if record.fixes.is_empty() {
            return Err(FlightError::EmptyTrack { name: record.name });
        }
        if record
            .fixes
            .windows(2)
            .any(|pair| pair[1].timestamp < pair[0].timestamp)
        {
            return Err(FlightError::NotChronological { name: record.name });
        }

        let samples: Vec<TrackSample> = record
            .fixes
            .iter()
            .map(|fix| TrackSample {
                time: fix.timestamp,
                position: GeoPoint::new(fix.latitude, fix.longitude, fix.altitude),
            })
            .collect();

        let smoothed_samples = TrackSmoother::smooth(&samples, DEFAULT_WINDOW);

        let start = samples[0].time;
        let stop = samples[samples.len() - 1].time;

        Ok(Self {
            id,
            name: record.name,
            owner,
            samples,
            smoothed_samples,
            interval: Interval::new(start, stop, EntityRef::Flight(id)),
        })
    }

    pub fn start(&self) -> Time {
        self.interval.start
    }

    pub fn stop(&self) -> Time {
        self.interval.stop
    }

    /// Raw track position at a timestamp, linearly interpolated between the
    /// surrounding fixes and clamped to the track's ends.
    pub fn position_at(&self, time: Time) -> GeoPoint {
        position_at(&self.samples, time)
    }

    /// Smoothed camera-facing position at a timestamp.
    pub fn smoothed_position_at(&self, time: Time) -> GeoPoint {
        position_at(&self.smoothed_samples, time)
    }
}

/// Interpolated position in an ordered sample sequence, clamped outside it.
fn position_at(samples: &[TrackSample], time: Time) -> GeoPoint {
    debug_assert!(!samples.is_empty());
    let pos = samples.partition_point(|sample| sample.time <= time);
    if pos == 0 {
        return samples[0].position;
    }
    if pos == samples.len() {
        return samples[samples.len() - 1].position;
    }

    let before = samples[pos - 1];
    let after = samples[pos];
    let span = after.time - before.time;
    if span == 0 {
        return before.position;
    }
    let t = (time - before.time) as f64 / span as f64;
    before.position.lerp(after.position, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::from_seconds;

    fn fix(seconds: f64, lat: f64) -> FlightFix {
        FlightFix {
            timestamp: from_seconds(seconds),
            latitude: lat,
            longitude: 7.0,
            altitude: 1000.0,
        }
    }

    fn record(fixes: Vec<FlightFix>) -> FlightRecord {
        FlightRecord {
            name: "morning-flight".to_string(),
            fixes,
        }
    }

    #[test]
    fn test_interval_spans_first_to_last_fix() {
        let flight =
            Flight::from_record(1, 1, record(vec![fix(100.0, 46.0), fix(160.0, 46.5)])).unwrap();

        assert_eq!(flight.start(), from_seconds(100.0));
        assert_eq!(flight.stop(), from_seconds(160.0));
        assert_eq!(flight.interval.payload, EntityRef::Flight(1));
    }

    #[test]
    fn test_empty_record_is_rejected() {
        let err = Flight::from_record(1, 1, record(vec![])).unwrap_err();
        assert!(matches!(err, FlightError::EmptyTrack { .. }));
    }

    #[test]
    fn test_unordered_record_is_rejected() {
        let err = Flight::from_record(1, 1, record(vec![fix(100.0, 46.0), fix(50.0, 46.5)]))
            .unwrap_err();
        assert!(matches!(err, FlightError::NotChronological { .. }));
    }

    #[test]
    fn test_position_interpolates_between_fixes() {
        let flight =
            Flight::from_record(1, 1, record(vec![fix(0.0, 46.0), fix(10.0, 47.0)])).unwrap();

        let mid = flight.position_at(from_seconds(5.0));
        assert!((mid.latitude - 46.5).abs() < 1e-9);
    }

    #[test]
    fn test_position_clamps_outside_track() {
        let flight =
            Flight::from_record(1, 1, record(vec![fix(10.0, 46.0), fix(20.0, 47.0)])).unwrap();

        assert_eq!(flight.position_at(from_seconds(0.0)).latitude, 46.0);
        assert_eq!(flight.position_at(from_seconds(30.0)).latitude, 47.0);
    }

    #[test]
    fn test_smoothed_track_is_built() {
        let fixes: Vec<FlightFix> = (0..200).map(|i| fix(i as f64, 46.0)).collect();
        let flight = Flight::from_record(1, 1, record(fixes)).unwrap();

        assert!(!flight.smoothed_samples.is_empty());
        // constant track smooths to itself
        for sample in &flight.smoothed_samples {
            assert!((sample.position.latitude - 46.0).abs() < 1e-9);
        }
    }
}
