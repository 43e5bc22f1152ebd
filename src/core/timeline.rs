//! Timeline membership: pilots, their flights and videos, and the global
//! merged interval view.
//!
//! The global view is rebuilt from scratch on every membership change
//! rather than patched in place, so a removal can never leave a stale clone
//! behind.

use std::collections::HashMap;

use tracing::warn;

use crate::core::index::IntervalIndex;
use crate::core::interval::{EntityId, EntityRef, Interval};
use crate::core::pilot::{PilotId, PilotRoster};
use crate::core::time::Time;
use crate::media::video::{MediaError, Video, VideoRecord};
use crate::track::flight::{Flight, FlightError, FlightRecord};

/// Error type for loading flights and videos into the timeline
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Flight(#[from] FlightError),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error("no pilot named '{name}'")]
    UnknownPilot { name: String },
}

/// All loaded content, grouped by pilot, plus the merged global view.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub roster: PilotRoster,
    flights: HashMap<EntityId, Flight>,
    videos: HashMap<EntityId, Video>,
    global: IntervalIndex,
    next_id: EntityId,
    /// IANA timezone name the session's timestamps are displayed in.
    pub timezone: String,
    /// Trailing track window shown behind each pilot, in seconds.
    pub trailing_seconds: f64,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            roster: PilotRoster::new(),
            flights: HashMap::new(),
            videos: HashMap::new(),
            global: IntervalIndex::new(),
            next_id: 1,
            timezone: "UTC".to_string(),
            trailing_seconds: 120.0,
        }
    }

    pub fn add_pilot(&mut self, name: impl Into<String>, color_id: u32) -> PilotId {
        self.roster.add(name, color_id)
    }

    /// Ingest a parsed flight record for a pilot.
    ///
    /// The flight is created and stored even when its interval conflicts
    /// with already-indexed content; the conflict is logged and the flight
    /// simply stays unindexed rather than failing the whole import.
    pub fn add_flight(
        &mut self,
        pilot: PilotId,
        record: FlightRecord,
    ) -> Result<EntityId, LoadError> {
        let id = self.allocate_id();
        let flight = Flight::from_record(id, pilot, record)?;

        insert_logged(
            &mut self.roster.pilot_mut(pilot).flight_intervals,
            flight.interval.clone(),
            &flight.name,
        );
        self.flights.insert(id, flight);
        self.rebuild_global();
        Ok(id)
    }

    /// Ingest a parsed video/image record; the owning pilot is resolved by
    /// name ("any" targets the shared bucket). A record without an explicit
    /// position inherits one from the owner's flight trajectory at the
    /// video's start.
    pub fn add_video(&mut self, record: VideoRecord) -> Result<EntityId, LoadError> {
        let owner =
            self.roster
                .find_by_name(&record.pilot)
                .ok_or_else(|| LoadError::UnknownPilot {
                    name: record.pilot.clone(),
                })?;

        let id = self.allocate_id();
        let mut video = Video::from_record(id, owner, record);

        if video.position.is_none() {
            video.position = self.inherited_position(owner, video.start);
        }

        insert_logged(
            &mut self.roster.pilot_mut(owner).video_intervals,
            video.interval.clone(),
            &video.name,
        );
        self.videos.insert(id, video);
        self.rebuild_global();
        Ok(id)
    }

    /// Remove a flight. Idempotent; the global view is rebuilt so no stale
    /// clone survives.
    pub fn remove_flight(&mut self, id: EntityId) -> Option<Flight> {
        let flight = self.flights.remove(&id)?;
        self.roster
            .pilot_mut(flight.owner)
            .flight_intervals
            .remove_by_payload(EntityRef::Flight(id));
        self.rebuild_global();
        Some(flight)
    }

    /// Remove a video. Idempotent; the global view is rebuilt so no stale
    /// clone survives.
    pub fn remove_video(&mut self, id: EntityId) -> Option<Video> {
        let video = self.videos.remove(&id)?;
        self.roster
            .pilot_mut(video.owner)
            .video_intervals
            .remove_by_payload(EntityRef::Video(id));
        self.rebuild_global();
        Some(video)
    }

    pub fn flight(&self, id: EntityId) -> Option<&Flight> {
        self.flights.get(&id)
    }

    pub fn video(&self, id: EntityId) -> Option<&Video> {
        self.videos.get(&id)
    }

    pub fn flights(&self) -> impl Iterator<Item = &Flight> {
        self.flights.values()
    }

    pub fn videos(&self) -> impl Iterator<Item = &Video> {
        self.videos.values()
    }

    /// The merged view over every pilot's flight and video intervals.
    pub fn global(&self) -> &IntervalIndex {
        &self.global
    }

    /// Earliest start and latest stop across all indexed content.
    pub fn bounds(&self) -> Option<(Time, Time)> {
        let start = self.global.first()?.start;
        let stop = self.global.iter().map(|interval| interval.stop).max()?;
        Some((start, stop))
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Position of the owner's flight trajectory at `time`, if a flight
    /// covers that instant.
    fn inherited_position(&self, owner: PilotId, time: Time) -> Option<crate::core::geo::GeoPoint> {
        let payload = self
            .roster
            .pilot(owner)
            .flight_intervals
            .payload_at(time)?;
        let flight = self.flights.get(&payload.id())?;
        Some(flight.position_at(time))
    }

    /// Rebuild the merged view: every pilot's flight intervals, then every
    /// pilot's video intervals, both in pilot creation order. The fixed
    /// source order makes equal-start merges deterministic.
    fn rebuild_global(&mut self) {
        let flight_sources = self.roster.iter().map(|pilot| &pilot.flight_intervals);
        let video_sources = self.roster.iter().map(|pilot| &pilot.video_intervals);
        self.global = IntervalIndex::merge(flight_sources.chain(video_sources));
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert into an index, logging and skipping on conflict instead of
/// failing the caller.
fn insert_logged(index: &mut IntervalIndex, interval: Interval, name: &str) {
    if let Err(error) = index.insert(interval) {
        warn!(%name, %error, "interval conflicts with existing content; not indexed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::from_seconds;
    use crate::track::flight::FlightFix;

    fn flight_record(name: &str, start: f64, stop: f64) -> FlightRecord {
        FlightRecord {
            name: name.to_string(),
            fixes: vec![
                FlightFix {
                    timestamp: from_seconds(start),
                    latitude: 46.0,
                    longitude: 7.0,
                    altitude: 1000.0,
                },
                FlightFix {
                    timestamp: from_seconds(stop),
                    latitude: 47.0,
                    longitude: 7.5,
                    altitude: 1500.0,
                },
            ],
        }
    }

    fn video_record(filename: &str, pilot: &str, start: f64, duration: f64) -> VideoRecord {
        VideoRecord {
            filename: filename.to_string(),
            pilot: pilot.to_string(),
            timestamp: from_seconds(start),
            duration: Some(duration),
            rate: Some(1.0),
            latitude: None,
            longitude: None,
            altitude: None,
        }
    }

    #[test]
    fn test_membership_feeds_global_view() {
        let mut timeline = Timeline::new();
        let pilot = timeline.add_pilot("ayla", 1);

        let flight = timeline
            .add_flight(pilot, flight_record("f1", 100.0, 200.0))
            .unwrap();
        timeline.add_video(video_record("v1.mp4", "ayla", 120.0, 30.0)).unwrap();

        assert_eq!(timeline.global().len(), 2);
        assert!(timeline.flight(flight).is_some());
        assert_eq!(timeline.bounds(), Some((from_seconds(100.0), from_seconds(200.0))));
    }

    #[test]
    fn test_removal_leaves_no_stale_global_entries() {
        let mut timeline = Timeline::new();
        let pilot = timeline.add_pilot("ayla", 1);

        let flight = timeline
            .add_flight(pilot, flight_record("f1", 0.0, 100.0))
            .unwrap();
        let video = timeline.add_video(video_record("v1.mp4", "ayla", 10.0, 20.0)).unwrap();
        assert_eq!(timeline.global().len(), 2);

        timeline.remove_flight(flight);
        assert_eq!(timeline.global().len(), 1);
        assert!(timeline
            .global()
            .iter()
            .all(|interval| interval.payload == EntityRef::Video(video)));

        // idempotent
        assert!(timeline.remove_flight(flight).is_none());

        timeline.remove_video(video);
        assert!(timeline.global().is_empty());
        assert_eq!(timeline.bounds(), None);
    }

    #[test]
    fn test_overlapping_flight_is_stored_but_not_indexed() {
        let mut timeline = Timeline::new();
        let pilot = timeline.add_pilot("ayla", 1);

        timeline
            .add_flight(pilot, flight_record("f1", 0.0, 100.0))
            .unwrap();
        let conflicting = timeline
            .add_flight(pilot, flight_record("f2", 50.0, 150.0))
            .unwrap();

        // the object exists, the index does not grow
        assert!(timeline.flight(conflicting).is_some());
        assert_eq!(timeline.roster.pilot(pilot).flight_intervals.len(), 1);
        assert_eq!(timeline.global().len(), 1);
    }

    #[test]
    fn test_concurrent_pilots_share_the_global_view() {
        let mut timeline = Timeline::new();
        let a = timeline.add_pilot("ayla", 1);
        let b = timeline.add_pilot("benoit", 2);

        timeline.add_flight(a, flight_record("f1", 0.0, 100.0)).unwrap();
        timeline.add_flight(b, flight_record("f2", 50.0, 150.0)).unwrap();

        // overlapping owners are both present in the merged view
        assert_eq!(timeline.global().len(), 2);
    }

    #[test]
    fn test_video_inherits_position_from_flight() {
        let mut timeline = Timeline::new();
        let pilot = timeline.add_pilot("ayla", 1);

        timeline
            .add_flight(pilot, flight_record("f1", 0.0, 100.0))
            .unwrap();
        let video = timeline.add_video(video_record("v1.mp4", "ayla", 50.0, 20.0)).unwrap();

        let position = timeline.video(video).unwrap().position.unwrap();
        // halfway along the 46.0 -> 47.0 track
        assert!((position.latitude - 46.5).abs() < 1e-6);
    }

    #[test]
    fn test_video_without_flight_has_no_position() {
        let mut timeline = Timeline::new();
        timeline.add_pilot("ayla", 1);

        let video = timeline.add_video(video_record("v1.mp4", "ayla", 50.0, 20.0)).unwrap();
        assert!(timeline.video(video).unwrap().position.is_none());
    }

    #[test]
    fn test_unknown_pilot_fails_the_load() {
        let mut timeline = Timeline::new();
        let err = timeline
            .add_video(video_record("v1.mp4", "nobody", 0.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, LoadError::UnknownPilot { .. }));
    }

    #[test]
    fn test_any_pilot_bucket_accepts_videos() {
        let mut timeline = Timeline::new();
        let video = timeline.add_video(video_record("shared.mp4", "any", 0.0, 10.0)).unwrap();
        assert_eq!(timeline.video(video).unwrap().owner, crate::core::pilot::ANY_PILOT);
    }
}
