//! Serializable snapshot of the session's current intervals.
//!
//! A read-only walk over the merged global view, in timeline order, for
//! "export current state" consumers. Entities that failed indexing (overlap
//! conflicts) are deliberately absent: the snapshot mirrors the timeline,
//! not the object stores.

use serde::{Deserialize, Serialize};

use crate::core::interval::EntityRef;
use crate::core::time::to_seconds;
use crate::core::timeline::Timeline;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSnapshot {
    pub filename: String,
    pub pilot: String,
    /// Unix seconds.
    pub timestamp: f64,
    /// Media duration in seconds.
    pub duration: f64,
    pub rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub flights: Vec<String>,
    pub videos: Vec<VideoSnapshot>,
    pub timezone: String,
    /// Trailing track window, in seconds.
    pub trailing: f64,
}

/// Capture the current membership in timeline order.
pub fn capture(timeline: &Timeline) -> SessionSnapshot {
    let mut flights = Vec::new();
    let mut videos = Vec::new();

    for interval in timeline.global().iter() {
        match interval.payload {
            EntityRef::Flight(id) => {
                if let Some(flight) = timeline.flight(id) {
                    flights.push(flight.name.clone());
                }
            }
            EntityRef::Video(id) => {
                if let Some(video) = timeline.video(id) {
                    videos.push(VideoSnapshot {
                        filename: video.name.clone(),
                        pilot: timeline.roster.pilot(video.owner).name.clone(),
                        timestamp: to_seconds(video.start),
                        duration: video.duration,
                        rate: video.rate,
                        position: video.position.map(|point| PositionSnapshot {
                            latitude: point.latitude,
                            longitude: point.longitude,
                            altitude: point.altitude,
                        }),
                    });
                }
            }
        }
    }

    SessionSnapshot {
        flights,
        videos,
        timezone: timeline.timezone.clone(),
        trailing: timeline.trailing_seconds,
    }
}

/// Capture and serialize to JSON.
pub fn to_json(timeline: &Timeline) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&capture(timeline))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::from_seconds;
    use crate::media::video::VideoRecord;
    use crate::track::flight::{FlightFix, FlightRecord};

    fn timeline() -> Timeline {
        let mut timeline = Timeline::new();
        let pilot = timeline.add_pilot("ayla", 1);
        timeline
            .add_flight(
                pilot,
                FlightRecord {
                    name: "morning".to_string(),
                    fixes: vec![
                        FlightFix {
                            timestamp: from_seconds(100.0),
                            latitude: 46.0,
                            longitude: 7.0,
                            altitude: 1000.0,
                        },
                        FlightFix {
                            timestamp: from_seconds(200.0),
                            latitude: 47.0,
                            longitude: 7.5,
                            altitude: 1500.0,
                        },
                    ],
                },
            )
            .unwrap();
        timeline
            .add_video(VideoRecord {
                filename: "launch.mp4".to_string(),
                pilot: "ayla".to_string(),
                timestamp: from_seconds(120.0),
                duration: Some(30.0),
                rate: Some(1.0),
                latitude: None,
                longitude: None,
                altitude: None,
            })
            .unwrap();
        timeline
    }

    #[test]
    fn test_capture_walks_the_timeline() {
        let snapshot = capture(&timeline());

        assert_eq!(snapshot.flights, vec!["morning".to_string()]);
        assert_eq!(snapshot.videos.len(), 1);

        let video = &snapshot.videos[0];
        assert_eq!(video.filename, "launch.mp4");
        assert_eq!(video.pilot, "ayla");
        assert_eq!(video.timestamp, 120.0);
        assert_eq!(video.duration, 30.0);
        // inherited from the flight trajectory at the video's start
        assert!(video.position.is_some());

        assert_eq!(snapshot.timezone, "UTC");
        assert_eq!(snapshot.trailing, 120.0);
    }

    #[test]
    fn test_json_shape() {
        let json = to_json(&timeline()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["flights"].is_array());
        assert_eq!(value["videos"][0]["filename"], "launch.mp4");
        assert_eq!(value["timezone"], "UTC");
        assert!(value["trailing"].is_number());
    }

    #[test]
    fn test_missing_position_is_omitted() {
        let mut timeline = Timeline::new();
        timeline.add_pilot("ayla", 1);
        timeline
            .add_video(VideoRecord {
                filename: "clip.mp4".to_string(),
                pilot: "ayla".to_string(),
                timestamp: from_seconds(0.0),
                duration: Some(10.0),
                rate: None,
                latitude: None,
                longitude: None,
                altitude: None,
            })
            .unwrap();

        let json = to_json(&timeline).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["videos"][0].get("position").is_none());
    }

    #[test]
    fn test_snapshot_roundtrips_through_serde() {
        let snapshot = capture(&timeline());
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
