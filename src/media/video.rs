//! Video/image payload: a media clip placed on the shared timeline.

use tracing::warn;

use crate::core::geo::GeoPoint;
use crate::core::interval::{EntityId, EntityRef, Interval};
use crate::core::pilot::PilotId;
use crate::core::time::{from_seconds, to_seconds, Time};

/// Display duration used when a record carries no usable duration
/// (images, or videos whose metadata never resolved).
pub const DEFAULT_DISPLAY_DURATION_SECONDS: f64 = 20.0;

/// Playback-speed multiplier used when a record carries no usable rate.
pub const DEFAULT_RATE: f64 = 1.0;

/// Error type for media loading
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    /// The loading collaborator gave up waiting for media metadata.
    /// Surfaced to the caller as a failed load; nothing is indexed.
    #[error("media metadata for '{filename}' never became available")]
    MetadataTimeout { filename: String },
}

/// Still image or playing video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
}

/// A parsed video/image record handed in by the loading collaborator.
#[derive(Debug, Clone)]
pub struct VideoRecord {
    pub filename: String,
    pub pilot: String,
    pub timestamp: Time,
    /// Media duration in seconds; absent for images.
    pub duration: Option<f64>,
    /// Playback-speed multiplier (> 0); absent means real time.
    pub rate: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
}

/// A video or image on the timeline.
#[derive(Debug, Clone)]
pub struct Video {
    pub id: EntityId,
    pub name: String,
    pub kind: MediaKind,
    pub owner: PilotId,
    /// Timeline instant the media starts at.
    pub start: Time,
    /// Media duration in seconds.
    pub duration: f64,
    /// Playback-speed multiplier, always > 0.
    pub rate: f64,
    pub interval: Interval,
    /// Display position: explicit from the record, or inherited from the
    /// owner's overlapping flight trajectory at `start`.
    pub position: Option<GeoPoint>,
}

impl Video {
    /// Build a video from a parsed record.
    ///
    /// Malformed duration/rate fields are recovered with a warning and the
    /// default, never propagated: one bad import must not take the session
    /// down. The timeline interval covers `duration * rate` seconds.
    pub fn from_record(id: EntityId, owner: PilotId, record: VideoRecord) -> Self {
        let kind = kind_of(&record.filename);

        let duration = match record.duration {
            Some(d) if d.is_finite() && d > 0.0 => d,
            Some(d) => {
                warn!(
                    filename = %record.filename,
                    duration = d,
                    "ignoring malformed media duration"
                );
                DEFAULT_DISPLAY_DURATION_SECONDS
            }
            None => DEFAULT_DISPLAY_DURATION_SECONDS,
        };

        let rate = match record.rate {
            Some(r) if r.is_finite() && r > 0.0 => r,
            Some(r) => {
                warn!(
                    filename = %record.filename,
                    rate = r,
                    "ignoring malformed media rate"
                );
                DEFAULT_RATE
            }
            None => DEFAULT_RATE,
        };

        let position = match (record.latitude, record.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint::new(
                latitude,
                longitude,
                record.altitude.unwrap_or(0.0),
            )),
            _ => None,
        };

        let start = record.timestamp;
        let stop = start + from_seconds(duration * rate);

        Self {
            id,
            name: record.filename,
            kind,
            owner,
            start,
            duration,
            rate,
            interval: Interval::new(start, stop, EntityRef::Video(id)),
            position,
        }
    }

    /// Seconds into the media corresponding to a timeline instant.
    pub fn media_position(&self, time: Time) -> f64 {
        to_seconds(time - self.start) / self.rate
    }
}

fn kind_of(filename: &str) -> MediaKind {
    let extension = filename
        .rsplit('.')
        .next()
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp") => MediaKind::Image,
        _ => MediaKind::Video,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::from_seconds;

    fn record(filename: &str, duration: Option<f64>, rate: Option<f64>) -> VideoRecord {
        VideoRecord {
            filename: filename.to_string(),
            pilot: "ayla".to_string(),
            timestamp: from_seconds(100.0),
            duration,
            rate,
            latitude: None,
            longitude: None,
            altitude: None,
        }
    }

    #[test]
    fn test_interval_covers_scaled_duration() {
        let video = Video::from_record(1, 1, record("wing.mp4", Some(60.0), Some(2.0)));

        assert_eq!(video.interval.start, from_seconds(100.0));
        assert_eq!(video.interval.stop, from_seconds(220.0)); // 60 s at 2x
        assert_eq!(video.interval.payload, EntityRef::Video(1));
        assert_eq!(video.kind, MediaKind::Video);
    }

    #[test]
    fn test_image_gets_default_display_duration() {
        let video = Video::from_record(1, 1, record("summit.jpg", None, None));

        assert_eq!(video.kind, MediaKind::Image);
        assert_eq!(video.duration, DEFAULT_DISPLAY_DURATION_SECONDS);
        assert_eq!(video.rate, DEFAULT_RATE);
    }

    #[test]
    fn test_malformed_fields_recover_to_defaults() {
        let video = Video::from_record(1, 1, record("wing.mp4", Some(-5.0), Some(f64::NAN)));

        assert_eq!(video.duration, DEFAULT_DISPLAY_DURATION_SECONDS);
        assert_eq!(video.rate, DEFAULT_RATE);
    }

    #[test]
    fn test_explicit_position() {
        let mut rec = record("summit.jpg", None, None);
        rec.latitude = Some(46.2);
        rec.longitude = Some(7.1);
        let video = Video::from_record(1, 1, rec);

        let position = video.position.unwrap();
        assert_eq!(position.latitude, 46.2);
        assert_eq!(position.altitude, 0.0); // missing altitude defaults

        // latitude alone is not a position
        let mut rec = record("summit.jpg", None, None);
        rec.latitude = Some(46.2);
        assert!(Video::from_record(2, 1, rec).position.is_none());
    }

    #[test]
    fn test_media_position_maps_through_rate() {
        let video = Video::from_record(1, 1, record("wing.mp4", Some(60.0), Some(2.0)));

        // 30 timeline seconds past start is 15 media seconds at 2x
        assert!((video.media_position(from_seconds(130.0)) - 15.0).abs() < 1e-9);
        assert!((video.media_position(from_seconds(100.0))).abs() < 1e-9);
    }
}
