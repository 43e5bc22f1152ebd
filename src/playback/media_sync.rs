//! Locks an external media element to the driving clock.
//!
//! The element runs on its own internal clock and drifts; the synchronizer
//! corrects it only when the drift passes a tolerance, because forcing a
//! seek every tick makes playback stutter. Players cannot run media
//! backward, so reverse playback is faked with a slow forward creep while
//! the driving clock keeps reporting negative progress.

use crate::core::interval::EntityId;
use crate::media::element::MediaElement;
use crate::media::video::Video;
use crate::playback::clock::Clock;

/// Element playback rate used while the driving clock runs backward.
/// Always positive: a slow forward creep standing in for reverse.
pub const REVERSE_CREEP_RATE: f64 = 0.1;

/// Element playback rate while the driving clock runs forward. Timeline
/// speed is carried by the clock's own rate, so the element plays its
/// media in real time.
pub const NORMAL_RATE: f64 = 1.0;

/// Drift beyond which the element is force-seeked, in seconds.
pub const DRIFT_TOLERANCE_SECONDS: f64 = 0.2;

/// Keeps one active media element's position and rate consistent with the
/// clock.
#[derive(Debug, Clone)]
pub struct MediaSynchronizer {
    active: Option<EntityId>,
    original_rate: f64,
}

impl MediaSynchronizer {
    pub fn new() -> Self {
        Self {
            active: None,
            original_rate: 1.0,
        }
    }

    /// The video currently driving an element, if any.
    pub fn active(&self) -> Option<EntityId> {
        self.active
    }

    /// A video became active: remember the clock's rate, slave the clock's
    /// speed to the video's, and start the element if the clock runs.
    pub fn activate(&mut self, video: &Video, clock: &mut Clock, element: &mut dyn MediaElement) {
        self.original_rate = clock.rate;
        clock.set_rate(video.rate * direction_sign(self.original_rate));
        self.active = Some(video.id);

        element.set_position(video.media_position(clock.current_time));
        element.set_playback_rate(if clock.is_reversed() {
            REVERSE_CREEP_RATE
        } else {
            NORMAL_RATE
        });
        if clock.running {
            element.play();
        } else {
            element.pause();
        }
    }

    /// Per-tick correction while active.
    pub fn tick(&mut self, video: &Video, clock: &Clock, element: &mut dyn MediaElement) {
        debug_assert_eq!(self.active, Some(video.id));

        let elapsed = video.media_position(clock.current_time);
        if (element.position() - elapsed).abs() > DRIFT_TOLERANCE_SECONDS {
            element.set_position(elapsed);
        }

        let target_rate = if clock.is_reversed() {
            REVERSE_CREEP_RATE
        } else {
            NORMAL_RATE
        };
        if element.playback_rate() != target_rate {
            element.set_playback_rate(target_rate);
        }

        if clock.running && !element.is_playing() {
            element.play();
        } else if !clock.running && element.is_playing() {
            element.pause();
        }
    }

    /// The video became inactive: pause the element and give the clock its
    /// speed back, keeping whatever direction it has meanwhile taken.
    pub fn deactivate(&mut self, clock: &mut Clock, element: &mut dyn MediaElement) {
        element.pause();
        clock.set_rate(self.original_rate.abs() * clock.direction());
        self.active = None;
    }
}

impl Default for MediaSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

fn direction_sign(rate: f64) -> f64 {
    if rate < 0.0 {
        -1.0
    } else {
        1.0
    }
}
