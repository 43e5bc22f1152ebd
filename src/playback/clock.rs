//! The driving clock every other component synchronizes to.
//!
//! A signed rate encodes playback direction and speed in one value; the
//! timeline bounds grow when plain seeking steps past them. The clock is
//! created once at session start and only ever mutated by seek and
//! playback commands.

use std::time::Duration;

use crate::core::time::{from_seconds, Time};

/// The session clock: current instant, timeline bounds, signed rate.
#[derive(Debug, Clone)]
pub struct Clock {
    pub current_time: Time,
    pub start_bound: Time,
    pub stop_bound: Time,
    /// Signed playback rate: sign is direction, magnitude is the speed
    /// multiplier relative to wall time.
    pub rate: f64,
    pub running: bool,
}

impl Clock {
    pub fn new(start_bound: Time, stop_bound: Time) -> Self {
        debug_assert!(start_bound <= stop_bound);
        Self {
            current_time: start_bound,
            start_bound,
            stop_bound,
            rate: 1.0,
            running: false,
        }
    }

    /// Advance by a slice of wall time, scaled by the signed rate and
    /// clamped at the timeline bounds. No-op while paused.
    pub fn advance(&mut self, wall: Duration) {
        if !self.running {
            return;
        }
        let delta = from_seconds(wall.as_secs_f64() * self.rate);
        self.current_time =
            (self.current_time + delta).clamp(self.start_bound, self.stop_bound);
    }

    /// Move the clock to an instant inside the bounds. Committing a time
    /// outside the bounds is a programming error; seek expands the bounds
    /// first.
    pub fn set_current_time(&mut self, time: Time) {
        debug_assert!(
            time >= self.start_bound && time <= self.stop_bound,
            "clock committed outside its bounds"
        );
        self.current_time = time;
    }

    pub fn set_rate(&mut self, rate: f64) {
        debug_assert!(rate.is_finite());
        self.rate = rate;
    }

    /// Widen the bounds so they admit `time`. Never narrows.
    pub fn expand_to(&mut self, time: Time) {
        if time < self.start_bound {
            self.start_bound = time;
        }
        if time > self.stop_bound {
            self.stop_bound = time;
        }
    }

    pub fn play(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// +1.0 going forward, -1.0 going backward.
    pub fn direction(&self) -> f64 {
        if self.rate < 0.0 {
            -1.0
        } else {
            1.0
        }
    }

    pub fn is_reversed(&self) -> bool {
        self.rate < 0.0
    }

    /// Unsigned speed multiplier.
    pub fn multiplier(&self) -> f64 {
        self.rate.abs()
    }
}
