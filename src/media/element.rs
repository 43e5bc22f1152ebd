//! Abstraction over the external real-time media player.
//!
//! The engine never creates or owns player widgets; the rendering front-end
//! registers one element per video and the synchronizer drives it through
//! this seam. Positions and rates are in the element's own units: seconds
//! into the media, and a playback-speed multiplier.

/// External media element surface the synchronizer controls.
pub trait MediaElement {
    /// Current playback position, in seconds into the media.
    fn position(&self) -> f64;

    /// Force-seek the element to a position in seconds.
    fn set_position(&mut self, seconds: f64);

    /// The element's own playback rate multiplier.
    fn playback_rate(&self) -> f64;

    fn set_playback_rate(&mut self, rate: f64);

    fn play(&mut self);

    fn pause(&mut self);

    fn is_playing(&self) -> bool;
}
