//! Active-entity resolution: which flight and which video are live at the
//! current clock time.

use crate::core::interval::EntityRef;
use crate::core::pilot::Pilot;
use crate::core::time::Time;

/// The entities active at one instant for one pilot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveEntities {
    pub flight: Option<EntityRef>,
    pub video: Option<EntityRef>,
}

/// Pure point query: the active flight and video for a pilot at `time`.
///
/// Videos fall back to the shared any-pilot bucket when the pilot has no
/// video of their own at that instant.
pub fn resolve_active(time: Time, pilot: &Pilot, any: &Pilot) -> ActiveEntities {
    let flight = pilot.flight_intervals.payload_at(time);
    let video = pilot.video_intervals.payload_at(time).or_else(|| {
        if pilot.ordinal != any.ordinal {
            any.video_intervals.payload_at(time)
        } else {
            None
        }
    });
    ActiveEntities { flight, video }
}

/// Transitions produced by one resolver pass. `None` means no change;
/// `Some((old, new))` fires exactly once per actual change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transitions {
    pub flight: Option<(Option<EntityRef>, Option<EntityRef>)>,
    pub video: Option<(Option<EntityRef>, Option<EntityRef>)>,
}

/// Tracks the currently-active entities across ticks and reports changes.
///
/// Comparison is by payload identity, never positional index: indices shift
/// on insert/remove, payload references do not.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    active_flight: Option<EntityRef>,
    active_video: Option<EntityRef>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_flight(&self) -> Option<EntityRef> {
        self.active_flight
    }

    pub fn active_video(&self) -> Option<EntityRef> {
        self.active_video
    }

    /// One resolver pass. Re-confirming the same entities is a no-op; only
    /// actual changes show up in the returned transitions.
    pub fn tick(&mut self, time: Time, pilot: &Pilot, any: &Pilot) -> Transitions {
        let resolved = resolve_active(time, pilot, any);
        let mut transitions = Transitions::default();

        if resolved.flight != self.active_flight {
            transitions.flight = Some((self.active_flight, resolved.flight));
            self.active_flight = resolved.flight;
        }
        if resolved.video != self.active_video {
            transitions.video = Some((self.active_video, resolved.video));
            self.active_video = resolved.video;
        }
        transitions
    }
}
