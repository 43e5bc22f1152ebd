//! Main playback engine coordinating the clock, resolver and media
//! synchronizer.
//!
//! Single-threaded and cooperative: every command and tick handler runs to
//! completion before the next one is processed, so resolver state is always
//! fully applied when the following tick arrives. The manual tick after a
//! seek commit is a plain synchronous call and never re-enters the seek.

use std::collections::HashMap;
use std::time::Duration;

use crossbeam::channel::Receiver;

use crate::core::interval::{EntityId, EntityRef};
use crate::core::pilot::PilotId;
use crate::core::time::Time;
use crate::core::timeline::{LoadError, Timeline};
use crate::media::element::MediaElement;
use crate::media::video::VideoRecord;
use crate::playback::clock::Clock;
use crate::playback::events::{EngineEvent, EventBus};
use crate::playback::media_sync::MediaSynchronizer;
use crate::playback::resolver::{resolve_active, ActiveEntities, Resolver};
use crate::playback::seek::{self, SeekDirection, DEFAULT_STEP_SECONDS};
use crate::track::flight::FlightRecord;

/// Command sent to the playback engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineCommand {
    Play,
    Pause,
    /// Advance the clock by a slice of wall time.
    Advance(Duration),
    /// Keyboard-driven seek.
    Seek { direction: SeekDirection, snap: bool },
    SelectPilot(PilotId),
    NextPilot,
    PreviousPilot,
}

/// Error type for engine commands
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("no pilot with id {id}")]
    UnknownPilot { id: PilotId },
}

/// The tick-driven synchronization engine.
pub struct PlaybackEngine {
    timeline: Timeline,
    clock: Clock,
    resolver: Resolver,
    synchronizer: MediaSynchronizer,
    elements: HashMap<EntityId, Box<dyn MediaElement>>,
    events: EventBus,
    active_pilot: PilotId,
    /// Whether the clock bounds have been initialized from content.
    content_seen: bool,
    /// Plain-seek step before rate scaling, in seconds.
    pub step_seconds: f64,
}

impl PlaybackEngine {
    /// Create an engine over loaded content. Returns the engine and the
    /// receiving half of its event stream.
    pub fn new(timeline: Timeline) -> (Self, Receiver<EngineEvent>) {
        let (events, rx) = EventBus::new();
        let bounds = timeline.bounds();
        let (start, stop) = bounds.unwrap_or((0, 0));
        // the first real pilot starts active; the any-pilot if none exist
        let active_pilot = if timeline.roster.len() > 1 { 1 } else { 0 };

        let engine = Self {
            timeline,
            clock: Clock::new(start, stop),
            resolver: Resolver::new(),
            synchronizer: MediaSynchronizer::new(),
            elements: HashMap::new(),
            events,
            active_pilot,
            content_seen: bounds.is_some(),
            step_seconds: DEFAULT_STEP_SECONDS,
        };
        (engine, rx)
    }

    /// Hand the engine the front-end's media element for a video. Videos
    /// without an element (images, failed loads) still produce change
    /// events but are not rate/position synchronized.
    pub fn register_element(&mut self, video: EntityId, element: Box<dyn MediaElement>) {
        self.elements.insert(video, element);
    }

    /// Ingest a flight and widen the clock bounds to cover it.
    pub fn add_flight(
        &mut self,
        pilot: PilotId,
        record: FlightRecord,
    ) -> Result<EntityId, LoadError> {
        let id = self.timeline.add_flight(pilot, record)?;
        self.cover_content_bounds();
        Ok(id)
    }

    /// Ingest a video/image and widen the clock bounds to cover it.
    pub fn add_video(&mut self, record: VideoRecord) -> Result<EntityId, LoadError> {
        let id = self.timeline.add_video(record)?;
        self.cover_content_bounds();
        Ok(id)
    }

    /// Remove a flight; the next tick resolves any active-entity fallout.
    pub fn remove_flight(&mut self, id: EntityId) {
        self.timeline.remove_flight(id);
        self.tick();
    }

    /// Remove a video; the next tick resolves any active-entity fallout.
    pub fn remove_video(&mut self, id: EntityId) {
        if self.synchronizer.active() == Some(id) {
            if let Some(element) = self.elements.get_mut(&id) {
                self.synchronizer.deactivate(&mut self.clock, element.as_mut());
            }
        }
        self.elements.remove(&id);
        self.timeline.remove_video(id);
        self.tick();
    }

    pub fn process_command(&mut self, command: EngineCommand) -> Result<(), EngineError> {
        match command {
            EngineCommand::Play => self.play(),
            EngineCommand::Pause => self.pause(),
            EngineCommand::Advance(wall) => self.advance(wall),
            EngineCommand::Seek { direction, snap } => {
                self.seek(direction, snap);
            }
            EngineCommand::SelectPilot(pilot) => self.set_active_pilot(pilot)?,
            EngineCommand::NextPilot => {
                self.set_active_pilot(self.timeline.roster.next(self.active_pilot))?
            }
            EngineCommand::PreviousPilot => {
                self.set_active_pilot(self.timeline.roster.previous(self.active_pilot))?
            }
        }
        Ok(())
    }

    pub fn play(&mut self) {
        self.clock.play();
        self.tick();
    }

    pub fn pause(&mut self) {
        self.clock.pause();
        self.tick();
    }

    /// Natural clock progression: scale the wall-time slice and fan out.
    pub fn advance(&mut self, wall: Duration) {
        self.clock.advance(wall);
        self.tick();
    }

    /// Keyboard-driven seek: commit the new clock time, then fan out a
    /// manual tick so dependents react immediately rather than on the next
    /// natural tick.
    pub fn seek(&mut self, direction: SeekDirection, snap: bool) -> Time {
        let target = seek::seek(
            &mut self.clock,
            self.timeline.global(),
            direction,
            snap,
            self.step_seconds,
        );
        self.tick();
        target
    }

    pub fn set_active_pilot(&mut self, pilot: PilotId) -> Result<(), EngineError> {
        if pilot >= self.timeline.roster.len() {
            return Err(EngineError::UnknownPilot { id: pilot });
        }
        if pilot != self.active_pilot {
            let old = self.active_pilot;
            self.active_pilot = pilot;
            self.events.emit(EngineEvent::PilotChanged { old, new: pilot });
            self.tick();
        }
        Ok(())
    }

    /// One resolver pass plus media synchronization, at the current clock
    /// time. Runs to completion; never suspends, never re-enters a seek.
    pub fn tick(&mut self) {
        let time = self.clock.current_time;
        let transitions = {
            let pilot = self.timeline.roster.pilot(self.active_pilot);
            let any = self.timeline.roster.any();
            self.resolver.tick(time, pilot, any)
        };

        if let Some((old, new)) = transitions.flight {
            self.events.emit(EngineEvent::FlightChanged {
                old: old.map(EntityRef::id),
                new: new.map(EntityRef::id),
            });
        }

        if let Some((old, new)) = transitions.video {
            if let Some(reference) = old {
                let id = reference.id();
                if self.synchronizer.active() == Some(id) {
                    if let Some(element) = self.elements.get_mut(&id) {
                        self.synchronizer.deactivate(&mut self.clock, element.as_mut());
                    }
                }
            }
            if let Some(reference) = new {
                let id = reference.id();
                if let (Some(video), Some(element)) =
                    (self.timeline.video(id), self.elements.get_mut(&id))
                {
                    self.synchronizer.activate(video, &mut self.clock, element.as_mut());
                }
            }
            self.events.emit(EngineEvent::VideoChanged {
                old: old.map(EntityRef::id),
                new: new.map(EntityRef::id),
            });
        }

        if let Some(id) = self.synchronizer.active() {
            if let (Some(video), Some(element)) =
                (self.timeline.video(id), self.elements.get_mut(&id))
            {
                self.synchronizer.tick(video, &self.clock, element.as_mut());
            }
        }
    }

    /// Pure point query: active flight and video for a pilot at a time.
    pub fn resolve_active(&self, time: Time, pilot: PilotId) -> ActiveEntities {
        resolve_active(
            time,
            self.timeline.roster.pilot(pilot),
            self.timeline.roster.any(),
        )
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub fn active_pilot(&self) -> PilotId {
        self.active_pilot
    }

    /// Make the clock bounds cover the loaded content. The first load sets
    /// the bounds outright; later loads only widen, so seek-driven
    /// expansion is never undone.
    fn cover_content_bounds(&mut self) {
        if let Some((start, stop)) = self.timeline.bounds() {
            if self.content_seen {
                self.clock.expand_to(start);
                self.clock.expand_to(stop);
            } else {
                self.content_seen = true;
                self.clock.start_bound = start;
                self.clock.stop_bound = stop;
                self.clock.current_time = start;
            }
        }
    }
}
