//! Engine event fan-out.
//!
//! Consumers (camera controller, media widgets, timeline UI) subscribe to
//! one channel and receive a notification only when an active entity
//! actually changes, never per tick.

use crossbeam::channel::{self, Receiver, Sender};

use crate::core::interval::EntityId;
use crate::core::pilot::PilotId;

/// Change notification emitted by the playback engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    FlightChanged {
        old: Option<EntityId>,
        new: Option<EntityId>,
    },
    VideoChanged {
        old: Option<EntityId>,
        new: Option<EntityId>,
    },
    PilotChanged {
        old: PilotId,
        new: PilotId,
    },
}

/// Sending half of the engine's event stream.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: Sender<EngineEvent>,
}

impl EventBus {
    pub fn new() -> (Self, Receiver<EngineEvent>) {
        let (tx, rx) = channel::unbounded();
        (Self { tx }, rx)
    }

    /// Deliver an event. A disconnected receiver is ignored; the engine
    /// keeps working without listeners.
    pub fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}
