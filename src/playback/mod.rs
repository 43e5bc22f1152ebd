//! The tick-driven playback layer: clock, resolution, seeking and media
//! synchronization.

pub mod clock;
pub mod engine;
pub mod events;
pub mod media_sync;
pub mod resolver;
pub mod seek;

pub use clock::Clock;
pub use engine::{EngineCommand, EngineError, PlaybackEngine};
pub use events::{EngineEvent, EventBus};
pub use media_sync::MediaSynchronizer;
pub use resolver::{resolve_active, ActiveEntities, Resolver};
pub use seek::{SeekDirection, DEFAULT_STEP_SECONDS};
