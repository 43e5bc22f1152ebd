//! Session state export.

pub mod snapshot;

pub use snapshot::{capture, SessionSnapshot, VideoSnapshot};
