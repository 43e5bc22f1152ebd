//! Video/image payloads and the external media element seam.

pub mod element;
pub mod video;

pub use element::MediaElement;
pub use video::{MediaError, MediaKind, Video, VideoRecord};
