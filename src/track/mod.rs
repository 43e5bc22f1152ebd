//! Flight tracks: raw position samples and the smoothed camera trajectory.

pub mod flight;
pub mod smoother;

pub use flight::{Flight, FlightError, FlightFix, FlightRecord, TrackSample};
pub use smoother::{TrackSmoother, DEFAULT_WINDOW};
