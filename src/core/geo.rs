//! Geographic position type used by flight trajectories.
//!
//! Positions are plain WGS84 coordinates with altitude in meters. The engine
//! only needs component-wise arithmetic (running sums for smoothing, linear
//! interpolation between fixes); projection math lives in the rendering
//! collaborator.

use std::ops::{Add, AddAssign, Div, Sub, SubAssign};

/// A geographic point: latitude/longitude in degrees, altitude in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Linear interpolation between two points, `t` in [0, 1].
    pub fn lerp(self, other: GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude + (other.latitude - self.latitude) * t,
            longitude: self.longitude + (other.longitude - self.longitude) * t,
            altitude: self.altitude + (other.altitude - self.altitude) * t,
        }
    }
}

impl Add for GeoPoint {
    type Output = GeoPoint;

    fn add(self, rhs: GeoPoint) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude + rhs.latitude,
            longitude: self.longitude + rhs.longitude,
            altitude: self.altitude + rhs.altitude,
        }
    }
}

impl AddAssign for GeoPoint {
    fn add_assign(&mut self, rhs: GeoPoint) {
        self.latitude += rhs.latitude;
        self.longitude += rhs.longitude;
        self.altitude += rhs.altitude;
    }
}

impl Sub for GeoPoint {
    type Output = GeoPoint;

    fn sub(self, rhs: GeoPoint) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude - rhs.latitude,
            longitude: self.longitude - rhs.longitude,
            altitude: self.altitude - rhs.altitude,
        }
    }
}

impl SubAssign for GeoPoint {
    fn sub_assign(&mut self, rhs: GeoPoint) {
        self.latitude -= rhs.latitude;
        self.longitude -= rhs.longitude;
        self.altitude -= rhs.altitude;
    }
}

impl Div<f64> for GeoPoint {
    type Output = GeoPoint;

    fn div(self, rhs: f64) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude / rhs,
            longitude: self.longitude / rhs,
            altitude: self.altitude / rhs,
        }
    }
}
