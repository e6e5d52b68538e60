use crate::core::constants::WGS84_EQUATORIAL_RADIUS;
use serde::{Deserialize, Serialize};

/// A geographic coordinate on the WGS84 ellipsoid, in degrees.
///
/// Values are immutable once constructed; equality is exact-degree
/// comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Creates a new Location, clamping latitude to [-90, 90] and wrapping
    /// longitude into (-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.clamp(-90.0, 90.0),
            longitude: Self::normalize_longitude(longitude),
        }
    }

    /// Wraps a longitude value into the (-180, 180] range.
    pub fn normalize_longitude(longitude: f64) -> f64 {
        let wrapped = longitude % 360.0;
        if wrapped > 180.0 {
            wrapped - 360.0
        } else if wrapped <= -180.0 {
            wrapped + 360.0
        } else {
            wrapped
        }
    }

    /// Great-circle distance to another location in meters, using the
    /// haversine formula on the equatorial sphere.
    pub fn great_circle_distance(&self, other: &Location) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lng = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        WGS84_EQUATORIAL_RADIUS * c
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A point in projected-plane or pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
