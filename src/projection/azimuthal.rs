//! Azimuthal projections about a configurable center location.
//!
//! All variants share the same great-circle geometry: a location is mapped
//! through its azimuth and distance from the projection center, and only
//! the radial function differs per variant.

use super::{degrees_to_viewport_scale, Projection};
use crate::core::constants::{METERS_PER_DEGREE, WGS84_EQUATORIAL_RADIUS};
use crate::core::geo::{Location, Point};
use serde::{Deserialize, Serialize};

/// The radial mapping variants of the azimuthal family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AzimuthalKind {
    Stereographic,
    Gnomonic,
    Orthographic,
    Equidistant,
}

impl AzimuthalKind {
    /// Map distance in meters of a great-circle distance in radians.
    fn map_distance(&self, distance: f64) -> f64 {
        let radius = WGS84_EQUATORIAL_RADIUS;
        match self {
            Self::Stereographic => 2.0 * radius * (distance / 2.0).tan(),
            Self::Gnomonic => radius * distance.tan(),
            Self::Orthographic => radius * distance.sin(),
            Self::Equidistant => radius * distance,
        }
    }

    /// Great-circle distance in radians of a map distance in meters.
    fn distance(&self, map_distance: f64) -> f64 {
        let radius = WGS84_EQUATORIAL_RADIUS;
        match self {
            Self::Stereographic => 2.0 * (map_distance / (2.0 * radius)).atan(),
            Self::Gnomonic => (map_distance / radius).atan(),
            Self::Orthographic => (map_distance / radius).clamp(-1.0, 1.0).asin(),
            Self::Equidistant => map_distance / radius,
        }
    }
}

/// An azimuthal projection centered on a location. Map units are meters.
///
/// The projection center maps to exactly (0, 0). The antipodal point of
/// the center is outside the projection domain; gnomonic and orthographic
/// variants are further restricted to less than a quarter turn from the
/// center.
#[derive(Debug, Clone)]
pub struct Azimuthal {
    crs_id: String,
    kind: AzimuthalKind,
    center: Location,
    scale: f64,
}

impl Azimuthal {
    pub fn new(kind: AzimuthalKind, crs_id: &str) -> Self {
        Self {
            crs_id: crs_id.to_owned(),
            kind,
            center: Location::default(),
            scale: degrees_to_viewport_scale(0.0) / METERS_PER_DEGREE,
        }
    }

    // GeoServer non-standard AUTO2 identifiers
    pub fn stereographic() -> Self {
        Self::new(AzimuthalKind::Stereographic, "AUTO2:97002")
    }

    pub fn gnomonic() -> Self {
        Self::new(AzimuthalKind::Gnomonic, "AUTO2:97001")
    }

    pub fn equidistant() -> Self {
        Self::new(AzimuthalKind::Equidistant, "AUTO2:97003")
    }

    pub fn orthographic() -> Self {
        Self::new(AzimuthalKind::Orthographic, "AUTO2:42003")
    }

    pub fn with_center(mut self, center: Location) -> Self {
        self.center = center;
        self
    }

    pub fn kind(&self) -> AzimuthalKind {
        self.kind
    }
}

/// Azimuth (clockwise from north) and great-circle distance from one
/// location to another, both in radians.
pub fn azimuth_distance(from: &Location, to: &Location) -> (f64, f64) {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let cos_distance =
        (lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * delta_lng.cos()).clamp(-1.0, 1.0);
    let azimuth = (lat2.cos() * delta_lng.sin())
        .atan2(lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos());

    (azimuth, cos_distance.acos())
}

/// The location reached by walking a great circle from `from` along
/// `azimuth` for `distance` radians.
pub fn destination(from: &Location, azimuth: f64, distance: f64) -> Location {
    let lat = from.latitude.to_radians();
    let sin_lat = lat.sin() * distance.cos() + lat.cos() * distance.sin() * azimuth.cos();
    let latitude = sin_lat.clamp(-1.0, 1.0).asin();
    let delta_lng = (distance.sin() * azimuth.sin())
        .atan2(lat.cos() * distance.cos() - lat.sin() * distance.sin() * azimuth.cos());

    Location::new(
        latitude.to_degrees(),
        from.longitude + delta_lng.to_degrees(),
    )
}

impl Projection for Azimuthal {
    fn crs_id(&self) -> &str {
        &self.crs_id
    }

    fn location_to_point(&self, location: Location) -> Point {
        if location == self.center {
            return Point::new(0.0, 0.0);
        }

        let (azimuth, distance) = azimuth_distance(&self.center, &location);
        let map_distance = self.kind.map_distance(distance);

        Point::new(map_distance * azimuth.sin(), map_distance * azimuth.cos())
    }

    fn point_to_location(&self, point: Point) -> Location {
        if point.x == 0.0 && point.y == 0.0 {
            return self.center;
        }

        let azimuth = point.x.atan2(point.y);
        let map_distance = point.length();

        destination(&self.center, azimuth, self.kind.distance(map_distance))
    }

    fn viewport_scale(&self, zoom_level: f64) -> f64 {
        degrees_to_viewport_scale(zoom_level) / METERS_PER_DEGREE
    }

    fn set_zoom_level(&mut self, zoom_level: f64) {
        self.scale = self.viewport_scale(zoom_level);
    }

    fn map_scale(&self, _location: Location) -> Point {
        // Distance-true at the center; distortion away from it is
        // variant-specific and not modeled here.
        Point::new(self.scale, self.scale)
    }

    fn translate_location(&self, location: Location, translation: Point) -> Location {
        let azimuth = translation.x.atan2(-translation.y);
        let distance = translation.length() / (self.scale * WGS84_EQUATORIAL_RADIUS);

        destination(&location, azimuth, distance)
    }

    fn projection_center(&self) -> Location {
        self.center
    }

    fn set_projection_center(&mut self, center: Location) {
        self.center = center;
    }
}
