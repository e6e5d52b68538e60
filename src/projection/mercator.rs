//! Cylindrical projections: the spherical Web Mercator used by the tile
//! pyramid, the elliptical World Mercator, and the linear Equirectangular
//! projection.

use super::{degrees_to_viewport_scale, Projection};
use crate::core::constants::{
    MERCATOR_MAX_ITERATIONS, MERCATOR_TOLERANCE, METERS_PER_DEGREE, WGS84_ECCENTRICITY,
};
use crate::core::geo::{Location, Point};
use std::f64::consts::PI;

/// Latitude of the top edge of the square Web Mercator world (y = 180).
pub const WEB_MERCATOR_MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Spherical Mercator, EPSG:3857.
///
/// Map units are degree-equivalent: longitude maps linearly to x, and the
/// world fits the [-180, 180] square that the tile pyramid indexes.
#[derive(Debug, Clone)]
pub struct WebMercator {
    crs_id: String,
    scale: f64,
}

impl WebMercator {
    pub fn new() -> Self {
        Self::with_crs_id("EPSG:3857")
    }

    pub fn with_crs_id(crs_id: &str) -> Self {
        Self {
            crs_id: crs_id.to_owned(),
            scale: degrees_to_viewport_scale(0.0),
        }
    }

    /// The y coordinate of a latitude in degree-equivalent units.
    /// Latitudes at or beyond the poles map to signed infinity.
    pub fn latitude_to_y(latitude: f64) -> f64 {
        if latitude <= -90.0 {
            return f64::NEG_INFINITY;
        }
        if latitude >= 90.0 {
            return f64::INFINITY;
        }
        (latitude.to_radians() / 2.0 + PI / 4.0).tan().ln().to_degrees()
    }

    /// Closed-form inverse of [`WebMercator::latitude_to_y`].
    pub fn y_to_latitude(y: f64) -> f64 {
        (PI / 2.0 - 2.0 * (-y.to_radians()).exp().atan()).to_degrees()
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self::new()
    }
}

impl Projection for WebMercator {
    fn crs_id(&self) -> &str {
        &self.crs_id
    }

    fn location_to_point(&self, location: Location) -> Point {
        Point::new(location.longitude, Self::latitude_to_y(location.latitude))
    }

    fn point_to_location(&self, point: Point) -> Location {
        Location::new(Self::y_to_latitude(point.y), point.x)
    }

    fn viewport_scale(&self, zoom_level: f64) -> f64 {
        degrees_to_viewport_scale(zoom_level)
    }

    fn set_zoom_level(&mut self, zoom_level: f64) {
        self.scale = self.viewport_scale(zoom_level);
    }

    fn map_scale(&self, location: Location) -> Point {
        let scale = self.scale / (METERS_PER_DEGREE * location.latitude.to_radians().cos());
        Point::new(scale, scale)
    }

    fn translate_location(&self, location: Location, translation: Point) -> Location {
        let scale_x = self.scale;
        let scale_y = scale_x / location.latitude.to_radians().cos();

        Location::new(
            location.latitude - translation.y / scale_y,
            location.longitude + translation.x / scale_x,
        )
    }

    fn max_latitude(&self) -> f64 {
        WEB_MERCATOR_MAX_LATITUDE
    }
}

/// Elliptical "World Mercator", EPSG:3395. Map units are meters.
///
/// The latitude transform follows the ellipsoidal Mercator equations from
/// "Map Projections - A Working Manual" (USGS PP 1395), p. 44.
#[derive(Debug, Clone)]
pub struct WorldMercator {
    crs_id: String,
    scale: f64,
    max_latitude: f64,
}

impl WorldMercator {
    pub fn new() -> Self {
        Self::with_crs_id("EPSG:3395")
    }

    pub fn with_crs_id(crs_id: &str) -> Self {
        Self {
            crs_id: crs_id.to_owned(),
            scale: degrees_to_viewport_scale(0.0) / METERS_PER_DEGREE,
            max_latitude: Self::y_to_latitude(180.0),
        }
    }

    /// The y coordinate of a latitude in degree-equivalent units on the
    /// WGS84 ellipsoid. Latitudes at or beyond the poles map to signed
    /// infinity.
    pub fn latitude_to_y(latitude: f64) -> f64 {
        if latitude <= -90.0 {
            return f64::NEG_INFINITY;
        }
        if latitude >= 90.0 {
            return f64::INFINITY;
        }
        let lat = latitude.to_radians();
        ((lat / 2.0 + PI / 4.0).tan() * conformal_factor(lat))
            .ln()
            .to_degrees()
    }

    /// The latitude of a y coordinate. There is no closed form; the
    /// latitude is recovered by fixed-point iteration seeded with the
    /// spherical inverse, stopping once the step drops below
    /// [`MERCATOR_TOLERANCE`] (about one meter of ground distance) or
    /// after [`MERCATOR_MAX_ITERATIONS`]. Hitting the cap returns the
    /// last iterate, a sub-meter approximation.
    pub fn y_to_latitude(y: f64) -> f64 {
        let t = (-y.to_radians()).exp();
        let mut lat = PI / 2.0 - 2.0 * t.atan();
        let mut delta = 1.0;

        for _ in 0..MERCATOR_MAX_ITERATIONS {
            if delta <= MERCATOR_TOLERANCE {
                break;
            }
            let next = PI / 2.0 - 2.0 * (t * conformal_factor(lat)).atan();
            delta = (next - lat).abs();
            lat = next;
        }

        lat.to_degrees()
    }
}

impl Default for WorldMercator {
    fn default() -> Self {
        Self::new()
    }
}

impl Projection for WorldMercator {
    fn crs_id(&self) -> &str {
        &self.crs_id
    }

    fn location_to_point(&self, location: Location) -> Point {
        Point::new(
            METERS_PER_DEGREE * location.longitude,
            METERS_PER_DEGREE * Self::latitude_to_y(location.latitude),
        )
    }

    fn point_to_location(&self, point: Point) -> Location {
        Location::new(
            Self::y_to_latitude(point.y / METERS_PER_DEGREE),
            point.x / METERS_PER_DEGREE,
        )
    }

    fn viewport_scale(&self, zoom_level: f64) -> f64 {
        degrees_to_viewport_scale(zoom_level) / METERS_PER_DEGREE
    }

    fn set_zoom_level(&mut self, zoom_level: f64) {
        self.scale = self.viewport_scale(zoom_level);
    }

    fn map_scale(&self, location: Location) -> Point {
        let lat = location.latitude.to_radians();
        let e_sin_lat = WGS84_ECCENTRICITY * lat.sin();
        let scale = self.scale * (1.0 - e_sin_lat * e_sin_lat).sqrt() / lat.cos();
        Point::new(scale, scale)
    }

    fn translate_location(&self, location: Location, translation: Point) -> Location {
        let scale_x = METERS_PER_DEGREE * self.scale;
        let scale_y = scale_x / location.latitude.to_radians().cos();

        Location::new(
            location.latitude - translation.y / scale_y,
            location.longitude + translation.x / scale_x,
        )
    }

    fn max_latitude(&self) -> f64 {
        self.max_latitude
    }
}

fn conformal_factor(lat: f64) -> f64 {
    let e_sin_lat = WGS84_ECCENTRICITY * lat.sin();
    ((1.0 - e_sin_lat) / (1.0 + e_sin_lat)).powf(WGS84_ECCENTRICITY / 2.0)
}

/// Equirectangular plate carrée projection, EPSG:4326: degrees map to map
/// units unchanged.
#[derive(Debug, Clone)]
pub struct Equirectangular {
    crs_id: String,
    scale: f64,
}

impl Equirectangular {
    pub fn new() -> Self {
        Self::with_crs_id("EPSG:4326")
    }

    pub fn with_crs_id(crs_id: &str) -> Self {
        Self {
            crs_id: crs_id.to_owned(),
            scale: degrees_to_viewport_scale(0.0),
        }
    }
}

impl Default for Equirectangular {
    fn default() -> Self {
        Self::new()
    }
}

impl Projection for Equirectangular {
    fn crs_id(&self) -> &str {
        &self.crs_id
    }

    fn location_to_point(&self, location: Location) -> Point {
        Point::new(location.longitude, location.latitude)
    }

    fn point_to_location(&self, point: Point) -> Location {
        Location::new(point.y, point.x)
    }

    fn viewport_scale(&self, zoom_level: f64) -> f64 {
        degrees_to_viewport_scale(zoom_level)
    }

    fn set_zoom_level(&mut self, zoom_level: f64) {
        self.scale = self.viewport_scale(zoom_level);
    }

    fn map_scale(&self, location: Location) -> Point {
        Point::new(
            self.scale / (METERS_PER_DEGREE * location.latitude.to_radians().cos()),
            self.scale / METERS_PER_DEGREE,
        )
    }

    fn translate_location(&self, location: Location, translation: Point) -> Location {
        Location::new(
            location.latitude - translation.y / self.scale,
            location.longitude + translation.x / self.scale,
        )
    }
}
