//! Coordinate projections between geographic locations and planar map
//! coordinates.
//!
//! Each projection is a small value type implementing [`Projection`];
//! [`for_crs`] creates one from its coordinate reference system
//! identifier.

pub mod azimuthal;
pub mod mercator;

pub use azimuthal::{Azimuthal, AzimuthalKind};
pub use mercator::{Equirectangular, WebMercator, WorldMercator};

use crate::core::constants::TILE_SIZE;
use crate::core::geo::{Location, Point};
use fxhash::FxHashMap;
use once_cell::sync::Lazy;

/// Bidirectional mapping between geographic locations and projected map
/// coordinates, plus the scale queries the viewport needs.
///
/// A projection carries the viewport scale for the current zoom level; it
/// is mutated only through [`Projection::set_zoom_level`] and (for
/// azimuthal variants) [`Projection::set_projection_center`], by the
/// single writer driving viewport state. All other operations are pure.
pub trait Projection: std::fmt::Debug + Send + Sync {
    /// Coordinate reference system identifier, e.g. "EPSG:3857".
    fn crs_id(&self) -> &str;

    /// Projects a location to map coordinates.
    fn location_to_point(&self, location: Location) -> Point;

    /// Projects map coordinates back to a location.
    fn point_to_location(&self, point: Point) -> Location;

    /// Pixels per map coordinate unit at the given zoom level. Strictly
    /// increasing in the zoom level.
    fn viewport_scale(&self, zoom_level: f64) -> f64;

    /// Stores the viewport scale for the given zoom level; used by
    /// [`Projection::map_scale`] and [`Projection::translate_location`].
    fn set_zoom_level(&mut self, zoom_level: f64);

    /// Ground scale factors in pixels per meter at a location, at the
    /// stored zoom level. Latitude-dependent for conformal cylindrical
    /// projections.
    fn map_scale(&self, location: Location) -> Point;

    /// The location reached by moving a pixel-space translation away from
    /// `location` (x right, y down, no heading applied), compensating for
    /// the projection's local scale distortion.
    fn translate_location(&self, location: Location, translation: Point) -> Location;

    /// Highest latitude the projection maps to a finite point.
    fn max_latitude(&self) -> f64 {
        90.0
    }

    /// Center of an azimuthal projection. Cylindrical projections have no
    /// center and return the default location.
    fn projection_center(&self) -> Location {
        Location::default()
    }

    /// Moves the center of an azimuthal projection; a no-op for
    /// cylindrical projections.
    fn set_projection_center(&mut self, _center: Location) {}
}

/// Pixels per degree at a zoom level, for the standard 256 pixel tile:
/// the world square is `256 * 2^zoom` pixels across 360 degrees.
pub(crate) fn degrees_to_viewport_scale(zoom_level: f64) -> f64 {
    TILE_SIZE as f64 * 2_f64.powf(zoom_level) / 360.0
}

type ProjectionFactory = fn() -> Box<dyn Projection>;

static REGISTRY: Lazy<FxHashMap<&'static str, ProjectionFactory>> = Lazy::new(|| {
    let mut registry: FxHashMap<&'static str, ProjectionFactory> = FxHashMap::default();
    registry.insert("EPSG:3857", || Box::new(WebMercator::new()));
    registry.insert("EPSG:3395", || Box::new(WorldMercator::new()));
    registry.insert("EPSG:4326", || Box::new(Equirectangular::new()));
    registry.insert("AUTO2:97001", || Box::new(Azimuthal::gnomonic()));
    registry.insert("AUTO2:97002", || Box::new(Azimuthal::stereographic()));
    registry.insert("AUTO2:97003", || Box::new(Azimuthal::equidistant()));
    registry.insert("AUTO2:42003", || Box::new(Azimuthal::orthographic()));
    registry
});

/// Creates the projection registered for a CRS identifier.
pub fn for_crs(crs_id: &str) -> Option<Box<dyn Projection>> {
    REGISTRY.get(crs_id).map(|factory| factory())
}

/// All CRS identifiers the registry knows.
pub fn registered_crs_ids() -> Vec<&'static str> {
    let mut ids: Vec<_> = REGISTRY.keys().copied().collect();
    ids.sort_unstable();
    ids
}
