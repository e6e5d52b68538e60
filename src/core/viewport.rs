use crate::core::bounds::Bounds;
use crate::core::config::MapConfig;
use crate::core::constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, TILE_SIZE};
use crate::core::geo::{Location, Point};
use crate::projection::{self, Projection, WebMercator};
use crate::tiles::TileGrid;
use crate::transform::ViewportTransform;
use crate::{MapError, Result};

/// Manages the current view of the map: center, zoom, heading and viewport
/// geometry, and keeps the composed [`ViewportTransform`] in sync.
///
/// The transform is an immutable value recomputed and swapped whole on
/// every state change, so concurrent readers can snapshot it via
/// [`Viewport::transform`] without observing a partial update. All
/// mutation happens through the setters below, from the single thread
/// driving viewport state.
#[derive(Debug)]
pub struct Viewport {
    center: Location,
    zoom_level: f64,
    heading: f64,
    size: Point,
    viewport_origin: Point,
    min_zoom: f64,
    max_zoom: f64,
    tile_size: u32,
    projection: Box<dyn Projection>,
    transform: ViewportTransform,
}

impl Viewport {
    /// Creates a Web Mercator viewport.
    pub fn new(center: Location, zoom_level: f64, size: Point) -> Result<Self> {
        Self::with_projection(Box::new(WebMercator::new()), center, zoom_level, size)
    }

    /// Creates a viewport over an explicit projection.
    pub fn with_projection(
        projection: Box<dyn Projection>,
        center: Location,
        zoom_level: f64,
        size: Point,
    ) -> Result<Self> {
        let mut viewport = Self {
            center: Location::default(),
            zoom_level: zoom_level.clamp(DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM),
            heading: 0.0,
            size,
            viewport_origin: size.multiply(0.5),
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            tile_size: TILE_SIZE,
            projection,
            transform: ViewportTransform::identity(),
        };
        viewport.center = viewport.clamp_center(center);
        viewport.rebuild()?;
        Ok(viewport)
    }

    /// Creates a viewport from a validated configuration.
    pub fn from_config(
        config: &MapConfig,
        center: Location,
        zoom_level: f64,
        size: Point,
    ) -> Result<Self> {
        config.validate()?;
        let mut viewport =
            Self::with_projection(config.projection()?, center, zoom_level, size)?;
        viewport.tile_size = config.tile_size;
        viewport.set_zoom_limits(config.min_zoom, config.max_zoom)?;
        // Re-clamp the requested zoom against the configured limits rather
        // than the defaults
        viewport.set_zoom_level(zoom_level)?;
        Ok(viewport)
    }

    pub fn center(&self) -> Location {
        self.center
    }

    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    /// Map rotation in degrees, clockwise, in [0, 360).
    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn size(&self) -> Point {
        self.size
    }

    /// The pixel the center location is pinned to, normally the middle of
    /// the viewport.
    pub fn viewport_origin(&self) -> Point {
        self.viewport_origin
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn projection(&self) -> &dyn Projection {
        self.projection.as_ref()
    }

    /// Snapshot of the current map-to-view transform.
    pub fn transform(&self) -> &ViewportTransform {
        &self.transform
    }

    pub fn set_center(&mut self, center: Location) -> Result<()> {
        self.center = self.clamp_center(center);
        self.rebuild()
    }

    pub fn set_zoom_level(&mut self, zoom_level: f64) -> Result<()> {
        let clamped = zoom_level.clamp(self.min_zoom, self.max_zoom);
        if clamped != zoom_level {
            log::debug!("zoom level {} clamped to {}", zoom_level, clamped);
        }
        self.zoom_level = clamped;
        self.rebuild()
    }

    pub fn set_heading(&mut self, heading: f64) -> Result<()> {
        self.heading = heading.rem_euclid(360.0);
        self.rebuild()
    }

    pub fn set_size(&mut self, size: Point) -> Result<()> {
        // Keep the origin at the same relative position, the common case
        // being the viewport center
        let relative = Point::new(
            self.viewport_origin.x / self.size.x,
            self.viewport_origin.y / self.size.y,
        );
        self.size = size;
        self.viewport_origin = Point::new(size.x * relative.x, size.y * relative.y);
        self.rebuild()
    }

    pub fn set_viewport_origin(&mut self, origin: Point) -> Result<()> {
        self.viewport_origin = origin;
        self.rebuild()
    }

    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) -> Result<()> {
        if !(min_zoom <= max_zoom) {
            return Err(MapError::InvalidConfig(format!(
                "empty zoom range {}..{}",
                min_zoom, max_zoom
            )));
        }
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom_level = self.zoom_level.clamp(min_zoom, max_zoom);
        self.rebuild()
    }

    /// Replaces the projection, keeping center, zoom and heading.
    pub fn set_projection(&mut self, projection: Box<dyn Projection>) -> Result<()> {
        log::debug!("switching projection to {}", projection.crs_id());
        self.projection = projection;
        self.center = self.clamp_center(self.center);
        self.rebuild()
    }

    /// Replaces the projection by CRS identifier.
    pub fn set_crs(&mut self, crs_id: &str) -> Result<()> {
        let projection =
            projection::for_crs(crs_id).ok_or_else(|| MapError::UnknownCrs(crs_id.to_string()))?;
        self.set_projection(projection)
    }

    /// Projects a location to viewport pixels through the current
    /// transform.
    pub fn location_to_view(&self, location: Location) -> Point {
        self.transform
            .map_to_view(self.projection.location_to_point(location))
    }

    /// Maps a viewport pixel back to the location under it.
    pub fn view_to_location(&self, point: Point) -> Location {
        self.projection
            .point_to_location(self.transform.view_to_map(point))
    }

    /// Pans the map content by a pixel delta: what was under a pixel `p`
    /// ends up under `p + delta`, independent of latitude and heading.
    pub fn translate(&mut self, delta: Point) -> Result<()> {
        if delta.x == 0.0 && delta.y == 0.0 {
            return Ok(());
        }

        // Rotate the screen delta back into the unrotated map frame
        let delta = if self.heading != 0.0 {
            let (sin, cos) = self.heading.to_radians().sin_cos();
            Point::new(delta.x * cos + delta.y * sin, delta.y * cos - delta.x * sin)
        } else {
            delta
        };

        let center = self
            .projection
            .translate_location(self.center, Point::new(-delta.x, -delta.y));
        self.set_center(center)
    }

    /// Changes the zoom level while keeping the location under the `focus`
    /// pixel stationary.
    ///
    /// The transform is re-anchored at the focus pixel for the zoom step
    /// and restored afterwards, so no drift accumulates across repeated
    /// gestures.
    pub fn zoom_around(&mut self, zoom_level: f64, focus: Point) -> Result<()> {
        let origin = self.viewport_origin;
        let focus_location = self.view_to_location(focus);

        self.center = self.clamp_center(focus_location);
        self.viewport_origin = focus;
        self.zoom_level = zoom_level.clamp(self.min_zoom, self.max_zoom);
        self.rebuild()?;

        let center = self.view_to_location(origin);
        self.viewport_origin = origin;
        self.center = self.clamp_center(center);
        self.rebuild()
    }

    /// Geographic corner box of the (possibly rotated) viewport, as
    /// south-west and north-east locations.
    pub fn bounds(&self) -> (Location, Location) {
        let rect = Bounds::from_coords(0.0, 0.0, self.size.x, self.size.y);
        let mut south = f64::INFINITY;
        let mut west = f64::INFINITY;
        let mut north = f64::NEG_INFINITY;
        let mut east = f64::NEG_INFINITY;

        for corner in rect.corners() {
            let location = self.view_to_location(corner);
            south = south.min(location.latitude);
            west = west.min(location.longitude);
            north = north.max(location.latitude);
            east = east.max(location.longitude);
        }

        (Location::new(south, west), Location::new(north, east))
    }

    /// Derives the visible tile grid for the current state.
    pub fn tile_grid(&self) -> TileGrid {
        TileGrid::compute(self)
    }

    fn clamp_center(&self, center: Location) -> Location {
        let max_latitude = self.projection.max_latitude();
        Location::new(
            center.latitude.clamp(-max_latitude, max_latitude),
            center.longitude,
        )
    }

    fn rebuild(&mut self) -> Result<()> {
        self.projection.set_projection_center(self.center);
        self.projection.set_zoom_level(self.zoom_level);

        let scale = self.projection.viewport_scale(self.zoom_level);
        let map_origin = self.projection.location_to_point(self.center);
        self.transform =
            ViewportTransform::compose(scale, self.heading, map_origin, self.viewport_origin)?;
        Ok(())
    }
}
