//! Tile pyramid indexing: which tiles are visible in a viewport and where
//! their rasters go on screen.
//!
//! Tile indices live in the square degree world (x and y in [-180, 180]),
//! so the viewport is expected to use the Web Mercator projection, as the
//! pyramid convention requires. The grid is snapped to the integer tile
//! zoom below the continuous viewport zoom, which keeps raster
//! magnification in [1, 2) and tile pixel coordinates small.

use crate::core::bounds::Bounds;
use crate::core::geo::Point;
use crate::core::viewport::Viewport;
use crate::transform::{Matrix, ViewportTransform};
use serde::{Deserialize, Serialize};

/// A tile address in the pyramid. The column is pre-wrapped into
/// [0, 2^z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileId {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileId {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Checks that both indices fit the pyramid at this zoom level.
    pub fn is_valid(&self) -> bool {
        let world = 1_u32 << self.z;
        self.x < world && self.y < world
    }
}

/// The integer tile range covering a viewport at a snapped tile zoom
/// level, plus the transform state to place the tile rasters.
///
/// Column bounds are kept unwrapped so a range straddling the ±180°
/// longitude seam stays contiguous; [`TileGrid::tiles`] wraps columns
/// modulo the world width when enumerating. Rows do not wrap and are
/// clamped to the valid range.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    /// Snapped integer tile zoom level, the floor of the viewport zoom.
    pub zoom: u8,
    /// Inclusive column range, unwrapped.
    pub x_min: i64,
    pub x_max: i64,
    /// Inclusive row range, clamped to [0, 2^zoom).
    pub y_min: i64,
    pub y_max: i64,
    /// Pre-rotation screen position of the snapped grid origin; within
    /// one scaled tile of the viewport's top-left corner at zero heading.
    pub layer_offset: Point,
    tile_size: u32,
    raster_scale: f64,
    zoom_factor: f64,
    rotation: f64,
    viewport_origin: Point,
}

impl TileGrid {
    /// Derives the visible tile range for the viewport's current state,
    /// snapped to `floor(zoom_level)`.
    pub fn compute(viewport: &Viewport) -> TileGrid {
        let zoom = viewport.zoom_level().floor().max(0.0) as u8;
        Self::compute_at(viewport, zoom)
    }

    /// Derives the visible tile range at an explicit tile zoom level.
    pub fn compute_at(viewport: &Viewport, zoom: u8) -> TileGrid {
        let size = viewport.size();
        let to_tile_index = tile_index_matrix(viewport.transform(), zoom);

        // The tile-index bounding box of the viewport rectangle; going
        // through all four corners keeps this correct under rotation.
        let mut index_bounds = Bounds::empty();
        for corner in Bounds::from_coords(0.0, 0.0, size.x, size.y).corners() {
            index_bounds.extend(&to_tile_index.transform(corner));
        }

        let world = 1_i64 << zoom;
        let x_min = index_bounds.min.x.floor() as i64;
        let x_max = index_bounds.max.x.floor() as i64;
        let y_min = (index_bounds.min.y.floor() as i64).clamp(0, world - 1);
        let y_max = (index_bounds.max.y.floor() as i64).clamp(0, world - 1);

        let tile_size = viewport.tile_size();
        let scale = viewport.projection().viewport_scale(viewport.zoom_level());
        // Raster pixels to screen pixels; one tile covers 360/2^z degrees
        let raster_scale = scale * 360.0 / (world as f64 * tile_size as f64);

        // Screen position of the snapped grid origin: its offset from the
        // center location in continuous-zoom pixels, measured from the
        // viewport origin.
        let center = viewport
            .projection()
            .location_to_point(viewport.center());
        let grid_px = Point::new(
            (x_min * tile_size as i64) as f64,
            (y_min * tile_size as i64) as f64,
        );
        let origin = viewport.viewport_origin();
        let layer_offset = Point::new(
            origin.x + grid_px.x * raster_scale - (180.0 + center.x) * scale,
            origin.y + grid_px.y * raster_scale - (180.0 - center.y) * scale,
        );

        log::trace!(
            "tile grid z{} cols {}..{} rows {}..{}",
            zoom,
            x_min,
            x_max,
            y_min,
            y_max
        );

        TileGrid {
            zoom,
            x_min,
            x_max,
            y_min,
            y_max,
            layer_offset,
            tile_size,
            raster_scale,
            zoom_factor: 2_f64.powf(viewport.zoom_level() - zoom as f64),
            rotation: viewport.heading(),
            viewport_origin: origin,
        }
    }

    /// Number of tile columns the world spans at this grid's zoom.
    pub fn world_width(&self) -> i64 {
        1_i64 << self.zoom
    }

    /// Raster magnification relative to the snapped tile zoom, in [1, 2).
    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    /// Visible tiles in row-major order with columns wrapped into
    /// [0, 2^z). A viewport wider than the world yields each wrapped
    /// column once.
    pub fn tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        let world = self.world_width();
        let span = (self.x_max - self.x_min + 1).min(world);

        (self.y_min..=self.y_max).flat_map(move |row| {
            (self.x_min..self.x_min + span).map(move |column| {
                TileId::new(column.rem_euclid(world) as u32, row as u32, self.zoom)
            })
        })
    }

    /// Grid-local raster position of an unwrapped column/row cell.
    pub fn tile_position(&self, column: i64, row: i64) -> Point {
        Point::new(
            ((column - self.x_min) * self.tile_size as i64) as f64,
            ((row - self.y_min) * self.tile_size as i64) as f64,
        )
    }

    /// Visible tiles paired with their grid-local raster positions.
    /// Unlike [`TileGrid::tiles`], a viewport wider than the world
    /// repeats wrapped tiles, once per world copy.
    pub fn placed(&self) -> impl Iterator<Item = (TileId, Point)> + '_ {
        let world = self.world_width();

        (self.y_min..=self.y_max).flat_map(move |row| {
            (self.x_min..=self.x_max).map(move |column| {
                (
                    TileId::new(column.rem_euclid(world) as u32, row as u32, self.zoom),
                    self.tile_position(column, row),
                )
            })
        })
    }

    /// Render transform mapping grid-local raster pixels to viewport
    /// pixels: scale by the fractional zoom factor, place the snapped
    /// grid origin, rotate about the viewport origin.
    pub fn render_transform(&self) -> Matrix {
        Matrix::scaling(self.raster_scale, self.raster_scale)
            .then(&Matrix::translation(
                self.layer_offset.x,
                self.layer_offset.y,
            ))
            .then(&Matrix::rotation_about(self.rotation, self.viewport_origin))
    }
}

/// View-to-tile-index transform at a tile zoom level: the inverse
/// viewport matrix back to map coordinates, shifted so the world's
/// north-west corner becomes the origin, scaled so one unit is one tile.
fn tile_index_matrix(transform: &ViewportTransform, zoom: u8) -> Matrix {
    let scale = (1_u64 << zoom) as f64 / 360.0;
    transform
        .inverse()
        .then(&Matrix::translation(180.0, -180.0))
        .then(&Matrix::scaling(scale, -scale))
}
