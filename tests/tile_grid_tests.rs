//! Visible-tile derivation, seam wrapping and render transform placement.

use mapview::{Location, Point, TileGrid, TileId, Viewport};
use std::collections::HashSet;

fn viewport(center: Location, zoom: f64) -> Viewport {
    Viewport::new(center, zoom, Point::new(512.0, 512.0)).unwrap()
}

#[test]
fn columns_wrap_across_the_antimeridian() {
    let viewport = viewport(Location::new(0.0, 179.0), 2.0);
    let grid = viewport.tile_grid();

    let first_row: Vec<u32> = grid
        .tiles()
        .filter(|tile| tile.y as i64 == grid.y_min)
        .map(|tile| tile.x)
        .collect();

    // At z=2 the world is 4 columns wide; a viewport centered at 179°
    // must see columns 3 and 0 adjacently, never a column 4
    assert!(first_row.windows(2).any(|pair| pair == [3, 0]));
    assert!(first_row.iter().all(|column| *column < 4));

    // No duplicates within a row
    let unique: HashSet<u32> = first_row.iter().copied().collect();
    assert_eq!(unique.len(), first_row.len());
}

#[test]
fn every_tile_id_is_pre_wrapped_and_valid() {
    for longitude in [-180.0, -179.0, -90.5, 0.0, 90.5, 179.0, 180.0] {
        let viewport = viewport(Location::new(10.0, longitude), 4.7);
        for tile in viewport.tile_grid().tiles() {
            assert!(tile.is_valid(), "invalid tile {:?} at lon {}", tile, longitude);
            assert_eq!(tile.z, 4);
        }
    }
}

#[test]
fn rows_clamp_instead_of_wrapping() {
    // A viewport pushed to the top of the world must not report negative
    // or out-of-range rows
    let viewport = viewport(Location::new(85.0, 0.0), 1.0);
    let grid = viewport.tile_grid();

    assert!(grid.y_min >= 0);
    assert!(grid.y_max < grid.world_width());
    for tile in grid.tiles() {
        assert!((tile.y as i64) < grid.world_width());
    }
}

#[test]
fn grid_covers_the_whole_viewport() {
    // Every sampled pixel must fall inside some visible tile
    let mut viewport = viewport(Location::new(37.7, -122.4), 11.3);
    viewport.set_heading(25.0).unwrap();
    let grid = viewport.tile_grid();

    let world = grid.world_width() as f64;
    let inverse = viewport.transform().inverse();
    for sx in 0..=8 {
        for sy in 0..=8 {
            let pixel = Point::new(sx as f64 * 64.0, sy as f64 * 64.0);
            let map = inverse.transform(pixel);
            let column = ((map.x + 180.0) / 360.0 * world).floor() as i64;
            let row = ((180.0 - map.y) / 360.0 * world).floor() as i64;
            assert!(
                column >= grid.x_min && column <= grid.x_max,
                "column {} outside {}..{}",
                column,
                grid.x_min,
                grid.x_max
            );
            assert!(row >= grid.y_min && row <= grid.y_max);
        }
    }
}

#[test]
fn tile_positions_step_by_one_tile_size() {
    let grid = viewport(Location::new(48.1, 11.5), 6.0).tile_grid();

    let origin = grid.tile_position(grid.x_min, grid.y_min);
    assert_eq!(origin, Point::new(0.0, 0.0));

    let next = grid.tile_position(grid.x_min + 1, grid.y_min + 2);
    assert_eq!(next, Point::new(256.0, 512.0));
}

#[test]
fn placed_tiles_align_with_the_viewport_transform() {
    let mut viewport = viewport(Location::new(52.5, 13.4), 9.6);
    viewport.set_heading(110.0).unwrap();
    let grid = viewport.tile_grid();
    let render = grid.render_transform();
    let world = grid.world_width() as f64;

    for (row_offset, column_offset) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
        let column = grid.x_min + column_offset;
        let row = grid.y_min + row_offset;

        // North-west corner of the tile in map degrees
        let corner_map = Point::new(
            column as f64 * 360.0 / world - 180.0,
            180.0 - row as f64 * 360.0 / world,
        );
        let expected = viewport.transform().map_to_view(corner_map);
        let actual = render.transform(grid.tile_position(column, row));

        assert!((expected.x - actual.x).abs() < 1e-6);
        assert!((expected.y - actual.y).abs() < 1e-6);
    }
}

#[test]
fn layer_offset_stays_within_one_tile_when_unrotated() {
    for (longitude, zoom) in [(7.0, 3.0), (13.4, 7.8), (179.5, 5.2), (-122.4, 12.1)] {
        let grid = viewport(Location::new(20.0, longitude), zoom).tile_grid();
        let tile_screen_size = 256.0 * grid.zoom_factor();

        assert!(grid.layer_offset.x <= 0.0 && grid.layer_offset.x > -tile_screen_size);
        assert!(grid.layer_offset.y <= 0.0 && grid.layer_offset.y > -tile_screen_size);
    }
}

#[test]
fn deeper_zoom_reuses_explicit_tile_level() {
    let viewport = viewport(Location::new(52.5, 13.4), 9.6);
    let grid = TileGrid::compute_at(&viewport, 8);

    assert_eq!(grid.zoom, 8);
    // Two levels below the continuous zoom the magnification leaves [1, 2)
    assert!(grid.zoom_factor() > 2.0);
    for tile in grid.tiles().take(4) {
        assert_eq!(tile.z, 8);
    }
}

#[test]
fn tile_ids_hash_and_compare() {
    let mut seen = HashSet::new();
    seen.insert(TileId::new(1, 2, 3));
    assert!(seen.contains(&TileId::new(1, 2, 3)));
    assert!(!seen.contains(&TileId::new(2, 1, 3)));
}
