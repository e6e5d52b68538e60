//! Headless demo: drive a viewport through pan/zoom/rotate gestures and
//! print the tile indices and transforms a renderer would consume.

use mapview::{Location, MapConfig, Point, Viewport};

fn main() -> mapview::Result<()> {
    env_logger::init();

    let config = MapConfig::default();
    let mut viewport = Viewport::from_config(
        &config,
        Location::new(52.5, 13.4),
        10.0,
        Point::new(800.0, 600.0),
    )?;

    viewport.set_heading(30.0)?;
    viewport.translate(Point::new(120.0, -40.0))?;
    viewport.zoom_around(11.5, Point::new(400.0, 300.0))?;

    println!(
        "center {:.4}, {:.4} at zoom {:.1}, heading {:.0}",
        viewport.center().latitude,
        viewport.center().longitude,
        viewport.zoom_level(),
        viewport.heading()
    );
    println!("viewport matrix: {:?}", viewport.transform().matrix());

    let grid = viewport.tile_grid();
    println!(
        "tile zoom {} ({} columns, {} rows), magnification {:.3}",
        grid.zoom,
        grid.x_max - grid.x_min + 1,
        grid.y_max - grid.y_min + 1,
        grid.zoom_factor()
    );
    println!("render transform: {:?}", grid.render_transform());

    for (tile, position) in grid.placed().take(6) {
        println!(
            "tile z{} x{} y{} at local ({:.0}, {:.0})",
            tile.z, tile.x, tile.y, position.x, position.y
        );
    }

    Ok(())
}
