//! Viewport transform composition, inversion and gesture behavior.

use mapview::{Location, MapConfig, MapError, Point, Viewport, ViewportTransform};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn berlin_viewport() -> Viewport {
    Viewport::new(Location::new(52.5, 13.4), 10.0, Point::new(800.0, 600.0)).unwrap()
}

#[test]
fn forward_inverse_round_trip_on_random_pixels() {
    let mut viewport = berlin_viewport();
    viewport.set_heading(47.0).unwrap();
    let transform = *viewport.transform();

    let mut rng = StdRng::seed_from_u64(0x6d61_7076);
    for _ in 0..1000 {
        let pixel = Point::new(rng.gen_range(-2000.0..2000.0), rng.gen_range(-2000.0..2000.0));
        let back = transform.map_to_view(transform.view_to_map(pixel));
        assert!((back.x - pixel.x).abs() < 1e-6);
        assert!((back.y - pixel.y).abs() < 1e-6);
    }
}

#[test]
fn degenerate_scale_is_rejected() {
    let origin = Point::new(400.0, 300.0);
    for scale in [0.0, -1.0, f64::NAN] {
        let result = ViewportTransform::compose(scale, 0.0, Point::new(0.0, 0.0), origin);
        assert!(matches!(result, Err(MapError::DegenerateScale(_))));
    }
}

#[test]
fn pan_moves_constant_pixels_at_any_latitude() {
    for latitude in [0.0, 45.0, 70.0] {
        let mut viewport =
            Viewport::new(Location::new(latitude, 5.0), 12.0, Point::new(800.0, 600.0)).unwrap();
        let before = viewport.center();

        viewport.translate(Point::new(64.0, -48.0)).unwrap();

        let view = viewport.location_to_view(before);
        assert!(
            (view.x - (400.0 + 64.0)).abs() < 0.1,
            "latitude {}: x {}",
            latitude,
            view.x
        );
        assert!(
            (view.y - (300.0 - 48.0)).abs() < 0.1,
            "latitude {}: y {}",
            latitude,
            view.y
        );
    }
}

#[test]
fn pan_respects_heading() {
    let mut viewport = berlin_viewport();
    viewport.set_heading(90.0).unwrap();
    let before = viewport.center();

    viewport.translate(Point::new(50.0, 0.0)).unwrap();

    // The content still moves 50 pixels to the right on screen
    let view = viewport.location_to_view(before);
    assert!((view.x - 450.0).abs() < 0.1);
    assert!((view.y - 300.0).abs() < 0.1);
}

#[test]
fn zoom_around_keeps_focus_location_fixed() {
    let mut viewport = berlin_viewport();
    let focus = Point::new(600.0, 150.0);
    let focus_location = viewport.view_to_location(focus);

    viewport.zoom_around(12.5, focus).unwrap();

    let location = viewport.view_to_location(focus);
    assert!((location.latitude - focus_location.latitude).abs() < 1e-6);
    assert!((location.longitude - focus_location.longitude).abs() < 1e-6);
    assert_eq!(viewport.zoom_level(), 12.5);
    // The origin anchor is restored after the gesture
    assert_eq!(viewport.viewport_origin(), Point::new(400.0, 300.0));
}

#[test]
fn repeated_zoom_gestures_do_not_drift() {
    let mut viewport = berlin_viewport();
    let focus = Point::new(123.0, 456.0);
    let focus_location = viewport.view_to_location(focus);

    for step in 0..20 {
        let zoom = 10.0 + (step % 5) as f64 * 0.7;
        viewport.zoom_around(zoom, focus).unwrap();
    }

    let location = viewport.view_to_location(focus);
    assert!((location.latitude - focus_location.latitude).abs() < 1e-6);
    assert!((location.longitude - focus_location.longitude).abs() < 1e-6);
}

#[test]
fn resize_keeps_center_pinned_to_relative_origin() {
    let mut viewport = berlin_viewport();
    let center = viewport.center();

    viewport.set_size(Point::new(400.0, 400.0)).unwrap();

    let view = viewport.location_to_view(center);
    assert!((view.x - 200.0).abs() < 1e-9);
    assert!((view.y - 200.0).abs() < 1e-9);
}

#[test]
fn bounds_contain_center() {
    let mut viewport = berlin_viewport();
    viewport.set_heading(33.0).unwrap();
    let (south_west, north_east) = viewport.bounds();
    let center = viewport.center();

    assert!(south_west.latitude < center.latitude && center.latitude < north_east.latitude);
    assert!(south_west.longitude < center.longitude && center.longitude < north_east.longitude);
}

#[test]
fn from_config_applies_limits_and_projection() {
    let config = MapConfig::from_json(
        r#"{"crs_id": "EPSG:3395", "min_zoom": 3, "max_zoom": 8}"#,
    )
    .unwrap();
    let viewport = Viewport::from_config(
        &config,
        Location::new(40.0, -3.7),
        12.0,
        Point::new(640.0, 480.0),
    )
    .unwrap();

    assert_eq!(viewport.projection().crs_id(), "EPSG:3395");
    assert_eq!(viewport.zoom_level(), 8.0);
}

#[test]
fn view_to_location_matches_location_to_view() {
    let mut viewport = berlin_viewport();
    viewport.set_heading(215.0).unwrap();

    let location = Location::new(52.52, 13.38);
    let view = viewport.location_to_view(location);
    let back = viewport.view_to_location(view);

    assert!((back.latitude - location.latitude).abs() < 1e-9);
    assert!((back.longitude - location.longitude).abs() < 1e-9);
}
