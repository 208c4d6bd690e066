use approx::assert_relative_eq;

use crossprint_core::consts::{MAX_ZOOM, MIN_ZOOM};
use crossprint_core::geometry::{ImagePoint, ScreenPoint, ScreenVec, Size};
use crossprint_core::viewport::Viewport;

// ---------------------------------------------------------------------------
// Fit to screen
// ---------------------------------------------------------------------------

#[test]
fn test_fit_800x600_into_400x300() {
    let mut vp = Viewport::default();
    vp.fit_to_screen(Size::new(400.0, 300.0), Some(Size::new(800.0, 600.0)));
    assert_relative_eq!(vp.zoom, 0.5);
    assert_relative_eq!(vp.pan.x, 0.0);
    assert_relative_eq!(vp.pan.y, 0.0);
}

#[test]
fn test_fit_centers_letterboxed_image() {
    let mut vp = Viewport::default();
    vp.fit_to_screen(Size::new(400.0, 400.0), Some(Size::new(800.0, 400.0)));
    assert_relative_eq!(vp.zoom, 0.5);
    assert_relative_eq!(vp.pan.x, 0.0);
    assert_relative_eq!(vp.pan.y, 100.0);
}

#[test]
fn test_fit_without_image_is_noop() {
    let mut vp = Viewport {
        zoom: 3.0,
        pan: ScreenVec::new(5.0, 6.0),
    };
    let before = vp;
    vp.fit_to_screen(Size::new(400.0, 300.0), None);
    assert_eq!(vp, before);
}

#[test]
fn test_fit_with_empty_canvas_is_noop() {
    let mut vp = Viewport::default();
    vp.fit_to_screen(Size::new(0.0, 0.0), Some(Size::new(100.0, 100.0)));
    assert_eq!(vp, Viewport::default());
}

#[test]
fn test_fit_clamps_zoom() {
    let mut vp = Viewport::default();
    vp.fit_to_screen(Size::new(1000.0, 1000.0), Some(Size::new(1.0, 1.0)));
    assert_relative_eq!(vp.zoom, MAX_ZOOM);

    vp.fit_to_screen(Size::new(10.0, 10.0), Some(Size::new(100_000.0, 100_000.0)));
    assert_relative_eq!(vp.zoom, MIN_ZOOM);
}

// ---------------------------------------------------------------------------
// Coordinate mapping
// ---------------------------------------------------------------------------

#[test]
fn test_to_image_inverts_to_screen() {
    let vp = Viewport {
        zoom: 2.5,
        pan: ScreenVec::new(-40.0, 17.0),
    };
    let p = ImagePoint::new(123.0, 45.5);
    let back = vp.to_image(vp.to_screen(p));
    assert_relative_eq!(back.x, p.x, epsilon = 1e-4);
    assert_relative_eq!(back.y, p.y, epsilon = 1e-4);
}

#[test]
fn test_image_rect_scaled_and_offset() {
    let vp = Viewport {
        zoom: 0.5,
        pan: ScreenVec::new(10.0, 20.0),
    };
    let r = vp.image_rect(Size::new(800.0, 600.0));
    assert_relative_eq!(r.min.x, 10.0);
    assert_relative_eq!(r.min.y, 20.0);
    assert_relative_eq!(r.width(), 400.0);
    assert_relative_eq!(r.height(), 300.0);
}

// ---------------------------------------------------------------------------
// Wheel zoom
// ---------------------------------------------------------------------------

fn assert_cursor_anchored(mut vp: Viewport, delta: f32, cursor: ScreenPoint) {
    let under_cursor = vp.to_image(cursor);
    vp.zoom_at_screen_point(delta, cursor);
    let after = vp.to_screen(under_cursor);
    assert_relative_eq!(after.x, cursor.x, epsilon = 1e-3);
    assert_relative_eq!(after.y, cursor.y, epsilon = 1e-3);
}

#[test]
fn test_zoom_in_keeps_point_under_cursor() {
    let vp = Viewport {
        zoom: 0.5,
        pan: ScreenVec::new(12.0, -30.0),
    };
    assert_cursor_anchored(vp, -120.0, ScreenPoint::new(173.0, 88.0));
}

#[test]
fn test_zoom_out_keeps_point_under_cursor() {
    let vp = Viewport {
        zoom: 3.0,
        pan: ScreenVec::new(-200.0, 40.0),
    };
    assert_cursor_anchored(vp, 1.0, ScreenPoint::new(10.0, 290.0));
}

#[test]
fn test_zoom_step_is_ten_percent() {
    let mut vp = Viewport::default();
    vp.zoom_at_screen_point(-1.0, ScreenPoint::new(0.0, 0.0));
    assert_relative_eq!(vp.zoom, 1.1);
    vp.zoom_at_screen_point(53.0, ScreenPoint::new(0.0, 0.0));
    assert_relative_eq!(vp.zoom, 0.99, epsilon = 1e-6);
}

#[test]
fn test_zoom_clamped_after_many_steps() {
    let mut vp = Viewport::default();
    for _ in 0..200 {
        vp.zoom_at_screen_point(1.0, ScreenPoint::new(50.0, 50.0));
    }
    assert_relative_eq!(vp.zoom, MIN_ZOOM);

    for _ in 0..400 {
        vp.zoom_at_screen_point(-1.0, ScreenPoint::new(50.0, 50.0));
    }
    assert_relative_eq!(vp.zoom, MAX_ZOOM);
}

#[test]
fn test_zero_wheel_delta_is_noop() {
    let mut vp = Viewport {
        zoom: 1.7,
        pan: ScreenVec::new(3.0, 4.0),
    };
    let before = vp;
    vp.zoom_at_screen_point(0.0, ScreenPoint::new(100.0, 100.0));
    assert_eq!(vp, before);
}

#[test]
fn test_pan_by_adds_screen_delta() {
    let mut vp = Viewport::default();
    vp.pan_by(15.0, -7.5);
    vp.pan_by(5.0, 2.5);
    assert_eq!(vp.pan, ScreenVec::new(20.0, -5.0));
}
