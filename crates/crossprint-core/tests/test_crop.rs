mod common;

use approx::assert_relative_eq;

use crossprint_core::bridge::{run_job, BridgeEvent, BridgeJob, EditOp};
use crossprint_core::geometry::{CropEdge, CropRect, ImagePoint, ScreenPoint, Size};
use crossprint_core::image::ImageId;
use crossprint_core::service::{ImageService, LocalImageService};
use crossprint_core::tools::ToolMode;

use common::{encode_png, loaded_editor, solid};

const IMAGE: Size = Size {
    width: 800.0,
    height: 600.0,
};

fn assert_valid(c: &CropRect, image: Size) {
    assert!(c.left < c.right, "left {} >= right {}", c.left, c.right);
    assert!(c.top < c.bottom, "top {} >= bottom {}", c.top, c.bottom);
    assert!(c.left >= 0.0 && c.right <= image.width, "{c:?}");
    assert!(c.top >= 0.0 && c.bottom <= image.height, "{c:?}");
}

// ---------------------------------------------------------------------------
// Edge drags
// ---------------------------------------------------------------------------

#[test]
fn test_drag_left_past_right_clamps_to_gap() {
    let full = CropRect::full(IMAGE);
    let c = full.with_dragged_edge(CropEdge::Left, ImagePoint::new(900.0, 10.0), IMAGE);
    assert_relative_eq!(c.left, 799.0);
    assert_relative_eq!(c.right, 800.0);
}

#[test]
fn test_drag_right_below_left_clamps_to_gap() {
    let c = CropRect::new(100.0, 0.0, 800.0, 600.0);
    let c = c.with_dragged_edge(CropEdge::Right, ImagePoint::new(-50.0, 0.0), IMAGE);
    assert_relative_eq!(c.right, 101.0);
}

#[test]
fn test_drag_clamps_to_image_bounds() {
    let c = CropRect::new(100.0, 100.0, 700.0, 500.0);
    let c = c.with_dragged_edge(CropEdge::Top, ImagePoint::new(0.0, -40.0), IMAGE);
    assert_relative_eq!(c.top, 0.0);
    let c = c.with_dragged_edge(CropEdge::Bottom, ImagePoint::new(0.0, 9000.0), IMAGE);
    assert_relative_eq!(c.bottom, 600.0);
}

#[test]
fn test_invariant_holds_over_drag_and_input_sequence() {
    let mut c = CropRect::full(IMAGE);
    let mut seed: u32 = 12345;
    let mut next = || {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
        (seed >> 8) as f32 / (1 << 24) as f32 * 1200.0 - 200.0
    };

    for step in 0..500 {
        let edge = CropEdge::ALL[step % 4];
        c = if step % 3 == 0 {
            c.with_edge_value(edge, next(), IMAGE)
        } else {
            c.with_dragged_edge(edge, ImagePoint::new(next(), next()), IMAGE)
        };
        assert_valid(&c, IMAGE);
    }
}

// ---------------------------------------------------------------------------
// Numeric input
// ---------------------------------------------------------------------------

#[test]
fn test_numeric_left_snaps_and_stays_left_of_right() {
    let c = CropRect::full(IMAGE).with_edge_value(CropEdge::Left, 1000.0, IMAGE);
    assert_relative_eq!(c.left, 799.0);
    assert_relative_eq!(c.right, 800.0);
}

#[test]
fn test_numeric_values_floor_to_whole_pixels() {
    let c = CropRect::full(IMAGE).with_edge_value(CropEdge::Top, 12.9, IMAGE);
    assert_relative_eq!(c.top, 12.0);
}

#[test]
fn test_numeric_right_of_zero_becomes_one() {
    let c = CropRect::full(IMAGE).with_edge_value(CropEdge::Right, 0.0, IMAGE);
    assert_relative_eq!(c.right, 1.0);
    assert_relative_eq!(c.left, 0.0);
}

#[test]
fn test_is_applicable_needs_a_whole_pixel() {
    assert!(CropRect::new(0.0, 0.0, 1.0, 1.0).is_applicable());
    assert!(!CropRect::new(0.0, 0.0, 0.5, 10.0).is_applicable());
}

// ---------------------------------------------------------------------------
// Crop tool through the editor (800x600 image at zoom 0.5, pan 0)
// ---------------------------------------------------------------------------

#[test]
fn test_entering_crop_creates_full_rect() {
    let (mut editor, _) = loaded_editor();
    assert!(editor.state().crop.is_none());
    editor.enter_mode(ToolMode::Crop);
    assert_eq!(editor.state().crop, Some(CropRect::full(IMAGE)));
}

#[test]
fn test_pointer_drag_moves_left_edge() {
    let (mut editor, _) = loaded_editor();
    editor.enter_mode(ToolMode::Crop);

    editor.pointer_down(ScreenPoint::new(3.0, 150.0));
    assert_eq!(editor.dragged_crop_edge(), Some(CropEdge::Left));
    editor.pointer_move(ScreenPoint::new(100.0, 150.0));
    editor.pointer_up();
    assert_eq!(editor.dragged_crop_edge(), None);

    let crop = editor.state().crop.unwrap();
    assert_relative_eq!(crop.left, 200.0);
    assert_relative_eq!(crop.right, 800.0);
}

#[test]
fn test_pointer_far_from_edges_starts_no_drag() {
    let (mut editor, _) = loaded_editor();
    editor.enter_mode(ToolMode::Crop);
    editor.pointer_down(ScreenPoint::new(200.0, 150.0));
    assert_eq!(editor.dragged_crop_edge(), None);
    editor.pointer_move(ScreenPoint::new(10.0, 10.0));
    assert_eq!(editor.state().crop, Some(CropRect::full(IMAGE)));
}

#[test]
fn test_crop_survives_mode_switch() {
    let (mut editor, _) = loaded_editor();
    editor.enter_mode(ToolMode::Crop);
    editor.set_crop_edge(CropEdge::Top, 50.0);
    editor.enter_mode(ToolMode::Anchors);
    editor.enter_mode(ToolMode::Crop);
    assert_relative_eq!(editor.state().crop.unwrap().top, 50.0);
}

#[test]
fn test_mode_switch_drops_drag() {
    let (mut editor, _) = loaded_editor();
    editor.enter_mode(ToolMode::Crop);
    editor.pointer_down(ScreenPoint::new(3.0, 150.0));
    editor.enter_mode(ToolMode::Idle);
    assert_eq!(editor.dragged_crop_edge(), None);
}

#[test]
fn test_apply_crop_then_reset_to_full_image() {
    let (mut editor, sink) = loaded_editor();
    editor.enter_mode(ToolMode::Crop);
    editor.set_crop_edge(CropEdge::Left, 100.0);
    editor.set_crop_edge(CropEdge::Bottom, 400.0);
    assert!(editor.can_apply());

    editor.apply();
    let expected = CropRect::new(100.0, 0.0, 800.0, 400.0);
    match sink.last() {
        Some(BridgeJob::Apply { image_id, op }) => {
            assert_eq!(image_id, ImageId(1));
            assert_eq!(op, EditOp::Crop(expected));
        }
        other => panic!("expected crop job, got {other:?}"),
    }

    editor.handle_event(BridgeEvent::Applied {
        image_id: ImageId(1),
        op: EditOp::Crop(expected),
        bitmap: solid(700, 400, [1, 2, 3, 255]),
    });

    let state = editor.state();
    assert!(state.dirty);
    assert_eq!(state.crop, Some(CropRect::new(0.0, 0.0, 700.0, 400.0)));
    assert_relative_eq!(state.viewport.zoom, (400.0_f32 / 700.0).min(300.0 / 400.0));
    assert_eq!(editor.history().checkpoint(), Some(ImageId(1)));
    assert_eq!(editor.status(), "Cropped");
}

#[test]
fn test_one_pixel_crop_from_drag_is_applied_by_service() {
    let (mut editor, sink) = loaded_editor();
    editor.enter_mode(ToolMode::Crop);

    // Left edge dragged to image x = 900 clamps one pixel short of the right edge.
    editor.pointer_down(ScreenPoint::new(1.0, 150.0));
    assert_eq!(editor.dragged_crop_edge(), Some(CropEdge::Left));
    editor.pointer_move(ScreenPoint::new(450.0, 150.0));
    editor.pointer_up();
    assert_eq!(editor.state().crop, Some(CropRect::new(799.0, 0.0, 800.0, 600.0)));
    assert!(editor.can_apply());

    editor.apply();
    let job = sink.last().expect("crop job queued");

    let mut service = LocalImageService::default();
    let loaded = service
        .load_image_from_bytes("scan.png", &encode_png(&solid(800, 600, [200, 200, 200, 255])))
        .unwrap();
    assert_eq!(loaded.id, ImageId(1));

    let event = run_job(&mut service, job);
    match &event {
        BridgeEvent::Applied { bitmap, .. } => assert_eq!(bitmap.dimensions(), (1, 600)),
        other => panic!("expected applied crop, got {other:?}"),
    }

    editor.handle_event(event);
    assert_eq!(editor.state().crop, Some(CropRect::new(0.0, 0.0, 1.0, 600.0)));
    assert_eq!(editor.status(), "Cropped");
}
