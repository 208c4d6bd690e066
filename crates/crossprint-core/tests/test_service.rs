mod common;

use crossprint_core::config::StoreConfig;
use crossprint_core::error::CrossPrintError;
use crossprint_core::geometry::{CropRect, ImagePoint};
use crossprint_core::image::ImageId;
use crossprint_core::service::{
    order_quad, square_side, ImageService, LocalImageService, ThresholdMode,
};

use common::{bicolor, encode_png, gradient, solid};

fn service_with(preview_long_edge: u32, full_cap_long_edge: u32) -> LocalImageService {
    LocalImageService::new(StoreConfig {
        preview_long_edge,
        full_cap_long_edge,
    })
}

fn load(service: &mut LocalImageService, image: &image::RgbaImage) -> ImageId {
    service
        .load_image_from_bytes("test.png", &encode_png(image))
        .unwrap()
        .id
}

// ---------------------------------------------------------------------------
// Load and preview
// ---------------------------------------------------------------------------

#[test]
fn test_load_small_image_keeps_scale_one() {
    let mut service = LocalImageService::default();
    let loaded = service
        .load_image_from_bytes("a.png", &encode_png(&solid(100, 50, [1, 2, 3, 255])))
        .unwrap();
    assert_eq!(loaded.id, ImageId(1));
    assert_eq!((loaded.meta.width, loaded.meta.height), (100, 50));
    assert_eq!(loaded.meta.scale, 1.0);
}

#[test]
fn test_ids_increase() {
    let mut service = LocalImageService::default();
    let a = load(&mut service, &solid(4, 4, [0, 0, 0, 255]));
    let b = load(&mut service, &solid(4, 4, [0, 0, 0, 255]));
    assert_eq!((a, b), (ImageId(1), ImageId(2)));
}

#[test]
fn test_preview_downscaled_to_long_edge() {
    let mut service = service_with(50, 8000);
    let id = load(&mut service, &solid(200, 100, [0, 0, 0, 255]));
    let meta = service.meta(id).unwrap();
    assert_eq!((meta.width, meta.height), (50, 25));
    assert_eq!(meta.scale, 0.25);
    assert_eq!(service.original(id).unwrap().dimensions(), (200, 100));

    let png = service.get_preview_png(id).unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (50, 25));
}

#[test]
fn test_full_resolution_is_capped() {
    let mut service = service_with(1600, 100);
    let id = load(&mut service, &solid(400, 200, [0, 0, 0, 255]));
    assert_eq!(service.original(id).unwrap().dimensions(), (100, 50));
}

#[test]
fn test_load_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.png");
    solid(30, 20, [5, 5, 5, 255]).save(&path).unwrap();

    let mut service = LocalImageService::default();
    let loaded = service.load_image(&path).unwrap();
    assert_eq!((loaded.meta.width, loaded.meta.height), (30, 20));
}

#[test]
fn test_garbage_bytes_fail() {
    let mut service = LocalImageService::default();
    assert!(service.load_image_from_bytes("x.png", b"not an image").is_err());
}

#[test]
fn test_unknown_id() {
    let mut service = LocalImageService::default();
    match service.get_preview_png(ImageId(42)) {
        Err(CrossPrintError::UnknownImage(id)) => assert_eq!(id, ImageId(42)),
        other => panic!("expected unknown image, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Crop
// ---------------------------------------------------------------------------

#[test]
fn test_crop_scales_preview_coordinates() {
    let mut service = service_with(100, 8000);
    let id = load(&mut service, &solid(200, 100, [0, 0, 0, 255]));
    service
        .apply_crop(id, &CropRect::new(10.0, 10.0, 30.0, 20.0))
        .unwrap();
    assert_eq!(service.original(id).unwrap().dimensions(), (40, 20));
}

#[test]
fn test_crop_clamps_to_bounds() {
    let mut service = LocalImageService::default();
    let id = load(&mut service, &solid(50, 40, [0, 0, 0, 255]));
    service
        .apply_crop(id, &CropRect::new(-20.0, 10.0, 500.0, 500.0))
        .unwrap();
    assert_eq!(service.original(id).unwrap().dimensions(), (50, 30));
}

#[test]
fn test_crop_one_pixel_wide_succeeds() {
    let mut service = LocalImageService::default();
    let id = load(&mut service, &solid(50, 40, [0, 0, 0, 255]));
    service
        .apply_crop(id, &CropRect::new(49.0, 0.0, 50.0, 40.0))
        .unwrap();
    assert_eq!(service.original(id).unwrap().dimensions(), (1, 40));
}

#[test]
fn test_crop_empty_fails() {
    let mut service = LocalImageService::default();
    let id = load(&mut service, &solid(50, 40, [0, 0, 0, 255]));
    let err = service
        .apply_crop(id, &CropRect::new(10.0, 10.0, 10.0, 30.0))
        .unwrap_err();
    assert!(matches!(err, CrossPrintError::InvalidGeometry(_)));
    assert_eq!(service.original(id).unwrap().dimensions(), (50, 40));
}

// ---------------------------------------------------------------------------
// Threshold
// ---------------------------------------------------------------------------

#[test]
fn test_global_threshold_is_binary() {
    let mut service = LocalImageService::default();
    let id = load(&mut service, &gradient(64, 8));
    service.apply_threshold(id, ThresholdMode::Global, 128).unwrap();
    let out = service.original(id).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(out.get_pixel(63, 0).0, [255, 255, 255, 255]);
    assert!(out.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
}

#[test]
fn test_repeated_thresholds_do_not_compound() {
    let mut service = LocalImageService::default();
    let retried = load(&mut service, &gradient(64, 8));
    service.apply_threshold(retried, ThresholdMode::Global, 200).unwrap();
    service.apply_threshold(retried, ThresholdMode::Global, 50).unwrap();

    let fresh = load(&mut service, &gradient(64, 8));
    service.apply_threshold(fresh, ThresholdMode::Global, 50).unwrap();

    assert_eq!(
        service.original(retried).unwrap(),
        service.original(fresh).unwrap()
    );
}

#[test]
fn test_geometric_edit_drops_threshold_base() {
    let mut service = LocalImageService::default();
    let id = load(&mut service, &gradient(64, 8));
    service.apply_threshold(id, ThresholdMode::Global, 200).unwrap();
    service
        .apply_crop(id, &CropRect::new(0.0, 0.0, 32.0, 8.0))
        .unwrap();
    // Base is now the cropped binary image: everything below 200 is black.
    service.apply_threshold(id, ThresholdMode::Global, 50).unwrap();
    let out = service.original(id).unwrap();
    assert_eq!(out.width(), 32);
    assert!(out.pixels().all(|p| p.0[0] == 0));
}

#[test]
fn test_otsu_threshold_splits_bicolor() {
    let mut service = LocalImageService::default();
    let id = load(&mut service, &bicolor(40, 10, 20, 230));
    service.apply_threshold(id, ThresholdMode::Otsu, 0).unwrap();
    let out = service.original(id).unwrap();
    assert_eq!(out.get_pixel(0, 5).0[0], 0);
    assert_eq!(out.get_pixel(39, 5).0[0], 255);
}

// ---------------------------------------------------------------------------
// Homography
// ---------------------------------------------------------------------------

#[test]
fn test_order_quad_from_any_order() {
    let shuffled = [(90.0, 90.0), (10.0, 10.0), (10.0, 90.0), (90.0, 10.0)];
    assert_eq!(
        order_quad(shuffled),
        [(10.0, 10.0), (90.0, 10.0), (90.0, 90.0), (10.0, 90.0)]
    );
}

#[test]
fn test_square_side_is_mean_edge() {
    let quad = [(0.0, 0.0), (100.0, 0.0), (100.0, 50.0), (0.0, 50.0)];
    assert_eq!(square_side(&quad), 75.0);
}

#[test]
fn test_homography_keeps_canvas_size() {
    let mut service = LocalImageService::default();
    let id = load(&mut service, &solid(120, 80, [200, 10, 10, 255]));
    let anchors = [
        ImagePoint::new(20.0, 10.0),
        ImagePoint::new(100.0, 15.0),
        ImagePoint::new(95.0, 70.0),
        ImagePoint::new(25.0, 65.0),
    ];
    service.apply_homography(id, &anchors).unwrap();

    let out = service.original(id).unwrap();
    assert_eq!(out.dimensions(), (120, 80));
    let px = out.get_pixel(60, 40).0;
    for (got, want) in px.iter().zip([200u8, 10, 10, 255]) {
        assert!(got.abs_diff(want) <= 1, "{px:?}");
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[test]
fn test_export_writes_timestamped_png() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("nested/output");

    let mut service = LocalImageService::default();
    let id = load(&mut service, &solid(30, 20, [1, 2, 3, 255]));
    let first = service.export_image(id, &out_dir).unwrap();
    let second = service.export_image(id, &out_dir).unwrap();

    assert_ne!(first, second);
    for path in [&first, &second] {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("crossprint_") && name.ends_with(".png"), "{name}");
        let saved = image::open(path).unwrap();
        assert_eq!((saved.width(), saved.height()), (30, 20));
    }
}
