/// Smallest allowed viewport zoom.
pub const MIN_ZOOM: f32 = 0.05;

/// Largest allowed viewport zoom.
pub const MAX_ZOOM: f32 = 20.0;

/// Multiplicative zoom change per wheel notch.
pub const WHEEL_ZOOM_STEP: f32 = 0.1;

/// Maximum number of perspective anchors.
pub const MAX_ANCHORS: usize = 4;

/// Anchor marker radius in screen pixels.
pub const ANCHOR_R: f32 = 8.0;

/// Extra slack added to the anchor hit radius, in screen pixels.
pub const ANCHOR_HIT_SLOP: f32 = 4.0;

/// Crop edge grab distance in screen pixels.
pub const CROP_EDGE_TOLERANCE: f32 = 8.0;

/// Minimum distance kept between opposite crop edges, in image pixels.
pub const CROP_MIN_GAP: f32 = 1.0;

/// Longer side of the bitmap sampled by the client-side Otsu estimate.
pub const OTSU_MAX_SIDE: u32 = 512;

/// Number of histogram bins for Otsu's thresholding.
pub const OTSU_HISTOGRAM_BINS: usize = 256;

/// Slider value used before the user has picked a threshold.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// ITU-R BT.709 luminance weights, scaled by `LUMA_SCALE` so grey stays exact.
pub const LUMA_R: u32 = 2126;
pub const LUMA_G: u32 = 7152;
pub const LUMA_B: u32 = 722;
pub const LUMA_SCALE: u32 = 10_000;

/// Minimum pixel count to binarize rows in parallel with Rayon.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Default long edge of the preview bitmap served by the local image store.
pub const DEFAULT_PREVIEW_LONG_EDGE: u32 = 1600;

/// Default cap on the long edge of full-resolution images in the local store.
pub const DEFAULT_FULL_CAP_LONG_EDGE: u32 = 8000;
