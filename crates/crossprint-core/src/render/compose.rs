use std::sync::Arc;

use image::RgbaImage;
use tracing::debug;

use super::scene::{
    colors, ImageLayer, LayerKey, Overlay, Scene, CROP_OUTLINE_WIDTH, CROSSHAIR_DASH,
    CROSSHAIR_WIDTH, LABEL_OFFSET, LABEL_SIZE,
};
use crate::consts::ANCHOR_R;
use crate::geometry::{CropRect, ImagePoint, ScreenPoint, ScreenRect, Size};
use crate::image::Image;
use crate::otsu::binarize;
use crate::state::AppState;
use crate::tools::ToolMode;
use crate::viewport::Viewport;

struct ThresholdCache {
    generation: u64,
    value: u8,
    pixels: Arc<RgbaImage>,
}

/// Builds scenes from state. Keeps the last binarized preview so slider
/// frames that do not change the value reuse it.
#[derive(Default)]
pub struct Compositor {
    threshold: Option<ThresholdCache>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compose(&mut self, state: &AppState) -> Scene {
        let mut scene = Scene::empty(state.canvas);

        let Some(image) = &state.image else {
            self.threshold = None;
            return scene;
        };

        scene.image = Some(self.image_layer(state, image));

        match state.mode {
            ToolMode::Anchors => anchor_overlays(
                &mut scene.overlays,
                &state.anchors,
                &state.viewport,
                state.canvas,
            ),
            ToolMode::Crop => {
                if let Some(crop) = &state.crop {
                    crop_overlays(&mut scene.overlays, crop, &state.viewport, state.canvas);
                }
            }
            ToolMode::Idle | ToolMode::Threshold => {}
        }

        scene
    }

    fn image_layer(&mut self, state: &AppState, image: &Image) -> ImageLayer {
        let dest = state.viewport.image_rect(image.size());

        let preview = match (state.mode, state.threshold_preview) {
            (ToolMode::Threshold, Some(value)) => Some(value),
            _ => None,
        };

        let Some(value) = preview else {
            return ImageLayer {
                key: LayerKey::Committed {
                    generation: image.generation,
                },
                pixels: Arc::clone(&image.bitmap),
                dest,
            };
        };

        ImageLayer {
            key: LayerKey::ThresholdPreview {
                generation: image.generation,
                value,
            },
            pixels: self.threshold_pixels(image, value),
            dest,
        }
    }

    fn threshold_pixels(&mut self, image: &Image, value: u8) -> Arc<RgbaImage> {
        if let Some(cache) = &self.threshold {
            if cache.generation == image.generation && cache.value == value {
                return Arc::clone(&cache.pixels);
            }
        }

        debug!(generation = image.generation, value, "binarizing preview");
        let pixels = Arc::new(binarize(&image.bitmap, value));
        self.threshold = Some(ThresholdCache {
            generation: image.generation,
            value,
            pixels: Arc::clone(&pixels),
        });
        pixels
    }
}

fn anchor_overlays(
    out: &mut Vec<Overlay>,
    anchors: &[ImagePoint],
    viewport: &Viewport,
    canvas: Size,
) {
    for (i, anchor) in anchors.iter().enumerate() {
        let c = viewport.to_screen(*anchor);

        out.push(crosshair(ScreenPoint::new(0.0, c.y), ScreenPoint::new(canvas.width, c.y)));
        out.push(crosshair(ScreenPoint::new(c.x, 0.0), ScreenPoint::new(c.x, canvas.height)));
        out.push(Overlay::Disc {
            center: c,
            radius: ANCHOR_R,
            color: colors::ANCHOR,
        });
        out.push(Overlay::Label {
            pos: ScreenPoint::new(c.x + LABEL_OFFSET.0, c.y + LABEL_OFFSET.1),
            text: (i + 1).to_string(),
            color: colors::LABEL,
            size: LABEL_SIZE,
        });
    }
}

fn crosshair(from: ScreenPoint, to: ScreenPoint) -> Overlay {
    Overlay::DashedLine {
        from,
        to,
        color: colors::CROSSHAIR,
        width: CROSSHAIR_WIDTH,
        dash: CROSSHAIR_DASH,
        gap: CROSSHAIR_DASH,
    }
}

/// Mask the four bands outside the crop, then outline it. Side bands span
/// only the crop's rows so corners are masked once.
fn crop_overlays(out: &mut Vec<Overlay>, crop: &CropRect, viewport: &Viewport, canvas: Size) {
    let tl = viewport.to_screen(ImagePoint::new(crop.left, crop.top));
    let br = viewport.to_screen(ImagePoint::new(crop.right, crop.bottom));
    let (l, t, r, b) = (tl.x, tl.y, br.x, br.y);
    let (w, h) = (canvas.width, canvas.height);

    let bands = [
        rect(0.0, 0.0, w, t),
        rect(0.0, b, w, h),
        rect(0.0, t, l, b),
        rect(r, t, w, b),
    ];
    for band in bands.into_iter().filter(|band| !band.is_empty()) {
        out.push(Overlay::FillRect {
            rect: band,
            color: colors::CROP_MASK,
        });
    }

    out.push(Overlay::StrokeRect {
        rect: rect(l, t, r, b),
        color: colors::CROP_OUTLINE,
        width: CROP_OUTLINE_WIDTH,
    });
}

fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> ScreenRect {
    ScreenRect::from_min_max(ScreenPoint::new(x0, y0), ScreenPoint::new(x1, y1))
}
