use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::geometry::{ScreenPoint, ScreenRect, Size};

/// Fixed palette of the editor canvas.
pub mod colors {
    use image::Rgba;

    pub const BACKGROUND: Rgba<u8> = Rgba([0x11, 0x11, 0x11, 0xff]);
    /// White at 60% opacity.
    pub const CROSSHAIR: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 153]);
    pub const ANCHOR: Rgba<u8> = Rgba([0x0e, 0xa5, 0xe9, 0xff]);
    pub const LABEL: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
    /// Black at 50% opacity.
    pub const CROP_MASK: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 128]);
    pub const CROP_OUTLINE: Rgba<u8> = Rgba([0x22, 0xc5, 0x5e, 0xff]);
}

pub const CROSSHAIR_WIDTH: f32 = 1.0;
pub const CROSSHAIR_DASH: f32 = 4.0;
pub const LABEL_SIZE: f32 = 12.0;
pub const LABEL_OFFSET: (f32, f32) = (10.0, -10.0);
pub const CROP_OUTLINE_WIDTH: f32 = 2.0;

/// Identifies the pixels of an image layer, for texture caching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKey {
    Committed { generation: u64 },
    ThresholdPreview { generation: u64, value: u8 },
}

#[derive(Clone, Debug)]
pub struct ImageLayer {
    pub key: LayerKey,
    pub pixels: Arc<RgbaImage>,
    /// Where the bitmap is drawn, already scaled by zoom and offset by pan.
    pub dest: ScreenRect,
}

/// Vector overlay primitive in screen space.
#[derive(Clone, Debug, PartialEq)]
pub enum Overlay {
    DashedLine {
        from: ScreenPoint,
        to: ScreenPoint,
        color: Rgba<u8>,
        width: f32,
        dash: f32,
        gap: f32,
    },
    Disc {
        center: ScreenPoint,
        radius: f32,
        color: Rgba<u8>,
    },
    /// Text whose baseline-left corner sits at `pos`.
    Label {
        pos: ScreenPoint,
        text: String,
        color: Rgba<u8>,
        size: f32,
    },
    FillRect {
        rect: ScreenRect,
        color: Rgba<u8>,
    },
    StrokeRect {
        rect: ScreenRect,
        color: Rgba<u8>,
        width: f32,
    },
}

/// Everything a single paint draws, back to front.
#[derive(Clone, Debug)]
pub struct Scene {
    pub canvas: Size,
    pub background: Rgba<u8>,
    pub image: Option<ImageLayer>,
    pub overlays: Vec<Overlay>,
}

impl Scene {
    pub fn empty(canvas: Size) -> Self {
        Self {
            canvas,
            background: colors::BACKGROUND,
            image: None,
            overlays: Vec::new(),
        }
    }
}
