use std::fmt;
use std::sync::Arc;

use image::RgbaImage;

use crate::geometry::Size;

/// Opaque handle naming an image held by the image service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u64);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The decoded bitmap currently on screen together with the id it came from.
///
/// Never mutated in place: every preview returned by the service produces a
/// new `Image` with a fresh `generation`.
#[derive(Clone, Debug)]
pub struct Image {
    pub id: ImageId,
    pub bitmap: Arc<RgbaImage>,
    /// Monotonic counter distinguishing successive bitmaps of the same id.
    pub generation: u64,
}

impl Image {
    pub fn new(id: ImageId, bitmap: Arc<RgbaImage>, generation: u64) -> Self {
        Self {
            id,
            bitmap,
            generation,
        }
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width() as f32, self.height() as f32)
    }
}
