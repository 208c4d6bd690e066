//! Mapping between image space and screen space.
//!
//! Screen space is the drawing surface, origin at its top-left corner. A
//! point `p` in image space lands at `pan + p * zoom` on screen.

use crate::consts::{MAX_ZOOM, MIN_ZOOM, WHEEL_ZOOM_STEP};
use crate::geometry::{ImagePoint, ScreenPoint, ScreenRect, ScreenVec, Size};

/// Zoom and pan of the canvas. `zoom` always lies in `[MIN_ZOOM, MAX_ZOOM]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub zoom: f32,
    pub pan: ScreenVec,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: ScreenVec::ZERO,
        }
    }
}

impl Viewport {
    pub fn to_screen(&self, p: ImagePoint) -> ScreenPoint {
        ScreenPoint::new(self.pan.x + p.x * self.zoom, self.pan.y + p.y * self.zoom)
    }

    pub fn to_image(&self, p: ScreenPoint) -> ImagePoint {
        ImagePoint::new((p.x - self.pan.x) / self.zoom, (p.y - self.pan.y) / self.zoom)
    }

    /// Screen rectangle covered by an image of the given size.
    pub fn image_rect(&self, image: Size) -> ScreenRect {
        ScreenRect::from_min_size(
            ScreenPoint::new(self.pan.x, self.pan.y),
            Size::new(image.width * self.zoom, image.height * self.zoom),
        )
    }

    /// Scale the image to fit inside the canvas and centre it.
    ///
    /// Does nothing without an image or with an empty canvas.
    pub fn fit_to_screen(&mut self, canvas: Size, image: Option<Size>) {
        let Some(image) = image else {
            return;
        };
        if canvas.is_empty() || image.is_empty() {
            return;
        }

        let zoom = (canvas.width / image.width)
            .min(canvas.height / image.height)
            .clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom = zoom;
        self.pan = ScreenVec::new(
            (canvas.width - image.width * zoom) / 2.0,
            (canvas.height - image.height * zoom) / 2.0,
        );
    }

    /// Zoom one wheel step around `cursor`, keeping the image point under the
    /// cursor fixed on screen.
    ///
    /// Positive `wheel_delta` zooms out, negative zooms in (browser wheel
    /// convention); zero leaves the viewport untouched.
    pub fn zoom_at_screen_point(&mut self, wheel_delta: f32, cursor: ScreenPoint) {
        if wheel_delta == 0.0 || wheel_delta.is_nan() {
            return;
        }

        let before = self.to_image(cursor);
        let factor = 1.0 - WHEEL_ZOOM_STEP * wheel_delta.signum();
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        let after = self.to_screen(before);
        self.pan.x += cursor.x - after.x;
        self.pan.y += cursor.y - after.y;
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan.x += dx;
        self.pan.y += dy;
    }
}
