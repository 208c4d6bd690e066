use crate::consts::DEFAULT_THRESHOLD;
use crate::geometry::{CropRect, ImagePoint, Size};
use crate::image::{Image, ImageId};
use crate::tools::ToolMode;
use crate::viewport::Viewport;

/// The single mutable record every component reads and writes.
///
/// Fields are plain data; clamping and other invariants are enforced by the
/// tool that performs the mutation.
#[derive(Debug)]
pub struct AppState {
    /// Last bitmap committed by the image service.
    pub image: Option<Image>,
    pub image_name: String,
    /// Set by any successful geometric or tonal apply, cleared on load.
    pub dirty: bool,

    pub viewport: Viewport,
    /// Size of the drawing surface in screen pixels.
    pub canvas: Size,

    pub mode: ToolMode,

    /// Perspective anchors in corner order, at most four.
    pub anchors: Vec<ImagePoint>,
    /// Crop selection; survives mode switches.
    pub crop: Option<CropRect>,
    /// Last value chosen on the threshold slider.
    pub threshold_value: u8,
    /// Live threshold preview. Present only while the slider is being adjusted.
    pub threshold_preview: Option<u8>,

    pub status: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl AppState {
    pub fn new(default_threshold: u8) -> Self {
        Self {
            image: None,
            image_name: String::new(),
            dirty: false,
            viewport: Viewport::default(),
            canvas: Size::default(),
            mode: ToolMode::Idle,
            anchors: Vec::new(),
            crop: None,
            threshold_value: default_threshold,
            threshold_preview: None,
            status: String::from("Ready"),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    pub fn image_id(&self) -> Option<ImageId> {
        self.image.as_ref().map(|img| img.id)
    }

    pub fn image_size(&self) -> Option<Size> {
        self.image.as_ref().map(Image::size)
    }

    /// Re-fit the viewport to the current image and canvas.
    pub fn fit_to_screen(&mut self) {
        let image = self.image_size();
        self.viewport.fit_to_screen(self.canvas, image);
    }
}
