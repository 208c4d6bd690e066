//! The image service: the only component that touches full-resolution pixels.
//!
//! Editors never call a service directly; calls go through the
//! [`bridge`](crate::bridge) queue, which runs them one at a time on a worker
//! thread.
//!
//! Contract: edits mutate the image in place and keep its id. A threshold
//! apply is computed from a snapshot taken before the first threshold on that
//! id, so repeated thresholds never compound; any geometric edit drops the
//! snapshot. Points and rectangles are given in preview space.

mod local;
mod quad;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::geometry::{CropRect, ImagePoint};
use crate::image::ImageId;

pub use local::LocalImageService;
pub use quad::{order_quad, square_side};

/// Binarization mode for `apply_threshold`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThresholdMode {
    /// Fixed cut-off supplied by the caller.
    #[default]
    Global,
    /// Cut-off computed by the service; the supplied value is ignored.
    Otsu,
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Otsu => write!(f, "otsu"),
        }
    }
}

/// Preview metadata reported on load.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageMeta {
    /// Preview width in pixels.
    pub width: u32,
    /// Preview height in pixels.
    pub height: u32,
    /// Preview size divided by full-resolution size.
    pub scale: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadedImage {
    pub id: ImageId,
    pub meta: ImageMeta,
}

/// Operations offered by an image backend. Every call may fail.
pub trait ImageService {
    fn load_image(&mut self, path: &Path) -> Result<LoadedImage>;

    fn load_image_from_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<LoadedImage>;

    /// PNG-encoded preview of the current state of `id`.
    fn get_preview_png(&mut self, id: ImageId) -> Result<Vec<u8>>;

    /// Warp so the quad given by `anchors` (in any order) becomes a square.
    fn apply_homography(&mut self, id: ImageId, anchors: &[ImagePoint; 4]) -> Result<()>;

    fn apply_crop(&mut self, id: ImageId, rect: &CropRect) -> Result<()>;

    fn apply_threshold(&mut self, id: ImageId, mode: ThresholdMode, value: u8) -> Result<()>;

    /// Write the full-resolution image into `out_dir`, returning the new file.
    fn export_image(&mut self, id: ImageId, out_dir: &Path) -> Result<PathBuf>;
}
