use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, Rgba, RgbaImage};
use imageproc::contrast::otsu_level;
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use tracing::{debug, info, instrument};

use crate::config::StoreConfig;
use crate::error::{CrossPrintError, Result};
use crate::geometry::{CropRect, ImagePoint};
use crate::image::ImageId;

use super::quad::{order_quad, square_side};
use super::{ImageMeta, ImageService, LoadedImage, ThresholdMode};

/// Fill colour for canvas regions the homography pulls in from outside the photo.
const WARP_FILL: Rgba<u8> = Rgba([0, 0, 0, 255]);

struct ImageEntry {
    original: RgbaImage,
    preview: RgbaImage,
    /// Preview size divided by original size.
    scale: f32,
    /// Snapshot thresholds are computed from; dropped by geometric edits.
    threshold_base: Option<RgbaImage>,
}

/// In-process image service backed by the `image` and `imageproc` crates.
pub struct LocalImageService {
    config: StoreConfig,
    next_id: u64,
    images: HashMap<ImageId, ImageEntry>,
}

impl Default for LocalImageService {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl LocalImageService {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            next_id: 1,
            images: HashMap::new(),
        }
    }

    /// Full-resolution pixels of `id`.
    pub fn original(&self, id: ImageId) -> Result<&RgbaImage> {
        Ok(&self.entry(id)?.original)
    }

    pub fn meta(&self, id: ImageId) -> Result<ImageMeta> {
        let entry = self.entry(id)?;
        Ok(ImageMeta {
            width: entry.preview.width(),
            height: entry.preview.height(),
            scale: entry.scale,
        })
    }

    fn entry(&self, id: ImageId) -> Result<&ImageEntry> {
        self.images.get(&id).ok_or(CrossPrintError::UnknownImage(id))
    }

    fn entry_mut(&mut self, id: ImageId) -> Result<&mut ImageEntry> {
        self.images.get_mut(&id).ok_or(CrossPrintError::UnknownImage(id))
    }

    fn insert(&mut self, image: DynamicImage) -> Result<LoadedImage> {
        let original = cap_long_edge(image.to_rgba8(), self.config.full_cap_long_edge);
        let (preview, scale) = build_preview(&original, self.config.preview_long_edge);
        let id = ImageId(self.next_id);
        self.next_id += 1;
        self.images.insert(
            id,
            ImageEntry {
                original,
                preview,
                scale,
                threshold_base: None,
            },
        );
        let meta = self.meta(id)?;
        info!(%id, width = meta.width, height = meta.height, scale = meta.scale, "image stored");
        Ok(LoadedImage { id, meta })
    }

    /// Replace the pixels of `id`, rebuilding its preview.
    fn replace(&mut self, id: ImageId, image: RgbaImage, keep_threshold_base: bool) -> Result<()> {
        let cap = self.config.full_cap_long_edge;
        let preview_edge = self.config.preview_long_edge;
        let entry = self.entry_mut(id)?;
        let original = cap_long_edge(image, cap);
        let (preview, scale) = build_preview(&original, preview_edge);
        entry.original = original;
        entry.preview = preview;
        entry.scale = scale;
        if !keep_threshold_base {
            entry.threshold_base = None;
        }
        Ok(())
    }
}

impl ImageService for LocalImageService {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn load_image(&mut self, path: &Path) -> Result<LoadedImage> {
        let bytes = std::fs::read(path)?;
        let image = decode_oriented(&bytes)?;
        self.insert(image)
    }

    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    fn load_image_from_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<LoadedImage> {
        let image = decode_oriented(bytes)?;
        self.insert(image)
    }

    fn get_preview_png(&mut self, id: ImageId) -> Result<Vec<u8>> {
        let entry = self.entry(id)?;
        let mut buf = Vec::new();
        entry
            .preview
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        Ok(buf)
    }

    #[instrument(skip(self, anchors))]
    fn apply_homography(&mut self, id: ImageId, anchors: &[ImagePoint; 4]) -> Result<()> {
        let entry = self.entry(id)?;
        let s = entry.scale;
        let full = anchors.map(|p| (p.x / s, p.y / s));

        let quad = order_quad(full);
        let side = square_side(&quad).max(1.0);
        let cx = quad.iter().map(|p| p.0).sum::<f32>() / 4.0;
        let cy = quad.iter().map(|p| p.1).sum::<f32>() / 4.0;
        let half = side / 2.0;
        let square = [
            (cx - half, cy - half),
            (cx + half, cy - half),
            (cx + half, cy + half),
            (cx - half, cy + half),
        ];

        let projection =
            Projection::from_control_points(quad, square).ok_or(CrossPrintError::DegenerateQuad)?;

        let (w, h) = entry.original.dimensions();
        let mut warped = RgbaImage::new(w, h);
        warp_into(
            &entry.original,
            &projection,
            Interpolation::Bilinear,
            WARP_FILL,
            &mut warped,
        );
        debug!(side, "quad warped onto square");

        self.replace(id, warped, false)
    }

    #[instrument(skip(self))]
    fn apply_crop(&mut self, id: ImageId, rect: &CropRect) -> Result<()> {
        let entry = self.entry(id)?;
        let s = entry.scale;
        let (w, h) = (entry.original.width() as i64, entry.original.height() as i64);

        let l = ((rect.left / s) as i64).clamp(0, w - 1);
        let r = ((rect.right / s) as i64).clamp(1, w);
        let t = ((rect.top / s) as i64).clamp(0, h - 1);
        let b = ((rect.bottom / s) as i64).clamp(1, h);
        if r <= l || b <= t {
            return Err(CrossPrintError::InvalidGeometry(
                "Crop too small or inverted".into(),
            ));
        }

        let cropped =
            imageops::crop_imm(&entry.original, l as u32, t as u32, (r - l) as u32, (b - t) as u32)
                .to_image();
        self.replace(id, cropped, false)
    }

    #[instrument(skip(self))]
    fn apply_threshold(&mut self, id: ImageId, mode: ThresholdMode, value: u8) -> Result<()> {
        let entry = self.entry_mut(id)?;
        let base = entry
            .threshold_base
            .get_or_insert_with(|| entry.original.clone());

        let gray = imageops::grayscale(&*base);
        let level = match mode {
            ThresholdMode::Global => value,
            // otsu_level returns the last background level.
            ThresholdMode::Otsu => otsu_level(&gray).saturating_add(1),
        };
        debug!(level, "threshold level");

        let binary = RgbaImage::from_fn(gray.width(), gray.height(), |x, y| {
            let v = if gray.get_pixel(x, y).0[0] >= level { 255 } else { 0 };
            Rgba([v, v, v, 255])
        });
        self.replace(id, binary, true)
    }

    #[instrument(skip(self), fields(out_dir = %out_dir.display()))]
    fn export_image(&mut self, id: ImageId, out_dir: &Path) -> Result<PathBuf> {
        let entry = self.entry(id)?;
        std::fs::create_dir_all(out_dir)?;

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let path = unique_path(out_dir, &stamp);
        entry.original.save_with_format(&path, ImageFormat::Png)?;
        info!(path = %path.display(), "image exported");
        Ok(path)
    }
}

/// Decode an encoded image and apply its EXIF orientation.
fn decode_oriented(bytes: &[u8]) -> Result<DynamicImage> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(image)
}

fn scaled_dims(w: u32, h: u32, scale: f32) -> (u32, u32) {
    (
        ((w as f32 * scale) as u32).max(1),
        ((h as f32 * scale) as u32).max(1),
    )
}

fn cap_long_edge(image: RgbaImage, cap: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    let long = w.max(h);
    if long <= cap {
        return image;
    }
    let (nw, nh) = scaled_dims(w, h, cap as f32 / long as f32);
    imageops::resize(&image, nw, nh, FilterType::Lanczos3)
}

fn build_preview(original: &RgbaImage, long_edge: u32) -> (RgbaImage, f32) {
    let (w, h) = original.dimensions();
    let long = w.max(h);
    if long <= long_edge {
        return (original.clone(), 1.0);
    }
    let scale = long_edge as f32 / long as f32;
    let (nw, nh) = scaled_dims(w, h, scale);
    (imageops::resize(original, nw, nh, FilterType::Lanczos3), scale)
}

/// `crossprint_<stamp>.png`, with a numeric suffix if that name is taken.
fn unique_path(dir: &Path, stamp: &str) -> PathBuf {
    let first = dir.join(format!("crossprint_{stamp}.png"));
    if !first.exists() {
        return first;
    }
    (1u32..)
        .map(|n| dir.join(format!("crossprint_{stamp}_{n}.png")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}
