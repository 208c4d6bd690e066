use crossprint_core::render::{ImageLayer, LayerKey};
use image::{Rgba, RgbaImage};

/// Convert an RGBA bitmap to an egui ColorImage.
pub fn rgba_to_color_image(bitmap: &RgbaImage) -> egui::ColorImage {
    let size = [bitmap.width() as usize, bitmap.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, bitmap.as_raw())
}

pub fn to_color32(color: Rgba<u8>) -> egui::Color32 {
    let [r, g, b, a] = color.0;
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// GPU textures for the committed bitmap and the threshold preview.
///
/// A slot is re-uploaded only when the layer key changes, so dragging the
/// threshold slider does not throw away the committed texture.
#[derive(Default)]
pub struct TextureCache {
    committed: Option<(LayerKey, egui::TextureHandle)>,
    preview: Option<(LayerKey, egui::TextureHandle)>,
}

impl TextureCache {
    pub fn texture_for(&mut self, ctx: &egui::Context, layer: &ImageLayer) -> egui::TextureId {
        let (slot, name) = match layer.key {
            LayerKey::Committed { .. } => (&mut self.committed, "committed"),
            LayerKey::ThresholdPreview { .. } => (&mut self.preview, "threshold_preview"),
        };

        match slot {
            Some((key, handle)) if *key == layer.key => handle.id(),
            _ => {
                let handle = ctx.load_texture(
                    name,
                    rgba_to_color_image(&layer.pixels),
                    egui::TextureOptions::LINEAR,
                );
                let id = handle.id();
                *slot = Some((layer.key, handle));
                id
            }
        }
    }
}
