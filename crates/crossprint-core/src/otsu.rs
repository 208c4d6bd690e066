//! Client-side Otsu estimate and live threshold preview.
//!
//! The estimate runs on a downsampled copy of the displayed bitmap and only
//! seeds the threshold slider; the authoritative threshold is computed by the
//! image service when the value is applied.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use rayon::prelude::*;

use crate::consts::{
    DEFAULT_THRESHOLD, LUMA_B, LUMA_G, LUMA_R, LUMA_SCALE, OTSU_HISTOGRAM_BINS, OTSU_MAX_SIDE,
    PARALLEL_PIXEL_THRESHOLD,
};

/// Integer-truncated BT.709 luma of an RGB triple.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((LUMA_R * r as u32 + LUMA_G * g as u32 + LUMA_B * b as u32) / LUMA_SCALE) as u8
}

/// Build a 256-bucket luma histogram.
pub fn luma_histogram(bitmap: &RgbaImage) -> [u64; OTSU_HISTOGRAM_BINS] {
    let mut histogram = [0u64; OTSU_HISTOGRAM_BINS];
    for px in bitmap.pixels() {
        let [r, g, b, _] = px.0;
        histogram[luma(r, g, b) as usize] += 1;
    }
    histogram
}

/// Otsu's method over a luma histogram.
///
/// For each candidate `t`, pixels with luma below `t` form the background and
/// pixels with luma `>= t` the foreground. Returns the `t` with the largest
/// between-class variance; the lowest such `t` wins ties. Returns `None` when
/// no `t` splits the pixels into two non-empty classes.
pub fn otsu_level(histogram: &[u64; OTSU_HISTOGRAM_BINS]) -> Option<u8> {
    let total: f64 = histogram.iter().map(|&c| c as f64).sum();
    let sum_all: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut weight_bg = 0.0_f64;
    let mut sum_bg = 0.0_f64;
    let mut best: Option<(u8, f64)> = None;

    for (t, &count) in histogram.iter().enumerate() {
        let weight_fg = total - weight_bg;
        if weight_bg > 0.0 && weight_fg > 0.0 {
            let mean_bg = sum_bg / weight_bg;
            let mean_fg = (sum_all - sum_bg) / weight_fg;
            let between = weight_bg * weight_fg * (mean_bg - mean_fg).powi(2);
            let better = match best {
                Some((_, v)) => between > v,
                None => true,
            };
            if better {
                best = Some((t as u8, between));
            }
        }
        weight_bg += count as f64;
        sum_bg += t as f64 * count as f64;
    }

    best.map(|(t, _)| t)
}

/// Shrink the bitmap so its longer side is at most `max_side`.
pub fn downsample(bitmap: &RgbaImage, max_side: u32) -> Option<RgbaImage> {
    let (w, h) = bitmap.dimensions();
    let long = w.max(h);
    if long <= max_side || long == 0 {
        return None;
    }
    let scale = max_side as f64 / long as f64;
    let nw = ((w as f64 * scale).round() as u32).max(1);
    let nh = ((h as f64 * scale).round() as u32).max(1);
    Some(imageops::resize(bitmap, nw, nh, FilterType::Triangle))
}

/// Estimate a binarization threshold for the displayed bitmap.
///
/// Falls back to `DEFAULT_THRESHOLD` when the bitmap has a single luma level.
pub fn estimate_threshold(bitmap: &RgbaImage) -> u8 {
    let small = downsample(bitmap, OTSU_MAX_SIDE);
    let sample = small.as_ref().unwrap_or(bitmap);
    otsu_level(&luma_histogram(sample)).unwrap_or(DEFAULT_THRESHOLD)
}

/// Binarize on luma: `>= threshold` becomes white, the rest black. Alpha is kept.
pub fn binarize(bitmap: &RgbaImage, threshold: u8) -> RgbaImage {
    let mut out = bitmap.clone();
    let apply = |px: &mut [u8]| {
        let v = if luma(px[0], px[1], px[2]) >= threshold { 255 } else { 0 };
        px[0] = v;
        px[1] = v;
        px[2] = v;
    };

    let pixel_count = (out.width() as usize) * (out.height() as usize);
    if pixel_count >= PARALLEL_PIXEL_THRESHOLD {
        out.par_chunks_exact_mut(4).for_each(apply);
    } else {
        out.chunks_exact_mut(4).for_each(apply);
    }
    out
}
