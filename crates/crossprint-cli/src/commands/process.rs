use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Args;
use console::Style;
use crossprint_core::geometry::{CropRect, ImagePoint};
use crossprint_core::service::{ImageService, LocalImageService, ThresholdMode};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input image (PNG, JPEG, WebP or BMP)
    pub file: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    pub out: PathBuf,

    /// Four print corners in preview pixels, in any order (e.g. "10,12 590,8 600,410 4,400")
    #[arg(long)]
    pub anchors: Option<String>,

    /// Crop rectangle in preview pixels as left,top,right,bottom
    #[arg(long)]
    pub crop: Option<String>,

    /// Threshold level 0-255, or "otsu"
    #[arg(long)]
    pub threshold: Option<ThresholdArg>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ThresholdArg {
    Level(u8),
    Otsu,
}

impl FromStr for ThresholdArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("otsu") {
            return Ok(Self::Otsu);
        }
        s.parse::<u8>()
            .map(Self::Level)
            .map_err(|_| format!("expected 0-255 or \"otsu\", got \"{s}\""))
    }
}

impl ThresholdArg {
    fn mode_and_value(self) -> (ThresholdMode, u8) {
        match self {
            Self::Level(v) => (ThresholdMode::Global, v),
            Self::Otsu => (ThresholdMode::Otsu, 0),
        }
    }
}

fn parse_point(s: &str) -> Result<ImagePoint> {
    let (x, y) = s
        .split_once(',')
        .with_context(|| format!("Invalid point \"{s}\", expected x,y"))?;
    let x: f32 = x.trim().parse().with_context(|| format!("Invalid x in \"{s}\""))?;
    let y: f32 = y.trim().parse().with_context(|| format!("Invalid y in \"{s}\""))?;
    Ok(ImagePoint::new(x, y))
}

pub fn parse_anchors(s: &str) -> Result<[ImagePoint; 4]> {
    let points = s
        .split_whitespace()
        .map(parse_point)
        .collect::<Result<Vec<_>>>()?;
    match <[ImagePoint; 4]>::try_from(points) {
        Ok(anchors) => Ok(anchors),
        Err(points) => bail!("Expected 4 anchors, got {}", points.len()),
    }
}

pub fn parse_crop(s: &str) -> Result<CropRect> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Invalid crop format, expected left,top,right,bottom")?;
    let &[left, top, right, bottom] = values.as_slice() else {
        bail!("Expected 4 crop values, got {}", values.len());
    };
    let rect = CropRect::new(left, top, right, bottom);
    if !rect.is_applicable() {
        bail!("Crop rectangle {left},{top},{right},{bottom} is empty");
    }
    Ok(rect)
}

pub fn run(args: &ProcessArgs) -> Result<()> {
    // Validate everything before touching the image.
    let anchors = args.anchors.as_deref().map(parse_anchors).transpose()?;
    let crop = args.crop.as_deref().map(parse_crop).transpose()?;
    debug!(?anchors, ?crop, threshold = ?args.threshold, "parsed edits");

    let steps = 2 + anchors.is_some() as u64 + crop.is_some() as u64 + args.threshold.is_some() as u64;
    let label = Style::new().dim();
    let value = Style::new().bold();

    let pb = ProgressBar::new(steps);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    let mut service = LocalImageService::default();

    pb.set_message("Loading");
    let loaded = service
        .load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let id = loaded.id;
    pb.inc(1);

    if let Some(ref anchors) = anchors {
        pb.set_message("Perspective");
        service
            .apply_homography(id, anchors)
            .context("Perspective correction failed")?;
        pb.inc(1);
    }

    if let Some(ref rect) = crop {
        pb.set_message("Crop");
        service.apply_crop(id, rect).context("Crop failed")?;
        pb.inc(1);
    }

    if let Some(threshold) = args.threshold {
        pb.set_message("Threshold");
        let (mode, level) = threshold.mode_and_value();
        service
            .apply_threshold(id, mode, level)
            .context("Threshold failed")?;
        pb.inc(1);
    }

    pb.set_message("Export");
    let path = service
        .export_image(id, &args.out)
        .with_context(|| format!("Failed to export to {}", args.out.display()))?;
    pb.inc(1);
    pb.finish_with_message("Done");

    let result = service.original(id)?;
    println!();
    println!(
        "  {:<10}{}",
        label.apply_to("Size"),
        value.apply_to(format!("{}x{}", result.width(), result.height()))
    );
    println!(
        "  {:<10}{}",
        label.apply_to("Output"),
        Style::new().underlined().apply_to(path.display())
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_anchors() {
        let anchors = parse_anchors("0,0 10,0 10,10 0,10").unwrap();
        assert_eq!(anchors[2], ImagePoint::new(10.0, 10.0));
        assert!(parse_anchors("0,0 10,0 10,10").is_err());
        assert!(parse_anchors("0,0 10,0 10,10 0;10").is_err());
    }

    #[test]
    fn test_parse_crop() {
        let rect = parse_crop("1, 2, 30, 40").unwrap();
        assert_eq!(rect.width(), 29.0);
        assert!(parse_crop("10,0,10,5").is_err());
        assert!(parse_crop("1,2,3").is_err());
    }

    #[test]
    fn test_threshold_arg() {
        assert_eq!("otsu".parse::<ThresholdArg>(), Ok(ThresholdArg::Otsu));
        assert_eq!("OTSU".parse::<ThresholdArg>(), Ok(ThresholdArg::Otsu));
        assert_eq!("140".parse::<ThresholdArg>(), Ok(ThresholdArg::Level(140)));
        assert!("256".parse::<ThresholdArg>().is_err());
    }
}
