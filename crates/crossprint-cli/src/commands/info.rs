use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use crossprint_core::otsu::estimate_threshold;
use crossprint_core::service::{ImageService, LocalImageService};

#[derive(Args)]
pub struct InfoArgs {
    /// Input image (PNG, JPEG, WebP or BMP)
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let mut service = LocalImageService::default();
    let loaded = service
        .load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let original = service.original(loaded.id)?;

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}", original.width(), original.height());
    println!("Preview:     {}x{}", loaded.meta.width, loaded.meta.height);
    println!("Scale:       {:.4}", loaded.meta.scale);
    println!("Otsu:        {}", estimate_threshold(original));

    Ok(())
}
