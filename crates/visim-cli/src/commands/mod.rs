//! CLI command implementations

pub mod daltonize;
pub mod infant;
pub mod simulate;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use visim_core::RgbaImage;
use visim_ops::Settings;

/// Load settings from `--config`, or defaults
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let settings = match path {
        Some(p) => Settings::from_file(p)
            .with_context(|| format!("Failed to load settings: {}", p.display()))?,
        None => Settings::default(),
    };
    Ok(settings)
}

/// Load a headerless RGBA8 dump
pub fn load_raw(path: &Path, width: u32, height: u32) -> Result<RgbaImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to load: {}", path.display()))?;
    info!(path = %path.display(), width, height, bytes = bytes.len(), "loaded");
    RgbaImage::from_raw(width, height, bytes)
        .with_context(|| format!("{} is not a {}x{} RGBA8 dump", path.display(), width, height))
}

/// Save a headerless RGBA8 dump
pub fn save_raw(path: &Path, image: &RgbaImage) -> Result<()> {
    std::fs::write(path, image.as_raw())
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    info!(path = %path.display(), "saved");
    Ok(())
}
