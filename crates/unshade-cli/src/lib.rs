//! Shared utilities for unshade-cli
//!
//! Argument parsing helpers and image file I/O reused by the CLI
//! commands.

pub mod parsers;

use std::path::Path;

use unshade_core::RasterImage;

pub use parsers::{parse_selection, parse_strength};

/// Load an image file into the pipeline's working raster.
pub fn load_raster<P: AsRef<Path>>(path: P) -> Result<RasterImage, String> {
    let decoded = image::open(path.as_ref())
        .map_err(|e| format!("Failed to open {}: {}", path.as_ref().display(), e))?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    let data = rgb.into_raw().into_iter().map(f32::from).collect();
    RasterImage::from_data(width, height, data)
        .ok_or_else(|| "Decoded image buffer has unexpected size".to_string())
}

/// Save a working raster to an image file; format follows the output
/// extension.
pub fn save_raster<P: AsRef<Path>>(raster: &RasterImage, path: P) -> Result<(), String> {
    let pixels: Vec<u8> = raster
        .data
        .iter()
        .map(|&v| v.clamp(0.0, 255.0) as u8)
        .collect();
    let buffer = image::RgbImage::from_raw(raster.width, raster.height, pixels)
        .ok_or_else(|| "Raster buffer has unexpected size".to_string())?;
    buffer
        .save(path.as_ref())
        .map_err(|e| format!("Failed to write {}: {}", path.as_ref().display(), e))
}
