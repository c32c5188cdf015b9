//! Correction quality metrics
//!
//! Observability-only measurements comparing an image before and after
//! correction. Nothing here ever affects control flow.

use crate::imageops::gaussian_blur_rgb;
use crate::raster::RasterImage;

/// Diagnostic measurements for one correction run.
#[derive(Debug, Clone, Copy)]
pub struct CorrectionMetrics {
    /// Ratio of texture deviation after vs. before correction. Values
    /// near 1 mean thread detail survived (target: > 0.8).
    pub texture_ratio: f32,

    /// Relative drop in low-frequency lighting deviation. Higher is
    /// better; 0 means the lighting is as uneven as before.
    pub uniformity_improvement: f32,

    /// Mean brightness of the input image.
    pub brightness_before: f32,

    /// Mean brightness of the corrected image.
    pub brightness_after: f32,
}

/// Standard deviation over all interleaved channel values.
fn raster_std(image: &RasterImage) -> f32 {
    if image.data.is_empty() {
        return 0.0;
    }
    let mean = image.mean() as f64;
    let variance: f64 = image
        .data
        .iter()
        .map(|&v| (v as f64 - mean) * (v as f64 - mean))
        .sum::<f64>()
        / image.data.len() as f64;
    variance.sqrt() as f32
}

/// Deviation of the residual left after removing a blur of the image.
fn texture_std(image: &RasterImage, ksize: usize, sigma: f32) -> f32 {
    let blurred = gaussian_blur_rgb(image, ksize, sigma);
    let mut residual = image.clone();
    for (v, &b) in residual.data.iter_mut().zip(blurred.data.iter()) {
        *v -= b;
    }
    raster_std(&residual)
}

/// Deviation of the low-frequency lighting component.
fn lighting_std(image: &RasterImage, ksize: usize, sigma: f32) -> f32 {
    raster_std(&gaussian_blur_rgb(image, ksize, sigma))
}

/// Compute before/after correction metrics.
pub fn correction_metrics(original: &RasterImage, corrected: &RasterImage) -> CorrectionMetrics {
    let original_texture = texture_std(original, 15, 3.0);
    let corrected_texture = texture_std(corrected, 15, 3.0);
    let texture_ratio = if original_texture > 0.0 {
        corrected_texture / original_texture
    } else {
        1.0
    };

    let original_lighting = lighting_std(original, 25, 5.0);
    let corrected_lighting = lighting_std(corrected, 25, 5.0);
    let uniformity_improvement = if original_lighting > 0.0 {
        (original_lighting - corrected_lighting) / original_lighting
    } else {
        0.0
    };

    CorrectionMetrics {
        texture_ratio,
        uniformity_improvement,
        brightness_before: original.mean(),
        brightness_after: corrected.mean(),
    }
}
