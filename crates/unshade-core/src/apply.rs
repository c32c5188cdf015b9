//! Correction application
//!
//! Upsamples the region correction map to full-image resolution,
//! decomposes the image into a base-lighting band and multi-scale
//! texture bands, rescales only the lighting, and recombines with the
//! texture preserved at fixed ratios. Brightness and color preservation
//! blends run last, driven by the user strength settings.

use tracing::{debug, info};

use crate::diagnostics;
use crate::estimator::CorrectionMap;
use crate::imageops::{gaussian_blur, resize_bicubic};
use crate::models::{Mode, StrengthSettings};
use crate::raster::{Plane, RasterImage};

/// Texture recombination weights: preserve fine detail almost fully,
/// coarser structure somewhat less.
const FINE_WEIGHT: f32 = 0.9;
const MEDIUM_WEIGHT: f32 = 0.8;
const COARSE_WEIGHT: f32 = 0.7;

/// Clamp range for the brightness-restoration ratio.
const BRIGHTNESS_RATIO_LO: f32 = 0.3;
const BRIGHTNESS_RATIO_HI: f32 = 3.0;

/// Apply a correction map to the full image.
///
/// With `gradient_strength == 0` the input is returned unmodified
/// (byte-identical). Otherwise the output raster holds integral channel
/// values in `[0, 255]`.
pub fn apply_correction(
    image: &RasterImage,
    map: &CorrectionMap,
    mode: Mode,
    settings: &StrengthSettings,
) -> RasterImage {
    let gs = settings.gradient_strength;
    if gs == 0.0 {
        debug!("gradient strength is 0, returning original image");
        return image.clone();
    }

    let (w, h) = (image.width as usize, image.height as usize);

    // Step 1: bring the region-sized map to full resolution, then
    // smooth it so the selection boundary cannot leave a hard seam.
    let resized = resize_bicubic(&map.factors, w, h);
    let smoothed = gaussian_blur(&resized, 25, 5.0);

    // Step 2: amplify the correction delta and scale by user strength.
    let mut effective = smoothed;
    for v in effective.data.iter_mut() {
        *v = 1.0 + gs * 2.0 * (*v - 1.0);
    }
    debug!(
        min = effective.min_value(),
        max = effective.max_value(),
        "effective correction range"
    );

    // Steps 3-6 run per color channel.
    let mut corrected = RasterImage::new(image.width, image.height);
    for channel in 0..3 {
        let original = image.channel_plane(channel);

        // Multi-scale texture bands, each relative to a blur of the
        // original channel. The heaviest blur doubles as the
        // base-lighting band.
        let fine_texture = original.sub(&gaussian_blur(&original, 5, 1.0));
        let medium_texture = original.sub(&gaussian_blur(&original, 15, 3.0));
        let base_lighting = gaussian_blur(&original, 35, 7.0);
        let coarse_texture = original.sub(&base_lighting);

        let result = if mode == Mode::Uniform {
            // Uniform fabrics get perfectly flat lighting: blend the
            // lighting band toward its per-channel median by strength,
            // and skip the coarse texture term entirely.
            let target = base_lighting.median();
            let mut flat = Plane::new(base_lighting.width, base_lighting.height);
            for (dst, &b) in flat.data.iter_mut().zip(base_lighting.data.iter()) {
                *dst = gs * target + (1.0 - gs) * b;
            }
            flat.add(&fine_texture)
                .add(&medium_texture.sub(&fine_texture).scale(MEDIUM_WEIGHT))
        } else {
            base_lighting
                .mul(&effective)
                .add(&fine_texture.scale(FINE_WEIGHT))
                .add(&medium_texture.sub(&fine_texture).scale(MEDIUM_WEIGHT))
                .add(&coarse_texture.sub(&medium_texture).scale(COARSE_WEIGHT))
        };

        corrected.set_channel_plane(channel, &result);
    }

    // Step 7: brightness preservation.
    if settings.brightness_preservation > 0.0 {
        let original_brightness = image.mean();
        let corrected_brightness = corrected.mean();
        if corrected_brightness > 0.0 {
            let ratio = (original_brightness / corrected_brightness)
                .clamp(BRIGHTNESS_RATIO_LO, BRIGHTNESS_RATIO_HI);
            let blend =
                settings.brightness_preservation * ratio + (1.0 - settings.brightness_preservation);
            for v in corrected.data.iter_mut() {
                *v *= blend;
            }
            debug!(ratio, blend, "brightness preservation");
        }
    }

    // Step 8: color preservation reverts toward the uncorrected image,
    // but only above the 0.5 midpoint.
    if settings.color_preservation > 0.5 {
        let blend = (settings.color_preservation - 0.5) * 2.0;
        for (v, &o) in corrected.data.iter_mut().zip(image.data.iter()) {
            *v = blend * o + (1.0 - blend) * *v;
        }
        debug!(blend, "color preservation blend");
    }

    // Step 9: clamp into pixel range and truncate to integers.
    for v in corrected.data.iter_mut() {
        *v = v.clamp(0.0, 255.0).floor();
    }

    let metrics = diagnostics::correction_metrics(image, &corrected);
    info!(
        texture_ratio = metrics.texture_ratio,
        uniformity_improvement = metrics.uniformity_improvement,
        brightness_before = metrics.brightness_before,
        brightness_after = metrics.brightness_after,
        "correction applied"
    );

    corrected
}
