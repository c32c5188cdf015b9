//! Uniform-mode gradient estimation
//!
//! Aggressive, position-based correction intended for near-solid
//! fabrics: measure edge-vs-center lightness on a heavily smoothed
//! copy, synthesize a linear lighting surface from the edge gradients,
//! and overcorrect toward the center brightness.

use tracing::debug;

use super::{CorrectionBounds, CorrectionMap};
use crate::color::lightness_plane;
use crate::imageops::gaussian_blur;
use crate::raster::{Plane, RasterImage};

/// Clamp range of the uniform strategy.
const CLAMP_LO: f32 = 0.1;
const CLAMP_HI: f32 = 10.0;

/// Mean of a rectangular sub-region of a plane (half-open bounds).
fn region_mean(plane: &Plane, x0: usize, x1: usize, y0: usize, y1: usize) -> f32 {
    let mut sum = 0.0f64;
    let mut count = 0usize;
    for y in y0..y1 {
        for x in x0..x1 {
            sum += plane.at(x, y) as f64;
            count += 1;
        }
    }
    if count == 0 {
        plane.mean()
    } else {
        (sum / count as f64) as f32
    }
}

/// Estimate a uniform-mode correction map for a region.
///
/// The "force stronger correction" branch (when the amplified map's
/// value range is below 0.2) compounds a position-based multiplier on
/// top of the already-amplified correction. That compounding is
/// intentional tuning carried over from the reference behavior and is
/// preserved literally.
pub fn estimate_uniform(region: &RasterImage) -> CorrectionMap {
    let lightness = lightness_plane(region);
    let (w, h) = (lightness.width, lightness.height);
    let (wf, hf) = (w as f32, h as f32);

    // Smooth out texture noise while keeping the lighting gradient.
    let smoothed = gaussian_blur(&lightness, 21, 5.0);

    // Edge quartiles and center region of the smoothed lightness. A
    // quartile never collapses below one pixel, so tiny regions stay
    // well-defined.
    let qw = (w / 4).max(1);
    let qh = (h / 4).max(1);
    let left_edge = region_mean(&smoothed, 0, qw, 0, h);
    let right_edge = region_mean(&smoothed, w - qw, w, 0, h);
    let top_edge = region_mean(&smoothed, 0, w, 0, qh);
    let bottom_edge = region_mean(&smoothed, 0, w, h - qh, h);
    let center = region_mean(&smoothed, w / 4, w - w / 4, h / 4, h - h / 4);

    debug!(
        left_edge,
        right_edge, top_edge, bottom_edge, center, "uniform edge analysis"
    );

    let horizontal_gradient = (right_edge - left_edge) / wf;
    let vertical_gradient = (bottom_edge - top_edge) / hf;

    // Synthetic lighting surface from the edge gradients, amplified 2x,
    // then a correction toward the center brightness.
    let mut factors = Plane::new(w, h);
    for y in 0..h {
        let y_norm = (y as f32 - hf / 2.0) / (hf / 2.0);
        for x in 0..w {
            let x_norm = (x as f32 - wf / 2.0) / (wf / 2.0);
            let surface = center
                + horizontal_gradient * x_norm * wf * 2.0
                + vertical_gradient * y_norm * hf * 2.0;

            let correction = if surface > 1.0 { center / surface } else { 1.0 };
            let correction = correction.clamp(CLAMP_LO, CLAMP_HI);

            // Triple the correction delta for maximum gradient removal.
            let amplified = 1.0 + (correction - 1.0) * 3.0;
            *factors.at_mut(x, y) = amplified.clamp(CLAMP_LO, CLAMP_HI);
        }
    }

    // If the correction came out too flat to matter, force additional
    // position-based variation.
    let range = factors.max_value() - factors.min_value();
    if range < 0.2 {
        for y in 0..h {
            let y_norm = (y as f32 - hf / 2.0) / (hf / 2.0);
            for x in 0..w {
                let x_norm = (x as f32 - wf / 2.0) / (wf / 2.0);
                *factors.at_mut(x, y) *= 1.0 + 0.3 * x_norm + 0.3 * y_norm;
            }
        }
        debug!(
            min = factors.min_value(),
            max = factors.max_value(),
            "forced stronger uniform correction"
        );
    }

    CorrectionMap {
        factors,
        bounds: CorrectionBounds::Uniform,
    }
}
