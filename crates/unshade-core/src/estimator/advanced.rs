//! Advanced (pattern-aware) gradient estimation
//!
//! Splits the region's lightness into a heavily blurred lighting
//! component and a high-frequency residual, classifies the residual's
//! pattern strength, then fits a polynomial surface to the lighting
//! component: a planar fit with tight clamps when a strong pattern must
//! be preserved, a regularized quadratic fit otherwise. Regions too
//! small for reliable classification get a conservative linear
//! correction instead.

use tracing::debug;

use super::fit::{eval_plane, eval_quadratic, fit_plane, fit_quadratic};
use super::{CorrectionBounds, CorrectionMap};
use crate::color::lightness_plane;
use crate::imageops::gaussian_blur;
use crate::pattern::{pattern_strength, PATTERN_THRESHOLD};
use crate::raster::{Plane, RasterImage};

/// Below this edge length the region routes to the conservative path.
const MIN_ANALYSIS_DIM: usize = 50;

/// Ridge parameter guarding the quadratic normal equations.
const QUADRATIC_RIDGE: f64 = 1e-6;

/// Estimate an advanced-mode correction map for a region.
pub fn estimate_advanced(region: &RasterImage) -> CorrectionMap {
    let lightness = lightness_plane(region);
    let (w, h) = (lightness.width, lightness.height);

    if w < MIN_ANALYSIS_DIM || h < MIN_ANALYSIS_DIM {
        debug!(w, h, "region too small for pattern analysis, using conservative correction");
        return conservative_correction(&lightness);
    }

    // Large blur isolates lighting; what remains is the pattern.
    let lighting = gaussian_blur(&lightness, 31, 8.0);
    let residual = lightness.sub(&lighting);

    let strength = pattern_strength(&residual);
    if strength > PATTERN_THRESHOLD {
        debug!(strength, "strong pattern detected, using gentle correction");
        gentle_correction(&lighting)
    } else {
        debug!(strength, "weak pattern detected, using standard correction");
        standard_correction(&lighting)
    }
}

/// Gentle correction that preserves patterned fabrics: planar fit only,
/// tight clamps.
pub(crate) fn gentle_correction(lighting: &Plane) -> CorrectionMap {
    let bounds = CorrectionBounds::Gentle;
    match fit_plane(lighting) {
        Some(coeffs) => {
            let surface = eval_plane(&coeffs, lighting.width, lighting.height);
            surface_ratio_map(lighting, surface, bounds)
        }
        None => CorrectionMap::identity(lighting.width, lighting.height, bounds),
    }
}

/// Standard correction for fabrics without strong patterns: quadratic
/// fit with cross term, ridge-regularized.
pub(crate) fn standard_correction(lighting: &Plane) -> CorrectionMap {
    let bounds = CorrectionBounds::Standard;
    match fit_quadratic(lighting, QUADRATIC_RIDGE) {
        Some(coeffs) => {
            let surface = eval_quadratic(&coeffs, lighting.width, lighting.height);
            surface_ratio_map(lighting, surface, bounds)
        }
        None => CorrectionMap::identity(lighting.width, lighting.height, bounds),
    }
}

/// Correction = mean(lighting) / surface, with the surface first
/// renormalized to share the lighting component's mean so the ratio is
/// centered at 1 on average. Zero denominators fall back to 1.
fn surface_ratio_map(lighting: &Plane, mut surface: Plane, bounds: CorrectionBounds) -> CorrectionMap {
    let mean_lighting = lighting.mean();
    let offset = mean_lighting - surface.mean();
    for v in surface.data.iter_mut() {
        *v += offset;
    }

    let (lo, hi) = bounds.range();
    let mut factors = Plane::new(surface.width, surface.height);
    for (dst, &s) in factors.data.iter_mut().zip(surface.data.iter()) {
        let correction = if s != 0.0 { mean_lighting / s } else { 1.0 };
        *dst = correction.clamp(lo, hi);
    }

    CorrectionMap { factors, bounds }
}

/// Mean horizontal gradient (central differences, one-sided at the
/// edges), 0 for a single-column plane.
fn mean_gradient_x(plane: &Plane) -> f32 {
    let (w, h) = (plane.width, plane.height);
    if w < 2 {
        return 0.0;
    }
    let mut sum = 0.0f64;
    for y in 0..h {
        sum += (plane.at(1, y) - plane.at(0, y)) as f64;
        for x in 1..w - 1 {
            sum += ((plane.at(x + 1, y) - plane.at(x - 1, y)) / 2.0) as f64;
        }
        sum += (plane.at(w - 1, y) - plane.at(w - 2, y)) as f64;
    }
    (sum / (w * h) as f64) as f32
}

/// Mean vertical gradient, 0 for a single-row plane.
fn mean_gradient_y(plane: &Plane) -> f32 {
    let (w, h) = (plane.width, plane.height);
    if h < 2 {
        return 0.0;
    }
    let mut sum = 0.0f64;
    for x in 0..w {
        sum += (plane.at(x, 1) - plane.at(x, 0)) as f64;
        for y in 1..h - 1 {
            sum += ((plane.at(x, y + 1) - plane.at(x, y - 1)) / 2.0) as f64;
        }
        sum += (plane.at(x, h - 1) - plane.at(x, h - 2)) as f64;
    }
    (sum / (w * h) as f64) as f32
}

/// Very gentle linear-gradient correction for small regions.
pub(crate) fn conservative_correction(lightness: &Plane) -> CorrectionMap {
    let bounds = CorrectionBounds::Conservative;
    let (lo, hi) = bounds.range();
    let (w, h) = (lightness.width, lightness.height);
    let (wf, hf) = (w as f32, h as f32);

    let mean_val = lightness.mean();
    let grad_x = mean_gradient_x(lightness);
    let grad_y = mean_gradient_y(lightness);

    let mut factors = Plane::new(w, h);
    for y in 0..h {
        let y_norm = (y as f32 - hf / 2.0) / hf;
        for x in 0..w {
            let x_norm = (x as f32 - wf / 2.0) / wf;
            let estimate = mean_val + grad_x * x_norm * wf * 0.1 + grad_y * y_norm * hf * 0.1;
            let correction = if estimate != 0.0 { mean_val / estimate } else { 1.0 };
            *factors.at_mut(x, y) = correction.clamp(lo, hi);
        }
    }

    CorrectionMap { factors, bounds }
}
