//! Pattern strength classification
//!
//! Decides whether a region is strongly patterned (plaid, checks) or
//! largely uniform by looking at where the spectral energy of its
//! high-frequency residual sits. Repeating weaves concentrate energy at
//! a characteristic non-zero spatial frequency; smooth gradients
//! concentrate near zero frequency.

use tracing::debug;

use crate::fft::magnitude_spectrum;
use crate::raster::Plane;

/// Fallback strength when the region is too small or degenerate for
/// frequency analysis.
pub const DEFAULT_PATTERN_STRENGTH: f32 = 0.2;

/// Regions with strength above this use gentle (pattern-preserving)
/// correction.
pub const PATTERN_THRESHOLD: f32 = 0.3;

/// Pattern strength of a lightness residual, in `[0,1]`.
///
/// The residual's center-shifted magnitude spectrum is partitioned into
/// a low-frequency disk (radius 10% of the min dimension) and a
/// mid-frequency annulus (10%-40%). Strength is the mid-band share of
/// total spectral energy, scaled by 10 and capped at 1.
pub fn pattern_strength(residual: &Plane) -> f32 {
    if residual.width < 2 || residual.height < 2 {
        return DEFAULT_PATTERN_STRENGTH;
    }

    let spectrum = magnitude_spectrum(residual);
    let (w, h) = (spectrum.width, spectrum.height);
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);

    let min_dim = w.min(h) as f32;
    let low_radius_sq = (min_dim * 0.1) * (min_dim * 0.1);
    let mid_radius_sq = (min_dim * 0.4) * (min_dim * 0.4);

    let mut mid_energy = 0.0f64;
    let mut total_energy = 0.0f64;
    for y in 0..h {
        let dy = y as f32 - cy;
        for x in 0..w {
            let dx = x as f32 - cx;
            let dist_sq = dx * dx + dy * dy;
            let magnitude = spectrum.at(x, y) as f64;
            total_energy += magnitude;
            if dist_sq > low_radius_sq && dist_sq <= mid_radius_sq {
                mid_energy += magnitude;
            }
        }
    }

    if !total_energy.is_finite() {
        return DEFAULT_PATTERN_STRENGTH;
    }

    let strength = if total_energy > 0.0 {
        ((mid_energy / total_energy) as f32 * 10.0).min(1.0)
    } else {
        0.0
    };
    debug!(strength, "pattern strength");
    strength
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_region_returns_default() {
        let tiny = Plane::filled(1, 1, 5.0);
        assert_eq!(pattern_strength(&tiny), DEFAULT_PATTERN_STRENGTH);
    }

    #[test]
    fn test_zero_residual_is_unpatterned() {
        let flat = Plane::new(64, 64);
        assert_eq!(pattern_strength(&flat), 0.0);
    }

    #[test]
    fn test_checkerboard_is_strongly_patterned() {
        // 8-pixel period checkerboard, zero-mean like a real residual.
        let mut plane = Plane::new(64, 64);
        for y in 0..64 {
            for x in 0..64 {
                let cell = (x / 4 + y / 4) % 2;
                *plane.at_mut(x, y) = if cell == 0 { 20.0 } else { -20.0 };
            }
        }
        let strength = pattern_strength(&plane);
        assert!(
            strength > PATTERN_THRESHOLD,
            "checkerboard strength {strength} should exceed threshold"
        );
    }

    #[test]
    fn test_smooth_gradient_is_weakly_patterned() {
        // One cycle across the region: all energy lands inside the
        // low-frequency disk.
        let mut plane = Plane::new(64, 64);
        for y in 0..64 {
            for x in 0..64 {
                *plane.at_mut(x, y) =
                    (2.0 * std::f32::consts::PI * x as f32 / 64.0).cos();
            }
        }
        let strength = pattern_strength(&plane);
        assert!(
            strength < PATTERN_THRESHOLD,
            "smooth-gradient strength {strength} should be below threshold"
        );
    }
}
