//! Gradient estimation
//!
//! Produces a per-pixel multiplicative correction map over the selected
//! region: "multiply this pixel's lightness by this factor to remove
//! the illumination gradient." Two strategies exist, selected by mode:
//!
//! - `uniform`: aggressive position-based flattening for near-solid
//!   fabrics
//! - `advanced`: polynomial-surface fit, pattern-aware, with gentle and
//!   standard variants plus a conservative fallback for small regions
//!
//! Numerical degeneracy (singular fit, zero denominators) never
//! escapes as an error; every path has a defined fallback.

mod advanced;
mod fit;
mod uniform;

#[cfg(test)]
mod tests;

pub use advanced::estimate_advanced;
pub use uniform::estimate_uniform;

use crate::models::Mode;
use crate::raster::{Plane, RasterImage};

/// Which clamp range produced a correction map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionBounds {
    /// Uniform strategy, clamped to `[0.1, 10.0]`.
    Uniform,
    /// Advanced gentle (pattern-preserving), clamped to `[0.85, 1.15]`.
    Gentle,
    /// Advanced standard, clamped to `[0.7, 1.4]`.
    Standard,
    /// Small-region fallback, clamped to `[0.9, 1.1]`.
    Conservative,
}

impl CorrectionBounds {
    /// The `(lo, hi)` clamp range for this bound class.
    pub fn range(&self) -> (f32, f32) {
        match self {
            CorrectionBounds::Uniform => (0.1, 10.0),
            CorrectionBounds::Gentle => (0.85, 1.15),
            CorrectionBounds::Standard => (0.7, 1.4),
            CorrectionBounds::Conservative => (0.9, 1.1),
        }
    }
}

/// A correction map over the selection's coordinate grid.
///
/// Produced once per request by the estimator, consumed once by the
/// applicator, then discarded.
#[derive(Debug, Clone)]
pub struct CorrectionMap {
    /// Positive scale factors, one per region pixel.
    pub factors: Plane,

    /// The clamp class that bounded the factors.
    pub bounds: CorrectionBounds,
}

impl CorrectionMap {
    /// An identity map (all factors 1.0) with the given bound class.
    pub fn identity(width: usize, height: usize, bounds: CorrectionBounds) -> Self {
        Self {
            factors: Plane::filled(width, height, 1.0),
            bounds,
        }
    }
}

/// Run the estimation strategy selected by `mode` over a region.
pub fn estimate(region: &RasterImage, mode: Mode) -> CorrectionMap {
    match mode {
        Mode::Uniform => estimate_uniform(region),
        Mode::Advanced => estimate_advanced(region),
    }
}
