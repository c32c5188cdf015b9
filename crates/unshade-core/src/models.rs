//! Data models for gradient removal
//!
//! Wire-facing request parameters: the normalized selection rectangle,
//! the estimation mode, and the three user strength settings.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Normalized selection rectangle in `[0,1]`, relative to the image
/// dimensions.
///
/// `left + width <= 1` is not enforced; the region extractor clamps
/// out-of-range rectangles rather than rejecting them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Gradient estimation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Aggressive position-based correction for near-solid fabrics.
    Uniform,
    /// Polynomial-surface-fit, pattern-aware correction.
    Advanced,
}

impl Mode {
    pub fn as_str(&self) -> &str {
        match self {
            Mode::Uniform => "uniform",
            Mode::Advanced => "advanced",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(Mode::Uniform),
            "advanced" => Ok(Mode::Advanced),
            other => Err(format!(
                "Invalid mode \"{}\". Must be \"uniform\" or \"advanced\"",
                other
            )),
        }
    }
}

/// User-supplied correction strengths, each in `[0,1]`.
///
/// These are pipeline parameters, not persisted state. Field names on
/// the wire match the original camelCase API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrengthSettings {
    /// How much correction to apply (0 = no-op).
    pub gradient_strength: f32,

    /// How much to restore original mean brightness after correction.
    pub brightness_preservation: f32,

    /// How much to blend back toward the uncorrected image. Only values
    /// above 0.5 cause any reversion.
    pub color_preservation: f32,
}

impl Default for StrengthSettings {
    fn default() -> Self {
        Self {
            gradient_strength: 0.5,
            brightness_preservation: 0.8,
            color_preservation: 0.9,
        }
    }
}
