//! Tests for the gradient estimation strategies

use super::advanced::{conservative_correction, gentle_correction, standard_correction};
use super::*;
use crate::color::lightness_plane;

/// Solid gray image with a linear left-to-right lightness ramp.
fn ramp_region(width: u32, height: u32, from: f32, to: f32) -> RasterImage {
    let mut image = RasterImage::new(width, height);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let t = x as f32 / (width - 1) as f32;
            let v = from + (to - from) * t;
            let i = (y * width as usize + x) * 3;
            image.data[i] = v;
            image.data[i + 1] = v;
            image.data[i + 2] = v;
        }
    }
    image
}

fn solid_region(width: u32, height: u32, value: f32) -> RasterImage {
    let mut image = RasterImage::new(width, height);
    image.data.fill(value);
    image
}

/// Period-8 checkerboard around a mid gray, no lighting gradient.
fn checkerboard_region(width: u32, height: u32) -> RasterImage {
    let mut image = RasterImage::new(width, height);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let v = if (x / 4 + y / 4) % 2 == 0 { 88.0 } else { 168.0 };
            let i = (y * width as usize + x) * 3;
            image.data[i] = v;
            image.data[i + 1] = v;
            image.data[i + 2] = v;
        }
    }
    image
}

fn assert_within_bounds(map: &CorrectionMap) {
    let (lo, hi) = map.bounds.range();
    for &v in &map.factors.data {
        assert!(
            v >= lo - 1e-5 && v <= hi + 1e-5,
            "factor {v} outside [{lo}, {hi}]"
        );
    }
}

// ========================================================================
// Uniform strategy
// ========================================================================

#[test]
fn test_uniform_ramp_brightens_dark_side() {
    let region = ramp_region(200, 200, 100.0, 200.0);
    let map = estimate_uniform(&region);

    assert_eq!(map.bounds, CorrectionBounds::Uniform);
    assert_within_bounds(&map);

    // The dark left side needs more boost than the bright right side.
    let left = map.factors.at(5, 100);
    let right = map.factors.at(195, 100);
    assert!(
        left > right,
        "left factor {left} should exceed right factor {right}"
    );
}

#[test]
fn test_uniform_flat_region_forces_position_variation() {
    let region = solid_region(80, 80, 128.0);
    let map = estimate_uniform(&region);

    // A perfectly flat region produces an all-ones map before the
    // forced-variation branch; after it, the map must vary by position.
    let range = map.factors.max_value() - map.factors.min_value();
    assert!(range > 0.2, "forced variation range {range} too small");

    // The multiplier grows toward the bottom-right corner.
    assert!(map.factors.at(79, 79) > map.factors.at(0, 0));
}

#[test]
fn test_uniform_dispatch() {
    let region = ramp_region(60, 60, 120.0, 160.0);
    let map = estimate(&region, Mode::Uniform);
    assert_eq!(map.bounds, CorrectionBounds::Uniform);
}

// ========================================================================
// Advanced strategy
// ========================================================================

#[test]
fn test_small_region_routes_to_conservative() {
    let region = ramp_region(40, 40, 100.0, 200.0);
    let map = estimate_advanced(&region);

    assert_eq!(map.bounds, CorrectionBounds::Conservative);
    assert_within_bounds(&map);
}

#[test]
fn test_solid_region_uses_standard_correction() {
    // Zero residual means zero pattern strength, so the quadratic
    // (standard) path runs; a flat region needs no correction.
    let region = solid_region(64, 64, 140.0);
    let map = estimate_advanced(&region);

    assert_eq!(map.bounds, CorrectionBounds::Standard);
    assert_within_bounds(&map);
    for &v in &map.factors.data {
        assert!((v - 1.0).abs() < 0.01, "flat region factor {v} should be ~1");
    }
}

#[test]
fn test_checkerboard_uses_gentle_correction() {
    let region = checkerboard_region(100, 100);
    let map = estimate_advanced(&region);

    assert_eq!(map.bounds, CorrectionBounds::Gentle);
    assert_within_bounds(&map);
}

#[test]
fn test_advanced_dispatch() {
    let region = solid_region(64, 64, 100.0);
    let map = estimate(&region, Mode::Advanced);
    assert_eq!(map.bounds, CorrectionBounds::Standard);
}

// ========================================================================
// Correction variants on synthetic lighting components
// ========================================================================

#[test]
fn test_gentle_correction_counteracts_ramp() {
    let region = ramp_region(60, 60, 110.0, 190.0);
    let lighting = lightness_plane(&region);
    let map = gentle_correction(&lighting);

    assert_within_bounds(&map);
    // Bright side scales down, dark side scales up.
    assert!(map.factors.at(2, 30) > 1.0);
    assert!(map.factors.at(57, 30) < 1.0);
}

#[test]
fn test_standard_correction_counteracts_bowl() {
    // Lighting brighter in the center, darker at the edges.
    let mut lighting = crate::raster::Plane::new(60, 60);
    for y in 0..60 {
        for x in 0..60 {
            let dx = x as f32 - 30.0;
            let dy = y as f32 - 30.0;
            *lighting.at_mut(x, y) = 180.0 - (dx * dx + dy * dy) * 0.02;
        }
    }
    let map = standard_correction(&lighting);

    assert_eq!(map.bounds, CorrectionBounds::Standard);
    assert_within_bounds(&map);
    assert!(
        map.factors.at(0, 0) > map.factors.at(30, 30),
        "dark corners should get a larger boost than the bright center"
    );
}

#[test]
fn test_conservative_flat_region_is_identity() {
    let region = solid_region(30, 30, 90.0);
    let map = conservative_correction(&lightness_plane(&region));

    assert_eq!(map.bounds, CorrectionBounds::Conservative);
    for &v in &map.factors.data {
        assert!((v - 1.0).abs() < 1e-4);
    }
}

#[test]
fn test_identity_map() {
    let map = CorrectionMap::identity(5, 4, CorrectionBounds::Gentle);
    assert_eq!(map.factors.width, 5);
    assert_eq!(map.factors.height, 4);
    assert!(map.factors.data.iter().all(|&v| v == 1.0));
}
