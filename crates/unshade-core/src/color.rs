//! Perceptual lightness extraction
//!
//! Gradient analysis runs on the L channel of a CIE L*a*b* transform of
//! the image. Only lightness is needed, so the a*/b* axes are never
//! computed. The L* value (0-100) is scaled to the 0-255 range so the
//! estimator thresholds written against 8-bit lightness keep their
//! meaning.

use crate::raster::{Plane, RasterImage};

/// D65 standard illuminant reference white (Y component).
const D65_Y: f32 = 1.00000;

/// Luminance row of the sRGB to XYZ matrix (D65).
const SRGB_LUMA: [f32; 3] = [0.2126729, 0.7151522, 0.0721750];

/// Scale factor mapping L* (0-100) onto the 0-255 working range.
const L_SCALE: f32 = 255.0 / 100.0;

/// sRGB gamma expansion for a channel value in 0.0-1.0.
#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// LAB f(t) function
#[inline]
fn lab_f(t: f32) -> f32 {
    const DELTA: f32 = 6.0 / 29.0;
    const DELTA_CUBED: f32 = DELTA * DELTA * DELTA; // ~0.008856

    if t > DELTA_CUBED {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

/// Lightness of a single RGB pixel (channels in 0-255), scaled 0-255.
#[inline]
pub fn pixel_lightness(r: f32, g: f32, b: f32) -> f32 {
    let rl = srgb_to_linear((r / 255.0).clamp(0.0, 1.0));
    let gl = srgb_to_linear((g / 255.0).clamp(0.0, 1.0));
    let bl = srgb_to_linear((b / 255.0).clamp(0.0, 1.0));

    let y = SRGB_LUMA[0] * rl + SRGB_LUMA[1] * gl + SRGB_LUMA[2] * bl;
    let l = 116.0 * lab_f(y / D65_Y) - 16.0;
    l * L_SCALE
}

/// Extract the scaled lightness channel of an image as a plane.
pub fn lightness_plane(image: &RasterImage) -> Plane {
    let mut plane = Plane::new(image.width as usize, image.height as usize);
    for (dst, pixel) in plane.data.iter_mut().zip(image.data.chunks_exact(3)) {
        *dst = pixel_lightness(pixel[0], pixel[1], pixel[2]);
    }
    plane
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lightness_endpoints() {
        assert!(pixel_lightness(0.0, 0.0, 0.0).abs() < 0.5);
        assert!((pixel_lightness(255.0, 255.0, 255.0) - 255.0).abs() < 0.5);
    }

    #[test]
    fn test_lightness_monotonic_in_gray() {
        let mut previous = -1.0;
        for v in (0..=255).step_by(5) {
            let l = pixel_lightness(v as f32, v as f32, v as f32);
            assert!(l > previous, "lightness must increase with gray level");
            previous = l;
        }
    }

    #[test]
    fn test_green_lighter_than_blue() {
        // Luminance weights make pure green much lighter than pure blue.
        let green = pixel_lightness(0.0, 255.0, 0.0);
        let blue = pixel_lightness(0.0, 0.0, 255.0);
        assert!(green > blue + 50.0);
    }
}
