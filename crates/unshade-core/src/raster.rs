//! Raster buffers for pipeline processing
//!
//! `RasterImage` holds interleaved RGB data as f32 in the 0..255
//! working range; `Plane` is a dense single-channel 2D buffer used for
//! lightness, correction maps, and texture bands.

use rayon::prelude::*;

/// Pixel count above which elementwise operations use rayon.
pub(crate) const PARALLEL_THRESHOLD: usize = 100_000;

/// An RGB raster image with f32 channel values in the 0..255 range.
///
/// Owned exclusively by the pipeline invocation that created it; steps
/// that modify pixel data produce a new derived image.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Interleaved RGB data (f32, 0.0-255.0 range)
    pub data: Vec<f32>,
}

impl RasterImage {
    /// Create a black image of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width as usize * height as usize * 3],
        }
    }

    /// Create an image from interleaved RGB data.
    ///
    /// Returns `None` if the buffer length does not match the
    /// dimensions.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Option<Self> {
        if data.len() != width as usize * height as usize * 3 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Number of pixels in the image.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Extract one color channel (0 = R, 1 = G, 2 = B) as a plane.
    pub fn channel_plane(&self, channel: usize) -> Plane {
        debug_assert!(channel < 3);
        let mut plane = Plane::new(self.width as usize, self.height as usize);
        for (dst, pixel) in plane.data.iter_mut().zip(self.data.chunks_exact(3)) {
            *dst = pixel[channel];
        }
        plane
    }

    /// Write a plane back into one color channel.
    pub fn set_channel_plane(&mut self, channel: usize, plane: &Plane) {
        debug_assert!(channel < 3);
        debug_assert_eq!(plane.width, self.width as usize);
        debug_assert_eq!(plane.height, self.height as usize);
        for (src, pixel) in plane.data.iter().zip(self.data.chunks_exact_mut(3)) {
            pixel[channel] = *src;
        }
    }

    /// Mean over all channel values.
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.data.iter().map(|&v| v as f64).sum();
        (sum / self.data.len() as f64) as f32
    }
}

/// A dense single-channel 2D buffer of f32 values.
///
/// Row-major storage; index `y * width + x`. All elementwise arithmetic
/// in the pipeline is expressed through these buffers rather than
/// per-pixel closures so the per-element semantics stay explicit.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl Plane {
    /// Create a zero-filled plane.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Create a plane filled with a constant value.
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Create a plane from existing data. Returns `None` on length
    /// mismatch.
    pub fn from_data(width: usize, height: usize, data: Vec<f32>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn at_mut(&mut self, x: usize, y: usize) -> &mut f32 {
        &mut self.data[y * self.width + x]
    }

    /// Elementwise subtraction: `self - other`.
    pub fn sub(&self, other: &Plane) -> Plane {
        debug_assert_eq!(self.data.len(), other.data.len());
        self.zip_with(other, |a, b| a - b)
    }

    /// Elementwise addition: `self + other`.
    pub fn add(&self, other: &Plane) -> Plane {
        debug_assert_eq!(self.data.len(), other.data.len());
        self.zip_with(other, |a, b| a + b)
    }

    /// Elementwise multiplication: `self * other`.
    pub fn mul(&self, other: &Plane) -> Plane {
        debug_assert_eq!(self.data.len(), other.data.len());
        self.zip_with(other, |a, b| a * b)
    }

    /// Multiply every element by a scalar.
    pub fn scale(&self, factor: f32) -> Plane {
        let mut out = self.clone();
        for v in out.data.iter_mut() {
            *v *= factor;
        }
        out
    }

    /// Clamp every element into `[lo, hi]` in place.
    pub fn clamp_in_place(&mut self, lo: f32, hi: f32) {
        for v in self.data.iter_mut() {
            *v = v.clamp(lo, hi);
        }
    }

    /// Mean of all elements (0.0 for an empty plane).
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.data.iter().map(|&v| v as f64).sum();
        (sum / self.data.len() as f64) as f32
    }

    /// Minimum element value.
    pub fn min_value(&self) -> f32 {
        self.data.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Maximum element value.
    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Population standard deviation of all elements.
    pub fn std_dev(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let mean = self.mean() as f64;
        let variance: f64 = self
            .data
            .iter()
            .map(|&v| (v as f64 - mean) * (v as f64 - mean))
            .sum::<f64>()
            / self.data.len() as f64;
        variance.sqrt() as f32
    }

    /// Median element value via partial sort.
    pub fn median(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let mut sorted = self.data.clone();
        let mid = sorted.len() / 2;
        sorted.select_nth_unstable_by(mid, |a, b| {
            a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted[mid]
    }

    fn zip_with(&self, other: &Plane, f: impl Fn(f32, f32) -> f32 + Sync) -> Plane {
        let mut out = Plane::new(self.width, self.height);
        if self.data.len() >= PARALLEL_THRESHOLD {
            out.data
                .par_iter_mut()
                .zip(self.data.par_iter().zip(other.data.par_iter()))
                .for_each(|(dst, (&a, &b))| *dst = f(a, b));
        } else {
            for (dst, (&a, &b)) in out
                .data
                .iter_mut()
                .zip(self.data.iter().zip(other.data.iter()))
            {
                *dst = f(a, b);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_roundtrip() {
        let mut image = RasterImage::new(4, 3);
        for (i, v) in image.data.iter_mut().enumerate() {
            *v = i as f32;
        }
        let green = image.channel_plane(1);
        assert_eq!(green.at(0, 0), 1.0);
        assert_eq!(green.at(1, 0), 4.0);

        let mut copy = RasterImage::new(4, 3);
        copy.set_channel_plane(1, &green);
        assert_eq!(copy.channel_plane(1), green);
    }

    #[test]
    fn test_plane_elementwise() {
        let a = Plane::filled(3, 2, 4.0);
        let b = Plane::filled(3, 2, 1.5);
        assert_eq!(a.sub(&b).at(2, 1), 2.5);
        assert_eq!(a.add(&b).at(0, 0), 5.5);
        assert_eq!(a.mul(&b).at(1, 1), 6.0);
        assert_eq!(a.scale(0.5).at(0, 1), 2.0);
    }

    #[test]
    fn test_plane_stats() {
        let plane = Plane::from_data(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((plane.mean() - 2.5).abs() < 1e-6);
        assert_eq!(plane.min_value(), 1.0);
        assert_eq!(plane.max_value(), 4.0);
        assert_eq!(plane.median(), 3.0);
        assert!((plane.std_dev() - 1.118).abs() < 1e-3);
    }

    #[test]
    fn test_from_data_length_mismatch() {
        assert!(Plane::from_data(3, 3, vec![0.0; 8]).is_none());
        assert!(RasterImage::from_data(2, 2, vec![0.0; 11]).is_none());
    }
}
