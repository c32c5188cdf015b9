//! Dense 2D image operations
//!
//! Separable Gaussian blur and bicubic resampling over `Plane` buffers.
//! Kernel sizes and sigmas used by the pipeline are part of the
//! observable contract; changing them changes output.

use rayon::prelude::*;

use crate::raster::{Plane, RasterImage, PARALLEL_THRESHOLD};

/// Build a normalized 1D Gaussian kernel of odd size `ksize`.
fn gaussian_kernel(ksize: usize, sigma: f32) -> Vec<f32> {
    debug_assert!(ksize % 2 == 1, "kernel size must be odd");
    let center = (ksize / 2) as f32;
    let denom = 2.0 * sigma * sigma;

    let mut kernel: Vec<f32> = (0..ksize)
        .map(|i| {
            let d = i as f32 - center;
            (-d * d / denom).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }
    kernel
}

/// Reflect an out-of-range coordinate using reflect-101 borders
/// (`-1 -> 1`, `len -> len - 2`), the border mode of the original
/// implementation.
#[inline]
fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let mut i = index.rem_euclid(period);
    if i >= len as isize {
        i = period - i;
    }
    i as usize
}

/// Separable Gaussian blur with reflect-101 borders.
pub fn gaussian_blur(plane: &Plane, ksize: usize, sigma: f32) -> Plane {
    if plane.data.is_empty() {
        return plane.clone();
    }
    let kernel = gaussian_kernel(ksize, sigma);
    let radius = (ksize / 2) as isize;
    let (w, h) = (plane.width, plane.height);

    // Horizontal pass
    let mut horizontal = Plane::new(w, h);
    let convolve_row = |(row_out, row_in): (&mut [f32], &[f32])| {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, &weight) in kernel.iter().enumerate() {
                let sx = reflect_101(x as isize + k as isize - radius, w);
                acc += row_in[sx] * weight;
            }
            row_out[x] = acc;
        }
    };
    if plane.data.len() >= PARALLEL_THRESHOLD {
        horizontal
            .data
            .par_chunks_mut(w)
            .zip(plane.data.par_chunks(w))
            .for_each(convolve_row);
    } else {
        horizontal
            .data
            .chunks_mut(w)
            .zip(plane.data.chunks(w))
            .for_each(convolve_row);
    }

    // Vertical pass
    let mut out = Plane::new(w, h);
    let src = &horizontal;
    let convolve_col_row = |(y, row_out): (usize, &mut [f32])| {
        for (k, &weight) in kernel.iter().enumerate() {
            let sy = reflect_101(y as isize + k as isize - radius, h);
            let src_row = &src.data[sy * w..sy * w + w];
            for (dst, &s) in row_out.iter_mut().zip(src_row) {
                *dst += s * weight;
            }
        }
    };
    if plane.data.len() >= PARALLEL_THRESHOLD {
        out.data
            .par_chunks_mut(w)
            .enumerate()
            .for_each(convolve_col_row);
    } else {
        out.data
            .chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| convolve_col_row((y, row)));
    }
    out
}

/// Gaussian blur applied independently to each RGB channel.
pub fn gaussian_blur_rgb(image: &RasterImage, ksize: usize, sigma: f32) -> RasterImage {
    let mut out = RasterImage::new(image.width, image.height);
    for channel in 0..3 {
        let blurred = gaussian_blur(&image.channel_plane(channel), ksize, sigma);
        out.set_channel_plane(channel, &blurred);
    }
    out
}

/// Bicubic interpolation weight (a = -0.75, matching the original's
/// cubic resampler).
#[inline]
fn cubic_weight(t: f32) -> f32 {
    const A: f32 = -0.75;
    let t = t.abs();
    if t <= 1.0 {
        ((A + 2.0) * t - (A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        (((t - 5.0) * t + 8.0) * t - 4.0) * A
    } else {
        0.0
    }
}

/// Resize a plane to `dst_w x dst_h` with bicubic interpolation.
///
/// Uses pixel-center coordinate mapping and clamps the 4x4 sample
/// neighborhood to the source edges.
pub fn resize_bicubic(plane: &Plane, dst_w: usize, dst_h: usize) -> Plane {
    debug_assert!(dst_w > 0 && dst_h > 0);
    if plane.width == dst_w && plane.height == dst_h {
        return plane.clone();
    }

    let scale_x = plane.width as f32 / dst_w as f32;
    let scale_y = plane.height as f32 / dst_h as f32;
    let mut out = Plane::new(dst_w, dst_h);

    let resample_row = |(dy, row): (usize, &mut [f32])| {
        let sy = (dy as f32 + 0.5) * scale_y - 0.5;
        let y0 = sy.floor() as isize;
        let fy = sy - y0 as f32;
        let wy: [f32; 4] = [
            cubic_weight(fy + 1.0),
            cubic_weight(fy),
            cubic_weight(fy - 1.0),
            cubic_weight(fy - 2.0),
        ];

        for (dx, dst) in row.iter_mut().enumerate() {
            let sx = (dx as f32 + 0.5) * scale_x - 0.5;
            let x0 = sx.floor() as isize;
            let fx = sx - x0 as f32;
            let wx: [f32; 4] = [
                cubic_weight(fx + 1.0),
                cubic_weight(fx),
                cubic_weight(fx - 1.0),
                cubic_weight(fx - 2.0),
            ];

            let mut acc = 0.0;
            for (j, &weight_y) in wy.iter().enumerate() {
                let py = (y0 + j as isize - 1).clamp(0, plane.height as isize - 1) as usize;
                let row_base = py * plane.width;
                let mut row_acc = 0.0;
                for (i, &weight_x) in wx.iter().enumerate() {
                    let px = (x0 + i as isize - 1).clamp(0, plane.width as isize - 1) as usize;
                    row_acc += plane.data[row_base + px] * weight_x;
                }
                acc += row_acc * weight_y;
            }
            *dst = acc;
        }
    };

    if out.data.len() >= PARALLEL_THRESHOLD {
        out.data
            .par_chunks_mut(dst_w)
            .enumerate()
            .for_each(resample_row);
    } else {
        out.data
            .chunks_mut(dst_w)
            .enumerate()
            .for_each(|(dy, row)| resample_row((dy, row)));
    }
    out
}
