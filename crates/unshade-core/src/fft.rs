//! 2D FFT for frequency analysis
//!
//! Minimal iterative radix-2 FFT used by the pattern classifier.
//! Planes are zero-padded to the next power of two per axis; the
//! returned spectrum is center-shifted so the zero frequency sits at
//! the middle of the buffer.

use crate::raster::Plane;

/// Complex value used by the transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Complex {
    pub re: f32,
    pub im: f32,
}

impl Complex {
    const ZERO: Complex = Complex { re: 0.0, im: 0.0 };

    #[inline]
    fn mul(self, other: Complex) -> Complex {
        Complex {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }

    #[inline]
    fn add(self, other: Complex) -> Complex {
        Complex {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }

    #[inline]
    fn sub(self, other: Complex) -> Complex {
        Complex {
            re: self.re - other.re,
            im: self.im - other.im,
        }
    }

    #[inline]
    pub fn magnitude(self) -> f32 {
        (self.re * self.re + self.im * self.im).sqrt()
    }
}

/// In-place iterative radix-2 FFT. Length must be a power of two.
fn fft_in_place(buf: &mut [Complex]) {
    let n = buf.len();
    debug_assert!(n.is_power_of_two());
    if n <= 1 {
        return;
    }

    // Bit-reversal permutation
    let bits = n.trailing_zeros();
    for i in 0..n {
        let j = i.reverse_bits() >> (usize::BITS - bits);
        if i < j {
            buf.swap(i, j);
        }
    }

    // Butterflies
    let mut len = 2;
    while len <= n {
        let angle = -2.0 * std::f32::consts::PI / len as f32;
        let w_len = Complex {
            re: angle.cos(),
            im: angle.sin(),
        };
        for start in (0..n).step_by(len) {
            let mut w = Complex { re: 1.0, im: 0.0 };
            for k in 0..len / 2 {
                let even = buf[start + k];
                let odd = buf[start + k + len / 2].mul(w);
                buf[start + k] = even.add(odd);
                buf[start + k + len / 2] = even.sub(odd);
                w = w.mul(w_len);
            }
        }
        len <<= 1;
    }
}

/// Center-shifted 2D magnitude spectrum of a plane.
///
/// The plane is zero-padded to power-of-two dimensions before the
/// transform, so the output dimensions may exceed the input's.
pub fn magnitude_spectrum(plane: &Plane) -> Plane {
    let pw = plane.width.max(1).next_power_of_two();
    let ph = plane.height.max(1).next_power_of_two();

    let mut grid = vec![Complex::ZERO; pw * ph];
    for y in 0..plane.height {
        for x in 0..plane.width {
            grid[y * pw + x] = Complex {
                re: plane.at(x, y),
                im: 0.0,
            };
        }
    }

    // Row transforms
    for row in grid.chunks_exact_mut(pw) {
        fft_in_place(row);
    }

    // Column transforms
    let mut column = vec![Complex::ZERO; ph];
    for x in 0..pw {
        for (y, slot) in column.iter_mut().enumerate() {
            *slot = grid[y * pw + x];
        }
        fft_in_place(&mut column);
        for (y, &value) in column.iter().enumerate() {
            grid[y * pw + x] = value;
        }
    }

    // Magnitude with quadrant shift: frequency (0,0) moves to the
    // center of the output.
    let mut out = Plane::new(pw, ph);
    for y in 0..ph {
        let sy = (y + ph / 2) % ph;
        for x in 0..pw {
            let sx = (x + pw / 2) % pw;
            *out.at_mut(sx, sy) = grid[y * pw + x].magnitude();
        }
    }
    out
}
