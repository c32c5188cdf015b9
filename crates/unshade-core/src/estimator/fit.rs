//! 2D polynomial least-squares fitting
//!
//! Normal-equation solvers for the planar and quadratic lighting
//! surfaces. Accumulation runs in f64: fourth-power coordinate moments
//! on large regions overwhelm f32 precision.

use crate::raster::Plane;

/// Pivot threshold below which the system is treated as singular.
const SINGULAR_EPS: f64 = 1e-12;

/// Solve `a * x = b` by Gaussian elimination with partial pivoting.
///
/// Returns `None` for a singular (or near-singular) system; callers
/// fall back to an identity correction.
fn solve_linear_system<const N: usize>(
    mut a: [[f64; N]; N],
    mut b: [f64; N],
) -> Option<[f64; N]> {
    for col in 0..N {
        // Partial pivot
        let mut pivot_row = col;
        for row in col + 1..N {
            if a[row][col].abs() > a[pivot_row][col].abs() {
                pivot_row = row;
            }
        }
        if a[pivot_row][col].abs() < SINGULAR_EPS {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        // Eliminate below
        for row in col + 1..N {
            let factor = a[row][col] / a[col][col];
            for k in col..N {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    // Back substitution
    let mut x = [0.0; N];
    for col in (0..N).rev() {
        let mut sum = b[col];
        for k in col + 1..N {
            sum -= a[col][k] * x[k];
        }
        x[col] = sum / a[col][col];
    }
    Some(x)
}

/// Fit `z = c0*x + c1*y + c2` to a plane by least squares.
pub(crate) fn fit_plane(plane: &Plane) -> Option<[f64; 3]> {
    let mut m = [[0.0f64; 3]; 3];
    let mut rhs = [0.0f64; 3];

    for y in 0..plane.height {
        for x in 0..plane.width {
            let basis = [x as f64, y as f64, 1.0];
            let z = plane.at(x, y) as f64;
            for i in 0..3 {
                for j in 0..3 {
                    m[i][j] += basis[i] * basis[j];
                }
                rhs[i] += basis[i] * z;
            }
        }
    }

    solve_linear_system(m, rhs)
}

/// Fit `z = c0*x^2 + c1*y^2 + c2*xy + c3*x + c4*y + c5` to a plane by
/// ridge-regularized least squares (`ridge` added to the normal-matrix
/// diagonal to guard against singularity).
pub(crate) fn fit_quadratic(plane: &Plane, ridge: f64) -> Option<[f64; 6]> {
    let mut m = [[0.0f64; 6]; 6];
    let mut rhs = [0.0f64; 6];

    for y in 0..plane.height {
        for x in 0..plane.width {
            let (xf, yf) = (x as f64, y as f64);
            let basis = [xf * xf, yf * yf, xf * yf, xf, yf, 1.0];
            let z = plane.at(x, y) as f64;
            for i in 0..6 {
                for j in 0..6 {
                    m[i][j] += basis[i] * basis[j];
                }
                rhs[i] += basis[i] * z;
            }
        }
    }

    for (i, row) in m.iter_mut().enumerate() {
        row[i] += ridge;
    }

    solve_linear_system(m, rhs)
}

/// Evaluate a planar fit over a grid.
pub(crate) fn eval_plane(coeffs: &[f64; 3], width: usize, height: usize) -> Plane {
    let mut out = Plane::new(width, height);
    for y in 0..height {
        for x in 0..width {
            *out.at_mut(x, y) =
                (coeffs[0] * x as f64 + coeffs[1] * y as f64 + coeffs[2]) as f32;
        }
    }
    out
}

/// Evaluate a quadratic fit over a grid.
pub(crate) fn eval_quadratic(coeffs: &[f64; 6], width: usize, height: usize) -> Plane {
    let mut out = Plane::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let (xf, yf) = (x as f64, y as f64);
            let value = coeffs[0] * xf * xf
                + coeffs[1] * yf * yf
                + coeffs[2] * xf * yf
                + coeffs[3] * xf
                + coeffs[4] * yf
                + coeffs[5];
            *out.at_mut(x, y) = value as f32;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_plane_recovers_coefficients() {
        let mut plane = Plane::new(30, 20);
        for y in 0..20 {
            for x in 0..30 {
                *plane.at_mut(x, y) = 2.0 * x as f32 + 3.0 * y as f32 + 5.0;
            }
        }
        let coeffs = fit_plane(&plane).expect("well-conditioned system");
        assert!((coeffs[0] - 2.0).abs() < 1e-4);
        assert!((coeffs[1] - 3.0).abs() < 1e-4);
        assert!((coeffs[2] - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_quadratic_recovers_coefficients() {
        let mut plane = Plane::new(25, 25);
        for y in 0..25 {
            for x in 0..25 {
                let (xf, yf) = (x as f32, y as f32);
                *plane.at_mut(x, y) =
                    0.5 * xf * xf - 0.25 * yf * yf + 0.1 * xf * yf + 2.0 * xf - yf + 10.0;
            }
        }
        let coeffs = fit_quadratic(&plane, 1e-6).expect("well-conditioned system");
        let expected = [0.5, -0.25, 0.1, 2.0, -1.0, 10.0];
        for (c, e) in coeffs.iter().zip(expected.iter()) {
            assert!((c - e).abs() < 1e-2, "coefficient {c} vs expected {e}");
        }
    }

    #[test]
    fn test_singular_system_returns_none() {
        // A 1x1 plane cannot determine a planar fit.
        let plane = Plane::filled(1, 1, 3.0);
        assert!(fit_plane(&plane).is_none());
    }

    #[test]
    fn test_eval_matches_fit() {
        let mut plane = Plane::new(12, 9);
        for y in 0..9 {
            for x in 0..12 {
                *plane.at_mut(x, y) = -0.5 * x as f32 + 1.5 * y as f32 + 20.0;
            }
        }
        let coeffs = fit_plane(&plane).unwrap();
        let surface = eval_plane(&coeffs, 12, 9);
        for (a, b) in surface.data.iter().zip(plane.data.iter()) {
            assert!((a - b).abs() < 1e-2);
        }
    }
}
