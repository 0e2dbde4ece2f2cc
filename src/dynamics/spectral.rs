//! Discrete Fourier transform along the longitude axis.
//!
//! The transform pair is the standard unnormalised forward DFT with a
//! 1/N-normalised inverse, so a forward/inverse round trip is the identity
//! up to floating-point error. Row fields are transformed lane by lane along
//! the longitude axis; twiddle factors are precomputed once per grid size.
//!
//! Longitude is periodic, so no windowing or padding is involved; the k-th
//! output coefficient pairs with the k-th entry of the signed wavenumber
//! sequence from [`crate::grid::fourier_wavenumbers`].

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::grid::fourier_wavenumbers;

/// Precomputed DFT tables for one longitude size.
#[derive(Clone, Debug)]
pub struct Spectral {
    n: usize,
    /// n-th roots of unity, `roots[m] = exp(−2πi·m/n)`
    roots: Array1<Complex64>,
    /// Signed wavenumbers in transform order
    wavenumbers: Array1<f64>,
}

impl Spectral {
    /// Build transform tables for `n` longitude points.
    pub fn new(n: usize) -> Self {
        assert!(n >= 2, "need at least 2 longitude points, got {}", n);
        let roots: Vec<Complex64> = (0..n)
            .map(|m| {
                let angle = -2.0 * std::f64::consts::PI * m as f64 / n as f64;
                Complex64::new(angle.cos(), angle.sin())
            })
            .collect();
        let roots = Array1::from_vec(roots);
        Self {
            n,
            roots,
            wavenumbers: fourier_wavenumbers(n),
        }
    }

    /// Longitude size the tables were built for.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Signed wavenumbers in transform order.
    #[inline]
    pub fn wavenumbers(&self) -> &Array1<f64> {
        &self.wavenumbers
    }

    /// Forward transform of every row of a real field.
    ///
    /// # Panics
    ///
    /// Panics if the row length does not match the table size.
    pub fn forward(&self, field: &Array2<f64>) -> Array2<Complex64> {
        let (rows, cols) = field.dim();
        assert_eq!(cols, self.n, "field has {} columns, transform needs {}", cols, self.n);

        let mut out = Array2::<Complex64>::zeros((rows, cols));
        for j in 0..rows {
            for k in 0..cols {
                let mut acc = Complex64::new(0.0, 0.0);
                for m in 0..cols {
                    acc += self.roots[(k * m) % self.n] * field[(j, m)];
                }
                out[(j, k)] = acc;
            }
        }
        out
    }

    /// Inverse transform of every row of a spectral field.
    pub fn inverse(&self, spec: &Array2<Complex64>) -> Array2<Complex64> {
        let (rows, cols) = spec.dim();
        assert_eq!(cols, self.n, "field has {} columns, transform needs {}", cols, self.n);

        let norm = 1.0 / self.n as f64;
        let mut out = Array2::<Complex64>::zeros((rows, cols));
        for j in 0..rows {
            for m in 0..cols {
                let mut acc = Complex64::new(0.0, 0.0);
                for k in 0..cols {
                    // conjugate root = forward root at the negated index
                    acc += self.roots[(self.n - (k * m) % self.n) % self.n] * spec[(j, k)];
                }
                out[(j, m)] = acc * norm;
            }
        }
        out
    }

    /// Inverse transform, keeping the real part.
    ///
    /// The spectral fields produced by the solver come from real inputs, so
    /// the imaginary residual must be numerically negligible; this is checked
    /// in debug builds.
    pub fn inverse_real(&self, spec: &Array2<Complex64>) -> Array2<f64> {
        let full = self.inverse(spec);
        debug_assert!(
            {
                let scale = full.iter().map(|c| c.re.abs()).fold(0.0_f64, f64::max);
                let worst = full.iter().map(|c| c.im.abs()).fold(0.0_f64, f64::max);
                worst <= 1e-7 * (1.0 + scale)
            },
            "inverse transform left a non-negligible imaginary residual"
        );
        full.mapv(|c| c.re)
    }

    /// Spectral derivative of every row with respect to distance along a
    /// periodic longitude circle of radius `r_earth`.
    ///
    /// Computes `Re(ifft(i·k·fft(row)))/r_earth` with the Nyquist wavenumber
    /// zeroed by the transform ordering.
    pub fn zonal_derivative(&self, field: &Array2<f64>, r_earth: f64) -> Array2<f64> {
        let mut spec = self.forward(field);
        let (rows, cols) = spec.dim();
        for j in 0..rows {
            for k in 0..cols {
                let ik = Complex64::new(0.0, self.wavenumbers[k] / r_earth);
                spec[(j, k)] *= ik;
            }
        }
        self.inverse_real(&spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn max_abs_diff(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_round_trip_identity() {
        let n = 180;
        let spectral = Spectral::new(n);
        let field = Array2::from_shape_fn((7, n), |(j, m)| {
            (0.3 * j as f64 + 1.0) * (2.0 * std::f64::consts::PI * m as f64 / n as f64).sin()
                + 0.1 * (m as f64).cos()
        });
        let back = spectral.inverse_real(&spectral.forward(&field));
        let scale = field.iter().fold(0.0_f64, |a, &v| a.max(v.abs()));
        assert!(
            max_abs_diff(&field, &back) < TOL * (1.0 + scale),
            "round trip error too large"
        );
    }

    #[test]
    fn test_round_trip_odd_length() {
        let n = 45;
        let spectral = Spectral::new(n);
        let field = Array2::from_shape_fn((3, n), |(j, m)| ((j * 31 + m * 17) % 13) as f64 - 6.0);
        let back = spectral.inverse_real(&spectral.forward(&field));
        assert!(max_abs_diff(&field, &back) < TOL * 10.0);
    }

    #[test]
    fn test_forward_of_constant_is_dc_only() {
        let n = 16;
        let spectral = Spectral::new(n);
        let field = Array2::from_elem((1, n), 2.5);
        let spec = spectral.forward(&field);
        assert!((spec[(0, 0)].re - 2.5 * n as f64).abs() < 1e-12);
        for k in 1..n {
            assert!(spec[(0, k)].norm() < 1e-12, "leakage at wavenumber {}", k);
        }
    }

    #[test]
    fn test_zonal_derivative_of_single_harmonic() {
        // d/dx sin(k·2πm/n) on a circle of radius r is (k/r)·cos(...)
        let n = 64;
        let r = 6.37e6;
        let k_mode = 3.0;
        let spectral = Spectral::new(n);
        let field = Array2::from_shape_fn((1, n), |(_, m)| {
            (k_mode * 2.0 * std::f64::consts::PI * m as f64 / n as f64).sin()
        });
        let expected = Array2::from_shape_fn((1, n), |(_, m)| {
            k_mode / r * (k_mode * 2.0 * std::f64::consts::PI * m as f64 / n as f64).cos()
        });
        let deriv = spectral.zonal_derivative(&field, r);
        assert!(max_abs_diff(&deriv, &expected) < 1e-12);
    }
}
