//! Tridiagonal elimination over the interior latitude rows.
//!
//! Thomas algorithm (forward elimination, back substitution) without
//! pivoting. The elimination is vectorized across the longitude wavenumbers:
//! each coefficient at a latitude row is an array over wavenumber, and all
//! wavenumber systems are solved in a single sweep.

use ndarray::Array2;
use num_complex::Complex64;

/// Solve `a·x[j−1] + b·x[j] + c·x[j+1] = d` for every column independently.
///
/// Rows index the equations (latitude), columns index independent systems
/// (wavenumber). `a` is the sub-diagonal (its first row is unused) and `c`
/// the super-diagonal (its last row is unused). Inputs are not modified.
///
/// No pivoting is performed; the damped-balance systems this solves are
/// strongly diagonally dominant through the friction and cooling terms.
///
/// # Panics
///
/// Panics if the four coefficient arrays do not share one shape.
pub fn solve_tridiagonal(
    a: &Array2<Complex64>,
    b: &Array2<Complex64>,
    c: &Array2<Complex64>,
    d: &Array2<Complex64>,
) -> Array2<Complex64> {
    let shape = b.dim();
    assert_eq!(a.dim(), shape, "sub-diagonal shape mismatch");
    assert_eq!(c.dim(), shape, "super-diagonal shape mismatch");
    assert_eq!(d.dim(), shape, "right-hand-side shape mismatch");
    let (n_rows, n_cols) = shape;
    assert!(n_rows >= 1, "empty tridiagonal system");

    let mut diag = b.clone();
    let mut rhs = d.clone();

    // forward elimination
    for j in 1..n_rows {
        for k in 0..n_cols {
            let m = a[(j, k)] / diag[(j - 1, k)];
            diag[(j, k)] -= m * c[(j - 1, k)];
            let rhs_prev = rhs[(j - 1, k)];
            rhs[(j, k)] -= m * rhs_prev;
        }
    }

    // back substitution
    let mut x = Array2::<Complex64>::zeros(shape);
    for k in 0..n_cols {
        x[(n_rows - 1, k)] = rhs[(n_rows - 1, k)] / diag[(n_rows - 1, k)];
    }
    for j in (0..n_rows - 1).rev() {
        for k in 0..n_cols {
            x[(j, k)] = (rhs[(j, k)] - c[(j, k)] * x[(j + 1, k)]) / diag[(j, k)];
        }
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    const TOL: f64 = 1e-12;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_identity_system() {
        // b = 1, a = c = 0: solution equals the right-hand side
        let n = 6;
        let a = Array2::from_elem((n, 2), c(0.0));
        let b = Array2::from_elem((n, 2), c(1.0));
        let cc = Array2::from_elem((n, 2), c(0.0));
        let d = Array2::from_shape_fn((n, 2), |(j, k)| c((j * 2 + k) as f64));
        let x = solve_tridiagonal(&a, &b, &cc, &d);
        for (xi, di) in x.iter().zip(d.iter()) {
            assert!((xi - di).norm() < TOL);
        }
    }

    #[test]
    fn test_constant_coefficients_known_solution() {
        // System: -x[j-1] + 4x[j] - x[j+1] = d[j], with x = ones:
        // interior rows give d = 2, boundary rows d = 3.
        let n = 8;
        let a = Array2::from_elem((n, 3), c(-1.0));
        let b = Array2::from_elem((n, 3), c(4.0));
        let cc = Array2::from_elem((n, 3), c(-1.0));
        let mut d = Array2::from_elem((n, 3), c(2.0));
        for k in 0..3 {
            d[(0, k)] = c(3.0);
            d[(n - 1, k)] = c(3.0);
        }
        let x = solve_tridiagonal(&a, &b, &cc, &d);
        for (idx, xi) in x.indexed_iter() {
            assert!(
                (xi - c(1.0)).norm() < TOL,
                "x{:?} = {} expected 1",
                idx,
                xi
            );
        }
    }

    #[test]
    fn test_complex_coefficients_residual() {
        // Verify A·x = d directly for a non-symmetric complex system.
        let n = 10;
        let cols = 2;
        let a = Array2::from_shape_fn((n, cols), |(j, k)| {
            Complex64::new(-0.5 - 0.1 * j as f64, 0.05 * k as f64)
        });
        let b = Array2::from_shape_fn((n, cols), |(j, k)| {
            Complex64::new(3.0 + 0.2 * j as f64, -0.3 + 0.1 * k as f64)
        });
        let cc = Array2::from_shape_fn((n, cols), |(j, k)| {
            Complex64::new(-0.7, 0.02 * (j + k) as f64)
        });
        let d = Array2::from_shape_fn((n, cols), |(j, k)| {
            Complex64::new((j as f64).sin(), (k as f64 + 1.0).cos())
        });

        let x = solve_tridiagonal(&a, &b, &cc, &d);

        for k in 0..cols {
            for j in 0..n {
                let mut lhs = b[(j, k)] * x[(j, k)];
                if j > 0 {
                    lhs += a[(j, k)] * x[(j - 1, k)];
                }
                if j + 1 < n {
                    lhs += cc[(j, k)] * x[(j + 1, k)];
                }
                assert!(
                    (lhs - d[(j, k)]).norm() < TOL,
                    "residual {} at ({}, {})",
                    (lhs - d[(j, k)]).norm(),
                    j,
                    k
                );
            }
        }
    }
}
