//! Steady linear dynamics.
//!
//! Solves the damped, steady shallow-water balance forced by diabatic
//! heating: a Fourier decomposition in longitude reduces the problem to one
//! tridiagonal system per wavenumber in the meridional wind, after which the
//! zonal wind and geopotential follow algebraically from the momentum and
//! continuity balances.

mod spectral;
mod tridiag;

pub use spectral::Spectral;
pub use tridiag::solve_tridiagonal;

use ndarray::{Array1, Array2, s};
use num_complex::Complex64;

use crate::constants::DerivedConstants;
use crate::grid::TropicalGrid;

/// Steady wind and geopotential response to a heating field.
///
/// `u` and `phi` live on the `yu` axis, `v` on the `yv` axis; all share the
/// longitude axis.
#[derive(Clone, Debug)]
pub struct SteadyResponse {
    /// Zonal wind (m/s), shape (ny−1, nx)
    pub u: Array2<f64>,
    /// Meridional wind (m/s), shape (ny, nx)
    pub v: Array2<f64>,
    /// Geopotential perturbation (m²/s²), shape (ny−1, nx)
    pub phi: Array2<f64>,
}

/// Solver for the steady damped shallow-water response.
///
/// Wavenumber-dependent coefficients are precomputed once; each
/// [`solve`](GillSolver::solve) call then costs two transforms and one
/// vectorized tridiagonal sweep.
#[derive(Clone, Debug)]
pub struct GillSolver {
    spectral: Spectral,
    nx: usize,
    ny: usize,
    /// Coriolis parameter on the yu rows
    fcu: Array1<f64>,
    /// Metric wavenumbers k/a (1/m)
    km: Array1<f64>,
    /// Dispersion term iκβ − εuεvεp − εvκ², per wavenumber
    rk: Array1<Complex64>,
    /// εuεp + κ², per wavenumber
    coeff: Array1<f64>,
    /// f²/4 at the poleward neighbour of each interior row
    fcp: Array1<f64>,
    /// f²/4 at the equatorward neighbour of each interior row
    fcm: Array1<f64>,
    dy_m: f64,
    eps_u: f64,
    eps_p: f64,
}

impl GillSolver {
    /// Precompute the solver for one grid and constant set.
    pub fn new(grid: &TropicalGrid, constants: &DerivedConstants) -> Self {
        let nx = grid.nx;
        let ny = grid.ny;
        let spectral = Spectral::new(nx);

        let km = grid.wavenumbers.mapv(|k| k / grid.r_earth);

        let rk = km.mapv(|k| {
            Complex64::new(
                -constants.eps_u * constants.eps_v * constants.eps_p - constants.eps_v * k * k,
                k * constants.beta,
            )
        });
        let coeff = km.mapv(|k| constants.eps_u * constants.eps_p + k * k);

        let n_int = grid.n_interior();
        let fcu = grid.coriolis_u.clone();
        let fcp = Array1::from_shape_fn(n_int, |j| fcu[j + 1] * fcu[j + 1] / 4.0);
        let fcm = Array1::from_shape_fn(n_int, |j| fcu[j] * fcu[j] / 4.0);

        Self {
            spectral,
            nx,
            ny,
            fcu,
            km,
            rk,
            coeff,
            fcp,
            fcm,
            dy_m: grid.dy_m,
            eps_u: constants.eps_u,
            eps_p: constants.eps_p,
        }
    }

    /// Transform tables shared with the moisture-convergence derivative.
    #[inline]
    pub fn spectral(&self) -> &Spectral {
        &self.spectral
    }

    /// Solve the steady balance for a heating field on (yu × x).
    ///
    /// # Panics
    ///
    /// Panics if `heating` is not shaped (ny−1, nx).
    pub fn solve(&self, heating: &Array2<f64>) -> SteadyResponse {
        let (rows, cols) = heating.dim();
        assert_eq!(
            (rows, cols),
            (self.ny - 1, self.nx),
            "heating shaped ({}, {}), solver needs ({}, {})",
            rows,
            cols,
            self.ny - 1,
            self.nx
        );

        let n_int = self.ny - 2;
        let nx = self.nx;
        let dym2 = self.dy_m * self.dy_m;

        let q1t = self.spectral.forward(heating);

        // Coriolis-weighted heating averaged onto the interior rows, and the
        // centred latitude derivative of the heating.
        let mut afq = Array2::<Complex64>::zeros((n_int, nx));
        let mut dq = Array2::<Complex64>::zeros((n_int, nx));
        for j in 0..n_int {
            for k in 0..nx {
                let fq_lo = q1t[(j, k)] * self.fcu[j];
                let fq_hi = q1t[(j + 1, k)] * self.fcu[j + 1];
                afq[(j, k)] = (fq_hi + fq_lo) * 0.5;
                dq[(j, k)] = (q1t[(j + 1, k)] - q1t[(j, k)]) / self.dy_m;
            }
        }

        // Tridiagonal coefficients over (interior latitude × wavenumber).
        let mut ak = Array2::<Complex64>::zeros((n_int, nx));
        let mut bk = Array2::<Complex64>::zeros((n_int, nx));
        let mut ck = Array2::<Complex64>::zeros((n_int, nx));
        let mut dk = Array2::<Complex64>::zeros((n_int, nx));
        for j in 0..n_int {
            let a_j = self.eps_u / dym2 - self.eps_p * self.fcm[j];
            let c_j = self.eps_u / dym2 - self.eps_p * self.fcp[j];
            let b_j = -2.0 * self.eps_u / dym2 - self.eps_p * (self.fcm[j] + self.fcp[j]);
            for k in 0..nx {
                ak[(j, k)] = Complex64::new(a_j, 0.0);
                ck[(j, k)] = Complex64::new(c_j, 0.0);
                bk[(j, k)] = Complex64::new(b_j, 0.0) + self.rk[k];
                dk[(j, k)] = -dq[(j, k)] * self.eps_u
                    + afq[(j, k)] * Complex64::new(0.0, self.km[k]);
            }
        }

        let vtk = solve_tridiagonal(&ak, &bk, &ck, &dk);

        // Rigid-wall boundaries: zero-pad v at both domain edges.
        let mut vt = Array2::<Complex64>::zeros((self.ny, nx));
        vt.slice_mut(s![1..self.ny - 1, ..]).assign(&vtk);

        // Interface-averaged v, its derivative, then the algebraic balance
        // for u and phi.
        let mut ut = Array2::<Complex64>::zeros((self.ny - 1, nx));
        let mut phit = Array2::<Complex64>::zeros((self.ny - 1, nx));
        for j in 0..self.ny - 1 {
            for k in 0..nx {
                let av = (vt[(j + 1, k)] + vt[(j, k)]) * 0.5;
                let dv = (vt[(j + 1, k)] - vt[(j, k)]) / self.dy_m;
                let f_av = av * self.fcu[j];
                let ik = Complex64::new(0.0, self.km[k]);
                let u = (f_av * self.eps_p + (q1t[(j, k)] + dv) * ik) / self.coeff[k];
                ut[(j, k)] = u;
                phit[(j, k)] = -(q1t[(j, k)] + u * ik + dv) / self.eps_p;
            }
        }

        SteadyResponse {
            u: self.spectral.inverse_real(&ut),
            v: self.spectral.inverse_real(&vt),
            phi: self.spectral.inverse_real(&phit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ModelParameters;

    fn small_params() -> ModelParameters {
        ModelParameters::default().with_resolution(24, 16)
    }

    #[test]
    fn test_response_shapes() {
        let params = small_params();
        let grid = TropicalGrid::new(&params);
        let constants = DerivedConstants::new(&params);
        let solver = GillSolver::new(&grid, &constants);

        let heating = Array2::from_elem((grid.ny - 1, grid.nx), 1e-5);
        let resp = solver.solve(&heating);
        assert_eq!(resp.u.dim(), (15, 24));
        assert_eq!(resp.v.dim(), (16, 24));
        assert_eq!(resp.phi.dim(), (15, 24));
    }

    #[test]
    fn test_meridional_wind_vanishes_at_walls() {
        let params = small_params();
        let grid = TropicalGrid::new(&params);
        let constants = DerivedConstants::new(&params);
        let solver = GillSolver::new(&grid, &constants);

        // localized equatorial heating
        let heating = Array2::from_shape_fn((grid.ny - 1, grid.nx), |(j, m)| {
            let y = grid.yu[j] / 15.0;
            let x = (m as f64 - 12.0) / 4.0;
            1e-5 * (-(y * y + x * x)).exp()
        });
        let resp = solver.solve(&heating);
        for m in 0..grid.nx {
            assert_eq!(resp.v[(0, m)], 0.0);
            assert_eq!(resp.v[(grid.ny - 1, m)], 0.0);
        }
        // and the interior circulation is non-trivial
        let max_v = resp.v.iter().fold(0.0_f64, |a, &v| a.max(v.abs()));
        assert!(max_v > 0.0, "heating produced no meridional wind");
    }

    #[test]
    fn test_zonally_symmetric_heating_gives_zonally_symmetric_response() {
        let params = small_params();
        let grid = TropicalGrid::new(&params);
        let constants = DerivedConstants::new(&params);
        let solver = GillSolver::new(&grid, &constants);

        let heating = Array2::from_shape_fn((grid.ny - 1, grid.nx), |(j, _)| {
            1e-5 * (-(grid.yu[j] / 20.0).powi(2)).exp()
        });
        let resp = solver.solve(&heating);
        let max_u = resp.u.iter().fold(0.0_f64, |a, &v| a.max(v.abs()));
        for j in 0..grid.ny - 1 {
            for m in 1..grid.nx {
                assert!(
                    (resp.u[(j, m)] - resp.u[(j, 0)]).abs() < 1e-10 * (1.0 + max_u),
                    "zonal asymmetry in u at row {}",
                    j
                );
            }
        }
    }
}
