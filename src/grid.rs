//! Staggered tropical grid.
//!
//! The model uses an Arakawa-C-like staggering in latitude: the meridional
//! wind lives on `yv` points, the zonal wind and all scalars on `yu` points
//! offset by half a cell, and the tridiagonal elimination runs over the `yi`
//! interior points offset by a further half cell. Longitude is periodic with
//! uniform spacing.

use std::f64::consts::PI;

use ndarray::Array1;

use crate::params::ModelParameters;

/// Rectilinear longitude/latitude grid with three staggered latitude axes.
///
/// Grid spacing is uniform in longitude and in each latitude axis; the
/// interior axis has exactly two points fewer than the full `yv` axis.
#[derive(Clone, Debug)]
pub struct TropicalGrid {
    /// Number of longitude points
    pub nx: usize,
    /// Number of latitude cells (length of `yv`)
    pub ny: usize,
    /// Longitudes (degrees east), `nx` points from 0 to 360−dx
    pub x: Array1<f64>,
    /// Meridional-wind latitudes (degrees north), `ny` points
    pub yv: Array1<f64>,
    /// Zonal-wind/scalar latitudes (degrees north), `ny − 1` points
    pub yu: Array1<f64>,
    /// Interior latitudes (degrees north), `ny − 2` points
    pub yi: Array1<f64>,
    /// Longitude spacing (degrees)
    pub dx_deg: f64,
    /// Latitude spacing (degrees)
    pub dy_deg: f64,
    /// Longitude spacing (metres at the equator)
    pub dx_m: f64,
    /// Latitude spacing (metres)
    pub dy_m: f64,
    /// Earth radius used for the metric spacings (m)
    pub r_earth: f64,
    /// Coriolis parameter on the `yu` axis (1/s)
    pub coriolis_u: Array1<f64>,
    /// Signed Fourier wavenumbers in transform order, length `nx`
    pub wavenumbers: Array1<f64>,
    omega_2: f64,
}

impl TropicalGrid {
    /// Build the grid from the model parameters.
    pub fn new(params: &ModelParameters) -> Self {
        let nx = params.nx;
        let ny = params.ny;
        let y_north = params.y_north;
        let y_south = -y_north;

        let dx_deg = 360.0 / nx as f64;
        let dy_deg = (y_north - y_south) / ny as f64;

        let x = Array1::linspace(0.0, 360.0 - dx_deg, nx);
        let yv = Array1::linspace(y_south + dy_deg / 2.0, y_north - dy_deg / 2.0, ny);
        let yu = Array1::linspace(y_south + dy_deg, y_north - dy_deg, ny - 1);
        let yi = Array1::linspace(
            y_south + 3.0 * dy_deg / 2.0,
            y_north - 3.0 * dy_deg / 2.0,
            ny - 2,
        );

        let dx_m = dx_deg * params.r_earth * PI / 180.0;
        let dy_m = dy_deg * params.r_earth * PI / 180.0;

        let omega_2 = params.omega_2;
        let coriolis_u = yu.mapv(|y| omega_2 * y * PI / 180.0);

        Self {
            nx,
            ny,
            x,
            yv,
            yu,
            yi,
            dx_deg,
            dy_deg,
            dx_m,
            dy_m,
            r_earth: params.r_earth,
            coriolis_u,
            wavenumbers: fourier_wavenumbers(nx),
            omega_2,
        }
    }

    /// Number of interior latitude points (`ny − 2`).
    #[inline]
    pub fn n_interior(&self) -> usize {
        self.ny - 2
    }

    /// Coriolis parameter at a latitude in degrees.
    ///
    /// Uses the equatorial beta-plane in degree form, `f = 2Ω·y·π/180`,
    /// which approximates `2Ω·sin(y)` near the equator.
    #[inline]
    pub fn coriolis(&self, y_deg: f64) -> f64 {
        self.omega_2 * y_deg * PI / 180.0
    }
}

/// Signed wavenumber sequence in the ordering produced by a discrete Fourier
/// transform, with the Nyquist entry zeroed.
///
/// For even N: `0, 1, …, N/2−1, 0, −(N/2−1), …, −1`; for odd N:
/// `0, 1, …, (N−1)/2−1, 0, −(N−1)/2, …, −1`. Length is exactly N. This
/// ordering is load-bearing for the spectral solve: entry `k` multiplies the
/// k-th transform coefficient.
pub fn fourier_wavenumbers(n: usize) -> Array1<f64> {
    let half = n / 2;
    let mut k = Vec::with_capacity(n);
    if n % 2 == 0 {
        k.extend((0..half).map(|i| i as f64));
        k.push(0.0);
        k.extend((1..half).map(|i| i as f64 - half as f64));
    } else {
        let half = (n - 1) / 2;
        k.extend((0..half).map(|i| i as f64));
        k.push(0.0);
        k.extend((0..half).map(|i| i as f64 - half as f64));
    }
    Array1::from_vec(k)
}
