//! Derived dynamical constants.
//!
//! The damping rates and scale parameters of the linear balance are fixed
//! functions of the model parameters. They are computed once at start-up and
//! never change during a run.

use std::f64::consts::PI;

use crate::params::ModelParameters;

/// Constants derived from [`ModelParameters`], immutable after construction.
///
/// The vertical-mode projection factor `b` converts heating rates to
/// geopotential forcing; `eps_u`/`eps_v` are the Rayleigh friction rates on
/// the two wind components, `eps_p` the Newtonian cooling rate acting on the
/// geopotential, `k1` the radiative relaxation coefficient and `beta` the
/// planetary vorticity gradient.
#[derive(Clone, Copy, Debug)]
pub struct DerivedConstants {
    /// Vertical-mode projection factor g·π/(N²·θ₀₀·z_T)
    pub b: f64,
    /// Zonal Rayleigh friction rate (1/s)
    pub eps_u: f64,
    /// Meridional Rayleigh friction rate (1/s)
    pub eps_v: f64,
    /// Newtonian cooling rate on the geopotential (1/s)
    pub eps_p: f64,
    /// Radiative relaxation coefficient
    pub k1: f64,
    /// Planetary vorticity gradient 2Ω/a (1/m/s)
    pub beta: f64,
}

impl DerivedConstants {
    /// Compute the constant set from the model parameters.
    pub fn new(params: &ModelParameters) -> Self {
        let b = params.gravity * PI / (params.nbsq * params.th_00 * params.zt);
        let eps = 1.0 / (params.eps_days * 86400.0);
        Self {
            b,
            eps_u: eps,
            eps_v: params.efrac * eps,
            eps_p: (PI / params.zt).powi(2) / (params.nbsq * params.k_days * 86400.0),
            k1: b / (params.k_days * 86400.0),
            beta: params.omega_2 / params.r_earth,
        }
    }
}
