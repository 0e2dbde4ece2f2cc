//! Diabatic heating terms.

use std::f64::consts::PI;

use ndarray::Array2;

use crate::constants::DerivedConstants;
use crate::params::ModelParameters;

/// Latent heating rate from a precipitation field (kg/m²/s → K/s):
/// `π·L·pr/(2·cp·ρ₀₀·z_T)`.
pub fn latent_heating(pr: &Array2<f64>, params: &ModelParameters) -> Array2<f64> {
    let scale = PI * params.l_latent / (2.0 * params.cp_air * params.rho_00 * params.zt);
    pr.mapv(|p| scale * p)
}

/// Radiative-heating baseline from the SST field: `k1·(ts−30)/b`.
///
/// Relaxation toward the SST anomaly, expressed in the units the solver
/// forcing uses (the projection factor divides out again in
/// [`total_heating`]).
pub fn radiative_heating(ts: &Array2<f64>, constants: &DerivedConstants) -> Array2<f64> {
    ts.mapv(|t| constants.k1 * (t - 30.0) / constants.b)
}

/// Combined solver forcing: `b·(qc + qth)`.
pub fn total_heating(
    qc: &Array2<f64>,
    qth: &Array2<f64>,
    constants: &DerivedConstants,
) -> Array2<f64> {
    assert_eq!(qc.dim(), qth.dim(), "heating component shapes differ");
    let mut q1 = qc + qth;
    q1.mapv_inplace(|q| q * constants.b);
    q1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latent_heating_linear_in_precipitation() {
        let params = ModelParameters::default();
        let pr = Array2::from_elem((2, 2), 1e-7);
        let q = latent_heating(&pr, &params);
        let q2 = latent_heating(&pr.mapv(|p| 2.0 * p), &params);
        for (a, b) in q.iter().zip(q2.iter()) {
            assert!((2.0 * a - b).abs() < 1e-18);
        }
        // π·2.5e6/(2·1000·0.3·15000) · 1e-7 ≈ 8.7e-8 K/s
        assert!(q[(0, 0)] > 5e-8 && q[(0, 0)] < 2e-7);
    }

    #[test]
    fn test_total_heating_scales_by_projection_factor() {
        let params = ModelParameters::default();
        let constants = DerivedConstants::new(&params);
        let qc = Array2::from_elem((1, 1), 2.0);
        let qth = Array2::from_elem((1, 1), 1.0);
        let q1 = total_heating(&qc, &qth, &constants);
        assert!((q1[(0, 0)] - 3.0 * constants.b).abs() < 1e-15);
    }
}
