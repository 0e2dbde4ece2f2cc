//! Integration tests for the steady dynamics solver.
//!
//! These tests verify:
//! - The degenerate non-rotating, uniform-heating case
//! - Physical structure of the rotating response to localized heating
//! - Consistency between the spectral machinery and the solver

use gill_rs::{
    fourier_wavenumbers, DerivedConstants, GillSolver, ModelParameters, Spectral, TropicalGrid,
};
use ndarray::Array2;

const TOL: f64 = 1e-10;

#[test]
fn test_uniform_heating_without_rotation_drives_no_circulation() {
    // With f ≡ 0 and spatially uniform heating the damped balance has no
    // pressure gradients to accelerate the flow: the winds vanish and the
    // geopotential settles to the uniform offset −q1/eps_p.
    let params = ModelParameters::default()
        .with_resolution(36, 20)
        .with_omega_2(0.0);
    let grid = TropicalGrid::new(&params);
    let constants = DerivedConstants::new(&params);
    let solver = GillSolver::new(&grid, &constants);

    let heating = Array2::from_elem((grid.ny - 1, grid.nx), 1.0);
    let resp = solver.solve(&heating);

    // the weak damping rates amplify spectral roundoff by ~1e6, so "zero"
    // wind means zero at that scale
    let max_u = resp.u.iter().fold(0.0_f64, |a, &v| a.max(v.abs()));
    let max_v = resp.v.iter().fold(0.0_f64, |a, &v| a.max(v.abs()));
    assert!(
        max_u < 1e-7,
        "zonal wind should vanish, max |u| = {}",
        max_u
    );
    assert!(
        max_v < 1e-7,
        "meridional wind should vanish, max |v| = {}",
        max_v
    );

    let phi_expected = -1.0 / constants.eps_p;
    for &p in resp.phi.iter() {
        assert!(
            (p - phi_expected).abs() < TOL * phi_expected.abs(),
            "phi = {}, expected uniform {}",
            p,
            phi_expected
        );
    }
}

#[test]
fn test_localized_equatorial_heating_drives_gill_circulation() {
    let params = ModelParameters::default().with_resolution(72, 30);
    let grid = TropicalGrid::new(&params);
    let constants = DerivedConstants::new(&params);
    let solver = GillSolver::new(&grid, &constants);

    // warm-pool-like heating centred on the equator
    let heating = Array2::from_shape_fn((grid.ny - 1, grid.nx), |(j, m)| {
        let y = grid.yu[j] / 10.0;
        let dx = (grid.x[m] - 160.0) / 30.0;
        1e-5 * (-(y * y + dx * dx)).exp()
    });
    let resp = solver.solve(&heating);

    // circulation exists and all fields are finite
    let max_u = resp.u.iter().fold(0.0_f64, |a, &v| a.max(v.abs()));
    assert!(max_u > 0.0, "no zonal response to localized heating");
    for &v in resp.u.iter().chain(resp.v.iter()).chain(resp.phi.iter()) {
        assert!(v.is_finite());
    }

    // rigid walls: v carries no flow through the domain edges
    for m in 0..grid.nx {
        assert_eq!(resp.v[(0, m)], 0.0);
        assert_eq!(resp.v[(grid.ny - 1, m)], 0.0);
    }

    // the equatorial geopotential response to heating is a trough
    let j_eq = grid.yu.len() / 2;
    let m_heat = grid
        .x
        .iter()
        .enumerate()
        .min_by(|a, b| (a.1 - 160.0).abs().partial_cmp(&(b.1 - 160.0).abs()).unwrap())
        .map(|(i, _)| i)
        .unwrap();
    assert!(
        resp.phi[(j_eq, m_heat)] < 0.0,
        "heating should lower the equatorial geopotential, got {}",
        resp.phi[(j_eq, m_heat)]
    );
}

#[test]
fn test_solver_linearity() {
    // The balance is linear: doubling the heating doubles the response.
    let params = ModelParameters::default().with_resolution(24, 12);
    let grid = TropicalGrid::new(&params);
    let constants = DerivedConstants::new(&params);
    let solver = GillSolver::new(&grid, &constants);

    let heating = Array2::from_shape_fn((grid.ny - 1, grid.nx), |(j, m)| {
        1e-6 * ((j + 1) as f64) * (2.0 * std::f64::consts::PI * m as f64 / 24.0).cos()
    });
    let resp1 = solver.solve(&heating);
    let resp2 = solver.solve(&heating.mapv(|q| 2.0 * q));

    for (a, b) in resp1.u.iter().zip(resp2.u.iter()) {
        assert!((2.0 * a - b).abs() < 1e-12 * (1.0 + b.abs()));
    }
    for (a, b) in resp1.phi.iter().zip(resp2.phi.iter()) {
        assert!((2.0 * a - b).abs() < 1e-9 * (1.0 + b.abs()));
    }
}

#[test]
fn test_wavenumber_sequence_reference_grid() {
    let k = fourier_wavenumbers(180);
    assert_eq!(k.len(), 180);
    assert_eq!(k[0], 0.0);
    assert_eq!(k[1], 1.0);
    assert_eq!(k[89], 89.0);
    assert_eq!(k[90], 0.0);
    assert_eq!(k[91], -89.0);
    assert_eq!(k[179], -1.0);
}

#[test]
fn test_transform_round_trip_on_reference_grid() {
    let spectral = Spectral::new(180);
    let field = Array2::from_shape_fn((59, 180), |(j, m)| {
        (j as f64 * 0.1).sin() + (m as f64 * 0.3).cos() * (1.0 + j as f64 / 59.0)
    });
    let back = spectral.inverse_real(&spectral.forward(&field));
    for (a, b) in field.iter().zip(back.iter()) {
        assert!(
            (a - b).abs() < 1e-10 * (1.0 + a.abs()),
            "round trip mismatch: {} vs {}",
            a,
            b
        );
    }
}
