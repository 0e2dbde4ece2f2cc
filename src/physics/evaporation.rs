//! Bulk evaporation flux.

use ndarray::Array2;

use super::RHO_AIR;

/// Evaporation flux (kg/m²/s) from surface humidity and windspeed.
///
/// The exchange coefficient is `0.0015·(1 + mask/2)`, slightly enhanced over
/// land, and the flux scales with the sub-saturation `(1−rh)/rh` of the
/// surface air. Windspeed is floored at `wnsp_min` before use so that calm
/// regions keep a finite ventilation.
///
/// All fields share the (yu × x) shape.
///
/// # Panics
///
/// Panics if the field shapes differ.
pub fn evaporation_flux(
    mask: &Array2<f64>,
    qa: &Array2<f64>,
    wnsp: &Array2<f64>,
    rh: f64,
    wnsp_min: f64,
) -> Array2<f64> {
    assert_eq!(mask.dim(), qa.dim(), "mask and humidity shapes differ");
    assert_eq!(qa.dim(), wnsp.dim(), "humidity and windspeed shapes differ");

    let mut evap = Array2::zeros(qa.dim());
    for (idx, e) in evap.indexed_iter_mut() {
        let cs_e = 0.0015 * (1.0 + mask[idx] / 2.0);
        let w = wnsp[idx].max(wnsp_min);
        *e = cs_e * RHO_AIR * (1.0 - rh) * qa[idx] * w / rh;
    }
    evap
}
