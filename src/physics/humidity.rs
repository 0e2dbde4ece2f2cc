//! Saturation specific humidity.

use ndarray::Array2;

/// Saturation vapour pressure (mb) over water at temperature `ts` (Kelvin),
/// Clausius–Clapeyron in the Magnus form.
#[inline]
fn saturation_vapour_pressure(ts: f64) -> f64 {
    let t_c = ts - 273.15;
    6.11 * (17.67 * t_c / (t_c + 243.5)).exp()
}

/// Surface specific humidity from SST and surface pressure.
///
/// # Arguments
///
/// * `ts` - sea-surface temperature in Kelvin
/// * `sp` - surface pressure in millibars
/// * `rh` - relative humidity fraction
///
/// Returns the dimensionless specific humidity `0.622·rh·es(ts)/sp`.
/// The Kelvin-scale assumption is load-bearing: non-positive or
/// Celsius-scale temperatures produce physically invalid values, so callers
/// must validate units first (the forcing preparation does).
#[inline]
pub fn saturation_specific_humidity(ts: f64, sp: f64, rh: f64) -> f64 {
    0.622 * rh * saturation_vapour_pressure(ts) / sp
}

/// Elementwise [`saturation_specific_humidity`] over SST and pressure fields.
///
/// # Panics
///
/// Panics if the two fields differ in shape.
pub fn saturation_specific_humidity_field(
    ts: &Array2<f64>,
    sp: &Array2<f64>,
    rh: f64,
) -> Array2<f64> {
    assert_eq!(ts.dim(), sp.dim(), "SST and pressure field shapes differ");
    let mut qa = ts.clone();
    qa.zip_mut_with(sp, |t, &p| *t = saturation_specific_humidity(*t, p, rh));
    qa
}
