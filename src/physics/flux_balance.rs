//! Linearized surface energy balance.
//!
//! Diagnoses the equilibrium SST perturbation implied by a perturbation of
//! the longwave cloud/greenhouse parameter, by linearizing the latent-heat
//! and longwave fluxes about the observed surface climatology:
//!
//! ```text
//! Q'_LW + Q'_LH = 0,   Q'_LW = A_LW·Ts' + B_LW·f1',   Q'_LH = A_LH·Ts'
//! →  Ts' = −B_LW·f1' / (A_LH + A_LW)
//! ```

use ndarray::Array2;

use super::RHO_AIR;

const C_E: f64 = 0.00125;
const L_LATENT: f64 = 2.5e6;
const EMISSIVITY: f64 = 0.97;
const SIGMA: f64 = 5.67e-8;
const PS_MB: f64 = 1000.0;
const ES0: f64 = 6.11;
const T0: f64 = 273.15;
/// Air–surface temperature offset (K)
const DELTA: f64 = 1.0;
/// Vapour-pressure correction weight in the clear-sky emission
const F2: f64 = 0.05;
/// Cloud absorption factor
const A_CLOUD: f64 = 0.6;

/// Linearization point and perturbation for the balance.
#[derive(Clone, Copy, Debug)]
pub struct FluxBalance {
    /// Longwave parameter perturbation f1'
    pub f1_prime: f64,
    /// Windspeed floor (m/s)
    pub wnsp_min: f64,
}

impl Default for FluxBalance {
    fn default() -> Self {
        Self {
            f1_prime: -0.003,
            wnsp_min: 4.0,
        }
    }
}

/// Linearization coefficients and the implied SST response.
#[derive(Clone, Debug)]
pub struct FluxSensitivity {
    /// dQ_LH/dT (W/m²/K)
    pub a_lh: Array2<f64>,
    /// dQ_LW/dT (W/m²/K)
    pub a_lw: Array2<f64>,
    /// dQ_LW/df (W/m²)
    pub b_lw: Array2<f64>,
    /// Equilibrium SST perturbation −B_LW·f1'/(A_LH+A_LW) (K)
    pub dts: Array2<f64>,
}

fn es(t: f64) -> f64 {
    ES0 * (17.67 * (t - T0) / (t - T0 + 243.5)).exp()
}

fn qs(t: f64) -> f64 {
    0.622 * es(t) / PS_MB
}

fn dqs_dt(t: f64) -> f64 {
    qs(t) * (17.67 * 243.5) / (t - T0 + 243.5).powi(2)
}

/// Latent-heat flux Q_LH = ρ_a·c_E·L·U·qs(T)·(1−rh).
pub fn latent_heat_flux(t: f64, u: f64, rh: f64) -> f64 {
    RHO_AIR * C_E * L_LATENT * u * qs(t) * (1.0 - rh)
}

fn dqlh_dt(t: f64, u: f64, rh: f64) -> f64 {
    RHO_AIR * C_E * L_LATENT * u * dqs_dt(t) * (1.0 - rh)
}

fn ebar(t: f64, rh: f64) -> f64 {
    rh * qs(t) * PS_MB / 0.622
}

fn dqlw_df(t: f64, cloud: f64) -> f64 {
    EMISSIVITY * SIGMA * (1.0 - A_CLOUD * cloud * cloud) * t.powi(4)
}

fn dqlw_dt(t: f64, cloud: f64, f1: f64, rh: f64) -> f64 {
    let eb = ebar(t, rh);
    let q = qs(t);
    let dq = dqs_dt(t);
    EMISSIVITY
        * SIGMA
        * ((1.0 - A_CLOUD * cloud * cloud)
            * t.powi(3)
            * (4.0 * f1 - F2 * eb.sqrt() * (4.0 + t * dq / (2.0 * q)))
            + 12.0 * t.powi(2) * DELTA)
}

impl FluxBalance {
    /// Evaluate the linearization over climatological fields.
    ///
    /// * `ts` - SST (K)
    /// * `wnsp` - near-surface windspeed (m/s), floored at `wnsp_min`
    /// * `cloud` - cloud fraction (0–1)
    /// * `rh` - relative humidity fraction (0–1)
    /// * `f1_bar` - longwave parameter linearization point
    ///
    /// # Panics
    ///
    /// Panics if the field shapes differ.
    pub fn sensitivity(
        &self,
        ts: &Array2<f64>,
        wnsp: &Array2<f64>,
        cloud: &Array2<f64>,
        rh: &Array2<f64>,
        f1_bar: f64,
    ) -> FluxSensitivity {
        assert_eq!(ts.dim(), wnsp.dim(), "SST and windspeed shapes differ");
        assert_eq!(ts.dim(), cloud.dim(), "SST and cloud shapes differ");
        assert_eq!(ts.dim(), rh.dim(), "SST and humidity shapes differ");

        let shape = ts.dim();
        let mut a_lh = Array2::zeros(shape);
        let mut a_lw = Array2::zeros(shape);
        let mut b_lw = Array2::zeros(shape);
        let mut dts = Array2::zeros(shape);

        for (idx, &t) in ts.indexed_iter() {
            let u = wnsp[idx].max(self.wnsp_min);
            let c = cloud[idx];
            let h = rh[idx];
            let lh = dqlh_dt(t, u, h);
            let lw = dqlw_dt(t, c, f1_bar, h);
            let bw = dqlw_df(t, c);
            a_lh[idx] = lh;
            a_lw[idx] = lw;
            b_lw[idx] = bw;
            dts[idx] = -bw * self.f1_prime / (lh + lw);
        }

        FluxSensitivity {
            a_lh,
            a_lw,
            b_lw,
            dts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const F1_BAR: f64 = 0.39;

    #[test]
    fn test_saturation_curve_reference_point() {
        assert!((es(T0) - ES0).abs() < 1e-12);
        assert!(dqs_dt(300.0) > 0.0);
    }

    #[test]
    fn test_latent_flux_magnitude() {
        // ~100 W/m² for tropical conditions
        let q = latent_heat_flux(300.0, 5.0, 0.8);
        assert!(q > 20.0 && q < 300.0, "Q_LH = {}", q);
    }

    #[test]
    fn test_greenhouse_perturbation_warms_surface() {
        // f1' < 0 reduces outgoing longwave, so the balance requires warming
        let ts = Array2::from_elem((2, 2), 298.15);
        let wnsp = Array2::from_elem((2, 2), 5.0);
        let cloud = Array2::from_elem((2, 2), 0.6);
        let rh = Array2::from_elem((2, 2), 0.8);
        let sens = FluxBalance::default().sensitivity(&ts, &wnsp, &cloud, &rh, F1_BAR);
        for &d in sens.dts.iter() {
            assert!(d > 0.0, "expected warming, got {}", d);
            assert!(d < 5.0, "implausibly large response {}", d);
        }
    }

    #[test]
    fn test_windspeed_floor_damps_response() {
        // stronger ventilation (larger A_LH) means a smaller SST response
        let ts = Array2::from_elem((1, 1), 298.15);
        let cloud = Array2::from_elem((1, 1), 0.6);
        let rh = Array2::from_elem((1, 1), 0.8);
        let balance = FluxBalance::default();

        let calm = balance.sensitivity(
            &ts,
            &Array2::from_elem((1, 1), 1.0),
            &cloud,
            &rh,
            F1_BAR,
        );
        let windy = balance.sensitivity(
            &ts,
            &Array2::from_elem((1, 1), 10.0),
            &cloud,
            &rh,
            F1_BAR,
        );
        // the calm cell is floored to 4 m/s, still weaker than 10 m/s
        assert!(windy.dts[(0, 0)] < calm.dts[(0, 0)]);
    }
}
