//! Forcing-field preparation.
//!
//! Takes raw climatology and trend fields on their native grids, regrids
//! them onto the model's staggered axes, derives the secondary fields
//! (humidity, evaporation, radiative heating) and splits the trends into the
//! "begin" and "end" endpoint snapshots consumed by the iteration driver.

mod interp;

pub use interp::{BilinearInterpolator, InterpError};

use log::debug;
use ndarray::{Array1, Array2};
use thiserror::Error;

use crate::constants::DerivedConstants;
use crate::grid::TropicalGrid;
use crate::params::ModelParameters;
use crate::physics::{evaporation_flux, radiative_heating, saturation_specific_humidity_field};
use crate::smoothing::{smooth121, SmoothAxis};

/// Latitude beyond which precipitation trends are zeroed (degrees).
const TREND_LAT_LIMIT: f64 = 25.0;
/// Cap on the precipitation trend rate (m/s).
const TREND_RATE_CAP: f64 = 5.0e-5;
/// Coldest plausible sea-surface temperature (K); anything below this means
/// the input is not on the Kelvin scale.
const TS_KELVIN_FLOOR: f64 = 150.0;

/// Error type for forcing preparation.
#[derive(Debug, Error)]
pub enum ForcingError {
    /// Source grid was unusable
    #[error("field {field}: {source}")]
    Interp {
        field: &'static str,
        #[source]
        source: InterpError,
    },

    /// Interpolated field does not match the model grid
    #[error("field {field} shaped ({rows}, {cols}), expected ({want_rows}, {want_cols}) on axis {axis}")]
    AxisMismatch {
        field: &'static str,
        axis: &'static str,
        rows: usize,
        cols: usize,
        want_rows: usize,
        want_cols: usize,
    },

    /// A prepared field contains NaN or infinite values
    #[error("field {field} contains non-finite values after preparation")]
    NonFinite { field: &'static str },

    /// SST is not on the Kelvin scale
    #[error("field {field} has minimum {min} K; expected Kelvin-scale temperatures")]
    NotKelvin { field: &'static str, min: f64 },
}

/// One gridded input field on its native axes.
#[derive(Clone, Debug)]
pub struct ClimatologyField {
    /// Native longitudes (degrees east), strictly increasing
    pub x: Array1<f64>,
    /// Native latitudes (degrees north), strictly increasing
    pub y: Array1<f64>,
    /// Values shaped (y, x)
    pub values: Array2<f64>,
}

impl ClimatologyField {
    /// Regrid onto the model's scalar rows (`yu` × `x`).
    fn onto_scalar_rows(
        &self,
        grid: &TropicalGrid,
        field: &'static str,
    ) -> Result<Array2<f64>, ForcingError> {
        let interp =
            BilinearInterpolator::new(self.x.clone(), self.y.clone(), self.values.clone())
                .map_err(|source| ForcingError::Interp { field, source })?;
        let out = interp.interpolate_onto(&grid.x, &grid.yu);
        let (rows, cols) = out.dim();
        if (rows, cols) != (grid.ny - 1, grid.nx) {
            return Err(ForcingError::AxisMismatch {
                field,
                axis: if rows != grid.ny - 1 { "Yu" } else { "X" },
                rows,
                cols,
                want_rows: grid.ny - 1,
                want_cols: grid.nx,
            });
        }
        Ok(out)
    }
}

/// The full set of raw input fields.
#[derive(Clone, Debug)]
pub struct ForcingInputs {
    /// Sea-surface temperature climatology (K)
    pub sst_clim: ClimatologyField,
    /// Sea-surface temperature trend (K over the trend period)
    pub sst_trend: ClimatologyField,
    /// Surface pressure climatology (mb)
    pub sp_clim: ClimatologyField,
    /// Near-surface windspeed climatology (m/s)
    pub wnsp_clim: ClimatologyField,
    /// Precipitation climatology (m/s)
    pub pr_clim: ClimatologyField,
    /// Precipitation trend (m/s over the trend period)
    pub pr_trend: ClimatologyField,
    /// Land/ocean mask (1 over land, 0 over ocean)
    pub mask: ClimatologyField,
}

/// Forcing state for one trend endpoint.
#[derive(Clone, Debug)]
pub struct EndpointForcing {
    /// Sea-surface temperature (K)
    pub ts: Array2<f64>,
    /// Surface specific humidity
    pub qa: Array2<f64>,
    /// Evaporation flux (kg/m²/s)
    pub evap: Array2<f64>,
    /// Radiative-heating baseline
    pub qth: Array2<f64>,
    /// Observed endpoint precipitation, used for the land override (m/s)
    pub pr_obs: Array2<f64>,
    /// Initial precipitation for the feedback loop (m/s)
    pub pr_init: Array2<f64>,
}

/// All prepared forcing: shared fields plus the two endpoint snapshots.
#[derive(Clone, Debug)]
pub struct PreparedForcing {
    /// Land/ocean mask on the scalar rows
    pub mask: Array2<f64>,
    /// Floored windspeed on the scalar rows (m/s)
    pub wnsp: Array2<f64>,
    pub begin: EndpointForcing,
    pub end: EndpointForcing,
}

/// Regrid, derive and split the raw inputs into endpoint forcing.
///
/// Fails fast on unusable source grids, grid-shape mismatches, non-finite
/// values and non-Kelvin temperatures; the iteration driver itself performs
/// no validation.
pub fn prepare(
    params: &ModelParameters,
    constants: &DerivedConstants,
    grid: &TropicalGrid,
    inputs: &ForcingInputs,
) -> Result<PreparedForcing, ForcingError> {
    let ts_clim = inputs.sst_clim.onto_scalar_rows(grid, "sst_clim")?;
    let ts_trend = inputs.sst_trend.onto_scalar_rows(grid, "sst_trend")?;
    let sp_clim = inputs.sp_clim.onto_scalar_rows(grid, "sp_clim")?;
    let pr_clim = inputs.pr_clim.onto_scalar_rows(grid, "pr_clim")?;
    let mut pr_trend = inputs.pr_trend.onto_scalar_rows(grid, "pr_trend")?;
    let mask = inputs.mask.onto_scalar_rows(grid, "mask")?;
    let mut wnsp = inputs.wnsp_clim.onto_scalar_rows(grid, "wnsp_clim")?;

    wnsp.mapv_inplace(|w| w.max(params.wnsp_min));

    check_finite(&ts_clim, "sst_clim")?;
    check_finite(&ts_trend, "sst_trend")?;
    check_finite(&sp_clim, "sp_clim")?;
    check_finite(&pr_clim, "pr_clim")?;
    check_finite(&pr_trend, "pr_trend")?;
    check_finite(&mask, "mask")?;
    check_finite(&wnsp, "wnsp_clim")?;
    check_kelvin(&ts_clim, "sst_clim")?;

    // clip the precipitation trend to the deep tropics, cap its rate and
    // smooth out native-grid noise
    for (idx, t) in pr_trend.indexed_iter_mut() {
        if grid.yu[idx.0].abs() > TREND_LAT_LIMIT {
            *t = 0.0;
        } else if *t > TREND_RATE_CAP {
            *t = TREND_RATE_CAP;
        }
    }
    let pr_trend = smooth121(&pr_trend, &[SmoothAxis::lat(), SmoothAxis::lon()], 1);

    debug!(
        "prepared forcing on {}x{} scalar rows, trend clipped poleward of {} deg",
        grid.ny - 1,
        grid.nx,
        TREND_LAT_LIMIT
    );

    // SST trends act over ocean only; precipitation trends everywhere
    let half = |sign: f64| -> (Array2<f64>, Array2<f64>) {
        let mut ts = ts_clim.clone();
        for (idx, t) in ts.indexed_iter_mut() {
            *t += sign * 0.5 * (1.0 - mask[idx]) * ts_trend[idx];
        }
        let mut pr = pr_clim.clone();
        for (idx, p) in pr.indexed_iter_mut() {
            *p += sign * 0.5 * pr_trend[idx];
        }
        (ts, pr)
    };
    let (ts_beg, pr_beg) = half(-1.0);
    let (ts_end, pr_end) = half(1.0);

    let build = |ts: Array2<f64>, pr_obs: Array2<f64>| -> Result<EndpointForcing, ForcingError> {
        check_kelvin(&ts, "sst endpoint")?;
        let qa = saturation_specific_humidity_field(&ts, &sp_clim, params.relative_humidity);
        // negative fluxes are clamped before the feedback loop sees them
        let mut evap =
            evaporation_flux(&mask, &qa, &wnsp, params.relative_humidity, params.wnsp_min);
        evap.mapv_inplace(|e| e.max(0.0));
        let qth = radiative_heating(&ts, constants);
        let pr_init = evap.clone();
        Ok(EndpointForcing {
            ts,
            qa,
            evap,
            qth,
            pr_obs,
            pr_init,
        })
    };

    let begin = build(ts_beg, pr_beg)?;
    let end = build(ts_end, pr_end)?;

    Ok(PreparedForcing {
        mask,
        wnsp,
        begin,
        end,
    })
}

fn check_finite(field: &Array2<f64>, name: &'static str) -> Result<(), ForcingError> {
    if field.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ForcingError::NonFinite { field: name })
    }
}

fn check_kelvin(field: &Array2<f64>, name: &'static str) -> Result<(), ForcingError> {
    let min = field.iter().copied().fold(f64::INFINITY, f64::min);
    if min < TS_KELVIN_FLOOR {
        Err(ForcingError::NotKelvin { field: name, min })
    } else {
        Ok(())
    }
}
