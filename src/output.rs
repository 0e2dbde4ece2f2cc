//! Trend output container.
//!
//! A labelled multi-field dataset holding the beginning, end and trend
//! values of every model quantity, plus the coordinate axes and scalar
//! timescale metadata. It is built by copying endpoint results, so later
//! mutation of solver state cannot change what is written.

use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2};

/// Per-endpoint output fields. `v` lives on the `yv` axis, everything else
/// on the `yu` axis.
#[derive(Clone, Debug)]
pub struct EndpointFields {
    /// Zonal wind (m/s)
    pub u: Array2<f64>,
    /// Meridional wind (m/s)
    pub v: Array2<f64>,
    /// Near-surface windspeed (m/s)
    pub windspeed: Array2<f64>,
    /// Geopotential perturbation (m²/s²)
    pub phi: Array2<f64>,
    /// Sea-surface temperature (K)
    pub ts: Array2<f64>,
    /// Precipitation (kg/m²/s)
    pub pr: Array2<f64>,
    /// Radiative-heating baseline (K/s)
    pub qth: Array2<f64>,
    /// Evaporation (kg/m²/s)
    pub evap: Array2<f64>,
    /// Moisture convergence (kg/m²/s)
    pub mc: Array2<f64>,
    /// Surface specific humidity
    pub qa: Array2<f64>,
}

/// End-minus-begin trend fields.
#[derive(Clone, Debug)]
pub struct TrendFields {
    /// Zonal wind trend (m/s)
    pub u: Array2<f64>,
    /// Meridional wind trend (m/s)
    pub v: Array2<f64>,
    /// Geopotential trend, longitude-smoothed (m²/s²)
    pub phi: Array2<f64>,
    /// Sea-surface temperature trend (K)
    pub ts: Array2<f64>,
    /// Precipitation trend (kg/m²/s)
    pub pr: Array2<f64>,
    /// Radiative-heating trend (K/s)
    pub qth: Array2<f64>,
}

/// The complete output of one trend experiment.
#[derive(Clone, Debug)]
pub struct TrendDataset {
    /// Longitudes (degrees east)
    pub x: Array1<f64>,
    /// Scalar-row latitudes (degrees north)
    pub yu: Array1<f64>,
    /// Meridional-wind latitudes (degrees north)
    pub yv: Array1<f64>,
    /// Newtonian cooling timescale (days)
    pub k_days: f64,
    /// Zonal friction timescale (days)
    pub eps_u_days: f64,
    /// Meridional friction timescale (days)
    pub eps_v_days: f64,
    /// Moisture scale depth (m)
    pub hq: f64,
    /// Whether observed precipitation was used over land
    pub land_precip_override: bool,
    pub begin: EndpointFields,
    pub end: EndpointFields,
    pub trend: TrendFields,
}

impl TrendDataset {
    /// Deterministic output path: the base path decorated with the moisture
    /// scale depth and the land-override flag.
    ///
    /// # Example
    ///
    /// ```
    /// # use gill_rs::output::{TrendDataset};
    /// # use std::path::Path;
    /// let path = TrendDataset::output_path(Path::new("tmp/S91"), 1800.0, true);
    /// assert_eq!(path.to_str().unwrap(), "tmp/S91-Hq1800-PrcpLand1.nc");
    /// ```
    pub fn output_path(base: &Path, hq: f64, land_precip_override: bool) -> PathBuf {
        let mut name = base.as_os_str().to_os_string();
        name.push(format!(
            "-Hq{}-PrcpLand{}.nc",
            format_scalar(hq),
            if land_precip_override { 1 } else { 0 }
        ));
        PathBuf::from(name)
    }

    /// Output path for this dataset's own parameters.
    pub fn path_for(&self, base: &Path) -> PathBuf {
        Self::output_path(base, self.hq, self.land_precip_override)
    }
}

/// Render a scalar for the file name: integral values drop the trailing
/// `.0`.
fn format_scalar(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}
