//! NetCDF I/O for climatology input and trend output.
//!
//! The reader loads one named 2-D variable per file together with its `X`
//! and `Y` axes; the writer emits the full trend dataset with unit
//! attributes, f32-encoded scalar parameters and a history stamp.

use std::path::{Path, PathBuf};

#[cfg(feature = "netcdf")]
use chrono::Utc;
#[cfg(feature = "netcdf")]
use ndarray::{Array1, Array2};
use thiserror::Error;

#[cfg(feature = "netcdf")]
use crate::forcing::{ClimatologyField, ForcingInputs};
#[cfg(feature = "netcdf")]
use crate::output::TrendDataset;

/// Error type for data-file operations.
#[derive(Debug, Error)]
pub enum DataFileError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// NetCDF library error
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),

    /// Expected variable absent from the file
    #[error("missing variable: {0}")]
    MissingVariable(String),

    /// Variable present but unusable
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Crate built without the `netcdf` feature
    #[error("NetCDF feature not enabled")]
    FeatureDisabled,
}

/// A file path plus the variable to read from it.
#[derive(Clone, Debug)]
pub struct VariableSpec {
    pub path: PathBuf,
    pub variable: String,
}

impl VariableSpec {
    pub fn new(path: impl Into<PathBuf>, variable: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            variable: variable.into(),
        }
    }
}

/// Locations of the seven forcing files.
#[derive(Clone, Debug)]
pub struct ForcingPaths {
    pub sst_clim: VariableSpec,
    pub sst_trend: VariableSpec,
    pub sp_clim: VariableSpec,
    pub wnsp_clim: VariableSpec,
    pub pr_clim: VariableSpec,
    pub pr_trend: VariableSpec,
    pub mask: VariableSpec,
}

impl ForcingPaths {
    /// The reference ECMWF climatology layout under one data directory.
    pub fn ecmwf(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self {
            sst_clim: VariableSpec::new(dir.join("ts-ECMWF-clim.nc"), "ts"),
            sst_trend: VariableSpec::new(dir.join("ts-ECMWF-trend.nc"), "ts"),
            sp_clim: VariableSpec::new(dir.join("ps-ECMWF-clim.nc"), "ps"),
            wnsp_clim: VariableSpec::new(dir.join("sfcWind-ECMWF-clim.nc"), "sfcWind"),
            pr_clim: VariableSpec::new(dir.join("pr-ECMWF-clim.nc"), "pr"),
            pr_trend: VariableSpec::new(dir.join("pr-ECMWF-trend.nc"), "pr"),
            mask: VariableSpec::new(dir.join("mask-360x180.nc"), "mask"),
        }
    }
}

/// Read a coordinate variable, trying the usual spellings.
#[cfg(feature = "netcdf")]
fn read_coord(file: &netcdf::File, names: &[&str]) -> Result<Array1<f64>, DataFileError> {
    for name in names {
        if let Some(var) = file.variable(name) {
            let data: Vec<f64> = var.get_values(..)?;
            return Ok(Array1::from_vec(data));
        }
    }
    Err(DataFileError::MissingVariable(names.join(" or ")))
}

/// Load one 2-D climatology variable and its axes.
#[cfg(feature = "netcdf")]
pub fn read_climatology(spec: &VariableSpec) -> Result<ClimatologyField, DataFileError> {
    let file = netcdf::open(&spec.path)?;

    let x = read_coord(&file, &["X", "lon", "longitude"])?;
    let y = read_coord(&file, &["Y", "lat", "latitude"])?;

    let var = file
        .variable(&spec.variable)
        .ok_or_else(|| DataFileError::MissingVariable(spec.variable.clone()))?;

    let raw: Vec<f64> = var.get_values(..)?;
    if raw.len() != x.len() * y.len() {
        return Err(DataFileError::InvalidData(format!(
            "variable {} has {} values, axes imply {}x{}",
            spec.variable,
            raw.len(),
            y.len(),
            x.len()
        )));
    }
    let values = Array2::from_shape_vec((y.len(), x.len()), raw)
        .map_err(|e| DataFileError::InvalidData(e.to_string()))?;

    Ok(ClimatologyField { x, y, values })
}

/// Load the full forcing set.
#[cfg(feature = "netcdf")]
pub fn read_forcing_inputs(paths: &ForcingPaths) -> Result<ForcingInputs, DataFileError> {
    Ok(ForcingInputs {
        sst_clim: read_climatology(&paths.sst_clim)?,
        sst_trend: read_climatology(&paths.sst_trend)?,
        sp_clim: read_climatology(&paths.sp_clim)?,
        wnsp_clim: read_climatology(&paths.wnsp_clim)?,
        pr_clim: read_climatology(&paths.pr_clim)?,
        pr_trend: read_climatology(&paths.pr_trend)?,
        mask: read_climatology(&paths.mask)?,
    })
}

/// Write the trend dataset to a new NetCDF file.
#[cfg(feature = "netcdf")]
pub fn write_trend_dataset(path: &Path, ds: &TrendDataset) -> Result<(), DataFileError> {
    let mut file = netcdf::create(path)?;

    file.add_dimension("X", ds.x.len())?;
    file.add_dimension("Yu", ds.yu.len())?;
    file.add_dimension("Yv", ds.yv.len())?;

    {
        let mut x_var = file.add_variable::<f64>("X", &["X"])?;
        x_var.put_attribute("units", "degree_east")?;
        x_var.put_values(&ds.x.to_vec(), ..)?;
    }
    {
        let mut yu_var = file.add_variable::<f64>("Yu", &["Yu"])?;
        yu_var.put_attribute("units", "degree_north")?;
        yu_var.put_values(&ds.yu.to_vec(), ..)?;
    }
    {
        let mut yv_var = file.add_variable::<f64>("Yv", &["Yv"])?;
        yv_var.put_attribute("units", "degree_north")?;
        yv_var.put_values(&ds.yv.to_vec(), ..)?;
    }

    // scalar timescale parameters, f32-encoded
    write_scalar(&mut file, "K", ds.k_days, "day")?;
    write_scalar(&mut file, "epsu", ds.eps_u_days, "day")?;
    write_scalar(&mut file, "epsv", ds.eps_v_days, "day")?;
    write_scalar(&mut file, "Hq", ds.hq, "m")?;

    // trends
    write_field(&mut file, "utrend", &ds.trend.u, "Yu", Some("m/s"))?;
    write_field(&mut file, "vtrend", &ds.trend.v, "Yv", Some("m/s"))?;
    write_field(&mut file, "phitrend", &ds.trend.phi, "Yu", Some("m2/s2"))?;
    write_field(&mut file, "tstrend", &ds.trend.ts, "Yu", None)?;
    write_field(&mut file, "PRtrend", &ds.trend.pr, "Yu", Some("m/s"))?;
    write_field(&mut file, "Qthtrend", &ds.trend.qth, "Yu", Some("K/s"))?;

    // endpoint snapshots
    for (suffix, fields) in [("end", &ds.end), ("beg", &ds.begin)] {
        write_field(&mut file, &format!("u{suffix}"), &fields.u, "Yu", None)?;
        write_field(&mut file, &format!("v{suffix}"), &fields.v, "Yv", None)?;
        write_field(&mut file, &format!("w{suffix}"), &fields.windspeed, "Yu", None)?;
        write_field(&mut file, &format!("phi{suffix}"), &fields.phi, "Yu", None)?;
        write_field(&mut file, &format!("ts{suffix}"), &fields.ts, "Yu", None)?;
        write_field(&mut file, &format!("PR{suffix}"), &fields.pr, "Yu", None)?;
        write_field(&mut file, &format!("Qth{suffix}"), &fields.qth, "Yu", None)?;
        write_field(&mut file, &format!("E{suffix}"), &fields.evap, "Yu", None)?;
        write_field(&mut file, &format!("MC{suffix}"), &fields.mc, "Yu", None)?;
        write_field(&mut file, &format!("qa{suffix}"), &fields.qa, "Yu", None)?;
    }

    let now = Utc::now();
    file.add_attribute(
        "history",
        format!("{}: written by gill-rs", now.format("%Y-%m-%d %H:%M:%S UTC")).as_str(),
    )?;

    Ok(())
}

#[cfg(feature = "netcdf")]
fn write_scalar(
    file: &mut netcdf::FileMut,
    name: &str,
    value: f64,
    units: &str,
) -> Result<(), DataFileError> {
    let mut var = file.add_variable::<f32>(name, &[])?;
    var.put_attribute("units", units)?;
    var.put_value(value as f32, ..)?;
    Ok(())
}

#[cfg(feature = "netcdf")]
fn write_field(
    file: &mut netcdf::FileMut,
    name: &str,
    field: &Array2<f64>,
    lat_dim: &str,
    units: Option<&str>,
) -> Result<(), DataFileError> {
    let mut var = file.add_variable::<f64>(name, &[lat_dim, "X"])?;
    if let Some(u) = units {
        var.put_attribute("units", u)?;
    }
    let flat: Vec<f64> = field.iter().copied().collect();
    var.put_values(&flat, ..)?;
    Ok(())
}
