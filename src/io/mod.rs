//! Reading forcing files and writing the trend dataset.
//!
//! All gridded data lives in NetCDF files; the readers and writers are
//! compiled behind the `netcdf` cargo feature so the numerical core builds
//! without a system NetCDF library.

mod netcdf_io;

pub use netcdf_io::{DataFileError, ForcingPaths, VariableSpec};

#[cfg(feature = "netcdf")]
pub use netcdf_io::{read_climatology, read_forcing_inputs, write_trend_dataset};
