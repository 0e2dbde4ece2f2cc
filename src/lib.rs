//! # gill-rs
//!
//! A steady-state linear tropical atmosphere model: the damped shallow-water
//! (Gill–Matsuno type) response to diabatic heating, driven by prescribed
//! sea-surface-temperature and precipitation climatologies and iterated
//! through a precipitation–moisture-convergence feedback to a steady state.
//!
//! The crate provides the building blocks and the trend driver:
//! - Staggered tropical grid and derived dynamical constants
//! - Spectral (longitude) / tridiagonal (latitude) steady-response solver
//! - Bulk surface physics: humidity, evaporation, heating, moisture
//!   convergence, and a linearized surface energy balance
//! - Forcing regridding and trend endpoint preparation
//! - The fixed-count feedback iteration and trend assembly
//! - NetCDF forcing input and trend output (behind the `netcdf` feature)
//!
//! # Example
//!
//! ```no_run
//! use gill_rs::{ModelParameters, TrendSimulation};
//! # fn load_inputs() -> gill_rs::ForcingInputs { unimplemented!() }
//!
//! let params = ModelParameters::default();
//! let inputs = load_inputs();
//! let simulation = TrendSimulation::new(params, &inputs).unwrap();
//! let dataset = simulation.run();
//! let max_du = dataset.trend.u.iter().fold(f64::NEG_INFINITY, |a, &v| a.max(v));
//! println!("max wind trend: {max_du}");
//! ```

pub mod constants;
pub mod dynamics;
pub mod forcing;
pub mod grid;
pub mod io;
pub mod output;
pub mod params;
pub mod physics;
pub mod simulation;
pub mod smoothing;

pub use constants::DerivedConstants;
pub use dynamics::{solve_tridiagonal, GillSolver, Spectral, SteadyResponse};
pub use forcing::{
    BilinearInterpolator, ClimatologyField, EndpointForcing, ForcingError, ForcingInputs,
    InterpError, PreparedForcing,
};
pub use grid::{fourier_wavenumbers, TropicalGrid};
pub use io::{DataFileError, ForcingPaths, VariableSpec};
pub use output::{EndpointFields, TrendDataset, TrendFields};
pub use params::{ModelParameters, ParamsError};
pub use physics::{
    evaporation_flux, latent_heating, moisture_convergence, radiative_heating,
    saturation_specific_humidity, total_heating, FluxBalance, FluxSensitivity,
};
pub use simulation::{Endpoint, EndpointState, IterationControl, TrendSimulation};
pub use smoothing::{smooth121, BoundaryRule, SmoothAxis};
