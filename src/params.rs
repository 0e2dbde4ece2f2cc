//! Model parameters.
//!
//! All tunable physical and numerical parameters of the model, with the
//! reference values used for the published trend experiments. Parameters can
//! be constructed from defaults, adjusted with builder-style setters, or
//! loaded from a TOML file.

use std::f64::consts::PI;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Error type for parameter loading.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid TOML or has wrong field types
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A parameter value is outside its valid range
    #[error("invalid parameter {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Physical and numerical parameters of the atmosphere model.
///
/// Defaults reproduce the reference trend experiment: a 2°×2° tropical grid
/// spanning 60°S–60°N, 0.75-day Rayleigh friction, 10-day Newtonian cooling
/// and 50 fixed feedback iterations per endpoint.
///
/// # Example
///
/// ```
/// use gill_rs::ModelParameters;
///
/// let params = ModelParameters::default().with_resolution(90, 30);
/// assert_eq!(params.nx, 90);
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelParameters {
    /// Rayleigh friction decay timescale (days)
    pub eps_days: f64,
    /// Newtonian cooling decay timescale (days)
    pub k_days: f64,
    /// Ratio of meridional to zonal friction rates
    pub efrac: f64,
    /// Moisture scale depth (m)
    pub hq: f64,
    /// Windspeed floor applied before evaporation (m/s)
    pub wnsp_min: f64,
    /// Boundary-layer density scale used in latent heating
    pub rho_00: f64,
    /// Precipitation-rate cap (m/s)
    pub pr_max: f64,
    /// Surface relative humidity fraction
    pub relative_humidity: f64,
    /// Number of longitude points
    pub nx: usize,
    /// Number of latitude cells
    pub ny: usize,
    /// Northern domain edge (degrees); the domain is symmetric about the equator
    pub y_north: f64,
    /// Fixed outer-iteration count per endpoint
    pub n_iterations: usize,
    /// Use observed precipitation over land instead of the model feedback
    pub land_precip_override: bool,
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
    /// Tropopause height (m)
    pub zt: f64,
    /// Reference potential temperature (K)
    pub th_00: f64,
    /// Buoyancy frequency squared (1/s²)
    pub nbsq: f64,
    /// Earth radius (m)
    pub r_earth: f64,
    /// Twice the planetary rotation rate (1/s)
    pub omega_2: f64,
    /// Latent heat of vaporisation (J/kg)
    pub l_latent: f64,
    /// Specific heat of air (J/kg/K)
    pub cp_air: f64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            eps_days: 0.75,
            k_days: 10.0,
            efrac: 2.0,
            hq: 1800.0,
            wnsp_min: 4.0,
            rho_00: 0.3,
            pr_max: 20.0 / 3600.0 / 24.0,
            relative_humidity: 0.80,
            nx: 180,
            ny: 60,
            y_north: 60.0,
            n_iterations: 50,
            land_precip_override: true,
            gravity: 9.8,
            zt: 15000.0,
            th_00: 300.0,
            nbsq: 3.0e-4,
            r_earth: 6.37e6,
            omega_2: 2.0 * (2.0 * PI / 86400.0),
            l_latent: 2.5e6,
            cp_air: 1000.0,
        }
    }
}

impl ModelParameters {
    /// Load parameters from a TOML file.
    ///
    /// Fields absent from the file keep their default values.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let text = std::fs::read_to_string(path)?;
        let params: Self = toml::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.nx < 2 {
            return Err(ParamsError::Invalid {
                name: "nx",
                reason: format!("need at least 2 longitude points, got {}", self.nx),
            });
        }
        if self.ny < 4 {
            return Err(ParamsError::Invalid {
                name: "ny",
                reason: format!("need at least 4 latitude cells, got {}", self.ny),
            });
        }
        if self.y_north <= 0.0 {
            return Err(ParamsError::Invalid {
                name: "y_north",
                reason: format!("domain half-width must be positive, got {}", self.y_north),
            });
        }
        if self.eps_days <= 0.0 || self.k_days <= 0.0 {
            return Err(ParamsError::Invalid {
                name: "eps_days/k_days",
                reason: "damping timescales must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Set the grid resolution.
    pub fn with_resolution(mut self, nx: usize, ny: usize) -> Self {
        self.nx = nx;
        self.ny = ny;
        self
    }

    /// Set the fixed outer-iteration count.
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.n_iterations = n;
        self
    }

    /// Set the moisture scale depth (m).
    pub fn with_hq(mut self, hq: f64) -> Self {
        self.hq = hq;
        self
    }

    /// Enable or disable the land-precipitation override.
    pub fn with_land_precip_override(mut self, on: bool) -> Self {
        self.land_precip_override = on;
        self
    }

    /// Set twice the planetary rotation rate (1/s). Zero gives a non-rotating
    /// planet, useful for degenerate-case testing.
    pub fn with_omega_2(mut self, omega_2: f64) -> Self {
        self.omega_2 = omega_2;
        self
    }
}
