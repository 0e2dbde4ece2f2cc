//! Surface-layer physics.
//!
//! Bulk formulae tying the atmospheric solver to the prescribed surface
//! state: saturation humidity, evaporation, diabatic heating and moisture
//! convergence, plus the linearized surface energy balance used for the SST
//! sensitivity diagnostic.

mod evaporation;
mod flux_balance;
mod heating;
mod humidity;
mod moisture;

pub use evaporation::evaporation_flux;
pub use flux_balance::{latent_heat_flux, FluxBalance, FluxSensitivity};
pub use heating::{latent_heating, radiative_heating, total_heating};
pub use humidity::{saturation_specific_humidity, saturation_specific_humidity_field};
pub use moisture::moisture_convergence;

/// Surface air density (kg/m³) shared by the bulk formulae.
pub const RHO_AIR: f64 = 1.225;
