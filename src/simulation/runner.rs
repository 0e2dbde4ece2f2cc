//! Endpoint iteration and trend assembly.
//!
//! For each trend endpoint the driver repeats a fixed number of
//! heating→dynamics→moisture-convergence→precipitation feedback steps; the
//! two converged endpoints are then differenced into trend fields. The
//! endpoints share no mutable state, so they can run in either order, or in
//! parallel, with bit-identical results.

use log::{debug, info};
use ndarray::Array2;

use crate::constants::DerivedConstants;
use crate::dynamics::GillSolver;
use crate::forcing::{prepare, EndpointForcing, ForcingError, ForcingInputs, PreparedForcing};
use crate::grid::TropicalGrid;
use crate::output::{EndpointFields, TrendDataset, TrendFields};
use crate::params::ModelParameters;
use crate::physics::{latent_heating, moisture_convergence, total_heating};
use crate::smoothing::{smooth121, SmoothAxis};

/// Which trend endpoint to operate on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Begin,
    End,
}

/// Stopping rule for the outer feedback loop.
///
/// The reference experiment uses a fixed iteration count; the tolerance mode
/// is an additive extension and is not used for reproducing reference
/// output.
#[derive(Clone, Copy, Debug)]
pub enum IterationControl {
    /// Run exactly this many steps.
    FixedCount(usize),
    /// Stop when the largest precipitation change drops below `tol`
    /// (kg/m²/s), or after `max_iterations` steps.
    Tolerance { tol: f64, max_iterations: usize },
}

/// Solver state carried between feedback steps of one endpoint.
#[derive(Clone, Debug)]
pub struct EndpointState {
    /// Precipitation (kg/m²/s), shape (ny−1, nx), never negative
    pub pr: Array2<f64>,
    /// Smoothed moisture convergence (kg/m²/s), shape (ny−1, nx)
    pub mc: Array2<f64>,
    /// Zonal wind (m/s), shape (ny−1, nx)
    pub u: Array2<f64>,
    /// Meridional wind (m/s), shape (ny, nx)
    pub v: Array2<f64>,
    /// Geopotential perturbation (m²/s²), shape (ny−1, nx)
    pub phi: Array2<f64>,
}

/// One configured trend experiment: grid, constants, solver and prepared
/// forcing, ready to iterate.
pub struct TrendSimulation {
    params: ModelParameters,
    constants: DerivedConstants,
    grid: TropicalGrid,
    solver: GillSolver,
    forcing: PreparedForcing,
}

impl TrendSimulation {
    /// Build the experiment from parameters and raw forcing inputs.
    pub fn new(params: ModelParameters, inputs: &ForcingInputs) -> Result<Self, ForcingError> {
        let constants = DerivedConstants::new(&params);
        let grid = TropicalGrid::new(&params);
        let solver = GillSolver::new(&grid, &constants);
        let forcing = prepare(&params, &constants, &grid, inputs)?;
        info!(
            "trend simulation on {}x{} grid, {} iterations per endpoint",
            grid.nx, grid.ny, params.n_iterations
        );
        Ok(Self {
            params,
            constants,
            grid,
            solver,
            forcing,
        })
    }

    /// Model grid in use.
    pub fn grid(&self) -> &TropicalGrid {
        &self.grid
    }

    /// Prepared forcing in use.
    pub fn forcing(&self) -> &PreparedForcing {
        &self.forcing
    }

    fn endpoint_forcing(&self, endpoint: Endpoint) -> &EndpointForcing {
        match endpoint {
            Endpoint::Begin => &self.forcing.begin,
            Endpoint::End => &self.forcing.end,
        }
    }

    /// One feedback step: heating from the given precipitation, dynamics
    /// solve, moisture convergence, new precipitation.
    ///
    /// Inputs are taken by reference and a fresh state is returned; nothing
    /// is mutated in place.
    pub fn step(&self, endpoint: Endpoint, pr: &Array2<f64>) -> EndpointState {
        let forcing = self.endpoint_forcing(endpoint);

        let qc = latent_heating(pr, &self.params);
        let q1 = total_heating(&qc, &forcing.qth, &self.constants);
        let resp = self.solver.solve(&q1);

        let mc_raw = moisture_convergence(
            &self.grid,
            self.solver.spectral(),
            &forcing.qa,
            &resp.u,
            &resp.v,
            self.params.hq,
        );
        let mc = smooth121(&mc_raw, &[SmoothAxis::lat(), SmoothAxis::lon()], 1);

        let mut pr_new = Array2::zeros(pr.dim());
        for (idx, p) in pr_new.indexed_iter_mut() {
            let ocean = (1.0 - self.forcing.mask[idx]) * (mc[idx] + forcing.evap[idx]);
            let land = if self.params.land_precip_override {
                self.forcing.mask[idx] * forcing.pr_obs[idx]
            } else {
                0.0
            };
            *p = (ocean + land).max(0.0);
        }

        EndpointState {
            pr: pr_new,
            mc,
            u: resp.u,
            v: resp.v,
            phi: resp.phi,
        }
    }

    /// Iterate one endpoint to its steady state under the given stopping
    /// rule.
    pub fn run_endpoint_with_control(
        &self,
        endpoint: Endpoint,
        control: IterationControl,
    ) -> EndpointState {
        let forcing = self.endpoint_forcing(endpoint);
        let mut pr = forcing.pr_init.clone();
        let mut state: Option<EndpointState> = None;

        let max_iterations = match control {
            IterationControl::FixedCount(n) => n,
            IterationControl::Tolerance { max_iterations, .. } => max_iterations,
        };

        for iteration in 0..max_iterations {
            let next = self.step(endpoint, &pr);
            let delta = max_abs_diff(&next.pr, &pr);
            debug!(
                "endpoint {:?} iteration {}: max |dPR| = {:.3e}",
                endpoint, iteration, delta
            );
            pr = next.pr.clone();
            state = Some(next);

            if let IterationControl::Tolerance { tol, .. } = control {
                if delta <= tol {
                    info!(
                        "endpoint {:?} converged after {} iterations",
                        endpoint,
                        iteration + 1
                    );
                    break;
                }
            }
        }

        state.unwrap_or_else(|| EndpointState {
            pr,
            mc: Array2::zeros((self.grid.ny - 1, self.grid.nx)),
            u: Array2::zeros((self.grid.ny - 1, self.grid.nx)),
            v: Array2::zeros((self.grid.ny, self.grid.nx)),
            phi: Array2::zeros((self.grid.ny - 1, self.grid.nx)),
        })
    }

    /// Iterate one endpoint with the reference fixed-count rule.
    pub fn run_endpoint(&self, endpoint: Endpoint) -> EndpointState {
        self.run_endpoint_with_control(
            endpoint,
            IterationControl::FixedCount(self.params.n_iterations),
        )
    }

    /// Run both endpoints sequentially and assemble the trend dataset.
    pub fn run(&self) -> TrendDataset {
        let begin = self.run_endpoint(Endpoint::Begin);
        let end = self.run_endpoint(Endpoint::End);
        self.assemble(begin, end)
    }

    /// Run both endpoints concurrently. The endpoints own disjoint state, so
    /// the result is bit-identical to [`run`](TrendSimulation::run).
    #[cfg(feature = "parallel")]
    pub fn run_parallel(&self) -> TrendDataset {
        let (begin, end) = rayon::join(
            || self.run_endpoint(Endpoint::Begin),
            || self.run_endpoint(Endpoint::End),
        );
        self.assemble(begin, end)
    }

    /// Difference the endpoints into trend fields and copy everything into
    /// the output container.
    fn assemble(&self, begin: EndpointState, end: EndpointState) -> TrendDataset {
        let fields = |state: &EndpointState, forcing: &EndpointForcing| EndpointFields {
            u: state.u.clone(),
            v: state.v.clone(),
            windspeed: self.forcing.wnsp.clone(),
            phi: state.phi.clone(),
            ts: forcing.ts.clone(),
            pr: state.pr.clone(),
            qth: forcing.qth.clone(),
            evap: forcing.evap.clone(),
            mc: state.mc.clone(),
            qa: forcing.qa.clone(),
        };

        let begin_fields = fields(&begin, &self.forcing.begin);
        let end_fields = fields(&end, &self.forcing.end);

        // the geopotential trend carries 2-gridpoint noise; remove it with a
        // single longitude smooth
        let phi_trend = smooth121(
            &(&end_fields.phi - &begin_fields.phi),
            &[SmoothAxis::lon()],
            1,
        );

        let trend = TrendFields {
            u: &end_fields.u - &begin_fields.u,
            v: &end_fields.v - &begin_fields.v,
            phi: phi_trend,
            ts: &end_fields.ts - &begin_fields.ts,
            pr: &end_fields.pr - &begin_fields.pr,
            qth: &end_fields.qth - &begin_fields.qth,
        };

        TrendDataset {
            x: self.grid.x.clone(),
            yu: self.grid.yu.clone(),
            yv: self.grid.yv.clone(),
            k_days: self.params.k_days,
            eps_u_days: self.params.eps_days,
            eps_v_days: self.params.eps_days / self.params.efrac,
            hq: self.params.hq,
            land_precip_override: self.params.land_precip_override,
            begin: begin_fields,
            end: end_fields,
            trend,
        }
    }
}

fn max_abs_diff(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
