//! Trend-experiment driver.

mod runner;

pub use runner::{Endpoint, EndpointState, IterationControl, TrendSimulation};
