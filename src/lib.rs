//! Monte Carlo quantification of cost and schedule risk
//!
//! Each risk or opportunity is a three-point estimate (P10/P50/P90) with
//! an occurrence probability and a distribution family. A run gates and
//! samples every valid risk per iteration, sums the draws, and reports
//! percentiles, a percentile table against the deterministic base, and
//! a per-risk variance-contribution ranking.

pub mod distributions;
pub mod error;
pub mod models;
pub mod monte_carlo;
pub mod reporting;
pub mod sensitivity;
pub mod simulation;
pub mod statistics;

pub use distributions::{inverse_normal_cdf, sample, RiskSampler, Sampler};
pub use error::SimulationError;
pub use models::{
    DistributionModel, MonteCarloResult, PercentileTableRow, RiskInput, SensitivityItem,
    SimulationConfig, ValidRisk,
};
pub use monte_carlo::{run, run_monte_carlo_simulation, run_with_progress, run_with_rng};
pub use statistics::HistogramBin;
