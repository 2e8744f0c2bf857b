/// Data model for the risk register snapshot, run configuration and results
/// All types serialize with camelCase field names for the dashboard layer

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::statistics::{histogram, HistogramBin};

/// Distribution family used to turn a three-point estimate into draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionModel {
    Triangular,
    Pert,
    Normal,
    Uniform,
    Lognormal,
    Weibull,
}

impl DistributionModel {
    pub const ALL: [DistributionModel; 6] = [
        DistributionModel::Triangular,
        DistributionModel::Pert,
        DistributionModel::Normal,
        DistributionModel::Uniform,
        DistributionModel::Lognormal,
        DistributionModel::Weibull,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DistributionModel::Triangular => "triangular",
            DistributionModel::Pert => "pert",
            DistributionModel::Normal => "normal",
            DistributionModel::Uniform => "uniform",
            DistributionModel::Lognormal => "lognormal",
            DistributionModel::Weibull => "weibull",
        }
    }
}

/// One risk or opportunity line item as supplied by the risk register
///
/// Any field may be missing while the item is still being edited; such
/// items are skipped by a run rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskInput {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub optimistic_p10: Option<f64>,
    #[serde(default)]
    pub likely_p50: Option<f64>,
    #[serde(default)]
    pub pessimistic_p90: Option<f64>,
    /// Occurrence probability in percent (0-100)
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default)]
    pub distribution_model: Option<DistributionModel>,
}

impl RiskInput {
    /// Build a fully populated risk
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        p10: f64,
        p50: f64,
        p90: f64,
        probability: f64,
        model: DistributionModel,
    ) -> Self {
        RiskInput {
            id: id.into(),
            title: title.into(),
            optimistic_p10: Some(p10),
            likely_p50: Some(p50),
            pessimistic_p90: Some(p90),
            probability: Some(probability),
            distribution_model: Some(model),
        }
    }

    /// Returns the resolved estimate if every required field is present and finite
    pub fn validate(&self) -> Option<ValidRisk> {
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
        Some(ValidRisk {
            id: self.id.clone(),
            title: self.title.clone(),
            p10: finite(self.optimistic_p10)?,
            p50: finite(self.likely_p50)?,
            p90: finite(self.pessimistic_p90)?,
            probability: finite(self.probability)?,
            model: self.distribution_model?,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_some()
    }
}

/// A risk that passed validation, with every field resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRisk {
    pub id: String,
    pub title: String,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
    pub probability: f64,
    pub model: DistributionModel,
}

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    pub iterations: usize,
    /// Percentile (0-100) reported as the target value, e.g. P80 for contingency
    pub target_percentile: f64,
    /// Fixed seed for reproducible runs; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Iterations between progress callbacks; 0 disables them
    pub progress_interval: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            iterations: 10_000,
            target_percentile: 80.0,
            seed: None,
            progress_interval: 1_000,
        }
    }
}

impl SimulationConfig {
    pub fn with_iterations(iterations: usize) -> Self {
        SimulationConfig {
            iterations,
            ..Default::default()
        }
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generator for this run: seeded when `seed` is set, OS entropy otherwise
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Sensitivity of the total outcome to one risk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityItem {
    pub risk_id: String,
    pub risk_title: String,
    /// Heuristic share of total variance in [0, 1]; shares need not sum to 1
    pub variance_contribution: f64,
    /// Pearson correlation with the total outcome in [-1, 1]
    pub correlation: f64,
}

/// One row of the percentile breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileTableRow {
    pub percentile: f64,
    pub value: f64,
    pub variance_from_base: f64,
}

/// Outcome of one Monte Carlo run over a risk portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonteCarloResult {
    pub p10: f64,
    pub p50: f64, // Median
    pub p90: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Deterministic sum of the likely (P50) values of the valid risks
    pub base: f64,
    pub target_percentile: f64,
    pub target_value: f64,
    pub iterations: usize,
    pub valid_risk_count: usize,
    /// Every iteration total, sorted ascending
    pub distribution: Vec<f64>,
    pub sensitivity_analysis: Vec<SensitivityItem>,
    pub percentile_table: Vec<PercentileTableRow>,
}

impl MonteCarloResult {
    /// Equal-width histogram of the simulated totals
    pub fn histogram(&self, bins: usize) -> Vec<HistogramBin> {
        histogram(&self.distribution, bins)
    }

    /// Contingency required above the deterministic base at the target percentile
    pub fn contingency(&self) -> f64 {
        self.target_value - self.base
    }
}
