/// Per-risk sensitivity of the total outcome
///
/// Contribution is a heuristic: the risk's own variance scaled by the
/// absolute correlation with the total, over the total variance. It is
/// not a Sobol decomposition and the shares need not sum to 1.

use crate::models::SensitivityItem;
use crate::simulation::SimulationRun;
use crate::statistics::{pearson_correlation, variance};

/// Rank risks by variance contribution, largest first
pub fn analyze_sensitivity(run: &SimulationRun) -> Vec<SensitivityItem> {
    let total_variance = variance(&run.totals);

    let mut items: Vec<SensitivityItem> = run
        .risks
        .iter()
        .zip(&run.risk_samples)
        .map(|(risk, samples)| {
            let risk_variance = variance(samples);
            let correlation = pearson_correlation(samples, &run.totals);
            let variance_contribution = if total_variance > 0.0 {
                (risk_variance * correlation.abs() / total_variance).clamp(0.0, 1.0)
            } else {
                0.0
            };
            SensitivityItem {
                risk_id: risk.id.clone(),
                risk_title: risk.title.clone(),
                variance_contribution,
                correlation,
            }
        })
        .collect();

    items.sort_by(|a, b| b.variance_contribution.total_cmp(&a.variance_contribution));
    items
}
