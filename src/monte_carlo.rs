/// Monte Carlo simulation of a risk portfolio and assembly of its result

use rand::Rng;
use tracing::info;

use crate::error::SimulationError;
use crate::models::{MonteCarloResult, RiskInput, SimulationConfig};
use crate::sensitivity::analyze_sensitivity;
use crate::simulation::{filter_valid_risks, run_simulation_iterations, SimulationRun};
use crate::statistics::{mean, percentile, percentile_table, std_dev};

/// Run a simulation with the given iteration count and target percentile
pub fn run(
    risks: &[RiskInput],
    iterations: usize,
    target_percentile: f64,
) -> Result<MonteCarloResult, SimulationError> {
    let config = SimulationConfig {
        iterations,
        target_percentile,
        ..Default::default()
    };
    run_monte_carlo_simulation(risks, &config)
}

/// Run a simulation, seeding the generator from `config.seed` when set
pub fn run_monte_carlo_simulation(
    risks: &[RiskInput],
    config: &SimulationConfig,
) -> Result<MonteCarloResult, SimulationError> {
    let mut rng = config.rng();
    run_with_rng(risks, config, &mut rng)
}

/// Run a simulation drawing from a caller-supplied generator
pub fn run_with_rng<R: Rng + ?Sized>(
    risks: &[RiskInput],
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<MonteCarloResult, SimulationError> {
    run_with_progress(risks, config, rng, |_, _| {})
}

/// Run a simulation, reporting `(completed, total)` iterations as it goes
pub fn run_with_progress<R, F>(
    risks: &[RiskInput],
    config: &SimulationConfig,
    rng: &mut R,
    on_progress: F,
) -> Result<MonteCarloResult, SimulationError>
where
    R: Rng + ?Sized,
    F: FnMut(usize, usize),
{
    let valid = filter_valid_risks(risks)?;
    let iterations = config.iterations.max(1);
    info!(
        iterations,
        valid_risks = valid.len(),
        skipped_risks = risks.len() - valid.len(),
        "starting monte carlo simulation"
    );

    let simulation = run_simulation_iterations(valid, iterations, config.progress_interval, rng, on_progress);
    let result = assemble_result(simulation, config.target_percentile);

    info!(
        p50 = result.p50,
        p90 = result.p90,
        target_value = result.target_value,
        "monte carlo simulation complete"
    );
    Ok(result)
}

/// Compute statistics and sensitivity from a finished run
pub fn assemble_result(simulation: SimulationRun, target_percentile: f64) -> MonteCarloResult {
    let target_percentile = target_percentile.clamp(0.0, 100.0);
    let sensitivity_analysis = analyze_sensitivity(&simulation);

    let base: f64 = simulation.risks.iter().map(|r| r.p50).sum();
    let valid_risk_count = simulation.risks.len();
    let iterations = simulation.iterations();

    let mut distribution = simulation.totals;
    distribution.sort_by(|a, b| a.total_cmp(b));

    MonteCarloResult {
        p10: percentile(&distribution, 10.0),
        p50: percentile(&distribution, 50.0),
        p90: percentile(&distribution, 90.0),
        mean: mean(&distribution),
        std_dev: std_dev(&distribution),
        min: distribution.first().copied().unwrap_or(0.0),
        max: distribution.last().copied().unwrap_or(0.0),
        base,
        target_percentile,
        target_value: percentile(&distribution, target_percentile),
        iterations,
        valid_risk_count,
        percentile_table: percentile_table(&distribution, base),
        sensitivity_analysis,
        distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DistributionModel;

    fn config(iterations: usize, seed: u64) -> SimulationConfig {
        SimulationConfig::with_iterations(iterations).seeded(seed)
    }

    #[test]
    fn test_base_counts_valid_risks_only() {
        let mut no_probability = RiskInput::new("c", "Missing probability", 1.0, 2.0, 3.0, 50.0, DistributionModel::Normal);
        no_probability.probability = None;
        let risks = vec![
            RiskInput::new("a", "Ground conditions", 80_000.0, 100_000.0, 140_000.0, 60.0, DistributionModel::Pert),
            RiskInput::new("b", "Steel price", 200_000.0, 250_000.0, 320_000.0, 30.0, DistributionModel::Triangular),
            no_probability,
        ];
        let result = run_monte_carlo_simulation(&risks, &config(1_000, 1)).unwrap();
        assert_eq!(result.base, 350_000.0);
        assert_eq!(result.valid_risk_count, 2);
        assert_eq!(result.sensitivity_analysis.len(), 2);
    }

    #[test]
    fn test_distribution_sorted_and_summarized() {
        let risks = vec![RiskInput::new("a", "A", 10.0, 20.0, 40.0, 75.0, DistributionModel::Lognormal)];
        let result = run_monte_carlo_simulation(&risks, &config(5_000, 9)).unwrap();
        assert_eq!(result.distribution.len(), 5_000);
        assert!(result.distribution.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(result.min, result.distribution[0]);
        assert_eq!(result.max, result.distribution[4_999]);
        assert!(result.p10 <= result.p50 && result.p50 <= result.p90);
        assert_eq!(result.target_percentile, 80.0);
        assert_eq!(result.target_value, percentile(&result.distribution, 80.0));
    }

    #[test]
    fn test_zero_iterations_run_once() {
        let risks = vec![RiskInput::new("a", "A", 5.0, 5.0, 5.0, 100.0, DistributionModel::Uniform)];
        let result = run_monte_carlo_simulation(&risks, &config(0, 3)).unwrap();
        assert_eq!(result.iterations, 1);
        assert_eq!(result.distribution, vec![5.0]);
        assert_eq!(result.std_dev, 0.0);
    }

    #[test]
    fn test_no_valid_risks() {
        assert_eq!(run(&[], 100, 80.0), Err(SimulationError::NoValidRisks));
    }

    #[test]
    fn test_same_seed_same_result() {
        let risks = vec![
            RiskInput::new("a", "A", 10.0, 20.0, 40.0, 50.0, DistributionModel::Weibull),
            RiskInput::new("b", "B", -30.0, -10.0, -5.0, 80.0, DistributionModel::Lognormal),
        ];
        let first = run_monte_carlo_simulation(&risks, &config(2_000, 77)).unwrap();
        let second = run_monte_carlo_simulation(&risks, &config(2_000, 77)).unwrap();
        assert_eq!(first, second);
    }
}
