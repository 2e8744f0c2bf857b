use rand::rngs::StdRng;
use rand::SeedableRng;

use risk_monte_carlo::statistics::{percentile, variance};
use risk_monte_carlo::{
    run, run_monte_carlo_simulation, run_with_rng, DistributionModel, RiskInput, SimulationConfig,
    SimulationError,
};

fn seeded(iterations: usize, seed: u64) -> SimulationConfig {
    SimulationConfig::with_iterations(iterations).seeded(seed)
}

#[test]
fn single_normal_risk_matches_its_estimate() {
    let risks = vec![RiskInput::new(
        "R-1",
        "Foundation redesign",
        80_000.0,
        100_000.0,
        140_000.0,
        100.0,
        DistributionModel::Normal,
    )];
    let result = run_monte_carlo_simulation(&risks, &seeded(50_000, 2024)).unwrap();

    let expected_std_dev = (140_000.0 - 80_000.0) / 2.56;
    assert!((result.p50 - 100_000.0).abs() <= 5_000.0, "p50 {}", result.p50);
    assert!(
        (result.std_dev - expected_std_dev).abs() <= expected_std_dev * 0.10,
        "std dev {}",
        result.std_dev
    );
}

#[test]
fn single_risk_explains_all_variance() {
    for model in DistributionModel::ALL {
        let risks = vec![RiskInput::new("only", "Only risk", 10.0, 25.0, 60.0, 65.0, model)];
        let result = run_monte_carlo_simulation(&risks, &seeded(5_000, 8)).unwrap();
        let item = &result.sensitivity_analysis[0];
        assert!((item.correlation - 1.0).abs() < 1e-9, "{:?}: {}", model, item.correlation);
        assert!((item.variance_contribution - 1.0).abs() < 1e-9);
    }
}

#[test]
fn constant_single_risk_has_zero_sensitivity() {
    let risks = vec![RiskInput::new("fixed", "Fixed fee", 500.0, 500.0, 500.0, 100.0, DistributionModel::Pert)];
    let result = run(&risks, 1_000, 80.0).unwrap();
    assert!(result.distribution.iter().all(|&v| v == 500.0));
    assert_eq!(result.sensitivity_analysis[0].correlation, 0.0);
    assert_eq!(result.sensitivity_analysis[0].variance_contribution, 0.0);
}

#[test]
fn empty_or_incomplete_register_is_rejected() {
    assert_eq!(run(&[], 1_000, 80.0), Err(SimulationError::NoValidRisks));

    let mut missing_p90 = RiskInput::new("R-1", "Incomplete", 1.0, 2.0, 3.0, 50.0, DistributionModel::Normal);
    missing_p90.pessimistic_p90 = None;
    assert_eq!(
        run_monte_carlo_simulation(&[missing_p90], &SimulationConfig::default()),
        Err(SimulationError::NoValidRisks)
    );
}

#[test]
fn base_ignores_invalid_risks() {
    let mut missing_probability =
        RiskInput::new("R-3", "Unscored", 1_000.0, 9_999.0, 20_000.0, 10.0, DistributionModel::Normal);
    missing_probability.probability = None;
    let risks = vec![
        RiskInput::new("R-1", "Access road", 90_000.0, 100_000.0, 130_000.0, 50.0, DistributionModel::Triangular),
        RiskInput::new("R-2", "Tunnel lining", 200_000.0, 250_000.0, 400_000.0, 20.0, DistributionModel::Lognormal),
        missing_probability,
    ];
    let result = run_monte_carlo_simulation(&risks, &seeded(1_000, 4)).unwrap();
    assert_eq!(result.base, 350_000.0);
    for row in &result.percentile_table {
        assert_eq!(row.variance_from_base, row.value - 350_000.0);
    }
}

#[test]
fn per_risk_samples_respect_the_occurrence_gate() {
    let risks = vec![
        RiskInput::new("never", "Never happens", 100.0, 200.0, 300.0, 0.0, DistributionModel::Normal),
        RiskInput::new("always", "Always happens", 100.0, 200.0, 300.0, 100.0, DistributionModel::Uniform),
    ];
    let result = run_monte_carlo_simulation(&risks, &seeded(10_000, 12)).unwrap();
    // Only the certain uniform risk contributes, so every total is inside its bounds
    assert!(result.distribution.iter().all(|&v| (100.0..=300.0).contains(&v)));
    let never = result.sensitivity_analysis.iter().find(|i| i.risk_id == "never").unwrap();
    assert_eq!(never.variance_contribution, 0.0);
}

#[test]
fn opportunities_pull_the_distribution_down() {
    let risks = vec![
        RiskInput::new("R-1", "Overrun", 100.0, 150.0, 220.0, 100.0, DistributionModel::Pert),
        RiskInput::new("O-1", "Saving", -120.0, -80.0, -40.0, 100.0, DistributionModel::Lognormal),
    ];
    let result = run_monte_carlo_simulation(&risks, &seeded(20_000, 21)).unwrap();
    assert_eq!(result.base, 70.0);
    assert!((result.p50 - 70.0).abs() < 15.0, "p50 {}", result.p50);
    assert!(result.min < 70.0);
}

#[test]
fn target_value_tracks_target_percentile() {
    let risks = vec![RiskInput::new("R-1", "Scope growth", 10.0, 20.0, 35.0, 80.0, DistributionModel::Weibull)];
    let mut config = seeded(4_000, 30);
    config.target_percentile = 95.0;
    let result = run_monte_carlo_simulation(&risks, &config).unwrap();
    assert_eq!(result.target_percentile, 95.0);
    assert_eq!(result.target_value, percentile(&result.distribution, 95.0));
    assert!(result.target_value >= result.p90);
    assert_eq!(result.contingency(), result.target_value - result.base);
}

#[test]
fn injected_generator_reproduces_seeded_config() {
    let risks = vec![
        RiskInput::new("R-1", "A", 10.0, 20.0, 40.0, 50.0, DistributionModel::Triangular),
        RiskInput::new("R-2", "B", 5.0, 7.0, 15.0, 90.0, DistributionModel::Normal),
    ];
    let from_config = run_monte_carlo_simulation(&risks, &seeded(3_000, 55)).unwrap();
    let mut rng = StdRng::seed_from_u64(55);
    let from_rng = run_with_rng(&risks, &SimulationConfig::with_iterations(3_000), &mut rng).unwrap();
    assert_eq!(from_config.distribution, from_rng.distribution);
    assert_eq!(from_config.sensitivity_analysis, from_rng.sensitivity_analysis);
}

#[test]
fn std_dev_is_population_std_dev_of_distribution() {
    let risks = vec![RiskInput::new("R-1", "A", 1.0, 2.0, 4.0, 70.0, DistributionModel::Uniform)];
    let result = run_monte_carlo_simulation(&risks, &seeded(2_000, 3)).unwrap();
    assert!((result.std_dev - variance(&result.distribution).sqrt()).abs() < 1e-12);
}

#[test]
fn result_serializes_with_camel_case_fields() {
    let risks = vec![RiskInput::new("R-1", "A", 1.0, 2.0, 4.0, 70.0, DistributionModel::Pert)];
    let result = run_monte_carlo_simulation(&risks, &seeded(100, 3)).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert!(json.get("stdDev").is_some());
    assert!(json.get("targetValue").is_some());
    assert!(json["percentileTable"][0].get("varianceFromBase").is_some());
    assert!(json["sensitivityAnalysis"][0].get("varianceContribution").is_some());

    let parsed: RiskInput = serde_json::from_str(
        r#"{"id":"R-9","title":"Parsed","optimisticP10":1,"likelyP50":2,"pessimisticP90":3,"probability":40,"distributionModel":"weibull"}"#,
    )
    .unwrap();
    assert_eq!(parsed.distribution_model, Some(DistributionModel::Weibull));
    assert!(parsed.is_valid());
}
