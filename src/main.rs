use std::env;
use std::fs;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use risk_monte_carlo::reporting::{
    display_histogram, display_percentile_table, display_portfolio, display_progress,
    display_sensitivity, display_summary,
};
use risk_monte_carlo::{run_with_progress, DistributionModel, RiskInput, SimulationConfig};

/// Register file layout: `{ "config": {...}, "risks": [...] }`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RegisterFile {
    config: SimulationConfig,
    risks: Vec<RiskInput>,
}

fn demo_register() -> RegisterFile {
    let mut pending_quote = RiskInput::new(
        "R-006",
        "Crane hire rate (awaiting quote)",
        15_000.0,
        22_000.0,
        30_000.0,
        50.0,
        DistributionModel::Triangular,
    );
    // Still being estimated, excluded from the run
    pending_quote.pessimistic_p90 = None;

    RegisterFile {
        config: SimulationConfig::default().seeded(2024),
        risks: vec![
            RiskInput::new("R-001", "Ground conditions", 80_000.0, 100_000.0, 140_000.0, 60.0, DistributionModel::Pert),
            RiskInput::new("R-002", "Steel price escalation", 120_000.0, 180_000.0, 300_000.0, 45.0, DistributionModel::Lognormal),
            RiskInput::new("R-003", "Design change orders", 40_000.0, 65_000.0, 120_000.0, 70.0, DistributionModel::Weibull),
            RiskInput::new("R-004", "Weather delay", 10_000.0, 35_000.0, 60_000.0, 80.0, DistributionModel::Normal),
            RiskInput::new("O-005", "Value engineering saving", -90_000.0, -50_000.0, -20_000.0, 40.0, DistributionModel::Triangular),
            pending_quote,
            RiskInput::new("R-007", "Permit fees", 5_000.0, 8_000.0, 12_000.0, 100.0, DistributionModel::Uniform),
        ],
    }
}

fn load_register(path: &str) -> Result<RegisterFile> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading risk register {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing risk register {}", path))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let register = match env::args().nth(1) {
        Some(path) => load_register(&path)?,
        None => demo_register(),
    };

    display_portfolio(&register.risks);

    let mut rng = register.config.rng();
    let result = run_with_progress(&register.risks, &register.config, &mut rng, display_progress)
        .context("running monte carlo simulation")?;

    display_summary(&result);
    display_percentile_table(&result);
    display_sensitivity(&result);
    display_histogram(&result, 20);

    Ok(())
}
