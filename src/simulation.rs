/// Iteration driver: gates and samples every valid risk once per iteration
/// and records both the per-risk draws and the iteration totals

use rand::Rng;
use rand_distr::Distribution;
use tracing::debug;

use crate::distributions::{RiskSampler, Sampler};
use crate::error::SimulationError;
use crate::models::{RiskInput, ValidRisk};

/// Raw output of the iteration loop, in iteration order
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub risks: Vec<ValidRisk>,
    /// One array per risk, aligned with `risks`
    pub risk_samples: Vec<Vec<f64>>,
    pub totals: Vec<f64>,
}

impl SimulationRun {
    pub fn iterations(&self) -> usize {
        self.totals.len()
    }
}

/// Keep only fully specified risks, failing when none remain
pub fn filter_valid_risks(risks: &[RiskInput]) -> Result<Vec<ValidRisk>, SimulationError> {
    let valid: Vec<ValidRisk> = risks
        .iter()
        .filter_map(|risk| {
            let resolved = risk.validate();
            if resolved.is_none() {
                debug!(risk_id = %risk.id, "skipping risk with incomplete estimate");
            }
            resolved
        })
        .collect();

    if valid.is_empty() {
        return Err(SimulationError::NoValidRisks);
    }
    Ok(valid)
}

/// Resolve each risk's sampler once, noting any family fallback
fn plan_samplers(risks: &[ValidRisk]) -> Vec<RiskSampler> {
    risks
        .iter()
        .map(|risk| {
            let planned = RiskSampler::for_risk(risk);
            match planned.sampler() {
                Sampler::Constant(value) => {
                    debug!(risk_id = %risk.id, value = *value, "degenerate range, risk impact is constant");
                }
                sampler if sampler.family() != Some(risk.model) => {
                    debug!(
                        risk_id = %risk.id,
                        requested = risk.model.name(),
                        "parameters invalid for requested family, sampling as normal"
                    );
                }
                _ => {}
            }
            planned
        })
        .collect()
}

/// Run `iterations` independent draws of the whole portfolio
///
/// Draw order is fixed (iterations ascending, risks in input order) so a
/// seeded generator reproduces the run exactly. `on_progress` receives
/// `(completed, total)` every `progress_interval` iterations and once at
/// the end; an interval of 0 only reports completion.
pub fn run_simulation_iterations<R, F>(
    risks: Vec<ValidRisk>,
    iterations: usize,
    progress_interval: usize,
    rng: &mut R,
    mut on_progress: F,
) -> SimulationRun
where
    R: Rng + ?Sized,
    F: FnMut(usize, usize),
{
    let samplers = plan_samplers(&risks);
    let mut risk_samples: Vec<Vec<f64>> = (0..risks.len())
        .map(|_| Vec::with_capacity(iterations))
        .collect();
    let mut totals = Vec::with_capacity(iterations);

    for iteration in 0..iterations {
        let mut total = 0.0;
        for (sampler, samples) in samplers.iter().zip(risk_samples.iter_mut()) {
            let value = sampler.sample(rng);
            samples.push(value);
            total += value;
        }
        totals.push(total);

        let completed = iteration + 1;
        if progress_interval > 0 && completed % progress_interval == 0 && completed < iterations {
            on_progress(completed, iterations);
        }
    }
    on_progress(iterations, iterations);

    SimulationRun {
        risks,
        risk_samples,
        totals,
    }
}
