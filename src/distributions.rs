/// Distribution sampling for three-point (P10/P50/P90) estimates
///
/// Only percentiles are known for each risk, never true bounds or shape,
/// so every family below is a documented approximation fitted from the
/// three points. Parameters are resolved once per risk into a [`Sampler`]
/// and then drawn from repeatedly.

use std::f64::consts::{LN_10, LN_2, PI};

use rand::Rng;
use rand_distr::{Distribution, Triangular, Uniform, Weibull};

use crate::models::{DistributionModel, ValidRisk};

/// Ranges narrower than this collapse to the P50 value
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// Distance between the 10th and 90th standard normal quantiles (2 x 1.28)
const P10_P90_Z_SPAN: f64 = 2.56;
const TRIANGULAR_TAIL_EXTENSION: f64 = 0.30;
const PERT_TAIL_EXTENSION: f64 = 0.15;

/// Family parameters resolved from a three-point estimate
#[derive(Debug, Clone)]
pub enum Sampler {
    Constant(f64),
    Triangular(Triangular<f64>),
    Pert { min: f64, max: f64, mean: f64, std_dev: f64 },
    Normal { mean: f64, std_dev: f64 },
    Uniform(Uniform<f64>),
    /// `negate` mirrors an all-negative estimate back below zero
    LogNormal { mu: f64, sigma: f64, negate: bool },
    Weibull(Weibull<f64>),
}

impl Sampler {
    /// Fit `model` to the given percentiles, applying the fallback rules
    ///
    /// A spread too small or too large to represent collapses to P50.
    pub fn fit(p10: f64, p50: f64, p90: f64, model: DistributionModel) -> Sampler {
        let spread = (p90 - p10).abs();
        if spread < DEGENERATE_EPSILON || !spread.is_finite() {
            return Sampler::Constant(p50);
        }

        match model {
            DistributionModel::Triangular => triangular(p10, p50, p90),
            DistributionModel::Pert => pert(p10, p50, p90),
            DistributionModel::Normal => normal(p10, p50, p90),
            DistributionModel::Uniform => {
                let (low, high) = ordered(p10, p90);
                Sampler::Uniform(Uniform::new_inclusive(low, high))
            }
            DistributionModel::Lognormal => lognormal(p10, p50, p90),
            DistributionModel::Weibull => weibull(p10, p50, p90),
        }
    }

    /// The family actually drawn from, `None` for a collapsed range
    pub fn family(&self) -> Option<DistributionModel> {
        match self {
            Sampler::Constant(_) => None,
            Sampler::Triangular(_) => Some(DistributionModel::Triangular),
            Sampler::Pert { .. } => Some(DistributionModel::Pert),
            Sampler::Normal { .. } => Some(DistributionModel::Normal),
            Sampler::Uniform(_) => Some(DistributionModel::Uniform),
            Sampler::LogNormal { .. } => Some(DistributionModel::Lognormal),
            Sampler::Weibull(_) => Some(DistributionModel::Weibull),
        }
    }

    /// Draw one impact value, ignoring occurrence
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Constant(value) => *value,
            Sampler::Triangular(triangular) => triangular.sample(rng),
            Sampler::Pert { min, max, mean, std_dev } => {
                (mean + std_dev * standard_normal(rng)).clamp(*min, *max)
            }
            Sampler::Normal { mean, std_dev } => mean + std_dev * standard_normal(rng),
            Sampler::Uniform(uniform) => uniform.sample(rng),
            Sampler::LogNormal { mu, sigma, negate } => {
                let magnitude = (mu + sigma * standard_normal(rng)).exp();
                if *negate {
                    -magnitude
                } else {
                    magnitude
                }
            }
            Sampler::Weibull(weibull) => weibull.sample(rng),
        }
    }
}

/// Support extended 30% past [P10, P90] on both sides, mode clamped inside
fn triangular(p10: f64, p50: f64, p90: f64) -> Sampler {
    let (low, high) = ordered(p10, p90);
    let extension = (high - low) * TRIANGULAR_TAIL_EXTENSION;
    let min = low - extension;
    let max = high + extension;
    match Triangular::new(min, max, p50.clamp(min, max)) {
        Ok(triangular) => Sampler::Triangular(triangular),
        Err(_) => normal(p10, p50, p90),
    }
}

/// Moment-matched normal stand-in for the PERT beta, clipped to a 15% extended support
fn pert(p10: f64, p50: f64, p90: f64) -> Sampler {
    let (low, high) = ordered(p10, p90);
    let extension = (high - low) * PERT_TAIL_EXTENSION;
    let min = low - extension;
    let max = high + extension;
    // Mode is P50 as given; draws outside the support land on the clip
    Sampler::Pert {
        min,
        max,
        mean: (min + 4.0 * p50 + max) / 6.0,
        std_dev: (max - min) / 6.0,
    }
}

fn normal(p10: f64, p50: f64, p90: f64) -> Sampler {
    Sampler::Normal {
        mean: p50,
        std_dev: (p90 - p10).abs() / P10_P90_Z_SPAN,
    }
}

fn lognormal(p10: f64, p50: f64, p90: f64) -> Sampler {
    if p10 > 0.0 && p50 > 0.0 && p90 > 0.0 {
        return Sampler::LogNormal {
            mu: p50.ln(),
            sigma: (p90 / p10).ln().abs() / P10_P90_Z_SPAN,
            negate: false,
        };
    }
    if p10 < 0.0 && p50 < 0.0 && p90 < 0.0 {
        // Mirror: the pessimistic tail of -X is the optimistic tail of X
        return match lognormal(-p90, -p50, -p10) {
            Sampler::LogNormal { mu, sigma, .. } => Sampler::LogNormal {
                mu,
                sigma,
                negate: true,
            },
            other => other,
        };
    }
    normal(p10, p50, p90)
}

/// Shape from the P90/P50 ratio, scale pinned so the median lands on P50
fn weibull(p10: f64, p50: f64, p90: f64) -> Sampler {
    if p10 <= 0.0 {
        return normal(p10, p50, p90);
    }
    let ratio = p90 / p50;
    if ratio.is_nan() || ratio <= 1.0 {
        return normal(p10, p50, p90);
    }
    let shape = (LN_10 / LN_2).ln() / ratio.ln();
    if !shape.is_finite() || shape <= 0.0 {
        return normal(p10, p50, p90);
    }
    let scale = p50 / LN_2.powf(1.0 / shape);
    match Weibull::new(scale, shape) {
        Ok(weibull) if scale.is_finite() => Sampler::Weibull(weibull),
        _ => normal(p10, p50, p90),
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A risk's impact distribution gated by its occurrence probability
#[derive(Debug, Clone)]
pub struct RiskSampler {
    /// Occurrence probability as a fraction
    occurrence: f64,
    sampler: Sampler,
}

impl RiskSampler {
    pub fn new(p10: f64, p50: f64, p90: f64, model: DistributionModel, probability: f64) -> Self {
        RiskSampler {
            occurrence: probability / 100.0,
            sampler: Sampler::fit(p10, p50, p90, model),
        }
    }

    pub fn for_risk(risk: &ValidRisk) -> Self {
        RiskSampler::new(risk.p10, risk.p50, risk.p90, risk.model, risk.probability)
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }
}

impl Distribution<f64> for RiskSampler {
    /// One gate draw, then the impact draw if the risk occurred
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let gate: f64 = rng.gen();
        if gate >= self.occurrence {
            return 0.0;
        }
        self.sampler.draw(rng)
    }
}

/// Draw one realization of a risk: occurrence gate, then the family sample
pub fn sample<R: Rng + ?Sized>(
    p10: f64,
    p50: f64,
    p90: f64,
    model: DistributionModel,
    probability: f64,
    rng: &mut R,
) -> f64 {
    RiskSampler::new(p10, p50, p90, model, probability).sample(rng)
}

/// Standard normal draw via the Box-Muller transform
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>(); // (0, 1], keeps ln finite
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

const BSM_A: [f64; 4] = [2.50662823884, -18.61500062529, 41.39119773534, -25.44106049637];
const BSM_B: [f64; 4] = [-8.47351093090, 23.08336743743, -21.06224101826, 3.13082909833];
const BSM_C: [f64; 9] = [
    0.3374754822726147,
    0.9761690190917186,
    0.1607979714918209,
    0.0276438810333863,
    0.0038405729373609,
    0.0003951896511919,
    0.0000321767881768,
    0.0000002888167364,
    0.0000003960315187,
];

/// Inverse standard normal CDF (Beasley-Springer-Moro rational approximation)
///
/// Returns negative infinity for `p <= 0`, positive infinity for `p >= 1`
/// and NaN for NaN input.
pub fn inverse_normal_cdf(p: f64) -> f64 {
    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    let y = p - 0.5;
    if y.abs() < 0.42 {
        let r = y * y;
        let num = ((BSM_A[3] * r + BSM_A[2]) * r + BSM_A[1]) * r + BSM_A[0];
        let den = (((BSM_B[3] * r + BSM_B[2]) * r + BSM_B[1]) * r + BSM_B[0]) * r + 1.0;
        return y * num / den;
    }

    let tail = if y > 0.0 { 1.0 - p } else { p };
    let r = (-tail.ln()).ln();
    let x = BSM_C.iter().rev().fold(0.0, |acc, &c| acc * r + c);
    if y < 0.0 {
        -x
    } else {
        x
    }
}
