/// Statistical analysis of simulated outcome arrays
///
/// Mean uses compensated summation and variance a two-pass population
/// formula, so totals from tens of thousands of iterations stay stable.
/// Every function returns 0 for empty input rather than NaN.

use serde::{Deserialize, Serialize};

use crate::models::PercentileTableRow;

/// Percentiles reported in the breakdown table
pub const PERCENTILE_BREAKPOINTS: [f64; 13] = [
    10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 75.0, 80.0, 85.0, 90.0, 95.0, 99.0,
];

/// Neumaier compensated sum
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    kahan_sum(data) / data.len() as f64
}

/// Population variance (divides by N)
pub fn variance(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / data.len() as f64
}

/// Population standard deviation
pub fn std_dev(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Linear-interpolated percentile (`p` in 0-100) of ascending data
///
/// The rank `p/100 * (n-1)` blends its floor and ceiling neighbours by
/// the fractional part. `p` outside 0-100 is clamped.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }

    let index = (p.clamp(0.0, 100.0) / 100.0) * (n as f64 - 1.0);
    let lower = index.floor() as usize;
    let upper = (index.ceil() as usize).min(n - 1);
    let fraction = index - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Percentile breakdown against the deterministic base
pub fn percentile_table(sorted: &[f64], base: f64) -> Vec<PercentileTableRow> {
    PERCENTILE_BREAKPOINTS
        .iter()
        .map(|&p| {
            let value = percentile(sorted, p);
            PercentileTableRow {
                percentile: p,
                value,
                variance_from_base: value - base,
            }
        })
        .collect()
}

/// Pearson correlation, 0 when the lengths differ or either series is constant
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n == 0 || n != y.len() {
        return 0.0;
    }
    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    (covariance / denominator).clamp(-1.0, 1.0)
}

/// One equal-width histogram bucket, `[lower, upper)` except the last which is closed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Bucket ascending data into `bins` equal-width bins
pub fn histogram(sorted: &[f64], bins: usize) -> Vec<HistogramBin> {
    if bins == 0 || sorted.is_empty() {
        return Vec::new();
    }
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let width = (max - min) / bins as f64;
    if width <= 0.0 || !width.is_finite() {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: sorted.len(),
        }];
    }

    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();
    for &value in sorted {
        let slot = (((value - min) / width) as usize).min(bins - 1);
        result[slot].count += 1;
    }
    result
}
