/// Reporting and output formatting module
/// Handles all console output for a simulated risk portfolio

use crate::models::{MonteCarloResult, RiskInput};

const BAR_WIDTH: usize = 40;

/// Display the portfolio being simulated
pub fn display_portfolio(risks: &[RiskInput]) {
    println!("Risk register ({} items):", risks.len());
    for risk in risks {
        match risk.validate() {
            Some(valid) => println!(
                "  {:<8} {:<32} P10={:>12.0} P50={:>12.0} P90={:>12.0} p={:>5.1}% {}",
                valid.id,
                valid.title,
                valid.p10,
                valid.p50,
                valid.p90,
                valid.probability,
                valid.model.name()
            ),
            None => println!("  {:<8} {:<32} (incomplete, excluded)", risk.id, risk.title),
        }
    }
    println!();
}

/// Display the headline statistics of a run
pub fn display_summary(result: &MonteCarloResult) {
    println!("╔══════════════════════════════════════════════════════════════════════════════╗");
    println!("║                      MONTE CARLO RISK EXPOSURE SUMMARY                       ║");
    println!("╚══════════════════════════════════════════════════════════════════════════════╝\n");

    println!(
        "Iterations: {} | Valid risks: {}",
        result.iterations, result.valid_risk_count
    );
    println!("Deterministic base (sum of P50): ${:.2}\n", result.base);
    println!(
        "Expected Exposure: ${:.2} ± ${:.2} (std dev)",
        result.mean, result.std_dev
    );
    println!("  Minimum:          ${:.2}", result.min);
    println!("  10th Percentile:  ${:.2}", result.p10);
    println!("  Median (50th):    ${:.2}", result.p50);
    println!("  90th Percentile:  ${:.2}", result.p90);
    println!("  Maximum:          ${:.2}", result.max);
    println!(
        "\nP{:.0} target: ${:.2} (contingency over base: ${:.2})\n",
        result.target_percentile,
        result.target_value,
        result.contingency()
    );
}

/// Display the percentile breakdown table
pub fn display_percentile_table(result: &MonteCarloResult) {
    println!("Percentile     Value              vs Base");
    for row in &result.percentile_table {
        println!(
            "  P{:<10.0} ${:>16.2}  {:>+16.2}",
            row.percentile, row.value, row.variance_from_base
        );
    }
    println!();
}

/// Display risks ranked by variance contribution as horizontal bars
pub fn display_sensitivity(result: &MonteCarloResult) {
    println!("Sensitivity (variance contribution):");
    for (rank, item) in result.sensitivity_analysis.iter().enumerate() {
        let filled = (item.variance_contribution * BAR_WIDTH as f64).round() as usize;
        println!(
            "{:>3}. {:<32} {:<width$} {:>6.1}%  r={:+.3}",
            rank + 1,
            item.risk_title,
            "█".repeat(filled.min(BAR_WIDTH)),
            item.variance_contribution * 100.0,
            item.correlation,
            width = BAR_WIDTH
        );
    }
    println!();
}

/// Display the outcome distribution as a text histogram
pub fn display_histogram(result: &MonteCarloResult, bins: usize) {
    let histogram = result.histogram(bins);
    let peak = histogram.iter().map(|b| b.count).max().unwrap_or(0);
    if peak == 0 {
        return;
    }
    println!("Outcome distribution:");
    for bin in &histogram {
        let filled = bin.count * BAR_WIDTH / peak;
        println!(
            "  [{:>14.0}, {:>14.0}] {:<width$} {}",
            bin.lower,
            bin.upper,
            "▇".repeat(filled),
            bin.count,
            width = BAR_WIDTH
        );
    }
    println!();
}

/// Display simulation progress
pub fn display_progress(completed: usize, total: usize) {
    print!("\r  Simulating... {}/{}", completed, total);
    if completed == total {
        println!();
    }
    let _ = std::io::Write::flush(&mut std::io::stdout());
}
