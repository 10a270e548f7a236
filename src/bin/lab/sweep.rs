// Parameter Sweep — ensemble summary over an evenly spaced I × epsilon grid
// Every cell reuses the same base seed, so cells differ only by parameters

use coalition_engine::{EngineError, EnsembleRunner, Scenario};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SweepCell {
    pub protocol_complexity: f64,
    pub tolerance: f64,
    pub success_rate_pct: f64,
    pub final_atcf: f64,
    pub min_final_atcf: f64,
    pub robustness_pct: f64,
}

/// `points` evenly spaced values over [0, 1], endpoints included.
pub fn axis(points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![0.5],
        n => (0..n).map(|k| k as f64 / (n - 1) as f64).collect(),
    }
}

/// Row-major over I, then epsilon.
pub fn run_sweep(
    runner: &EnsembleRunner,
    scenario: &Scenario,
    points: usize,
) -> Result<Vec<SweepCell>, EngineError> {
    let values = axis(points);
    let mut cells = Vec::with_capacity(values.len() * values.len());
    for &i in &values {
        for &epsilon in &values {
            let result = runner.run(&scenario.with_parameters(i, epsilon))?;
            tracing::debug!(i, epsilon, success = result.summary.avg_success_rate_pct, "sweep cell");
            cells.push(SweepCell {
                protocol_complexity: i,
                tolerance: epsilon,
                success_rate_pct: result.summary.avg_success_rate_pct,
                final_atcf: result.summary.avg_final_atcf,
                min_final_atcf: result.summary.min_final_atcf,
                robustness_pct: result.summary.robustness_pct,
            });
        }
    }
    Ok(cells)
}
