// Lab Report Types — structured JSON output of a CLI run or sweep

use coalition_engine::metrics::GroupMetrics;
use coalition_engine::{EnsembleSummary, Insight, RunResult, TimePoint};
use serde::Serialize;

use crate::sweep::SweepCell;

// ─── Per-Run Spread ─────────────────────────────────────────────────────────

const Z_95: f64 = 1.96;

/// Spread of one per-run quantity (final ATCF, last-step success probability)
/// across the trials of an ensemble, with a normal 95% interval on the mean.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub mean: f64,
    /// Sample standard deviation; 0 for fewer than two runs.
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let Some((&first, rest)) = samples.split_first() else {
            return Self::default();
        };
        let n = samples.len();
        let (min, max) = rest
            .iter()
            .fold((first, first), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        let mean = samples.iter().sum::<f64>() / n as f64;
        let std_dev = match n {
            1 => 0.0,
            _ => (samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt(),
        };
        let half_width = Z_95 * std_dev / (n as f64).sqrt();
        Self {
            mean,
            std_dev,
            ci_lower: mean - half_width,
            ci_upper: mean + half_width,
            min,
            max,
            n,
        }
    }

    pub fn final_atcf(runs: &[RunResult]) -> Self {
        Self::from_samples(&runs.iter().map(|r| r.final_atcf).collect::<Vec<_>>())
    }

    /// Spread of the per-run success probability at the last step.
    pub fn final_success_probability(runs: &[RunResult]) -> Self {
        Self::from_samples(
            &runs
                .iter()
                .filter_map(|r| r.steps.last().map(|s| s.success_probability))
                .collect::<Vec<_>>(),
        )
    }
}

// ─── Run Report ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ScenarioInfo {
    pub label: String,
    pub task: String,
    pub agents: usize,
    pub protocol_complexity: f64,
    pub tolerance: f64,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub scenario: ScenarioInfo,
    pub n_runs: usize,
    pub n_steps: usize,
    pub base_seed: u64,
    pub summary: EnsembleSummary,
    pub final_atcf: Stats,
    pub final_success_probability: Stats,
    pub group_metrics: Option<GroupMetrics>,
    pub insights: Vec<Insight>,
    pub time_series: Vec<TimePoint>,
}

// ─── Sweep Report ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SweepReport {
    pub timestamp: String,
    pub version: &'static str,
    pub scenario: ScenarioInfo,
    pub grid: usize,
    pub n_runs: usize,
    pub n_steps: usize,
    pub base_seed: u64,
    pub cells: Vec<SweepCell>,
}
