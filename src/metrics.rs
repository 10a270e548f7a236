// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Coalition Ethics Lab - Ensemble Metrics
//
// Reductions over completed runs. Robustness is derived from the spread of
// the binary final-success outcome only; ATCF spread does not enter it.

use serde::Serialize;

use crate::types::{Agent, EnsembleResult, EnsembleSummary, RunResult, TimePoint};

// ─── Time Series ─────────────────────────────────────────────────────────────

/// Cross-run averages at each of the first `num_steps` time indices.
pub fn time_series(runs: &[RunResult], num_steps: usize) -> Vec<TimePoint> {
    (0..num_steps)
        .map(|t| {
            let mut successes = 0usize;
            let mut atcf_sum = 0.0;
            let mut contributions = 0usize;
            for step in runs.iter().filter_map(|r| r.steps.get(t)) {
                if step.success {
                    successes += 1;
                }
                atcf_sum += step.avg_atcf;
                contributions += 1;
            }
            let n = contributions.max(1) as f64;
            TimePoint {
                time: t as u32 + 1,
                avg_success_pct: successes as f64 / n * 100.0,
                avg_atcf: atcf_sum / n,
            }
        })
        .collect()
}

// ─── Summary ─────────────────────────────────────────────────────────────────

pub fn summarize(runs: &[RunResult]) -> EnsembleSummary {
    if runs.is_empty() {
        return EnsembleSummary {
            avg_success_rate_pct: 0.0,
            avg_final_atcf: 0.0,
            min_final_atcf: 0.0,
            robustness_pct: 0.0,
        };
    }

    let n = runs.len() as f64;
    let successes = runs.iter().filter(|r| r.final_success).count();
    let avg_success_rate_pct = successes as f64 / n * 100.0;
    let avg_final_atcf = runs.iter().map(|r| r.final_atcf).sum::<f64>() / n;
    let min_final_atcf = runs
        .iter()
        .map(|r| r.final_atcf)
        .fold(f64::INFINITY, f64::min);

    EnsembleSummary {
        avg_success_rate_pct,
        avg_final_atcf,
        min_final_atcf,
        robustness_pct: robustness(runs, avg_success_rate_pct),
    }
}

/// `max(0, 100 - sd)` where sd is the population standard deviation of the
/// per-run outcome scored 100 (success) or 0 (failure).
pub fn robustness(runs: &[RunResult], avg_success_rate_pct: f64) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    let variance = runs
        .iter()
        .map(|r| {
            let score = if r.final_success { 100.0 } else { 0.0 };
            (score - avg_success_rate_pct).powi(2)
        })
        .sum::<f64>()
        / runs.len() as f64;
    (100.0 - variance.sqrt()).max(0.0)
}

// ─── Group Breakdown ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAtcf {
    pub group: String,
    pub atcf: f64,
}

/// ATCF spread over a set of agents plus the mean per group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMetrics {
    pub avg_atcf: f64,
    pub min_atcf: f64,
    pub max_atcf: f64,
    /// One entry per `group_name`, in order of first appearance.
    pub atcf_by_group: Vec<GroupAtcf>,
}

pub fn group_metrics(agents: &[Agent]) -> GroupMetrics {
    let mut totals: Vec<(String, f64, usize)> = Vec::new();
    let mut sum = 0.0;
    let mut min_atcf = f64::INFINITY;
    let mut max_atcf = f64::NEG_INFINITY;

    for agent in agents {
        let atcf = agent.current_atcf;
        sum += atcf;
        min_atcf = min_atcf.min(atcf);
        max_atcf = max_atcf.max(atcf);

        match totals.iter_mut().find(|(g, _, _)| *g == agent.group_name) {
            Some((_, total, count)) => {
                *total += atcf;
                *count += 1;
            }
            None => totals.push((agent.group_name.clone(), atcf, 1)),
        }
    }

    if agents.is_empty() {
        return GroupMetrics {
            avg_atcf: 0.0,
            min_atcf: 0.0,
            max_atcf: 0.0,
            atcf_by_group: Vec::new(),
        };
    }

    GroupMetrics {
        avg_atcf: sum / agents.len() as f64,
        min_atcf,
        max_atcf,
        atcf_by_group: totals
            .into_iter()
            .map(|(group, total, count)| GroupAtcf {
                group,
                atcf: total / count as f64,
            })
            .collect(),
    }
}

/// Group breakdown at the final step of zero-based run `run_index`.
pub fn group_breakdown(result: &EnsembleResult, run_index: usize) -> Option<GroupMetrics> {
    result
        .runs
        .get(run_index)
        .map(|run| group_metrics(&run.final_agents))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StepSummary;

    fn run(number: u32, outcomes: &[(bool, f64)]) -> RunResult {
        let steps: Vec<StepSummary> = outcomes
            .iter()
            .enumerate()
            .map(|(i, &(success, atcf))| StepSummary {
                step: i as u32 + 1,
                success,
                success_probability: 0.5,
                avg_atcf: atcf,
                min_atcf: atcf,
            })
            .collect();
        let &(final_success, final_atcf) = outcomes.last().unwrap();
        RunResult {
            run_number: number,
            steps,
            final_success,
            final_atcf,
            final_agents: Vec::new(),
        }
    }

    fn agent_at(id: u32, group: &str, atcf: f64) -> Agent {
        let mut agent = Agent::new(id, group, 0.8);
        agent.current_atcf = atcf;
        agent
    }

    #[test]
    fn test_time_series_averages_each_index() {
        let runs = vec![
            run(1, &[(true, 0.8), (false, 0.6)]),
            run(2, &[(false, 0.6), (false, 0.4)]),
        ];
        let series = time_series(&runs, 2);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].time, 1);
        assert!((series[0].avg_success_pct - 50.0).abs() < 1e-12);
        assert!((series[0].avg_atcf - 0.7).abs() < 1e-12);
        assert_eq!(series[1].avg_success_pct, 0.0);
        assert!((series[1].avg_atcf - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_summary_uses_final_step_only() {
        let runs = vec![
            run(1, &[(false, 0.9), (true, 0.7)]),
            run(2, &[(true, 0.9), (false, 0.5)]),
            run(3, &[(true, 0.9), (true, 0.6)]),
            run(4, &[(true, 0.9), (true, 0.8)]),
        ];
        let summary = summarize(&runs);
        assert_eq!(summary.avg_success_rate_pct, 75.0);
        assert!((summary.avg_final_atcf - 0.65).abs() < 1e-12);
        assert_eq!(summary.min_final_atcf, 0.5);
        // Scores 100,0,100,100 around 75: variance 1875, sd ~43.30
        assert!((summary.robustness_pct - (100.0 - 1875f64.sqrt())).abs() < 1e-9);
    }

    #[test]
    fn test_unanimous_outcomes_are_fully_robust() {
        let wins = vec![run(1, &[(true, 0.7)]), run(2, &[(true, 0.7)])];
        assert_eq!(summarize(&wins).robustness_pct, 100.0);
        let losses = vec![run(1, &[(false, 0.7)]), run(2, &[(false, 0.7)])];
        assert_eq!(summarize(&losses).robustness_pct, 100.0);
    }

    #[test]
    fn test_even_split_is_half_robust() {
        let runs = vec![run(1, &[(true, 0.7)]), run(2, &[(false, 0.7)])];
        assert!((summarize(&runs).robustness_pct - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_group_metrics_in_first_appearance_order() {
        let agents = vec![
            agent_at(1, "Scientists", 0.8),
            agent_at(2, "Rural_Women", 0.5),
            agent_at(3, "Scientists", 0.6),
        ];
        let metrics = group_metrics(&agents);
        assert!((metrics.avg_atcf - 19.0 / 30.0).abs() < 1e-12);
        assert_eq!(metrics.min_atcf, 0.5);
        assert_eq!(metrics.max_atcf, 0.8);
        let groups: Vec<&str> = metrics.atcf_by_group.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(groups, vec!["Scientists", "Rural_Women"]);
        assert!((metrics.atcf_by_group[0].atcf - 0.7).abs() < 1e-12);
        assert_eq!(metrics.atcf_by_group[1].atcf, 0.5);
    }

    #[test]
    fn test_group_breakdown_out_of_range_run() {
        let result = EnsembleResult {
            runs: vec![run(1, &[(true, 0.7)])],
            time_series: Vec::new(),
            summary: summarize(&[]),
        };
        assert!(group_breakdown(&result, 0).is_some());
        assert!(group_breakdown(&result, 1).is_none());
    }
}
