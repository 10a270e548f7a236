// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Coalition Ethics Lab - Ensemble Runner
//
// N independent runs of a scenario, each seeded with base_seed + run index,
// reduced to per-time averages and summary statistics. Runs share no mutable
// state, so the `parallel` feature can hand them to rayon without changing
// any result.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{EnsembleConfig, ModelParams};
use crate::error::{validate_dimensions, validate_parameters, validate_scenario, EngineError};
use crate::metrics;
use crate::simulation::{ScenarioState, StepSimulator};
use crate::types::{EnsembleResult, RunResult, Scenario, StepSummary};

// ─── Cancellation ────────────────────────────────────────────────────────────

/// Shared flag checked before each run starts.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ─── Seeding ─────────────────────────────────────────────────────────────────

/// Seed for zero-based run `run` of an ensemble started from `base_seed`.
pub fn seed_for_run(base_seed: u64, run: usize) -> u64 {
    base_seed.wrapping_add(run as u64)
}

// ─── EnsembleRunner ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct EnsembleRunner {
    simulator: StepSimulator,
    config: EnsembleConfig,
    cancel: Option<CancelToken>,
}

impl EnsembleRunner {
    pub fn new(params: ModelParams, config: EnsembleConfig) -> Self {
        Self {
            simulator: StepSimulator::new(params),
            config,
            cancel: None,
        }
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    /// Run the ensemble with one ChaCha8 generator per run.
    pub fn run(&self, scenario: &Scenario) -> Result<EnsembleResult, EngineError> {
        let base_seed = self.config.base_seed;
        self.run_with_rng(scenario, |run| {
            ChaCha8Rng::seed_from_u64(seed_for_run(base_seed, run))
        })
    }

    /// Run the ensemble drawing run `k` from `make_rng(k)`.
    ///
    /// All inputs are validated before the first run; an invalid scenario never
    /// yields a partial ensemble.
    pub fn run_with_rng<F, R>(
        &self,
        scenario: &Scenario,
        make_rng: F,
    ) -> Result<EnsembleResult, EngineError>
    where
        F: Fn(usize) -> R + Sync,
        R: Rng,
    {
        let EnsembleConfig { num_runs, num_steps, base_seed } = self.config;
        validate_dimensions(num_runs, num_steps)?;
        validate_parameters(scenario.protocol_complexity, scenario.tolerance)?;
        validate_scenario(scenario)?;

        tracing::debug!(
            num_runs,
            num_steps,
            base_seed,
            agents = scenario.agents.len(),
            i = scenario.protocol_complexity,
            epsilon = scenario.tolerance,
            "starting ensemble"
        );

        let completed = AtomicUsize::new(0);
        let trial = |run: usize| -> Result<RunResult, EngineError> {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                let completed = completed.load(Ordering::SeqCst);
                tracing::info!(completed, "ensemble cancelled");
                return Err(EngineError::Cancelled { completed });
            }
            let mut rng = make_rng(run);
            let result = self.run_trial(scenario, run, num_steps, &mut rng);
            completed.fetch_add(1, Ordering::SeqCst);
            Ok(result)
        };

        #[cfg(feature = "parallel")]
        let runs = {
            use rayon::prelude::*;
            (0..num_runs)
                .into_par_iter()
                .map(trial)
                .collect::<Result<Vec<_>, _>>()?
        };
        #[cfg(not(feature = "parallel"))]
        let runs = (0..num_runs).map(trial).collect::<Result<Vec<_>, _>>()?;

        let time_series = metrics::time_series(&runs, num_steps);
        let summary = metrics::summarize(&runs);

        tracing::debug!(
            success_pct = summary.avg_success_rate_pct,
            final_atcf = summary.avg_final_atcf,
            robustness = summary.robustness_pct,
            "ensemble complete"
        );

        Ok(EnsembleResult { runs, time_series, summary })
    }

    /// One independent run of `num_steps` steps from a fresh copy of the agents.
    fn run_trial<R: Rng>(
        &self,
        scenario: &Scenario,
        run: usize,
        num_steps: usize,
        rng: &mut R,
    ) -> RunResult {
        let i = scenario.protocol_complexity;
        let epsilon = scenario.tolerance;

        let mut state = ScenarioState::start(&scenario.agents);
        let mut steps = Vec::with_capacity(num_steps);
        for _ in 0..num_steps {
            let result = self.simulator.step(&state, i, epsilon, rng);
            steps.push(StepSummary {
                step: result.time_step,
                success: result.success,
                success_probability: result.success_probability,
                avg_atcf: result.avg_atcf,
                min_atcf: result.min_atcf,
            });
            state = ScenarioState::after(result);
        }

        // num_steps >= 1 is validated before any run starts.
        let (final_success, final_atcf) = steps
            .last()
            .map(|s| (s.success, s.avg_atcf))
            .unwrap_or((false, 0.0));

        tracing::trace!(run = run + 1, final_success, final_atcf, "run complete");

        RunResult {
            run_number: run as u32 + 1,
            steps,
            final_success,
            final_atcf,
            final_agents: state.agents,
        }
    }
}

/// Run `scenario` with default model coefficients and base seed 0.
pub fn run_ensemble(
    scenario: &Scenario,
    num_runs: usize,
    num_steps: usize,
) -> Result<EnsembleResult, EngineError> {
    let config = EnsembleConfig {
        num_runs,
        num_steps,
        ..EnsembleConfig::default()
    };
    EnsembleRunner::new(ModelParams::default(), config).run(scenario)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Agent;
    use rand::rngs::mock::StepRng;

    fn scenario() -> Scenario {
        let agents = vec![
            Agent::new(1, "Catholic_Diplomats", 0.72)
                .with_capability("diplomacy", 0.7)
                .with_belief("natural_law", 0.85),
            Agent::new(2, "Protestant_Diplomats", 0.75)
                .with_capability("conscience", 0.6)
                .with_belief("scripture_alone", 0.92),
        ];
        Scenario::new("Establish peace treaty principles", agents, 0.2, 0.3)
    }

    fn runner(num_runs: usize, num_steps: usize) -> EnsembleRunner {
        EnsembleRunner::new(
            ModelParams::default(),
            EnsembleConfig { num_runs, num_steps, base_seed: 7 },
        )
    }

    #[test]
    fn test_shape_matches_dimensions() {
        let result = runner(6, 4).run(&scenario()).unwrap();
        assert_eq!(result.runs.len(), 6);
        assert_eq!(result.time_series.len(), 4);
        for (k, run) in result.runs.iter().enumerate() {
            assert_eq!(run.run_number, k as u32 + 1);
            assert_eq!(run.steps.len(), 4);
            let steps: Vec<u32> = run.steps.iter().map(|s| s.step).collect();
            assert_eq!(steps, vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_final_values_come_from_last_step() {
        let result = runner(5, 3).run(&scenario()).unwrap();
        for run in &result.runs {
            let last = run.steps.last().unwrap();
            assert_eq!(run.final_success, last.success);
            assert_eq!(run.final_atcf, last.avg_atcf);
        }
    }

    #[test]
    fn test_runs_do_not_share_fatigue() {
        let result = runner(3, 5).run(&scenario()).unwrap();
        let first_atcf: Vec<f64> = result.runs.iter().map(|r| r.steps[0].avg_atcf).collect();
        assert!(first_atcf.iter().all(|a| *a == first_atcf[0]));
    }

    #[test]
    fn test_injected_generator_controls_outcomes() {
        let all_success = runner(4, 2)
            .run_with_rng(&scenario(), |_| StepRng::new(0, 0))
            .unwrap();
        assert_eq!(all_success.summary.avg_success_rate_pct, 100.0);
        assert_eq!(all_success.summary.robustness_pct, 100.0);

        let all_fail = runner(4, 2)
            .run_with_rng(&scenario(), |_| StepRng::new(u64::MAX, 0))
            .unwrap();
        assert_eq!(all_fail.summary.avg_success_rate_pct, 0.0);
        assert!(all_fail.time_series.iter().all(|t| t.avg_success_pct == 0.0));
    }

    #[test]
    fn test_original_scenario_not_mutated() {
        let scenario = scenario();
        let before = scenario.clone();
        runner(3, 10).run(&scenario).unwrap();
        assert_eq!(scenario, before);
    }

    #[test]
    fn test_validation_precedes_runs() {
        let mut bad = scenario();
        bad.agents.clear();
        assert!(matches!(
            runner(3, 3).run(&bad),
            Err(EngineError::InvalidScenario { .. })
        ));

        let out_of_range = scenario().with_parameters(1.5, 0.3);
        assert!(matches!(
            runner(3, 3).run(&out_of_range),
            Err(EngineError::InvalidParameter { name: "protocol_complexity", .. })
        ));

        assert!(matches!(
            runner(0, 3).run(&scenario()),
            Err(EngineError::InvalidParameter { name: "num_runs", .. })
        ));
        assert!(matches!(
            runner(3, 0).run(&scenario()),
            Err(EngineError::InvalidParameter { name: "num_steps", .. })
        ));
    }

    #[test]
    fn test_cancelled_token_stops_ensemble() {
        let token = CancelToken::new();
        token.cancel();
        let result = runner(10, 3).with_cancel_token(token).run(&scenario());
        assert_eq!(result, Err(EngineError::Cancelled { completed: 0 }));
    }

    // Rayon may already be running later trials when the token trips, so the
    // exact count only holds on the sequential path.
    #[cfg(not(feature = "parallel"))]
    #[test]
    fn test_token_tripped_between_runs_reports_completed() {
        let token = CancelToken::new();
        let trip = token.clone();
        let result = runner(10, 3)
            .with_cancel_token(token)
            .run_with_rng(&scenario(), |run| {
                if run == 3 {
                    trip.cancel();
                }
                StepRng::new(0, 0)
            });
        assert_eq!(result, Err(EngineError::Cancelled { completed: 4 }));
    }

    #[test]
    fn test_ensemble_matches_trials_run_one_by_one() {
        let runner = runner(64, 7);
        let scenario = scenario();
        let runs: Vec<RunResult> = (0..64)
            .map(|run| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed_for_run(7, run));
                runner.run_trial(&scenario, run, 7, &mut rng)
            })
            .collect();
        let expected = EnsembleResult {
            time_series: metrics::time_series(&runs, 7),
            summary: metrics::summarize(&runs),
            runs,
        };

        let result = runner.run(&scenario).unwrap();
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            serde_json::to_string(&expected).unwrap()
        );
    }

    #[test]
    fn test_seed_for_run_wraps() {
        assert_eq!(seed_for_run(10, 3), 13);
        assert_eq!(seed_for_run(u64::MAX, 1), 0);
    }
}
