// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Coalition Ethics Lab - Step Simulator

use rand::Rng;

use crate::config::ModelParams;
use crate::types::{Agent, StepResult};

// ─── ScenarioState ───────────────────────────────────────────────────────────

/// Everything a step needs to know about a run in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioState {
    pub agents: Vec<Agent>,
    /// Zero-based index of the next step.
    pub time_step: u32,
}

impl ScenarioState {
    /// Fresh state for a new run: every agent back at its initial ATCF, time 0.
    pub fn start(agents: &[Agent]) -> Self {
        Self {
            agents: agents.iter().map(Agent::reset).collect(),
            time_step: 0,
        }
    }

    /// State following `result`.
    pub fn after(result: StepResult) -> Self {
        Self {
            agents: result.agents_after,
            time_step: result.time_step,
        }
    }
}

// ─── StepSimulator ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct StepSimulator {
    pub params: ModelParams,
}

impl StepSimulator {
    pub fn new(params: ModelParams) -> Self {
        Self { params }
    }

    /// Advance `state` by one time unit.
    ///
    /// The Bernoulli draw for coordination success is the only use of `rng`.
    /// Agents are rebuilt rather than mutated, so `state` is never aliased by
    /// the result.
    pub fn step<R: Rng + ?Sized>(
        &self,
        state: &ScenarioState,
        i: f64,
        epsilon: f64,
        rng: &mut R,
    ) -> StepResult {
        let success_probability = self.params.success.probability(&state.agents, i, epsilon);
        let success = rng.gen::<f64>() < success_probability;

        let agents_after: Vec<Agent> = state
            .agents
            .iter()
            .map(|agent| Agent {
                current_atcf: self.params.authenticity.atcf(agent, i, epsilon, state.time_step),
                ..agent.clone()
            })
            .collect();

        let (avg_atcf, min_atcf) = atcf_extent(&agents_after);

        StepResult {
            success,
            success_probability,
            agents_after,
            avg_atcf,
            min_atcf,
            time_step: state.time_step + 1,
        }
    }
}

/// Mean and minimum current ATCF. Zeroes for an empty slice.
pub fn atcf_extent(agents: &[Agent]) -> (f64, f64) {
    if agents.is_empty() {
        return (0.0, 0.0);
    }
    let sum: f64 = agents.iter().map(|a| a.current_atcf).sum();
    let min = agents
        .iter()
        .map(|a| a.current_atcf)
        .fold(f64::INFINITY, f64::min);
    (sum / agents.len() as f64, min)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
