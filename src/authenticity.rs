// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Coalition Ethics Lab - Authenticity (ATCF) Model
//
// ATCF tracks how much of a group's identity survives coordination pressure.
// Each step starts from the agent's carried-forward value, so fatigue compounds
// within a run and resets with the next run.

use serde::{Deserialize, Serialize};

use crate::types::{Agent, ATCF_CEILING, ATCF_FLOOR};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthenticityModel {
    /// Identity pressure per unit of protocol complexity.
    pub protocol_pressure: f64,
    /// Protection per unit of tolerance.
    pub tolerance_protection: f64,
    /// Fatigue per zero-based step index.
    pub fatigue_per_step: f64,
    pub resilience_weight: f64,
    /// Resilience used for agents that do not declare one.
    pub default_resilience: f64,
}

impl Default for AuthenticityModel {
    fn default() -> Self {
        Self {
            protocol_pressure: 0.10,
            tolerance_protection: 0.15,
            fatigue_per_step: 0.02,
            resilience_weight: 0.10,
            default_resilience: 0.7,
        }
    }
}

impl AuthenticityModel {
    /// New ATCF for `agent` at zero-based `time_step` of its run.
    pub fn atcf(&self, agent: &Agent, i: f64, epsilon: f64, time_step: u32) -> f64 {
        let resilience = agent.resilience.unwrap_or(self.default_resilience);

        let mut a = agent.current_atcf;
        a -= i * self.protocol_pressure;
        a += epsilon * self.tolerance_protection;
        a -= f64::from(time_step) * self.fatigue_per_step;
        a += (resilience - 0.5) * self.resilience_weight;
        a.clamp(ATCF_FLOOR, ATCF_CEILING)
    }
}
