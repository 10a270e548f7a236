// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Coalition Ethics Lab - Type Definitions

use serde::{Deserialize, Serialize};

/// Lower clamp for an agent's ATCF.
pub const ATCF_FLOOR: f64 = 0.1;
/// Upper clamp for an agent's ATCF.
pub const ATCF_CEILING: f64 = 1.0;
/// ATCF assumed for an agent described without one.
pub const DEFAULT_INITIAL_ATCF: f64 = 0.8;

fn default_initial_atcf() -> f64 {
    DEFAULT_INITIAL_ATCF
}

// ─── Agent ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub name: String,
    /// Competence in [0, 1].
    pub level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    pub name: String,
    /// Conviction in [0, 1].
    pub strength: f64,
}

/// One stakeholder group taking part in a coordination scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: u32,
    pub group_name: String,
    pub capabilities: Vec<Capability>,
    pub beliefs: Vec<Belief>,
    #[serde(default = "default_initial_atcf", alias = "initial_ATCF")]
    pub initial_atcf: f64,
    /// Rewritten once per simulated step; reset to `initial_atcf` at the start of every run.
    #[serde(default = "default_initial_atcf")]
    pub current_atcf: f64,
    /// Inherent resistance to identity pressure, [0, 1]. `None` uses the model default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resilience: Option<f64>,
}

impl Agent {
    pub fn new(id: u32, group_name: impl Into<String>, initial_atcf: f64) -> Self {
        Self {
            id,
            group_name: group_name.into(),
            capabilities: Vec::new(),
            beliefs: Vec::new(),
            initial_atcf,
            current_atcf: initial_atcf,
            resilience: None,
        }
    }

    pub fn with_capability(mut self, name: impl Into<String>, level: f64) -> Self {
        self.capabilities.push(Capability { name: name.into(), level });
        self
    }

    pub fn with_belief(mut self, name: impl Into<String>, strength: f64) -> Self {
        self.beliefs.push(Belief { name: name.into(), strength });
        self
    }

    pub fn with_resilience(mut self, resilience: f64) -> Self {
        self.resilience = Some(resilience);
        self
    }

    /// Mean capability level. `None` when the agent lists no capabilities.
    pub fn mean_capability(&self) -> Option<f64> {
        if self.capabilities.is_empty() {
            return None;
        }
        let total: f64 = self.capabilities.iter().map(|c| c.level).sum();
        Some(total / self.capabilities.len() as f64)
    }

    /// Copy of this agent positioned at the start of a run.
    pub fn reset(&self) -> Self {
        Self { current_atcf: self.initial_atcf, ..self.clone() }
    }
}

// ─── Scenario ────────────────────────────────────────────────────────────────

/// Read-only description of a coalition: who takes part and under which rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub task_description: String,
    pub agents: Vec<Agent>,
    /// Protocol complexity `I`, [0, 1].
    #[serde(alias = "I")]
    pub protocol_complexity: f64,
    /// Tolerance for difference `epsilon`, [0, 1].
    #[serde(alias = "epsilon")]
    pub tolerance: f64,
}

impl Scenario {
    pub fn new(
        task_description: impl Into<String>,
        agents: Vec<Agent>,
        protocol_complexity: f64,
        tolerance: f64,
    ) -> Self {
        Self {
            task_description: task_description.into(),
            agents,
            protocol_complexity,
            tolerance,
        }
    }

    /// Derived copy with overridden I / epsilon. The receiver is left untouched.
    pub fn with_parameters(&self, protocol_complexity: f64, tolerance: f64) -> Self {
        Self {
            protocol_complexity,
            tolerance,
            ..self.clone()
        }
    }
}

// ─── Step / Run / Ensemble Results ───────────────────────────────────────────

/// Outcome of advancing one scenario state by a single time unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub success: bool,
    pub success_probability: f64,
    pub agents_after: Vec<Agent>,
    pub avg_atcf: f64,
    pub min_atcf: f64,
    /// Index of the next step to compute (input index + 1).
    pub time_step: u32,
}

/// Per-step record kept inside a [`RunResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSummary {
    /// 1-based step number.
    pub step: u32,
    pub success: bool,
    pub success_probability: f64,
    pub avg_atcf: f64,
    pub min_atcf: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    /// 1-based trial number.
    pub run_number: u32,
    pub steps: Vec<StepSummary>,
    pub final_success: bool,
    pub final_atcf: f64,
    /// Agents as they stand after the last step.
    pub final_agents: Vec<Agent>,
}

/// Cross-run average at one time index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePoint {
    /// 1-based time index.
    pub time: u32,
    pub avg_success_pct: f64,
    pub avg_atcf: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleSummary {
    pub avg_success_rate_pct: f64,
    pub avg_final_atcf: f64,
    pub min_final_atcf: f64,
    pub robustness_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleResult {
    pub runs: Vec<RunResult>,
    pub time_series: Vec<TimePoint>,
    pub summary: EnsembleSummary,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_capability() {
        let agent = Agent::new(1, "Farmers", 0.7)
            .with_capability("planting", 0.4)
            .with_capability("organizing", 0.8);
        assert!((agent.mean_capability().unwrap() - 0.6).abs() < 1e-12);
        assert_eq!(Agent::new(2, "Empty", 0.7).mean_capability(), None);
    }

    #[test]
    fn test_reset_restores_initial_atcf() {
        let mut agent = Agent::new(1, "Scientists", 0.75);
        agent.current_atcf = 0.2;
        let fresh = agent.reset();
        assert_eq!(fresh.current_atcf, 0.75);
        assert_eq!(agent.current_atcf, 0.2);
    }

    #[test]
    fn test_with_parameters_leaves_original_untouched() {
        let scenario = Scenario::new("plant trees", vec![Agent::new(1, "A", 0.7)], 0.2, 0.3);
        let derived = scenario.with_parameters(0.9, 0.1);
        assert_eq!(scenario.protocol_complexity, 0.2);
        assert_eq!(scenario.tolerance, 0.3);
        assert_eq!(derived.protocol_complexity, 0.9);
        assert_eq!(derived.tolerance, 0.1);
        assert_eq!(derived.agents, scenario.agents);
    }

    #[test]
    fn test_deserialize_scenario_with_short_parameter_names() {
        let json = r#"{
            "task_description": "Pass the Factory Act",
            "agents": [{
                "id": 1,
                "group_name": "Factory_Workers",
                "capabilities": [{"name": "labor", "level": 0.6}],
                "beliefs": [{"name": "fair_treatment", "strength": 0.95}]
            }],
            "I": 0.1,
            "epsilon": 0.35
        }"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.protocol_complexity, 0.1);
        assert_eq!(scenario.tolerance, 0.35);
        assert_eq!(scenario.agents[0].initial_atcf, DEFAULT_INITIAL_ATCF);
        assert_eq!(scenario.agents[0].resilience, None);
    }

    #[test]
    fn test_deserialize_catalogue_spelling_of_initial_atcf() {
        let json = r#"{
            "id": 3,
            "group_name": "Rural_Women",
            "capabilities": [{"name": "local_knowledge", "level": 0.7}],
            "beliefs": [{"name": "family_survival", "strength": 0.95}],
            "initial_ATCF": 0.68
        }"#;
        let agent: Agent = serde_json::from_str(json).unwrap();
        assert_eq!(agent.initial_atcf, 0.68);
        assert_eq!(agent.reset().current_atcf, 0.68);
    }
}
