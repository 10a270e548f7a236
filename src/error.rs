// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Coalition Ethics Lab - Errors and Input Validation

use crate::types::{Scenario, ATCF_CEILING, ATCF_FLOOR};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by the ensemble engine. All input errors are raised before
/// the first trial runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid scenario: {reason}")]
    InvalidScenario { reason: String },
    #[error("invalid parameter {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("ensemble cancelled after {completed} completed runs")]
    Cancelled { completed: usize },
}

impl EngineError {
    fn scenario(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!(%reason, "scenario rejected");
        EngineError::InvalidScenario { reason }
    }

    fn parameter(name: &'static str, value: f64) -> Self {
        tracing::warn!(param = name, value, "parameter rejected");
        EngineError::InvalidParameter { name, value }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn in_unit_range(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

/// Check the population and its per-agent values.
///
/// Agents without beliefs are accepted (diversity falls back to 0.5 for their
/// pairs); agents without capabilities are not, since their mean level is undefined.
pub fn validate_scenario(scenario: &Scenario) -> Result<(), EngineError> {
    if scenario.agents.is_empty() {
        return Err(EngineError::scenario("scenario has no agents"));
    }

    for agent in &scenario.agents {
        if agent.capabilities.is_empty() {
            return Err(EngineError::scenario(format!(
                "agent {} ({}) has no capabilities",
                agent.id, agent.group_name
            )));
        }
        if let Some(cap) = agent.capabilities.iter().find(|c| !in_unit_range(c.level)) {
            return Err(EngineError::scenario(format!(
                "agent {} capability '{}' level {} outside [0, 1]",
                agent.id, cap.name, cap.level
            )));
        }
        if let Some(belief) = agent.beliefs.iter().find(|b| !in_unit_range(b.strength)) {
            return Err(EngineError::scenario(format!(
                "agent {} belief '{}' strength {} outside [0, 1]",
                agent.id, belief.name, belief.strength
            )));
        }
        let atcf = agent.initial_atcf;
        if !atcf.is_finite() || !(ATCF_FLOOR..=ATCF_CEILING).contains(&atcf) {
            return Err(EngineError::scenario(format!(
                "agent {} initial ATCF {} outside [{}, {}]",
                agent.id, atcf, ATCF_FLOOR, ATCF_CEILING
            )));
        }
        if let Some(resilience) = agent.resilience {
            if !in_unit_range(resilience) {
                return Err(EngineError::scenario(format!(
                    "agent {} resilience {} outside [0, 1]",
                    agent.id, resilience
                )));
            }
        }
    }

    Ok(())
}

/// Check I and epsilon.
pub fn validate_parameters(protocol_complexity: f64, tolerance: f64) -> Result<(), EngineError> {
    if !in_unit_range(protocol_complexity) {
        return Err(EngineError::parameter("protocol_complexity", protocol_complexity));
    }
    if !in_unit_range(tolerance) {
        return Err(EngineError::parameter("tolerance", tolerance));
    }
    Ok(())
}

/// Check the ensemble dimensions.
pub fn validate_dimensions(num_runs: usize, num_steps: usize) -> Result<(), EngineError> {
    if num_runs < 1 {
        return Err(EngineError::parameter("num_runs", num_runs as f64));
    }
    if num_steps < 1 {
        return Err(EngineError::parameter("num_steps", num_steps as f64));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Agent;

    fn agent(id: u32) -> Agent {
        Agent::new(id, "Group", 0.7)
            .with_capability("organizing", 0.6)
            .with_belief("care", 0.9)
    }

    #[test]
    fn test_empty_scenario_rejected() {
        let scenario = Scenario::new("t", vec![], 0.2, 0.3);
        assert!(matches!(
            validate_scenario(&scenario),
            Err(EngineError::InvalidScenario { .. })
        ));
    }

    #[test]
    fn test_agent_without_capabilities_rejected() {
        let scenario = Scenario::new("t", vec![agent(1), Agent::new(2, "Idle", 0.7)], 0.2, 0.3);
        let err = validate_scenario(&scenario).unwrap_err();
        assert!(err.to_string().contains("no capabilities"));
    }

    #[test]
    fn test_agent_without_beliefs_accepted() {
        let silent = Agent::new(2, "Silent", 0.7).with_capability("listening", 0.5);
        let scenario = Scenario::new("t", vec![agent(1), silent], 0.2, 0.3);
        assert!(validate_scenario(&scenario).is_ok());
    }

    #[test]
    fn test_out_of_range_agent_values_rejected() {
        let bad_level = Agent::new(1, "G", 0.7).with_capability("x", 1.5);
        let bad_atcf = Agent::new(2, "G", 0.05).with_capability("x", 0.5);
        let bad_resilience = agent(3).with_resilience(f64::NAN);
        for a in [bad_level, bad_atcf, bad_resilience] {
            let scenario = Scenario::new("t", vec![a], 0.2, 0.3);
            assert!(validate_scenario(&scenario).is_err());
        }
    }

    #[test]
    fn test_parameters() {
        assert!(validate_parameters(0.0, 1.0).is_ok());
        assert_eq!(
            validate_parameters(1.2, 0.3),
            Err(EngineError::InvalidParameter { name: "protocol_complexity", value: 1.2 })
        );
        assert!(validate_parameters(0.3, -0.1).is_err());
        assert!(validate_parameters(f64::NAN, 0.3).is_err());
    }

    #[test]
    fn test_dimensions() {
        assert!(validate_dimensions(1, 1).is_ok());
        assert!(validate_dimensions(0, 10).is_err());
        assert!(validate_dimensions(20, 0).is_err());
    }
}
