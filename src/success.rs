// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Coalition Ethics Lab - Coordination Success Model

use serde::{Deserialize, Serialize};

use crate::diversity::diversity;
use crate::types::Agent;

pub const SUCCESS_FLOOR: f64 = 0.05;
pub const SUCCESS_CEILING: f64 = 0.95;

/// Per-step probability that the coalition coordinates successfully.
///
/// ```text
/// p = base
///   - I * protocol_friction
///   + epsilon * tolerance_bonus
///   + (avg_capability - 0.5) * capability_weight
///   - diversity * (1 - epsilon) * diversity_penalty
/// ```
/// clamped to `[SUCCESS_FLOOR, SUCCESS_CEILING]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuccessModel {
    pub base: f64,
    pub protocol_friction: f64,
    pub tolerance_bonus: f64,
    pub capability_weight: f64,
    pub diversity_penalty: f64,
}

impl Default for SuccessModel {
    fn default() -> Self {
        Self {
            base: 0.5,
            protocol_friction: 0.15,
            tolerance_bonus: 0.30,
            capability_weight: 0.20,
            diversity_penalty: 0.15,
        }
    }
}

impl SuccessModel {
    /// Success probability for `agents` under protocol complexity `i` and tolerance `epsilon`.
    ///
    /// Every agent must carry at least one capability (see
    /// [`validate_scenario`](crate::error::validate_scenario)); release builds
    /// would otherwise score a capability-less agent as level 0.
    ///
    /// # Panics
    ///
    /// In debug builds, if any agent has no capabilities.
    pub fn probability(&self, agents: &[Agent], i: f64, epsilon: f64) -> f64 {
        debug_assert!(
            agents.iter().all(|a| !a.capabilities.is_empty()),
            "success probability needs at least one capability per agent"
        );
        let mut p = self.base;
        p -= i * self.protocol_friction;
        p += epsilon * self.tolerance_bonus;
        p += (average_capability(agents) - 0.5) * self.capability_weight;
        p -= diversity(agents) * (1.0 - epsilon) * self.diversity_penalty;
        p.clamp(SUCCESS_FLOOR, SUCCESS_CEILING)
    }
}

/// Mean over agents of each agent's own mean capability level.
pub fn average_capability(agents: &[Agent]) -> f64 {
    if agents.is_empty() {
        return 0.0;
    }
    let total: f64 = agents.iter().filter_map(Agent::mean_capability).sum();
    total / agents.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capable(id: u32, level: f64) -> Agent {
        Agent::new(id, "G", 0.7)
            .with_capability("a", level)
            .with_capability("b", level)
            .with_belief("shared", 0.9)
    }

    fn trio(level: f64) -> Vec<Agent> {
        (1..=3).map(|id| capable(id, level)).collect()
    }

    #[test]
    fn test_full_tolerance_no_friction() {
        // 0.5 - 0 + 0.30 + 0.06 - 0
        let p = SuccessModel::default().probability(&trio(0.8), 0.0, 1.0);
        assert!((p - 0.86).abs() < 1e-12);
    }

    #[test]
    fn test_full_friction_no_tolerance() {
        // 0.5 - 0.15 + 0 + 0.06 - 0
        let p = SuccessModel::default().probability(&trio(0.8), 1.0, 0.0);
        assert!((p - 0.41).abs() < 1e-12);
    }

    #[test]
    fn test_diversity_penalty_scaled_by_intolerance() {
        let agents = vec![
            Agent::new(1, "A", 0.7).with_capability("x", 0.5),
            Agent::new(2, "B", 0.7).with_capability("x", 0.5),
        ];
        // No beliefs: diversity 0.5, penalty 0.5 * 1.0 * 0.15
        let p = SuccessModel::default().probability(&agents, 0.0, 0.0);
        assert!((p - 0.425).abs() < 1e-12);
        // At epsilon = 1 the diversity penalty vanishes.
        let p = SuccessModel::default().probability(&agents, 0.0, 1.0);
        assert!((p - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_clamped_to_floor_and_ceiling() {
        let strong = SuccessModel { base: 2.0, ..SuccessModel::default() };
        assert_eq!(strong.probability(&trio(1.0), 0.0, 1.0), SUCCESS_CEILING);

        let weak = SuccessModel { base: -1.0, ..SuccessModel::default() };
        assert_eq!(weak.probability(&trio(0.0), 1.0, 0.0), SUCCESS_FLOOR);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "at least one capability per agent")]
    fn test_capability_less_agent_rejected_in_debug() {
        let agents = vec![capable(1, 0.8), Agent::new(2, "Empty", 0.7)];
        SuccessModel::default().probability(&agents, 0.0, 0.0);
    }

    #[test]
    fn test_average_capability_is_mean_of_means() {
        let agents = vec![
            Agent::new(1, "A", 0.7).with_capability("x", 1.0),
            Agent::new(2, "B", 0.7)
                .with_capability("x", 0.0)
                .with_capability("y", 0.4)
                .with_capability("z", 0.2),
        ];
        // (1.0 + 0.2) / 2
        assert!((average_capability(&agents) - 0.6).abs() < 1e-12);
    }
}
