// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Coalition Ethics Lab - Belief Diversity
//
// Mean pairwise belief divergence across a population, 0 (identical) to 1.
// Beliefs are paired by position, not by name, and each absolute strength
// difference is divided by 100.

use crate::types::Agent;

/// Divisor applied to each paired belief-strength difference.
pub const BELIEF_SCALE: f64 = 100.0;

/// Divergence assigned to a pair that shares no belief positions.
pub const UNPAIRED_DIVERGENCE: f64 = 0.5;

/// Divergence between two agents' belief sequences.
pub fn compare_agents(a: &Agent, b: &Agent) -> f64 {
    let paired = a.beliefs.len().min(b.beliefs.len());
    if paired == 0 {
        return UNPAIRED_DIVERGENCE;
    }

    let total: f64 = a
        .beliefs
        .iter()
        .zip(&b.beliefs)
        .map(|(x, y)| (x.strength - y.strength).abs() / BELIEF_SCALE)
        .sum();
    total / paired as f64
}

/// Mean divergence over every unordered pair. Returns 0 below two agents.
pub fn diversity(agents: &[Agent]) -> f64 {
    if agents.len() < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut comparisons = 0usize;
    for (i, a) in agents.iter().enumerate() {
        for b in &agents[i + 1..] {
            total += compare_agents(a, b);
            comparisons += 1;
        }
    }
    total / comparisons as f64
}
