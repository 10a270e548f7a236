// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Coalition Ethics Lab - Lab Session
//
// One scenario plus the slider state of the simulator page. The browser
// bindings live in lib.rs; everything here is plain Rust.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::{EnsembleConfig, LabConfig, ModelParams};
use crate::ensemble::EnsembleRunner;
use crate::error::EngineError;
use crate::insights::{generate_insights, Insight};
use crate::types::{EnsembleResult, Scenario};
use crate::visualization::{visualization_data, VisualizationData};

/// Everything the simulator page renders after a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabReport {
    pub ensemble: EnsembleResult,
    pub visualization: VisualizationData,
    pub insights: Vec<Insight>,
}

// ─── CoalitionLab struct ─────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct CoalitionLab {
    pub(crate) scenario: Scenario,
    pub(crate) protocol_complexity: f64,
    pub(crate) tolerance: f64,
    pub(crate) model: ModelParams,
    pub(crate) ensemble: EnsembleConfig,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl CoalitionLab {
    /// Session with the scenario's own I / epsilon and default configuration.
    pub fn from_scenario(scenario: Scenario) -> Self {
        Self::with_config(scenario, LabConfig::default())
    }

    pub fn with_config(scenario: Scenario, config: LabConfig) -> Self {
        Self {
            protocol_complexity: scenario.protocol_complexity,
            tolerance: scenario.tolerance,
            scenario,
            model: config.model,
            ensemble: config.ensemble,
        }
    }

    /// Scenario as it will be simulated: the original with the current I / epsilon.
    pub fn effective_scenario(&self) -> Scenario {
        self.scenario
            .with_parameters(self.protocol_complexity, self.tolerance)
    }

    pub fn run_core(&self) -> Result<LabReport, EngineError> {
        let scenario = self.effective_scenario();
        let runner = EnsembleRunner::new(self.model.clone(), self.ensemble.clone());
        let ensemble = runner.run(&scenario)?;
        let visualization = visualization_data(&ensemble);
        let insights = generate_insights(&ensemble, &scenario);
        Ok(LabReport {
            ensemble,
            visualization,
            insights,
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
