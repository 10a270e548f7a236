// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Coalition Ethics Lab - Ensemble Engine

pub mod types;
pub mod error;
pub mod config;
pub mod diversity;
pub mod success;
pub mod authenticity;
pub mod simulation;
pub mod ensemble;
pub mod metrics;
pub mod insights;
pub mod visualization;
pub mod lab;

pub use types::*;
pub use error::EngineError;
pub use config::{EnsembleConfig, LabConfig, ModelParams};
pub use ensemble::{run_ensemble, CancelToken, EnsembleRunner};
pub use insights::{generate_insights, Insight, InsightCategory};
pub use lab::{CoalitionLab, LabReport};
pub use visualization::{visualization_data, VisualizationData};

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl CoalitionLab {
    /// Session for a scenario object as sent by the scenario library page.
    #[wasm_bindgen(constructor)]
    pub fn new(scenario: JsValue) -> Result<CoalitionLab, JsError> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let scenario: Scenario = serde_wasm_bindgen::from_value(scenario)?;
        Ok(CoalitionLab::from_scenario(scenario))
    }

    pub fn set_protocol_complexity(&mut self, val: f64) { self.protocol_complexity = val; }
    pub fn set_tolerance(&mut self, val: f64) { self.tolerance = val; }
    pub fn set_num_runs(&mut self, val: u32) { self.ensemble.num_runs = val as usize; }
    pub fn set_num_steps(&mut self, val: u32) { self.ensemble.num_steps = val as usize; }
    pub fn set_seed(&mut self, val: u32) { self.ensemble.base_seed = u64::from(val); }

    /// Run the ensemble and return `{ ensemble, visualization, insights }`.
    pub fn run(&self) -> Result<JsValue, JsError> {
        let report = self.run_core()?;
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }
}
