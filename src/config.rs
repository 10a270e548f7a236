// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Coalition Ethics Lab - Configuration
//
// Model coefficients and ensemble defaults. Every default reproduces the
// published heuristics exactly; a TOML file may override any subset.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::authenticity::AuthenticityModel;
use crate::success::SuccessModel;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("coefficient {name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
}

// ---------------------------------------------------------------------------
// ModelParams
// ---------------------------------------------------------------------------

/// Coefficients for the two per-step models.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    pub success: SuccessModel,
    pub authenticity: AuthenticityModel,
}

impl ModelParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.success;
        let a = &self.authenticity;
        let coefficients = [
            ("success.base", s.base),
            ("success.protocol_friction", s.protocol_friction),
            ("success.tolerance_bonus", s.tolerance_bonus),
            ("success.capability_weight", s.capability_weight),
            ("success.diversity_penalty", s.diversity_penalty),
            ("authenticity.protocol_pressure", a.protocol_pressure),
            ("authenticity.tolerance_protection", a.tolerance_protection),
            ("authenticity.fatigue_per_step", a.fatigue_per_step),
            ("authenticity.resilience_weight", a.resilience_weight),
            ("authenticity.default_resilience", a.default_resilience),
        ];
        match coefficients.iter().find(|(_, v)| !v.is_finite()) {
            Some(&(name, value)) => Err(ConfigError::NonFinite { name, value }),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// EnsembleConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    pub num_runs: usize,
    pub num_steps: usize,
    /// Run `k` (zero-based) is seeded with `base_seed + k`.
    pub base_seed: u64,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            num_runs: 20,
            num_steps: 10,
            base_seed: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// LabConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub model: ModelParams,
    pub ensemble: EnsembleConfig,
}

impl LabConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Ok(ConfigFile::from_file(path)?.over(EnsembleConfig::default()))
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(ConfigFile::from_str(content)?.over(EnsembleConfig::default()))
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// ConfigFile
// ---------------------------------------------------------------------------

/// `[ensemble]` keys present in a file; absent keys leave the base value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EnsembleOverrides {
    pub num_runs: Option<usize>,
    pub num_steps: Option<usize>,
    pub base_seed: Option<u64>,
}

impl EnsembleOverrides {
    pub fn apply(&self, mut base: EnsembleConfig) -> EnsembleConfig {
        if let Some(num_runs) = self.num_runs {
            base.num_runs = num_runs;
        }
        if let Some(num_steps) = self.num_steps {
            base.num_steps = num_steps;
        }
        if let Some(base_seed) = self.base_seed {
            base.base_seed = base_seed;
        }
        base
    }
}

/// A TOML file as written, before it is layered over some other ensemble
/// configuration (the built-in defaults, or a preset's own runs and steps).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub model: ModelParams,
    pub ensemble: EnsembleOverrides,
}

impl ConfigFile {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let file: Self = toml::from_str(content)?;
        file.model.validate()?;
        Ok(file)
    }

    /// Model coefficients from the file; ensemble keys from the file where set, else `base`.
    pub fn over(self, base: EnsembleConfig) -> LabConfig {
        LabConfig {
            model: self.model,
            ensemble: self.ensemble.apply(base),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
