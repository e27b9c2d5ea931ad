//! # Settings Module
//!
//! ## Purpose
//! Keeps every tunable of a titration run in one serializable value: the equilibrium
//! constants, the numerical settings of the relaxation, the sweep grid, optional initial
//! concentrations and the rate-of-reaction parameters. The configuration is stored as a
//! JSON file and validated on load.
//!
//! ## Usage Pattern
//! ```rust, ignore
//! use TitraKin::settings::TitrationConfig;
//!
//! let config = TitrationConfig::load_config("titration.json")?;
//! let solver = config.build_solver()?;
//! let curves = TitraKin::Equilibrium::TitrationCurve::run_sweep(&solver, &config.sweep)?;
//! ```
//!
//! ## Defaults
//! | Parameter | Value |
//! |-----------|-------|
//! | KW | 1e-8 |
//! | K_ACID | 1e-3 |
//! | K_BASE | 0.45 |
//! | max iterations | 1000 |
//! | change cutoff | 1e-15 |
//! | damping | 0.5 |
//! | sweep | [0, 2) step 0.01 |

use crate::Equilibrium::AcidBaseReactions::{
    Concentrations, EquilibriumConstants, ReactionModel,
};
use crate::Equilibrium::EquilibriumSolver::{EquilibriumSolver, SolverSettings};
use crate::Equilibrium::TitrationCurve::TitrationSweep;
use crate::Equilibrium::equilibrium_errors::EquilibriumError;
use crate::Kinetics::rate_of_reaction::{ConsecutiveReaction, RateConstantParams, RateError};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read or write config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<EquilibriumError> for ConfigError {
    fn from(err: EquilibriumError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

impl From<RateError> for ConfigError {
    fn from(err: RateError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

/// parameters of the tablet rate-of-reaction experiment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateConfig {
    pub initial_concentration: f64,
    pub first_stage: RateConstantParams,
    pub second_stage: RateConstantParams,
    pub time_end: f64,
    pub time_step: f64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            initial_concentration: 0.6,
            first_stage: RateConstantParams::first_stage(),
            second_stage: RateConstantParams::second_stage(),
            time_end: 60.0,
            time_step: 0.001,
        }
    }
}

impl RateConfig {
    pub fn build_reaction(&self) -> Result<ConsecutiveReaction, RateError> {
        ConsecutiveReaction::from_params(
            self.initial_concentration,
            &self.first_stage,
            &self.second_stage,
        )
    }
}

/// complete configuration of a titration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TitrationConfig {
    #[serde(default)]
    pub constants: EquilibriumConstants,
    #[serde(default)]
    pub solver: SolverSettings,
    #[serde(default)]
    pub sweep: TitrationSweep,
    /// replaces the default initial state (1 mol/L acid in neutral water) when present
    #[serde(default)]
    pub initial_concentrations: Option<Concentrations>,
    #[serde(default)]
    pub rate: RateConfig,
}

impl TitrationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.constants.validate()?;
        self.solver.validate()?;
        self.sweep
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.rate.build_reaction()?;
        if !(self.rate.time_end > 0.0 && self.rate.time_step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "time grid must be positive, got end {} step {}",
                self.rate.time_end, self.rate.time_step
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TitrationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&content)?;
        info!("loaded titration config from '{}'", path.display());
        Ok(config)
    }

    pub fn save_config<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("saved titration config to '{}'", path.display());
        Ok(())
    }

    pub fn build_model(&self) -> Result<ReactionModel, ConfigError> {
        let model = ReactionModel::new(self.constants);
        match &self.initial_concentrations {
            Some(initial) => Ok(model.with_initial_concentrations(initial.clone())?),
            None => Ok(model),
        }
    }

    pub fn build_solver(&self) -> Result<EquilibriumSolver, ConfigError> {
        Ok(EquilibriumSolver::new(self.build_model()?, self.solver)?)
    }
}
