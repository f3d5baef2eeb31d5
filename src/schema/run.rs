//! Run configuration consumed by the command-line front end.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Bound, ConfigError, EngineConfig, ObjectiveSpec, SelectionMethod, StepConfig};

/// A complete optimization run: engine, per-step parameters, objectives and length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub engine: EngineConfig,
    #[serde(default)]
    pub step: StepConfig,
    pub objectives: Vec<ObjectiveSpec>,
    #[serde(default = "default_generations")]
    pub generations: usize,
}

fn default_generations() -> usize {
    100
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig {
                population_size: 40,
                variables: 2,
                lower: Bound::Scalar(0.0),
                upper: Bound::Scalar(1.0),
                selection: SelectionMethod::Roulette,
                random_seed: Some(42),
            },
            step: StepConfig::new(0.8, 0.1).with_elite(1),
            objectives: vec![
                ObjectiveSpec::Proximity {
                    target: vec![0.2, 0.8],
                },
                ObjectiveSpec::Proximity {
                    target: vec![0.8, 0.2],
                },
            ],
            generations: default_generations(),
        }
    }
}

/// Errors loading a run configuration.
#[derive(Debug, thiserror::Error)]
pub enum RunConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(#[from] ConfigError),
}

impl RunConfig {
    /// Read and validate a JSON run configuration.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RunConfigError> {
        let text = fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.step.validate(self.engine.population_size)?;
        if self.objectives.is_empty() {
            return Err(ConfigError::NoObjectives);
        }
        for objective in &self.objectives {
            objective.validate(self.engine.variables)?;
        }
        Ok(())
    }
}
