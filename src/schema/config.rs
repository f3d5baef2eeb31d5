//! Configuration types for the coevolution engine and its generation steps.

use serde::{Deserialize, Serialize};

use super::Bound;

/// Engine construction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of population slots (`n_pop`).
    pub population_size: usize,
    /// Number of variables per individual (`n_var`).
    pub variables: usize,
    /// Lower bound, scalar or per-variable.
    #[serde(default = "default_lower")]
    pub lower: Bound,
    /// Upper bound, scalar or per-variable.
    #[serde(default = "default_upper")]
    pub upper: Bound,
    /// Parent selection applied to every objective column.
    #[serde(default)]
    pub selection: SelectionMethod,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl EngineConfig {
    /// Configuration with unit bounds and roulette selection.
    pub fn new(population_size: usize, variables: usize) -> Self {
        Self {
            population_size,
            variables,
            lower: default_lower(),
            upper: default_upper(),
            selection: SelectionMethod::default(),
            random_seed: None,
        }
    }

    /// Replace both bounds.
    pub fn with_bounds(mut self, lower: impl Into<Bound>, upper: impl Into<Bound>) -> Self {
        self.lower = lower.into();
        self.upper = upper.into();
        self
    }

    /// Replace the selection method.
    pub fn with_selection(mut self, selection: SelectionMethod) -> Self {
        self.selection = selection;
        self
    }

    /// Fix the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Validate sizes and selection parameters.
    ///
    /// Bounds are checked when they are resolved against `variables`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::InvalidPopulationSize);
        }
        if self.variables == 0 {
            return Err(ConfigError::InvalidVariableCount);
        }
        if let SelectionMethod::Tournament { size: 0 } = self.selection {
            return Err(ConfigError::InvalidTournamentSize);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(default_population_size(), 2)
    }
}

fn default_population_size() -> usize {
    20
}
fn default_lower() -> Bound {
    Bound::Scalar(0.0)
}
fn default_upper() -> Bound {
    Bound::Scalar(1.0)
}

/// Selection method used to draw parents from one objective column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum SelectionMethod {
    /// Fitness-proportionate sampling by cumulative distribution inversion.
    #[default]
    Roulette,
    /// Deterministic tournament with replacement.
    Tournament {
        #[serde(default = "default_tournament_size")]
        size: usize,
    },
}

fn default_tournament_size() -> usize {
    3
}

/// Largest accepted `StepConfig::cross_fraction`.
///
/// The pooled parent list holds about `population * cross_fraction` indices.
pub const MAX_CROSS_FRACTION: f64 = 64.0;

/// Parameters for a single generation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Probability that a sampled pair is crossed over (0.0-1.0).
    pub cross_rate: f64,
    /// Probability that a slot is mutated (0.0-1.0).
    pub mutation_rate: f64,
    /// Fraction of the population sampled as parents, split across objectives.
    #[serde(default = "default_cross_fraction")]
    pub cross_fraction: f64,
    /// Elites kept per objective.
    #[serde(default)]
    pub elite: usize,
    /// BLX-alpha extrapolation factor.
    #[serde(default = "default_blend_alpha")]
    pub blend_alpha: f64,
}

impl StepConfig {
    /// Step with default fraction, no elitism and alpha 0.5.
    pub fn new(cross_rate: f64, mutation_rate: f64) -> Self {
        Self {
            cross_rate,
            mutation_rate,
            cross_fraction: default_cross_fraction(),
            elite: 0,
            blend_alpha: default_blend_alpha(),
        }
    }

    pub fn with_elite(mut self, elite: usize) -> Self {
        self.elite = elite;
        self
    }

    pub fn with_cross_fraction(mut self, cross_fraction: f64) -> Self {
        self.cross_fraction = cross_fraction;
        self
    }

    pub fn with_blend_alpha(mut self, blend_alpha: f64) -> Self {
        self.blend_alpha = blend_alpha;
        self
    }

    /// Validate against a population of `population_size` slots.
    pub fn validate(&self, population_size: usize) -> Result<(), ConfigError> {
        check_rate("cross_rate", self.cross_rate)?;
        check_rate("mutation_rate", self.mutation_rate)?;
        if !(self.cross_fraction > 0.0 && self.cross_fraction <= MAX_CROSS_FRACTION) {
            return Err(ConfigError::InvalidCrossFraction(self.cross_fraction));
        }
        if self.elite > population_size {
            return Err(ConfigError::EliteCountTooLarge {
                elite: self.elite,
                population: population_size,
            });
        }
        if !self.blend_alpha.is_finite() || self.blend_alpha < 0.0 {
            return Err(ConfigError::InvalidBlendAlpha(self.blend_alpha));
        }
        Ok(())
    }
}

impl Default for StepConfig {
    fn default() -> Self {
        Self::new(default_cross_rate(), default_mutation_rate())
    }
}

fn default_cross_rate() -> f64 {
    0.8
}
fn default_mutation_rate() -> f64 {
    0.1
}
fn default_cross_fraction() -> f64 {
    1.0
}
fn default_blend_alpha() -> f64 {
    0.5
}

fn check_rate(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { name, value })
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Population size must be non-zero")]
    InvalidPopulationSize,
    #[error("Variable count must be non-zero")]
    InvalidVariableCount,
    #[error("At least one objective is required")]
    NoObjectives,
    #[error("Expected {expected} objectives, got {found}")]
    ObjectiveCountMismatch { expected: usize, found: usize },
    #[error("{which} bound has {found} entries, expected {expected}")]
    BoundLength {
        which: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Variable {index}: lower bound {lower} exceeds upper bound {upper}")]
    InvertedBounds { index: usize, lower: f64, upper: f64 },
    #[error("Variable {index}: bounds must be finite")]
    NonFiniteBound { index: usize },
    #[error("Tournament size must be non-zero")]
    InvalidTournamentSize,
    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidRate { name: &'static str, value: f64 },
    #[error("Cross fraction must lie in (0, 64], got {0}")]
    InvalidCrossFraction(f64),
    #[error("Elite count {elite} exceeds population size {population}")]
    EliteCountTooLarge { elite: usize, population: usize },
    #[error("Blend alpha must be non-negative and finite, got {0}")]
    InvalidBlendAlpha(f64),
    #[error("Invalid objective: {0}")]
    InvalidObjective(String),
}
