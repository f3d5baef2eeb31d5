//! Built-in analytic objectives selectable from configuration files.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// An analytic objective to maximize.
///
/// All presets are non-negative whenever the variables are, which keeps them
/// usable with roulette selection on non-negative domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectiveSpec {
    /// Sum of all variables.
    Sum,
    /// Value of a single variable.
    Coordinate { index: usize },
    /// `1 / (1 + |x - target|^2)`, peaking at the target point.
    Proximity { target: Vec<f64> },
    /// `max(0, radius^2 - |x - center|^2)`, a cap centered on `center`.
    Sphere { center: Vec<f64>, radius: f64 },
}

impl ObjectiveSpec {
    /// Human readable name for progress output.
    pub fn name(&self) -> String {
        match self {
            ObjectiveSpec::Sum => "sum".to_string(),
            ObjectiveSpec::Coordinate { index } => format!("x[{index}]"),
            ObjectiveSpec::Proximity { target } => format!("proximity{target:?}"),
            ObjectiveSpec::Sphere { center, radius } => format!("sphere{center:?}/r{radius}"),
        }
    }

    /// Check dimensions against `n_var` variables.
    pub fn validate(&self, n_var: usize) -> Result<(), ConfigError> {
        match self {
            ObjectiveSpec::Sum => Ok(()),
            ObjectiveSpec::Coordinate { index } if *index >= n_var => {
                Err(ConfigError::InvalidObjective(format!(
                    "coordinate {index} out of range for {n_var} variables"
                )))
            }
            ObjectiveSpec::Coordinate { .. } => Ok(()),
            ObjectiveSpec::Proximity { target } => check_point("target", target, n_var),
            ObjectiveSpec::Sphere { center, radius } => {
                if !radius.is_finite() || *radius <= 0.0 {
                    return Err(ConfigError::InvalidObjective(format!(
                        "sphere radius must be positive, got {radius}"
                    )));
                }
                check_point("center", center, n_var)
            }
        }
    }
}

fn check_point(name: &str, point: &[f64], n_var: usize) -> Result<(), ConfigError> {
    if point.len() != n_var {
        return Err(ConfigError::InvalidObjective(format!(
            "{name} has {} entries, expected {n_var}",
            point.len()
        )));
    }
    if point.iter().any(|v| !v.is_finite()) {
        return Err(ConfigError::InvalidObjective(format!(
            "{name} must be finite"
        )));
    }
    Ok(())
}
