//! Fitness functions and the per-slot fitness cache.

use crate::schema::{ConfigError, ObjectiveSpec};

/// An objective to maximize, mapping an individual to a scalar.
pub type FitnessFn = Box<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// Fitness values for every population slot, one column per objective.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessMatrix {
    rows: Vec<Vec<f64>>,
    objectives: usize,
}

impl FitnessMatrix {
    /// A zeroed matrix. Rows are meaningless until evaluated.
    pub(crate) fn new(slots: usize, objectives: usize) -> Self {
        Self {
            rows: vec![vec![0.0; objectives]; slots],
            objectives,
        }
    }

    /// `(slots, objectives)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.objectives)
    }

    pub fn row(&self, slot: usize) -> &[f64] {
        &self.rows[slot]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Copy of one objective's values across all slots.
    pub fn column(&self, objective: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[objective]).collect()
    }

    /// Recompute the row of `slot` from `individual`, objectives in declaration order.
    pub(crate) fn evaluate_row(
        &mut self,
        slot: usize,
        individual: &[f64],
        objectives: &[FitnessFn],
    ) {
        for (value, objective) in self.rows[slot].iter_mut().zip(objectives) {
            *value = objective(individual);
        }
    }

    /// Best value of each objective.
    pub fn best(&self) -> Vec<f64> {
        (0..self.objectives)
            .map(|j| {
                self.rows
                    .iter()
                    .map(|row| row[j])
                    .fold(f64::NEG_INFINITY, f64::max)
            })
            .collect()
    }

    /// Mean value of each objective.
    pub fn mean(&self) -> Vec<f64> {
        let n = self.rows.len().max(1) as f64;
        (0..self.objectives)
            .map(|j| self.rows.iter().map(|row| row[j]).sum::<f64>() / n)
            .collect()
    }
}

/// Build the fitness function for a preset objective over `n_var` variables.
///
/// The preset is validated against `n_var` first, so the returned function
/// never indexes past an individual or compares against a shorter point.
pub fn build_objective(spec: &ObjectiveSpec, n_var: usize) -> Result<FitnessFn, ConfigError> {
    spec.validate(n_var)?;
    Ok(match spec.clone() {
        ObjectiveSpec::Sum => Box::new(|x: &[f64]| x.iter().sum::<f64>()),
        ObjectiveSpec::Coordinate { index } => Box::new(move |x: &[f64]| x[index]),
        ObjectiveSpec::Proximity { target } => {
            Box::new(move |x: &[f64]| 1.0 / (1.0 + squared_distance(x, &target)))
        }
        ObjectiveSpec::Sphere { center, radius } => Box::new(move |x: &[f64]| {
            (radius * radius - squared_distance(x, &center)).max(0.0)
        }),
    })
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}
