//! Per-objective parent selection.
//!
//! Both selectors take one objective's fitness column and return the sampled
//! parent indices together with the elite indices for that objective. Samples
//! may repeat and may overlap the elites; deduplication is left to the caller.

use rand::Rng;

/// Parent indices and elite indices drawn from one fitness column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub sampled: Vec<usize>,
    pub elites: Vec<usize>,
}

/// Errors raised by the selectors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    #[error("Fitness column is empty")]
    EmptyFitness,
    #[error("Fitness column has zero or unbounded total mass; roulette selection is undefined")]
    DegenerateFitness,
    #[error("Fitness at slot {index} is negative ({value}); roulette requires non-negative fitness")]
    NegativeFitness { index: usize, value: f64 },
    #[error("Fitness at slot {index} is not finite")]
    NonFiniteFitness { index: usize },
    #[error("Tournament size must be non-zero")]
    EmptyTournament,
}

/// Roulette wheel selection by inverse-CDF sampling over the ascending fitness order.
///
/// Fitness must be non-negative with a positive total. Shift or rescale
/// objectives that can go negative before selecting on them.
pub fn roulette<R: Rng + ?Sized>(
    fitness: &[f64],
    sample_count: usize,
    elite_count: usize,
    rng: &mut R,
) -> Result<Selection, SelectionError> {
    check_finite(fitness)?;
    if let Some((index, &value)) = fitness.iter().enumerate().find(|(_, v)| **v < 0.0) {
        return Err(SelectionError::NegativeFitness { index, value });
    }

    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| fitness[a].total_cmp(&fitness[b]));

    let mut cumulative: Vec<f64> = order
        .iter()
        .scan(0.0, |total, &i| {
            *total += fitness[i];
            Some(*total)
        })
        .collect();

    // Non-negative values make the last entry the maximum. A sum that
    // overflows to infinity cannot be normalized.
    let total = cumulative.last().copied().unwrap_or(0.0);
    if !total.is_finite() || total <= 0.0 {
        return Err(SelectionError::DegenerateFitness);
    }
    for c in &mut cumulative {
        *c /= total;
    }

    let last = order.len() - 1;
    let sampled = (0..sample_count)
        .map(|_| {
            let r: f64 = rng.r#gen();
            let position = cumulative.partition_point(|&c| c <= r);
            order[position.min(last)]
        })
        .collect();

    Ok(Selection {
        sampled,
        elites: top_indices(fitness, elite_count),
    })
}

/// Deterministic tournament selection with replacement.
///
/// Each draw picks `tournament_size` slots uniformly and keeps the fittest;
/// ties go to the contestant drawn first.
pub fn tournament<R: Rng + ?Sized>(
    fitness: &[f64],
    sample_count: usize,
    tournament_size: usize,
    elite_count: usize,
    rng: &mut R,
) -> Result<Selection, SelectionError> {
    check_finite(fitness)?;
    if tournament_size == 0 {
        return Err(SelectionError::EmptyTournament);
    }

    let sampled = (0..sample_count)
        .map(|_| {
            let mut best_idx = rng.gen_range(0..fitness.len());
            for _ in 1..tournament_size {
                let idx = rng.gen_range(0..fitness.len());
                if fitness[idx] > fitness[best_idx] {
                    best_idx = idx;
                }
            }
            best_idx
        })
        .collect();

    Ok(Selection {
        sampled,
        elites: top_indices(fitness, elite_count),
    })
}

/// The `count` fittest slots, best first. Ties keep the lower slot first.
pub fn top_indices(fitness: &[f64], count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));
    order.truncate(count);
    order
}

fn check_finite(fitness: &[f64]) -> Result<(), SelectionError> {
    if fitness.is_empty() {
        return Err(SelectionError::EmptyFitness);
    }
    match fitness.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(SelectionError::NonFiniteFitness { index }),
        None => Ok(()),
    }
}
