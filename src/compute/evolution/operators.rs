//! Variation operators on bounded real-valued individuals.
//!
//! Operators never modify their inputs; they return fresh individuals.

use rand::Rng;

use crate::schema::Bounds;

/// Uniform draw in `[low, high)`, returning `low` for a degenerate range.
#[inline]
pub(crate) fn uniform_in<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + rng.r#gen::<f64>() * (high - low)
}

/// Replace one uniformly chosen variable with a uniform draw inside its bounds.
pub fn mutate_uniform<R: Rng + ?Sized>(
    individual: &[f64],
    bounds: &Bounds,
    rng: &mut R,
) -> Vec<f64> {
    let mut child = individual.to_vec();
    let idx = rng.gen_range(0..child.len());
    child[idx] = uniform_in(rng, bounds.lower()[idx], bounds.upper()[idx]);
    child
}

/// BLX-alpha blend crossover.
///
/// Each variable draws its own `gamma` in `[-alpha, 1 + alpha]`; both children
/// are clipped to the bounds afterwards.
pub fn cross_blend<R: Rng + ?Sized>(
    parent1: &[f64],
    parent2: &[f64],
    alpha: f64,
    bounds: &Bounds,
    rng: &mut R,
) -> (Vec<f64>, Vec<f64>) {
    let (mut child1, mut child2): (Vec<f64>, Vec<f64>) = parent1
        .iter()
        .zip(parent2)
        .map(|(&a, &b)| {
            let gamma = (1.0 + 2.0 * alpha) * rng.r#gen::<f64>() - alpha;
            ((1.0 - gamma) * a + gamma * b, gamma * a + (1.0 - gamma) * b)
        })
        .unzip();

    for (i, (c1, c2)) in child1.iter_mut().zip(child2.iter_mut()).enumerate() {
        *c1 = bounds.clamp(i, *c1);
        *c2 = bounds.clamp(i, *c2);
    }

    (child1, child2)
}
