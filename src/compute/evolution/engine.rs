//! The coevolution engine: population state, lazy fitness and the generation step.

use std::collections::BTreeSet;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::schema::{Bounds, ConfigError, EngineConfig, SelectionMethod, StepConfig};

use super::fitness::{FitnessFn, FitnessMatrix};
use super::operators::{cross_blend, mutate_uniform, uniform_in};
use super::selection::{self, Selection, SelectionError};

/// Errors raised by the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Selection failed on objective {objective}: {source}")]
    Selection {
        objective: usize,
        #[source]
        source: SelectionError,
    },
    #[error("Slot {slot} out of range for population of {population}")]
    SlotOutOfRange { slot: usize, population: usize },
}

/// Snapshot of the engine after a generation step.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    /// Generations completed so far.
    pub generation: usize,
    /// Total fitness rows computed since construction.
    pub evaluations: u64,
    /// Rows recomputed by the last step.
    pub reevaluated: usize,
    /// Best fitness per objective.
    pub best: Vec<f64>,
    /// Mean fitness per objective.
    pub mean: Vec<f64>,
}

/// Coevolutionary multi-objective genetic algorithm over bounded real vectors.
///
/// Every objective applies its own selection pressure: parents are sampled
/// per objective column and pooled, and an individual that is elite under any
/// objective survives the step untouched.
pub struct CoevolutionEngine {
    population: Vec<Vec<f64>>,
    fitness: FitnessMatrix,
    bounds: Bounds,
    objectives: Vec<FitnessFn>,
    selection: SelectionMethod,
    rng: StdRng,
    generation: usize,
    evaluations: u64,
    last_reevaluated: usize,
}

impl std::fmt::Debug for CoevolutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoevolutionEngine")
            .field("population_size", &self.population.len())
            .field("variables", &self.bounds.len())
            .field("objectives", &self.objectives.len())
            .field("selection", &self.selection)
            .field("generation", &self.generation)
            .finish()
    }
}

impl CoevolutionEngine {
    /// Create an engine, seeding its RNG from `config.random_seed` or from entropy.
    pub fn new(config: &EngineConfig, objectives: Vec<FitnessFn>) -> Result<Self, EngineError> {
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, objectives, rng)
    }

    /// Create an engine drawing from an explicit generator.
    ///
    /// The population is sampled uniformly inside the bounds and every slot is
    /// evaluated before returning.
    pub fn with_rng(
        config: &EngineConfig,
        objectives: Vec<FitnessFn>,
        mut rng: StdRng,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        if objectives.is_empty() {
            return Err(ConfigError::NoObjectives.into());
        }
        let bounds = Bounds::resolve(config.variables, &config.lower, &config.upper)?;

        let population: Vec<Vec<f64>> = (0..config.population_size)
            .map(|_| {
                (0..bounds.len())
                    .map(|i| uniform_in(&mut rng, bounds.lower()[i], bounds.upper()[i]))
                    .collect()
            })
            .collect();

        let mut engine = Self {
            fitness: FitnessMatrix::new(population.len(), objectives.len()),
            population,
            bounds,
            objectives,
            selection: config.selection.clone(),
            rng,
            generation: 0,
            evaluations: 0,
            last_reevaluated: 0,
        };
        let all: BTreeSet<usize> = (0..engine.population.len()).collect();
        engine.refresh(&all, None);
        engine.last_reevaluated = all.len();

        debug!(
            "Initialized population of {} x {} against {} objectives",
            engine.population.len(),
            engine.bounds.len(),
            engine.objectives.len()
        );

        Ok(engine)
    }

    /// Current individuals, one per slot.
    pub fn population(&self) -> &[Vec<f64>] {
        &self.population
    }

    /// Fitness rows, valid for the individuals currently in each slot.
    pub fn fitness(&self) -> &FitnessMatrix {
        &self.fitness
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn selection_method(&self) -> &SelectionMethod {
        &self.selection
    }

    #[inline]
    pub fn population_size(&self) -> usize {
        self.population.len()
    }

    #[inline]
    pub fn variable_count(&self) -> usize {
        self.bounds.len()
    }

    #[inline]
    pub fn objective_count(&self) -> usize {
        self.objectives.len()
    }

    /// Generations completed.
    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Fitness rows computed since construction.
    #[inline]
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Slot holding the best individual for `objective`, first slot on ties.
    pub fn best_index(&self, objective: usize) -> Option<usize> {
        if objective >= self.objective_count() {
            return None;
        }
        selection::top_indices(&self.fitness.column(objective), 1)
            .first()
            .copied()
    }

    /// Recompute the fitness rows of the given slots with the stored objectives.
    ///
    /// Order and duplicates do not matter. Rows of other slots are left as they are.
    pub fn evaluate<I>(&mut self, slots: I) -> Result<(), EngineError>
    where
        I: IntoIterator<Item = usize>,
    {
        let population = self.population.len();
        let slots: BTreeSet<usize> = slots.into_iter().collect();
        if let Some(&slot) = slots.iter().find(|&&slot| slot >= population) {
            return Err(EngineError::SlotOutOfRange { slot, population });
        }
        self.refresh(&slots, None);
        Ok(())
    }

    /// Advance one generation with the stored objectives.
    pub fn evolve_generation(
        &mut self,
        step: &StepConfig,
    ) -> Result<GenerationSummary, EngineError> {
        self.advance(step, None)
    }

    /// Advance one generation, re-evaluating changed slots with `objectives`.
    ///
    /// The override applies to this step only. Rows of untouched slots keep
    /// the values computed by whichever objectives evaluated them last.
    pub fn evolve_generation_with(
        &mut self,
        step: &StepConfig,
        objectives: &[FitnessFn],
    ) -> Result<GenerationSummary, EngineError> {
        if objectives.len() != self.objectives.len() {
            return Err(ConfigError::ObjectiveCountMismatch {
                expected: self.objectives.len(),
                found: objectives.len(),
            }
            .into());
        }
        self.advance(step, Some(objectives))
    }

    /// Run `generations` steps, reporting each summary to `callback`.
    pub fn run_with_callback<F>(
        &mut self,
        step: &StepConfig,
        generations: usize,
        mut callback: F,
    ) -> Result<Vec<GenerationSummary>, EngineError>
    where
        F: FnMut(&GenerationSummary),
    {
        let mut history = Vec::with_capacity(generations);
        for _ in 0..generations {
            let summary = self.evolve_generation(step)?;
            callback(&summary);
            history.push(summary);
        }
        Ok(history)
    }

    /// Run `generations` steps.
    pub fn run(
        &mut self,
        step: &StepConfig,
        generations: usize,
    ) -> Result<Vec<GenerationSummary>, EngineError> {
        self.run_with_callback(step, generations, |_| {})
    }

    /// Current state summary.
    pub fn summary(&self) -> GenerationSummary {
        GenerationSummary {
            generation: self.generation,
            evaluations: self.evaluations,
            reevaluated: self.last_reevaluated,
            best: self.fitness.best(),
            mean: self.fitness.mean(),
        }
    }

    fn advance(
        &mut self,
        step: &StepConfig,
        objectives: Option<&[FitnessFn]>,
    ) -> Result<GenerationSummary, EngineError> {
        let n_pop = self.population.len();
        step.validate(n_pop)?;

        // Selection runs before any write so a failure leaves the state intact.
        let sample_count =
            (n_pop as f64 * step.cross_fraction / self.objectives.len() as f64) as usize;
        let mut parents = Vec::new();
        let mut elites = BTreeSet::new();
        for objective in 0..self.objectives.len() {
            let picked = self.select(objective, sample_count, step.elite)?;
            parents.extend(picked.sampled);
            elites.extend(picked.elites);
        }

        parents.shuffle(&mut self.rng);
        if parents.len() % 2 != 0 {
            parents.pop();
        }

        let mut next = self.population.clone();
        let mut stale = BTreeSet::new();

        for pair in parents.chunks_exact(2) {
            let (a, b) = (pair[0], pair[1]);
            if self.rng.r#gen::<f64>() < step.cross_rate {
                let (child_a, child_b) = cross_blend(
                    &self.population[a],
                    &self.population[b],
                    step.blend_alpha,
                    &self.bounds,
                    &mut self.rng,
                );
                next[a] = child_a;
                next[b] = child_b;
                stale.insert(a);
                stale.insert(b);
            }
        }

        // Mutation reads the pre-crossover individual; the later write wins.
        for slot in 0..n_pop {
            if self.rng.r#gen::<f64>() < step.mutation_rate {
                next[slot] = mutate_uniform(&self.population[slot], &self.bounds, &mut self.rng);
                stale.insert(slot);
            }
        }

        for &slot in &elites {
            next[slot].clone_from(&self.population[slot]);
            stale.remove(&slot);
        }

        self.population = next;
        self.refresh(&stale, objectives);
        self.generation += 1;
        self.last_reevaluated = stale.len();

        trace!(
            "Generation {}: {} parents, {} elites, {} rows recomputed",
            self.generation,
            parents.len(),
            elites.len(),
            stale.len()
        );

        let summary = self.summary();
        debug!(
            "Generation {}: best {:?}, mean {:?}",
            summary.generation, summary.best, summary.mean
        );
        Ok(summary)
    }

    /// Draw parents and elites from one objective column.
    fn select(
        &mut self,
        objective: usize,
        sample_count: usize,
        elite_count: usize,
    ) -> Result<Selection, EngineError> {
        let column = self.fitness.column(objective);
        let picked = match self.selection {
            SelectionMethod::Roulette => {
                selection::roulette(&column, sample_count, elite_count, &mut self.rng)
            }
            SelectionMethod::Tournament { size } => {
                selection::tournament(&column, sample_count, size, elite_count, &mut self.rng)
            }
        };
        picked.map_err(|source| EngineError::Selection { objective, source })
    }

    /// Recompute rows for `slots`, which must all be in range.
    fn refresh(&mut self, slots: &BTreeSet<usize>, objectives: Option<&[FitnessFn]>) {
        let objectives = objectives.unwrap_or(self.objectives.as_slice());
        for &slot in slots {
            self.fitness
                .evaluate_row(slot, &self.population[slot], objectives);
        }
        self.evaluations += slots.len() as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evolution::build_objective;
    use crate::schema::{Bound, ObjectiveSpec};
    use proptest::prelude::*;

    fn sum_objectives() -> Vec<FitnessFn> {
        vec![build_objective(&ObjectiveSpec::Sum, 1).unwrap()]
    }

    fn two_objectives() -> Vec<FitnessFn> {
        vec![
            build_objective(&ObjectiveSpec::Coordinate { index: 0 }, 2).unwrap(),
            build_objective(&ObjectiveSpec::Coordinate { index: 1 }, 2).unwrap(),
        ]
    }

    fn row_sum(row: &[f64]) -> f64 {
        row.iter().sum()
    }

    #[test]
    fn test_construction_evaluates_every_slot() {
        let config = EngineConfig::new(4, 2).with_seed(42);
        let engine = CoevolutionEngine::new(&config, sum_objectives()).unwrap();

        assert_eq!(engine.fitness().shape(), (4, 1));
        assert_eq!(engine.population_size(), 4);
        assert_eq!(engine.variable_count(), 2);
        assert_eq!(engine.evaluations(), 4);
        for (slot, individual) in engine.population().iter().enumerate() {
            assert!(engine.bounds().contains(individual));
            assert_eq!(engine.fitness().row(slot)[0], row_sum(individual));
        }
    }

    #[test]
    fn test_construction_errors() {
        let config = EngineConfig::new(4, 2);
        assert_eq!(
            CoevolutionEngine::new(&config, vec![]).unwrap_err(),
            EngineError::Config(ConfigError::NoObjectives)
        );
        assert_eq!(
            CoevolutionEngine::new(&EngineConfig::new(0, 2), sum_objectives()).unwrap_err(),
            EngineError::Config(ConfigError::InvalidPopulationSize)
        );
        assert_eq!(
            CoevolutionEngine::new(&EngineConfig::new(4, 0), sum_objectives()).unwrap_err(),
            EngineError::Config(ConfigError::InvalidVariableCount)
        );

        let mismatched = EngineConfig::new(4, 3).with_bounds(vec![0.0, 0.0], 1.0);
        assert!(matches!(
            CoevolutionEngine::new(&mismatched, sum_objectives()),
            Err(EngineError::Config(ConfigError::BoundLength { .. }))
        ));

        let inverted = EngineConfig::new(4, 2).with_bounds(1.0, 0.0);
        assert!(matches!(
            CoevolutionEngine::new(&inverted, sum_objectives()),
            Err(EngineError::Config(ConfigError::InvertedBounds { index: 0, .. }))
        ));
    }

    #[test]
    fn test_same_seed_same_run() {
        let config = EngineConfig::new(10, 3).with_seed(7);
        let step = StepConfig::new(0.9, 0.2).with_elite(1);

        let mut a = CoevolutionEngine::new(&config, two_objectives()).unwrap();
        let mut b = CoevolutionEngine::new(&config, two_objectives()).unwrap();
        a.run(&step, 5).unwrap();
        b.run(&step, 5).unwrap();

        assert_eq!(a.population(), b.population());
        assert_eq!(a.fitness(), b.fitness());
    }

    #[test]
    fn test_all_elite_step_is_identity() {
        let config = EngineConfig::new(4, 2).with_seed(42);
        let mut engine = CoevolutionEngine::new(&config, sum_objectives()).unwrap();
        let population = engine.population().to_vec();
        let fitness = engine.fitness().clone();

        let summary = engine
            .evolve_generation(&StepConfig::new(0.0, 0.0).with_elite(4))
            .unwrap();

        assert_eq!(engine.population(), population.as_slice());
        assert_eq!(engine.fitness(), &fitness);
        assert_eq!(summary.generation, 1);
        assert_eq!(summary.reevaluated, 0);
        assert_eq!(summary.evaluations, 4);
    }

    #[test]
    fn test_full_crossover_leaves_no_stale_rows() {
        let config = EngineConfig::new(4, 2).with_seed(3);
        let mut engine = CoevolutionEngine::new(&config, sum_objectives()).unwrap();

        for _ in 0..10 {
            engine
                .evolve_generation(&StepConfig::new(1.0, 0.0).with_cross_fraction(1.0))
                .unwrap();
            for (slot, individual) in engine.population().iter().enumerate() {
                let expected = row_sum(individual);
                assert!((engine.fitness().row(slot)[0] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_elites_survive_mutation() {
        let config = EngineConfig::new(12, 3).with_seed(5);
        let mut engine = CoevolutionEngine::new(&config, two_objectives()).unwrap();

        for _ in 0..5 {
            let before = engine.population().to_vec();
            let elites: Vec<usize> = (0..2)
                .filter_map(|objective| engine.best_index(objective))
                .collect();

            engine
                .evolve_generation(&StepConfig::new(1.0, 1.0).with_elite(1))
                .unwrap();

            for &slot in &elites {
                assert_eq!(engine.population()[slot], before[slot]);
            }
        }
    }

    #[test]
    fn test_every_slot_mutated_without_elites() {
        let config = EngineConfig::new(6, 2).with_seed(8);
        let mut engine = CoevolutionEngine::new(&config, sum_objectives()).unwrap();

        let summary = engine.evolve_generation(&StepConfig::new(0.0, 1.0)).unwrap();
        assert_eq!(summary.reevaluated, 6);
        assert_eq!(engine.evaluations(), 12);
    }

    #[test]
    fn test_evaluate_only_touches_listed_slots() {
        let config = EngineConfig::new(5, 2).with_seed(1);
        let mut engine = CoevolutionEngine::new(&config, sum_objectives()).unwrap();
        let before = engine.fitness().clone();

        engine.evaluate([3, 1, 3]).unwrap();
        assert_eq!(engine.fitness(), &before);
        assert_eq!(engine.evaluations(), 7);

        assert_eq!(
            engine.evaluate([0, 5]).unwrap_err(),
            EngineError::SlotOutOfRange {
                slot: 5,
                population: 5
            }
        );
        assert_eq!(engine.evaluations(), 7);
    }

    #[test]
    fn test_override_objectives() {
        let config = EngineConfig::new(6, 2).with_seed(11);
        let mut engine = CoevolutionEngine::new(&config, sum_objectives()).unwrap();
        let doubled: Vec<FitnessFn> = vec![Box::new(|x: &[f64]| 2.0 * x.iter().sum::<f64>())];

        let before_pop = engine.population().to_vec();
        let before_fit = engine.fitness().clone();
        engine
            .evolve_generation_with(&StepConfig::new(0.0, 1.0).with_elite(1), &doubled)
            .unwrap();

        let elite = before_fit
            .column(0)
            .iter()
            .enumerate()
            .fold(0, |best, (i, v)| if *v > before_fit.column(0)[best] { i } else { best });
        for slot in 0..6 {
            let individual = &engine.population()[slot];
            let value = engine.fitness().row(slot)[0];
            if slot == elite {
                assert_eq!(individual, &before_pop[slot]);
                assert_eq!(value, before_fit.row(slot)[0]);
            } else {
                assert!((value - 2.0 * row_sum(individual)).abs() < 1e-12);
            }
        }

        assert!(matches!(
            engine.evolve_generation_with(&StepConfig::default(), &[]),
            Err(EngineError::Config(ConfigError::ObjectiveCountMismatch {
                expected: 1,
                found: 0
            }))
        ));
    }

    #[test]
    fn test_degenerate_fitness_leaves_state_intact() {
        let config = EngineConfig::new(4, 2).with_bounds(0.0, 0.0).with_seed(2);
        let mut engine = CoevolutionEngine::new(&config, sum_objectives()).unwrap();
        let before = engine.population().to_vec();

        let err = engine
            .evolve_generation(&StepConfig::new(1.0, 1.0))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::Selection {
                objective: 0,
                source: SelectionError::DegenerateFitness
            }
        );
        assert_eq!(engine.population(), before.as_slice());
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn test_invalid_step_rejected() {
        let config = EngineConfig::new(4, 2).with_seed(2);
        let mut engine = CoevolutionEngine::new(&config, sum_objectives()).unwrap();
        assert!(matches!(
            engine.evolve_generation(&StepConfig::new(0.5, 0.5).with_elite(5)),
            Err(EngineError::Config(ConfigError::EliteCountTooLarge { .. }))
        ));

        let before = engine.population().to_vec();
        assert_eq!(
            engine.evolve_generation(&StepConfig::new(0.5, 0.1).with_cross_fraction(1e30)),
            Err(EngineError::Config(ConfigError::InvalidCrossFraction(1e30)))
        );
        assert_eq!(engine.population(), before.as_slice());
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn test_mutation_overrides_crossover_child() {
        // Every slot is crossed and then mutated. Mutation starts from the
        // individual as it was before the step, so exactly one variable moves.
        let config = EngineConfig::new(10, 4).with_bounds(0.1, 1.0).with_seed(21);
        let mut engine = CoevolutionEngine::new(&config, sum_objectives()).unwrap();
        let step = StepConfig::new(1.0, 1.0);

        for _ in 0..5 {
            let before = engine.population().to_vec();
            let summary = engine.evolve_generation(&step).unwrap();
            assert_eq!(summary.reevaluated, 10);

            for (slot, individual) in engine.population().iter().enumerate() {
                let changed = (0..4)
                    .filter(|&i| individual[i] != before[slot][i])
                    .count();
                assert_eq!(changed, 1, "slot {}: {:?} -> {:?}", slot, before[slot], individual);
                assert!((engine.fitness().row(slot)[0] - row_sum(individual)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_tournament_engine_runs_on_negative_objectives() {
        let config = EngineConfig::new(10, 2)
            .with_bounds(-1.0, 1.0)
            .with_selection(SelectionMethod::Tournament { size: 2 })
            .with_seed(4);
        let objectives: Vec<FitnessFn> = vec![Box::new(|x: &[f64]| -x[0].abs())];
        let mut engine = CoevolutionEngine::new(&config, objectives).unwrap();

        let history = engine.run(&StepConfig::new(0.8, 0.2).with_elite(1), 20).unwrap();
        assert_eq!(history.len(), 20);
        // Elitism keeps the best value from ever regressing.
        for pair in history.windows(2) {
            assert!(pair[1].best[0] >= pair[0].best[0]);
        }
    }

    #[test]
    fn test_run_with_callback_reports_each_generation() {
        let config = EngineConfig::new(8, 2).with_seed(9);
        let mut engine = CoevolutionEngine::new(&config, two_objectives()).unwrap();
        let mut seen = Vec::new();

        let history = engine
            .run_with_callback(&StepConfig::default(), 3, |s| seen.push(s.generation))
            .unwrap();

        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(history.last().map(|s| s.generation), Some(3));
        assert_eq!(engine.best_index(2), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_generation_invariants(
            seed in any::<u64>(),
            n_pop in 2usize..16,
            n_var in 1usize..5,
            cross_rate in 0.0f64..=1.0,
            mutation_rate in 0.0f64..=1.0,
            elite in 0usize..3,
        ) {
            let upper: Vec<f64> = (0..n_var).map(|i| 1.0 + i as f64).collect();
            let config = EngineConfig::new(n_pop, n_var)
                .with_bounds(Bound::Scalar(0.1), Bound::PerVariable(upper))
                .with_seed(seed);
            let objectives: Vec<FitnessFn> = vec![
                build_objective(&ObjectiveSpec::Sum, n_var).unwrap(),
                build_objective(&ObjectiveSpec::Coordinate { index: 0 }, n_var).unwrap(),
            ];
            let mut engine = CoevolutionEngine::new(&config, objectives).unwrap();
            let step = StepConfig::new(cross_rate, mutation_rate).with_elite(elite.min(n_pop));

            for _ in 0..4 {
                let before_pop = engine.population().to_vec();
                let before_fit = engine.fitness().clone();
                let elites: BTreeSet<usize> = (0..2)
                    .flat_map(|j| selection::top_indices(&before_fit.column(j), step.elite))
                    .collect();

                engine.evolve_generation(&step).unwrap();

                prop_assert_eq!(engine.population_size(), n_pop);
                for (slot, individual) in engine.population().iter().enumerate() {
                    prop_assert_eq!(individual.len(), n_var);
                    prop_assert!(engine.bounds().contains(individual));
                    if elites.contains(&slot) {
                        prop_assert_eq!(individual, &before_pop[slot]);
                    }
                    if individual == &before_pop[slot] {
                        // Unchanged individuals keep a row consistent with themselves.
                        prop_assert_eq!(engine.fitness().row(slot), before_fit.row(slot));
                    }
                    prop_assert!((engine.fitness().row(slot)[0] - row_sum(individual)).abs() < 1e-9);
                }
            }
        }
    }
}
