//! Coevolutionary multi-objective search over bounded real vectors.
//!
//! # Overview
//!
//! The system consists of:
//!
//! - **Selection** (`selection`): roulette and tournament sampling on one
//!   objective's fitness column, plus elite extraction
//! - **Operators** (`operators`): uniform mutation and BLX-alpha crossover
//! - **Fitness** (`fitness`): the fitness cache and built-in objectives
//! - **Engine** (`engine`): population state and the generation step
//!
//! # Example
//!
//! ```rust
//! use coevo::compute::evolution::{CoevolutionEngine, FitnessFn};
//! use coevo::schema::{EngineConfig, StepConfig};
//!
//! let objectives: Vec<FitnessFn> = vec![
//!     Box::new(|x: &[f64]| x[0]),
//!     Box::new(|x: &[f64]| x[1]),
//! ];
//! let config = EngineConfig::new(20, 2).with_seed(42);
//! let mut engine = CoevolutionEngine::new(&config, objectives).unwrap();
//!
//! let step = StepConfig::new(0.8, 0.1).with_elite(1);
//! let history = engine.run(&step, 10).unwrap();
//! assert_eq!(history.len(), 10);
//! assert_eq!(engine.population_size(), 20);
//! ```
//!
//! # Selection
//!
//! - `Roulette`: fitness-proportionate, requires non-negative fitness
//! - `Tournament`: deterministic tournament with replacement

mod engine;
mod fitness;
mod operators;
mod selection;

pub use engine::{CoevolutionEngine, EngineError, GenerationSummary};
pub use fitness::{FitnessFn, FitnessMatrix, build_objective};
pub use operators::{cross_blend, mutate_uniform};
pub use selection::{Selection, SelectionError, roulette, top_indices, tournament};
