//! Coevo - Coevolutionary multi-objective genetic algorithm.
//!
//! This crate evolves a fixed-size population of bounded real vectors against
//! several objective functions at once. Instead of scalarizing the objectives,
//! each one selects its own parents and elites every generation; fitness is
//! cached per slot and recomputed only for slots whose individual changed.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration types, bounds and objective presets
//! - `compute`: Selection, variation operators and the evolution engine
//!
//! # Example
//!
//! ```rust,no_run
//! use coevo::{
//!     compute::{CoevolutionEngine, evolution::build_objective},
//!     schema::{EngineConfig, ObjectiveSpec, StepConfig},
//! };
//!
//! let objectives = vec![
//!     build_objective(&ObjectiveSpec::Proximity { target: vec![0.2, 0.8] }, 2).unwrap(),
//!     build_objective(&ObjectiveSpec::Proximity { target: vec![0.8, 0.2] }, 2).unwrap(),
//! ];
//! let config = EngineConfig::new(40, 2).with_bounds(0.0, 1.0).with_seed(7);
//! let mut engine = CoevolutionEngine::new(&config, objectives).unwrap();
//!
//! let step = StepConfig::new(0.8, 0.1).with_elite(1);
//! for summary in engine.run(&step, 100).unwrap() {
//!     println!("generation {}: best {:?}", summary.generation, summary.best);
//! }
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{CoevolutionEngine, EngineError, FitnessFn, GenerationSummary};
pub use schema::{Bound, EngineConfig, ObjectiveSpec, RunConfig, SelectionMethod, StepConfig};
