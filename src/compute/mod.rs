//! Compute module - Evolutionary algorithms.

pub mod evolution;

pub use evolution::{CoevolutionEngine, EngineError, FitnessFn, GenerationSummary};
