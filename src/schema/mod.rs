//! Schema module - Configuration types for coevolutionary optimization runs.

mod bounds;
mod config;
mod objective;
mod run;

pub use bounds::*;
pub use config::*;
pub use objective::*;
pub use run::*;
