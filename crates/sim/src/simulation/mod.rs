//! Populations and the evolution loop.
//!
//! This module provides the population side of the engine: the capability
//! trait demographic models act through, the fitter that reshapes a
//! population to a size specification, and the driver that evolves a
//! population under a model.
//!
//! - `PopulationHandle`: structural view of a population (sizes, names,
//!   resize, split, merge).
//! - `Population`: in-memory population of identified individuals.
//! - `fit` / `fit_raw`: reshape a population to a size specification.
//! - `Evolution`: drives a model generation by generation and records a
//!   `Trajectory`.
//! - `ModelConfig`: serializable model descriptors.

mod configs;
mod engine;
mod fitting;
mod population;

pub use configs::ModelConfig;
pub use engine::{Evolution, Trajectory, TrajectoryPoint};
pub use fitting::{fit, fit_raw};
pub use population::{Individual, Population, PopulationHandle};
