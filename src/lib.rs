//! Demevo: composable demographic models for forward-time population
//! simulations.
//!
//! A demographic model decides, at every generation, how many
//! subpopulations a simulated population has, how large each of them is and
//! what they are called. Models range from simple growth curves to
//! multi-stage histories with splits, bottlenecks and admixture.
//!
//! The engine lives in the `demevo-sim` crate; this crate re-exports it.

pub use demevo_sim::{base, demography, errors, prelude, simulation};

// Re-export commonly used types for convenient external access.
pub use demevo_sim::base::{RawSize, SizeSpec};
pub use demevo_sim::demography::{DemographicModel, MultiStageModel, Outcome};
pub use demevo_sim::errors::DemographyError;
pub use demevo_sim::simulation::{Evolution, ModelConfig, Population, PopulationHandle, Trajectory};
