//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use demevo_sim::prelude::*;
//!
//! let mut model: ExponentialGrowthModel = ExponentialGrowthModel::builder()
//!     .generations(10)
//!     .initial_size(100usize)
//!     .final_size(1000usize)
//!     .build()
//!     .unwrap();
//! let mut pop = Population::new(&[100]);
//! let trajectory = Evolution::new(&mut model).run(&mut pop).unwrap();
//! assert_eq!(trajectory.final_sizes(), Some(&[1000][..]));
//! ```

pub use crate::base::{normalize, RawSize, SizeSpec};
pub use crate::demography::{
    AdmixtureKind, AdmixtureModel, BoxedModel, BoxedOperator, DemographicModel,
    ExponentialGrowthModel, InstantChangeModel, LinearGrowthModel, MigrationSpec,
    MultiStageModel, Outcome,
};
pub use crate::errors::{DemographyError, ErrorKind};
pub use crate::simulation::{
    fit, Evolution, ModelConfig, Population, PopulationHandle, Trajectory,
};
