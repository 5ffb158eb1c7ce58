//! # Simulation Crate
//!
//! The `sim` crate provides the demographic event engine of `demevo`: size
//! specifications, fitting a population to them, and composable demographic
//! models that decide, generation by generation, how large each
//! subpopulation of a forward-time simulation should be.

pub mod base;
pub mod demography;
pub mod errors;
pub mod prelude;
pub mod simulation;

pub use base::{RawSize, SizeSpec};
pub use errors::DemographyError;
