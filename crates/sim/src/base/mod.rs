//! Base types for describing subpopulation sizes.
//!
//! This module provides the raw size vocabulary accepted from users and
//! configuration files, and its canonical, normalized form.

mod size;

pub use size::{
    absolute_sizes, describe, extract_sizes, normalize, Magnitude, NamedSize, RawSize, SizeSpec,
};
