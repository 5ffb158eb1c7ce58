use thiserror::Error;

/// Broad classification of a [`DemographyError`].
///
/// Configuration errors are raised when a model or size description is
/// built or first set up. Index errors are raised while a model is applied
/// to a population and refer to subpopulations that do not exist.
/// Assertion errors come from trajectory checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Index,
    Assertion,
}

/// Errors raised by size normalization, population fitting and the
/// demographic models.
///
/// A veto from an auxiliary operator is not an error; models report it as
/// [`Outcome::Stop`](crate::demography::Outcome::Stop).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DemographyError {
    /// A size description could not be interpreted.
    #[error("Unacceptable population size: {0}")]
    InvalidSize(String),

    /// Growth parameters are missing, inconsistent or unreachable.
    #[error("Invalid growth parameters: {0}")]
    InvalidGrowth(String),

    /// A change point lies outside of the model's duration.
    #[error("Population change generation {generation} exceeds total number of generations {num_gens}")]
    ChangeOutOfRange { generation: usize, num_gens: usize },

    /// The same generation was listed twice as a change point.
    #[error("Population change generation {0} is listed more than once")]
    DuplicateChange(usize),

    /// The population cannot be reshaped into the requested structure.
    #[error("Cannot fit population with sizes {current:?} to size {target}")]
    IncompatibleFit { current: Vec<usize>, target: String },

    /// The number of subpopulations does not match a per-subpopulation list.
    #[error("Number of subpopulations mismatch: {found} in population, {expected} required")]
    SubPopMismatch { found: usize, expected: usize },

    /// An admixture descriptor is invalid.
    #[error("Invalid admixture model: {0}")]
    InvalidAdmixture(String),

    /// A preset model was given parameters that break its event order.
    #[error("Invalid preset parameters: {0}")]
    InvalidPreset(String),

    /// A subpopulation index is out of range.
    #[error("Subpopulation index {index} out of range (population has {num_sub_pops} subpopulations)")]
    SubPopIndex { index: usize, num_sub_pops: usize },

    /// A primitive population operation was rejected.
    #[error("Population operation failed: {0}")]
    Population(String),

    /// An observed trajectory does not match the intended sizes.
    #[error("Mismatch population size at generation {generation}: observed={observed:?}, intended={intended:?}")]
    SizeMismatch {
        generation: usize,
        observed: Vec<usize>,
        intended: Vec<usize>,
    },

    /// A trajectory was checked at a generation it never reached.
    #[error("Generation {generation} was not reached by the evolution")]
    GenerationNotReached { generation: usize },
}

impl DemographyError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SubPopIndex { .. } => ErrorKind::Index,
            Self::SizeMismatch { .. } | Self::GenerationNotReached { .. } => ErrorKind::Assertion,
            _ => ErrorKind::Configuration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DemographyError::ChangeOutOfRange {
            generation: 12,
            num_gens: 10,
        };
        assert_eq!(
            err.to_string(),
            "Population change generation 12 exceeds total number of generations 10"
        );

        let err = DemographyError::SubPopIndex {
            index: 3,
            num_sub_pops: 2,
        };
        assert!(err.to_string().contains("index 3"));
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            DemographyError::InvalidSize("x".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            DemographyError::SubPopIndex {
                index: 1,
                num_sub_pops: 1
            }
            .kind(),
            ErrorKind::Index
        );
        assert_eq!(
            DemographyError::SizeMismatch {
                generation: 0,
                observed: vec![1],
                intended: vec![2]
            }
            .kind(),
            ErrorKind::Assertion
        );
        assert_eq!(
            DemographyError::GenerationNotReached { generation: 4 }.kind(),
            ErrorKind::Assertion
        );
    }
}
