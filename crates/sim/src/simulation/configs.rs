//! Model descriptors.
//!
//! A [`ModelConfig`] describes a demographic model as plain data so that a
//! whole demography can be deserialized from a file and rebuilt exactly.
//! Operators are code and therefore never part of a descriptor; attach
//! them after building if needed.

use crate::base::RawSize;
use crate::demography::{
    AdmixtureKind, AdmixtureModel, BoxedModel, CosiParams, ExponentialGrowthModel, GrowthParams,
    InstantChangeModel, LinearGrowthModel, MultiStageModel, OutOfAfricaParams,
    SettlementOfNewWorldParams,
};
use crate::errors::DemographyError;
use crate::simulation::PopulationHandle;
use serde::{Deserialize, Serialize};

/// Serializable description of a demographic model.
///
/// The variant is selected by the `model` field:
///
/// ```
/// use demevo_sim::simulation::ModelConfig;
///
/// let config: ModelConfig = serde_json::from_str(r#"{
///     "model": "multi_stage",
///     "stages": [
///         {"model": "instant_change", "num_gens": 10, "init_size": 1000},
///         {"model": "exponential", "num_gens": 20, "final_size": 5000}
///     ]
/// }"#).unwrap();
/// assert!(matches!(config, ModelConfig::MultiStage { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ModelConfig {
    /// Exponential growth.
    Exponential(GrowthParams),
    /// Linear growth.
    Linear(GrowthParams),
    /// Instant population changes at given generations.
    InstantChange {
        #[serde(default)]
        num_gens: Option<usize>,
        #[serde(default)]
        init_size: RawSize,
        /// `(generation, size)` pairs.
        #[serde(default)]
        changes: Vec<(usize, RawSize)>,
        #[serde(default)]
        remove_empty_sub_pops: bool,
    },
    /// Hybrid-isolation or continuous-gene-flow admixture.
    Admixture {
        #[serde(default)]
        num_gens: Option<usize>,
        #[serde(default)]
        init_size: RawSize,
        admixture: AdmixtureKind,
    },
    /// Stages applied one after another.
    MultiStage { stages: Vec<ModelConfig> },
    /// Out-of-Africa preset for an evolution of `t0` generations.
    OutOfAfrica {
        t0: usize,
        #[serde(flatten)]
        params: OutOfAfricaParams,
    },
    /// Settlement-of-the-New-World preset.
    SettlementOfNewWorld {
        t0: usize,
        #[serde(flatten)]
        params: SettlementOfNewWorldParams,
    },
    /// Cosi calibrated preset.
    Cosi {
        t0: usize,
        #[serde(flatten)]
        params: CosiParams,
    },
}

impl ModelConfig {
    /// Name of the variant, as written in the `model` field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exponential(_) => "exponential",
            Self::Linear(_) => "linear",
            Self::InstantChange { .. } => "instant_change",
            Self::Admixture { .. } => "admixture",
            Self::MultiStage { .. } => "multi_stage",
            Self::OutOfAfrica { .. } => "out_of_africa",
            Self::SettlementOfNewWorld { .. } => "settlement_of_new_world",
            Self::Cosi { .. } => "cosi",
        }
    }

    /// Build the described model, without operators.
    ///
    /// # Errors
    /// Whatever the model's own constructor rejects.
    pub fn build<P: PopulationHandle + 'static>(&self) -> Result<BoxedModel<P>, DemographyError> {
        let model: BoxedModel<P> = match self {
            Self::Exponential(params) => Box::new(ExponentialGrowthModel::<P>::new(params.clone())?),
            Self::Linear(params) => Box::new(LinearGrowthModel::<P>::new(params.clone())?),
            Self::InstantChange {
                num_gens,
                init_size,
                changes,
                remove_empty_sub_pops,
            } => Box::new(
                InstantChangeModel::<P>::new(*num_gens, init_size.clone(), changes.clone())?
                    .remove_empty_sub_pops(*remove_empty_sub_pops),
            ),
            Self::Admixture {
                num_gens,
                init_size,
                admixture,
            } => Box::new(AdmixtureModel::<P>::new(
                *num_gens,
                init_size.clone(),
                admixture.clone(),
            )?),
            Self::MultiStage { stages } => {
                let stages = stages
                    .iter()
                    .map(ModelConfig::build::<P>)
                    .collect::<Result<Vec<_>, _>>()?;
                Box::new(MultiStageModel::new(stages)?)
            }
            Self::OutOfAfrica { t0, params } => Box::new(params.build::<P>(*t0, None, Vec::new())?),
            Self::SettlementOfNewWorld { t0, params } => {
                Box::new(params.build::<P>(*t0, None, Vec::new())?)
            }
            Self::Cosi { t0, params } => Box::new(params.build::<P>(*t0, None, Vec::new())?),
        };
        Ok(model)
    }
}
