//! Demographic models.
//!
//! A demographic model is evaluated once per generation against a live
//! population. It may reshape the population (merge, split, resize,
//! admix) and returns the subpopulation sizes of the next generation, or
//! [`Outcome::Stop`] when evolution should end.
//!
//! - [`ExponentialGrowthModel`], [`LinearGrowthModel`]: growth between a
//!   start and an end size.
//! - [`InstantChangeModel`]: discontinuous size or structure changes at
//!   given generations.
//! - [`AdmixtureModel`]: hybrid isolation or continuous gene flow between
//!   two subpopulations.
//! - [`MultiStageModel`]: any of the above chained end to end.

pub mod admixture;
pub mod growth;
pub mod instant;
pub mod migration;
pub mod multi_stage;
pub mod presets;

pub use admixture::{hi_size, AdmixtureKind, AdmixtureModel};
pub use growth::{
    Exponential, ExponentialGrowthModel, GrowthCurve, GrowthModel, GrowthModelBuilder, GrowthParams,
    GrowthRate, Linear, LinearGrowthModel,
};
pub use instant::InstantChangeModel;
pub use migration::{island_rates, stepping_stone_2d_rates, stepping_stone_rates, MigrationSpec};
pub use multi_stage::{BoxedModel, MultiStageModel};
pub use presets::{CosiParams, Migrator, OutOfAfricaParams, SettlementOfNewWorldParams};

use crate::base::{absolute_sizes, extract_sizes, normalize, RawSize, SizeSpec};
use crate::errors::DemographyError;
use crate::simulation::{fit, PopulationHandle};
use std::fmt;
use tracing::debug;

/// Result of evaluating a model at one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Subpopulation sizes for the next generation.
    Continue(Vec<usize>),
    /// Evolution should end here.
    Stop,
}

impl Outcome {
    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }

    pub fn sizes(&self) -> Option<&[usize]> {
        match self {
            Self::Continue(sizes) => Some(sizes),
            Self::Stop => None,
        }
    }

    /// Sizes, with an empty vector standing for [`Outcome::Stop`].
    pub fn into_sizes(self) -> Vec<usize> {
        match self {
            Self::Continue(sizes) => sizes,
            Self::Stop => Vec::new(),
        }
    }
}

/// An auxiliary operator applied by a model at every generation.
///
/// Returning `false` vetoes continued evolution for the owning model.
/// Closures `FnMut(&mut P) -> bool` are operators.
pub trait Operator<P> {
    fn apply(&mut self, pop: &mut P) -> bool;
}

impl<P, F> Operator<P> for F
where
    F: FnMut(&mut P) -> bool,
{
    fn apply(&mut self, pop: &mut P) -> bool {
        self(pop)
    }
}

/// A boxed auxiliary operator.
pub type BoxedOperator<P> = Box<dyn Operator<P>>;

/// Common interface of all demographic models.
///
/// Models are single-threaded state machines: they record the generation
/// at which they first ran and count generations relative to it. Calling a
/// model at a generation earlier than its recorded start restarts it.
pub trait DemographicModel<P: PopulationHandle> {
    /// Short type name, used in logs.
    fn kind(&self) -> &'static str;

    /// Number of generations the model lasts, `None` if unbounded or not
    /// known until the model has been set up.
    fn num_gens(&self) -> Option<usize>;

    /// Initial sizes if fully determined by the model, empty otherwise.
    fn init_size(&self) -> &[usize];

    /// Information fields required by the operators of this model.
    fn info_fields(&self) -> &[String];

    /// Bookkeeping of the current run.
    fn state(&self) -> &ModelState;

    /// Evaluate the model at the population's current generation.
    fn apply(&mut self, pop: &mut P) -> Result<Outcome, DemographyError>;

    /// Forget the current run so that the next call starts afresh.
    fn reset(&mut self);

    fn is_initialized(&self) -> bool {
        self.state().is_initialized()
    }
}

/// Per-run bookkeeping of a model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelState {
    start_gen: Option<usize>,
    init_size: Vec<usize>,
    relative_gen: usize,
}

impl ModelState {
    pub fn is_initialized(&self) -> bool {
        self.start_gen.is_some()
    }

    /// Absolute generation at which the current run started.
    pub fn start_gen(&self) -> Option<usize> {
        self.start_gen
    }

    /// Subpopulation sizes observed when the current run started.
    pub fn init_size(&self) -> &[usize] {
        &self.init_size
    }

    /// Generation relative to the start of the current run.
    pub fn relative_gen(&self) -> usize {
        self.relative_gen
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// State and behaviour shared by all models: initial fitting, generation
/// counting and auxiliary operators.
pub struct ModelBase<P> {
    num_gens: Option<usize>,
    init_spec: Vec<SizeSpec>,
    declared_init_size: Vec<usize>,
    ops: Vec<BoxedOperator<P>>,
    info_fields: Vec<String>,
    state: ModelState,
}

impl<P: PopulationHandle> ModelBase<P> {
    /// Create a base for a model lasting `num_gens` generations (`None` for
    /// unbounded) whose population is first fitted to `init_size`.
    pub fn new(num_gens: Option<usize>, init_size: &RawSize) -> Result<Self, DemographyError> {
        let declared_init_size = absolute_sizes(&extract_sizes(init_size)?).unwrap_or_default();
        Ok(Self {
            num_gens,
            init_spec: normalize(init_size)?,
            declared_init_size,
            ops: Vec::new(),
            info_fields: Vec::new(),
            state: ModelState::default(),
        })
    }

    pub fn with_ops(mut self, ops: Vec<BoxedOperator<P>>) -> Self {
        self.ops = ops;
        self
    }

    pub fn with_info_fields(mut self, fields: Vec<String>) -> Self {
        self.info_fields = fields;
        self
    }

    pub fn push_op(&mut self, op: BoxedOperator<P>) {
        self.ops.push(op);
    }

    pub fn num_gens(&self) -> Option<usize> {
        self.num_gens
    }

    pub fn set_num_gens(&mut self, num_gens: Option<usize>) {
        self.num_gens = num_gens;
    }

    pub fn declared_init_size(&self) -> &[usize] {
        &self.declared_init_size
    }

    pub fn set_declared_init_size(&mut self, sizes: Vec<usize>) {
        self.declared_init_size = sizes;
    }

    pub fn info_fields(&self) -> &[String] {
        &self.info_fields
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Enter the population's current generation.
    ///
    /// On the first call of a run, or when the generation precedes the
    /// recorded start, the population is fitted to the initial size, the
    /// resulting sizes are recorded and `setup` is invoked with the new
    /// state. Operators are then applied in order.
    ///
    /// Returns the relative generation, or `None` if an operator vetoed, in
    /// which case the state has been cleared.
    pub fn begin<F>(&mut self, pop: &mut P, setup: F) -> Result<Option<usize>, DemographyError>
    where
        F: FnOnce(&ModelState) -> Result<(), DemographyError>,
    {
        let current = pop.generation();
        let start = match self.state.start_gen {
            Some(start) if start <= current => start,
            _ => {
                self.state.reset();
                fit(pop, &self.init_spec)?;
                self.state.start_gen = Some(current);
                self.state.init_size = pop.sub_pop_sizes();
                if let Err(e) = setup(&self.state) {
                    self.state.reset();
                    return Err(e);
                }
                current
            }
        };
        self.state.relative_gen = current - start;

        for (i, op) in self.ops.iter_mut().enumerate() {
            if !op.apply(pop) {
                debug!(generation = current, operator = i, "operator vetoed evolution");
                self.state.reset();
                return Ok(None);
            }
        }
        Ok(Some(self.state.relative_gen))
    }

    /// Restart the relative generation count at the current generation
    /// without refitting.
    pub(crate) fn restart_at(&mut self, generation: usize) {
        self.state.start_gen = Some(generation);
        self.state.relative_gen = 0;
    }
}

impl<P> fmt::Debug for ModelBase<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBase")
            .field("num_gens", &self.num_gens)
            .field("init_spec", &self.init_spec)
            .field("ops", &self.ops.len())
            .field("info_fields", &self.info_fields)
            .field("state", &self.state)
            .finish()
    }
}
