//! Models chained end to end.

use crate::base::RawSize;
use crate::demography::{BoxedOperator, DemographicModel, ModelBase, ModelState, Outcome};
use crate::errors::DemographyError;
use crate::simulation::{Population, PopulationHandle};
use std::fmt;
use tracing::{debug, info};

/// A boxed demographic model.
pub type BoxedModel<P> = Box<dyn DemographicModel<P>>;

/// A sequence of stages, each an arbitrary demographic model.
///
/// A stage runs until it reaches its own number of generations or stops;
/// the next stage then starts at the same generation. Zero-generation stages
/// are applied for their structural effect only. When the last stage is
/// done the model stops and rewinds to the first stage. It keeps stopping
/// until it is reset or called at a generation before the one where it
/// finished.
pub struct MultiStageModel<P: PopulationHandle = Population> {
    stages: Vec<BoxedModel<P>>,
    current: usize,
    /// Generation at which the last run went past its final stage.
    finished_at: Option<usize>,
    base: ModelBase<P>,
}

impl<P: PopulationHandle> MultiStageModel<P> {
    /// # Errors
    /// [`DemographyError::InvalidSize`] if `stages` is empty.
    pub fn new(stages: Vec<BoxedModel<P>>) -> Result<Self, DemographyError> {
        let Some(first) = stages.first() else {
            return Err(DemographyError::InvalidSize(
                "a multi-stage model needs at least one stage".into(),
            ));
        };
        let num_gens = stages
            .iter()
            .map(|stage| stage.num_gens())
            .sum::<Option<usize>>();
        let mut info_fields: Vec<String> = Vec::new();
        for field in stages.iter().flat_map(|stage| stage.info_fields()) {
            if !info_fields.contains(field) {
                info_fields.push(field.clone());
            }
        }
        let mut base = ModelBase::new(num_gens, &RawSize::default())?.with_info_fields(info_fields);
        base.set_declared_init_size(first.init_size().to_vec());
        Ok(Self {
            stages,
            current: 0,
            finished_at: None,
            base,
        })
    }

    /// Operators applied at every generation, before the current stage.
    pub fn with_ops(mut self, ops: Vec<BoxedOperator<P>>) -> Self {
        self.base = self.base.with_ops(ops);
        self
    }

    /// Declare additional information fields.
    pub fn with_info_fields(mut self, fields: Vec<String>) -> Self {
        let mut all = self.base.info_fields().to_vec();
        for field in fields {
            if !all.contains(&field) {
                all.push(field);
            }
        }
        self.base = self.base.with_info_fields(all);
        self
    }

    /// Index of the stage currently being applied.
    pub fn current_stage(&self) -> usize {
        self.current
    }

    pub fn num_stages(&self) -> usize {
        self.stages.len()
    }

    fn rewind(&mut self) {
        self.current = 0;
        for stage in &mut self.stages {
            stage.reset();
        }
    }

    /// Move on to the next stage that yields sizes, rewinding and stopping
    /// once all stages are done.
    fn advance(&mut self, pop: &mut P) -> Result<Outcome, DemographyError> {
        self.current += 1;
        loop {
            let generation = pop.generation();
            self.base.restart_at(generation);
            if self.current == self.stages.len() {
                info!(generation, "all demographic stages completed");
                self.finished_at = Some(generation);
                self.rewind();
                self.base.reset();
                return Ok(Outcome::Stop);
            }

            let stage = &mut self.stages[self.current];
            stage.reset();
            debug!(
                generation,
                stage = self.current,
                kind = stage.kind(),
                "entering demographic stage"
            );
            let outcome = stage.apply(pop)?;
            if stage.num_gens() != Some(0) && !outcome.is_stop() {
                return Ok(outcome);
            }
            self.current += 1;
        }
    }
}

impl<P: PopulationHandle> DemographicModel<P> for MultiStageModel<P> {
    fn kind(&self) -> &'static str {
        "MultiStageModel"
    }

    fn num_gens(&self) -> Option<usize> {
        self.base.num_gens()
    }

    fn init_size(&self) -> &[usize] {
        self.base.declared_init_size()
    }

    fn info_fields(&self) -> &[String] {
        self.base.info_fields()
    }

    fn state(&self) -> &ModelState {
        self.base.state()
    }

    fn apply(&mut self, pop: &mut P) -> Result<Outcome, DemographyError> {
        if let Some(end) = self.finished_at {
            if pop.generation() >= end {
                return Ok(Outcome::Stop);
            }
            self.finished_at = None;
        }
        let fresh = !self.base.state().is_initialized()
            || self
                .base
                .state()
                .start_gen()
                .is_some_and(|start| start > pop.generation());
        if fresh {
            self.rewind();
        }
        let Some(at) = self.base.begin(pop, |_| Ok(()))? else {
            return Ok(Outcome::Stop);
        };

        let stage = &mut self.stages[self.current];
        match stage.num_gens() {
            Some(0) => {
                stage.apply(pop)?;
                self.advance(pop)
            }
            Some(limit) if limit <= at => self.advance(pop),
            _ => match stage.apply(pop)? {
                Outcome::Stop => self.advance(pop),
                outcome => Ok(outcome),
            },
        }
    }

    fn reset(&mut self) {
        self.rewind();
        self.finished_at = None;
        self.base.reset();
    }
}

impl<P: PopulationHandle> fmt::Debug for MultiStageModel<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiStageModel")
            .field("stages", &self.stages.len())
            .field("current", &self.current)
            .field("finished_at", &self.finished_at)
            .field("base", &self.base)
            .finish()
    }
}
