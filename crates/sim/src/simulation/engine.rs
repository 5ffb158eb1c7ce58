//! Driving a demographic model over a population.
//!
//! [`Evolution`] plays the role of the mating scheme: once per generation it
//! asks the model for the next subpopulation sizes, resizes the population
//! accordingly and records the result in a [`Trajectory`].

use crate::demography::{DemographicModel, Outcome};
use crate::errors::DemographyError;
use crate::simulation::{Population, PopulationHandle};
use std::fmt;
use tracing::{debug, info};

/// Sizes and names of the subpopulations at one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrajectoryPoint {
    pub generation: usize,
    pub sizes: Vec<usize>,
    pub names: Vec<String>,
}

impl TrajectoryPoint {
    fn observe<P: PopulationHandle>(pop: &P) -> Self {
        Self {
            generation: pop.generation(),
            sizes: pop.sub_pop_sizes(),
            names: pop.sub_pop_names(),
        }
    }
}

impl fmt::Display for TrajectoryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.generation)?;
        for (i, (size, name)) in self.sizes.iter().zip(&self.names).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{size}")?;
            if !name.is_empty() {
                write!(f, " ({name})")?;
            }
        }
        Ok(())
    }
}

/// Population structure over the generations of an evolution.
///
/// Holds one point per evolved generation, followed by the state of the
/// population when evolution ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    /// Number of evolved generations.
    pub fn num_generations(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Sizes recorded at `generation`, the latest if recorded twice.
    pub fn sizes_at(&self, generation: usize) -> Option<&[usize]> {
        self.points
            .iter()
            .rev()
            .find(|point| point.generation == generation)
            .map(|point| point.sizes.as_slice())
    }

    /// Sizes when evolution ended.
    pub fn final_sizes(&self) -> Option<&[usize]> {
        self.points.last().map(|point| point.sizes.as_slice())
    }

    /// Points whose sizes differ from the preceding point.
    pub fn changes(&self) -> impl Iterator<Item = &TrajectoryPoint> {
        let mut last: Option<&[usize]> = None;
        self.points.iter().filter(move |point| {
            let changed = last != Some(point.sizes.as_slice());
            last = Some(&point.sizes);
            changed
        })
    }

    /// Check that the population had the intended sizes at the given
    /// generations.
    ///
    /// # Errors
    /// [`DemographyError::SizeMismatch`] at the first generation whose
    /// recorded sizes differ, and [`DemographyError::GenerationNotReached`]
    /// for a generation that was never recorded.
    pub fn assert_sizes<I, S>(&self, intended: I) -> Result<(), DemographyError>
    where
        I: IntoIterator<Item = (usize, S)>,
        S: AsRef<[usize]>,
    {
        for (generation, sizes) in intended {
            let sizes = sizes.as_ref();
            let observed = self
                .sizes_at(generation)
                .ok_or(DemographyError::GenerationNotReached { generation })?;
            if observed != sizes {
                return Err(DemographyError::SizeMismatch {
                    generation,
                    observed: observed.to_vec(),
                    intended: sizes.to_vec(),
                });
            }
        }
        Ok(())
    }

    fn push(&mut self, point: TrajectoryPoint) {
        self.points.push(point);
    }
}

impl fmt::Display for Trajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for point in self.changes() {
            writeln!(f, "{point}")?;
        }
        Ok(())
    }
}

/// Evolution of a population under a demographic model.
///
/// # Examples
///
/// ```
/// use demevo_sim::demography::InstantChangeModel;
/// use demevo_sim::base::RawSize;
/// use demevo_sim::simulation::{Evolution, Population};
///
/// let mut model: InstantChangeModel = InstantChangeModel::new(Some(10), 100usize, vec![(5, RawSize::count(1000))]).unwrap();
/// let mut pop = Population::for_model(&model, None).unwrap();
/// let trajectory = Evolution::new(&mut model).run(&mut pop).unwrap();
/// assert_eq!(trajectory.final_sizes(), Some(&[1000][..]));
/// ```
pub struct Evolution<'a, P: PopulationHandle> {
    model: &'a mut dyn DemographicModel<P>,
    generations: Option<usize>,
}

impl<'a, P: PopulationHandle> Evolution<'a, P> {
    /// Evolve for as many generations as the model lasts.
    pub fn new(model: &'a mut dyn DemographicModel<P>) -> Self {
        let generations = model.num_gens();
        Self { model, generations }
    }

    /// Limit the number of generations; `None` evolves until the model
    /// stops.
    pub fn generations(mut self, generations: impl Into<Option<usize>>) -> Self {
        self.generations = generations.into();
        self
    }

    /// Evolve one generation. Returns `false` once the model stopped.
    pub fn step(&mut self, pop: &mut P) -> Result<bool, DemographyError> {
        match self.model.apply(pop)? {
            Outcome::Continue(sizes) => {
                pop.resize(&sizes, true)?;
                Ok(true)
            }
            Outcome::Stop => Ok(false),
        }
    }

    /// Evolve `pop` from its current generation, starting the model afresh.
    pub fn run(&mut self, pop: &mut P) -> Result<Trajectory, DemographyError> {
        self.model.reset();
        info!(
            model = self.model.kind(),
            start = pop.generation(),
            generations = ?self.generations,
            "starting evolution"
        );

        let mut trajectory = Trajectory::default();
        let mut evolved = 0;
        while self.generations.map_or(true, |limit| evolved < limit) {
            if !self.step(pop)? {
                debug!(generation = pop.generation(), "demographic model stopped evolution");
                break;
            }
            let point = TrajectoryPoint::observe(pop);
            if trajectory.final_sizes() != Some(point.sizes.as_slice()) {
                debug!(%point, "population size changed");
            }
            trajectory.push(point);
            pop.increment_generation();
            evolved += 1;
        }
        trajectory.push(TrajectoryPoint::observe(pop));

        info!(generations = evolved, end = pop.generation(), "evolution finished");
        Ok(trajectory)
    }
}

impl Population {
    /// An initial population for `model`: of the model's declared initial
    /// size, or of `size` when the model's initial size is only known at
    /// run time.
    ///
    /// # Errors
    /// [`DemographyError::InvalidSize`] if neither is available.
    pub fn for_model<M>(model: &M, size: Option<&[usize]>) -> Result<Self, DemographyError>
    where
        M: DemographicModel<Population> + ?Sized,
    {
        match (model.init_size(), size) {
            (_, Some(size)) if !size.is_empty() => Ok(Self::new(size)),
            (declared, _) if !declared.is_empty() => Ok(Self::new(declared)),
            _ => Err(DemographyError::InvalidSize(format!(
                "{} does not have a valid initial population size",
                model.kind()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::RawSize;
    use crate::demography::{
        BoxedOperator, InstantChangeModel, LinearGrowthModel, MultiStageModel,
    };

    fn instant(num_gens: Option<usize>, size: usize, changes: Vec<(usize, RawSize)>) -> InstantChangeModel {
        InstantChangeModel::new(num_gens, size, changes).unwrap()
    }

    #[test]
    fn test_evolution_runs_model_duration() {
        let mut model = instant(Some(10), 100, vec![(5, RawSize::count(500)), (8, RawSize::count(100))]);
        let mut pop = Population::for_model(&model, None).unwrap();
        let trajectory = Evolution::new(&mut model).run(&mut pop).unwrap();

        assert_eq!(trajectory.num_generations(), 10);
        assert_eq!(pop.generation(), 10);
        trajectory
            .assert_sizes([(0, vec![100]), (4, vec![100]), (5, vec![500]), (8, vec![100])])
            .unwrap();
        let changes: Vec<usize> = trajectory.changes().map(|p| p.generation).collect();
        assert_eq!(changes, vec![0, 5, 8]);
    }

    #[test]
    fn test_assert_sizes_reports_mismatch() {
        let mut model = instant(Some(3), 10, vec![]);
        let mut pop = Population::new(&[10]);
        let trajectory = Evolution::new(&mut model).run(&mut pop).unwrap();
        assert_eq!(
            trajectory.assert_sizes([(1, [11])]),
            Err(DemographyError::SizeMismatch {
                generation: 1,
                observed: vec![10],
                intended: vec![11]
            })
        );
        assert_eq!(
            trajectory.assert_sizes([(7, [10])]),
            Err(DemographyError::GenerationNotReached { generation: 7 })
        );
        // an empty population that was recorded is still a size mismatch
        let mut model = instant(Some(2), 0, vec![]);
        let mut pop = Population::new(&[5]);
        let trajectory = Evolution::new(&mut model).run(&mut pop).unwrap();
        trajectory.assert_sizes([(1, [0])]).unwrap();
        assert!(matches!(
            trajectory.assert_sizes([(1, [5])]),
            Err(DemographyError::SizeMismatch { generation: 1, .. })
        ));
    }

    #[test]
    fn test_generation_limit() {
        let mut model = instant(None, 20, vec![]);
        let mut pop = Population::new(&[20]);
        let trajectory = Evolution::new(&mut model)
            .generations(4)
            .run(&mut pop)
            .unwrap();
        assert_eq!(trajectory.num_generations(), 4);
        assert_eq!(pop.generation(), 4);
    }

    #[test]
    fn test_unbounded_model_stops_on_veto() {
        let veto: BoxedOperator<Population> = Box::new(|pop: &mut Population| pop.generation() < 6);
        let mut model = instant(None, 20, vec![]).with_ops(vec![veto]);
        let mut pop = Population::new(&[20]);
        let trajectory = Evolution::new(&mut model)
            .generations(None)
            .run(&mut pop)
            .unwrap();
        assert_eq!(trajectory.num_generations(), 6);
        assert_eq!(trajectory.final_sizes(), Some(&[20][..]));
    }

    #[test]
    fn test_rerun_after_completion() {
        let growth: LinearGrowthModel = LinearGrowthModel::builder()
            .generations(4)
            .initial_size(100usize)
            .final_size(500usize)
            .build()
            .unwrap();
        let mut model = MultiStageModel::new(vec![Box::new(growth)]).unwrap();
        let mut pop = Population::new(&[100]);
        let first = Evolution::new(&mut model).run(&mut pop).unwrap();
        let mut pop = Population::new(&[100]);
        let second = Evolution::new(&mut model).run(&mut pop).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.final_sizes(), Some(&[500][..]));
    }

    #[test]
    fn test_display_lists_changes() {
        let mut model = InstantChangeModel::<Population>::new(
            Some(3),
            RawSize::named(10usize, "A"),
            vec![(2, RawSize::list([RawSize::keep(), RawSize::count(5)]))],
        )
        .unwrap();
        let mut pop = Population::new(&[10]);
        let trajectory = Evolution::new(&mut model).run(&mut pop).unwrap();
        assert_eq!(trajectory.to_string(), "0: 10 (A)\n2: 10 (A), 5 (A)\n");
    }

    #[test]
    fn test_population_for_dynamic_model() {
        let model = InstantChangeModel::<Population>::new(Some(3), RawSize::keep(), vec![]).unwrap();
        assert!(Population::for_model(&model, None).is_err());
        let pop = Population::for_model(&model, Some(&[5, 6])).unwrap();
        assert_eq!(pop.sub_pop_sizes(), vec![5, 6]);
    }
}
