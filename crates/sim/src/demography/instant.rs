//! Instant population changes.

use crate::base::{normalize, RawSize, SizeSpec};
use crate::demography::{BoxedOperator, DemographicModel, ModelBase, ModelState, Outcome};
use crate::errors::DemographyError;
use crate::simulation::{fit, Population, PopulationHandle};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// A model that keeps sizes constant except at listed generations, where
/// the population is refitted (resized, merged or split) in one step.
///
/// Change points are relative to the generation at which the model starts.
/// With `remove_empty_sub_pops`, subpopulations of size zero are dropped
/// at every generation, which is how subpopulations are removed.
pub struct InstantChangeModel<P = Population> {
    changes: Vec<(usize, Vec<SizeSpec>)>,
    remove_empty: bool,
    base: ModelBase<P>,
}

impl<P: PopulationHandle> InstantChangeModel<P> {
    /// Create a model lasting `num_gens` generations (`None` for unbounded),
    /// starting from `init_size` and refitting the population to each
    /// `(generation, size)` change point.
    ///
    /// # Errors
    /// [`DemographyError::ChangeOutOfRange`] for a change point at or past
    /// `num_gens`, [`DemographyError::DuplicateChange`] when a generation is
    /// listed twice and [`DemographyError::InvalidSize`] for malformed
    /// sizes.
    pub fn new(
        num_gens: Option<usize>,
        init_size: impl Into<RawSize>,
        changes: Vec<(usize, RawSize)>,
    ) -> Result<Self, DemographyError> {
        let base = ModelBase::new(num_gens, &init_size.into())?;
        let mut seen = BTreeSet::new();
        let changes = changes
            .into_iter()
            .map(|(generation, size)| {
                if let Some(limit) = num_gens {
                    if generation >= limit {
                        return Err(DemographyError::ChangeOutOfRange {
                            generation,
                            num_gens: limit,
                        });
                    }
                }
                if !seen.insert(generation) {
                    return Err(DemographyError::DuplicateChange(generation));
                }
                Ok((generation, normalize(&size)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            changes,
            remove_empty: false,
            base,
        })
    }

    /// Drop empty subpopulations after every generation.
    pub fn remove_empty_sub_pops(mut self, remove: bool) -> Self {
        self.remove_empty = remove;
        self
    }

    pub fn with_ops(mut self, ops: Vec<BoxedOperator<P>>) -> Self {
        self.base = self.base.with_ops(ops);
        self
    }

    pub fn with_info_fields(mut self, fields: Vec<String>) -> Self {
        self.base = self.base.with_info_fields(fields);
        self
    }

    /// Relative generations at which the population changes, in the order
    /// given.
    pub fn change_points(&self) -> impl Iterator<Item = usize> + '_ {
        self.changes.iter().map(|(generation, _)| *generation)
    }
}

impl<P: PopulationHandle> DemographicModel<P> for InstantChangeModel<P> {
    fn kind(&self) -> &'static str {
        "InstantChangeModel"
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
        let Some(at) = self.base.begin(pop, |_| Ok(()))? else {
            return Ok(Outcome::Stop);
        };
        if self.base.num_gens().is_some_and(|limit| at >= limit) {
            return Ok(Outcome::Stop);
        }
        if let Some((_, size)) = self.changes.iter().find(|(generation, _)| *generation == at) {
            debug!(generation = pop.generation(), relative = at, "instant population change");
            fit(pop, size)?;
        }
        if self.remove_empty {
            let empty: Vec<usize> = pop
                .sub_pop_sizes()
                .iter()
                .enumerate()
                .filter(|(_, &size)| size == 0)
                .map(|(index, _)| index)
                .collect();
            if !empty.is_empty() {
                pop.remove_sub_pops(&empty)?;
            }
        }
        Ok(Outcome::Continue(pop.sub_pop_sizes()))
    }

    fn reset(&mut self) {
        self.base.reset();
    }
}

impl<P> fmt::Debug for InstantChangeModel<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstantChangeModel")
            .field("changes", &self.changes)
            .field("remove_empty", &self.remove_empty)
            .field("base", &self.base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes_over(model: &mut InstantChangeModel, pop: &mut Population) -> Vec<Vec<usize>> {
        let mut sizes = Vec::new();
        while let Outcome::Continue(next) = model.apply(pop).unwrap() {
            pop.resize(&next, true).unwrap();
            sizes.push(next);
            pop.increment_generation();
        }
        sizes
    }

    #[test]
    fn test_change_points_apply_in_place() {
        let mut model = InstantChangeModel::new(
            Some(10),
            1000usize,
            vec![(5, RawSize::count(500)), (8, RawSize::count(100))],
        )
        .unwrap();
        let mut pop = Population::new(&[10]);
        let sizes = sizes_over(&mut model, &mut pop);
        assert_eq!(sizes.len(), 10);
        for (g, size) in sizes.iter().enumerate() {
            let expected = match g {
                0..=4 => 1000,
                5..=7 => 500,
                _ => 100,
            };
            assert_eq!(size, &vec![expected], "generation {g}");
        }
    }

    #[test]
    fn test_change_out_of_range() {
        let err = InstantChangeModel::<Population>::new(
            Some(10),
            RawSize::default(),
            vec![(10, RawSize::count(5))],
        )
        .unwrap_err();
        assert_eq!(
            err,
            DemographyError::ChangeOutOfRange {
                generation: 10,
                num_gens: 10
            }
        );
        assert!(InstantChangeModel::<Population>::new(
            None,
            RawSize::default(),
            vec![(500, RawSize::count(5))],
        )
        .is_ok());
    }

    #[test]
    fn test_duplicate_change() {
        let err = InstantChangeModel::<Population>::new(
            Some(10),
            RawSize::default(),
            vec![(3, RawSize::count(5)), (3, RawSize::count(6))],
        )
        .unwrap_err();
        assert_eq!(err, DemographyError::DuplicateChange(3));
    }

    #[test]
    fn test_split_and_remove_empty() {
        let mut model = InstantChangeModel::new(
            Some(3),
            RawSize::named(100usize, "AF"),
            vec![
                (1, RawSize::list([RawSize::keep(), RawSize::named(20usize, "B")])),
                (2, RawSize::list([RawSize::count(0), RawSize::keep()])),
            ],
        )
        .unwrap()
        .remove_empty_sub_pops(true);
        let mut pop = Population::new(&[50]);
        let sizes = sizes_over(&mut model, &mut pop);
        assert_eq!(sizes, vec![vec![100], vec![100, 20], vec![20]]);
        assert_eq!(pop.sub_pop_names(), vec!["B"]);
    }

    #[test]
    fn test_zero_duration_still_fits() {
        let mut model = InstantChangeModel::new(Some(0), 40usize, vec![]).unwrap();
        let mut pop = Population::new(&[10]);
        assert_eq!(model.apply(&mut pop), Ok(Outcome::Stop));
        assert_eq!(pop.sub_pop_sizes(), vec![40]);
    }

    #[test]
    fn test_restart_from_earlier_generation() {
        let mut model =
            InstantChangeModel::new(Some(4), 10usize, vec![(2, RawSize::count(30))]).unwrap();
        let mut pop = Population::new(&[10]);
        pop.set_generation(5);
        let first = sizes_over(&mut model, &mut pop);
        assert_eq!(first, vec![vec![10], vec![10], vec![30], vec![30]]);

        let mut pop = Population::new(&[10]);
        let second = sizes_over(&mut model, &mut pop);
        assert_eq!(first, second);
        assert_eq!(model.state().start_gen(), Some(0));
    }
}
