//! Population handles.
//!
//! Demographic models never own individuals. They see a population through
//! [`PopulationHandle`], a narrow capability set of size queries and
//! structural edits. [`Population`] is an in-memory implementation that
//! tracks individuals by identifier only; it backs the trajectory driver and
//! the tests, and documents the semantics other handles are expected to
//! follow.

use crate::errors::DemographyError;
use std::collections::BTreeSet;

/// Structural view of a population consumed by demographic models.
///
/// Subpopulations are addressed by position. Operations that drop
/// subpopulations compact the remaining ones, preserving their order.
pub trait PopulationHandle: Clone {
    /// Size of each subpopulation, in order.
    fn sub_pop_sizes(&self) -> Vec<usize>;

    /// Name of each subpopulation, in order. Unnamed subpopulations are `""`.
    fn sub_pop_names(&self) -> Vec<String>;

    /// Number of subpopulations.
    fn num_sub_pops(&self) -> usize {
        self.sub_pop_sizes().len()
    }

    /// Total number of individuals.
    fn pop_size(&self) -> usize {
        self.sub_pop_sizes().iter().sum()
    }

    /// Size of one subpopulation.
    fn sub_pop_size(&self, index: usize) -> Result<usize, DemographyError> {
        let sizes = self.sub_pop_sizes();
        sizes
            .get(index)
            .copied()
            .ok_or(DemographyError::SubPopIndex {
                index,
                num_sub_pops: sizes.len(),
            })
    }

    /// Resize every subpopulation.
    ///
    /// With `propagate`, a growing subpopulation is filled by repeating its
    /// existing individuals by index modulo the old size; otherwise new
    /// slots hold blank individuals. Shrinking keeps the leading individuals.
    fn resize(&mut self, sizes: &[usize], propagate: bool) -> Result<(), DemographyError>;

    /// Split subpopulation `index` into consecutive slices of `sizes`, which
    /// must add up to its current size. Returns the indices of the new
    /// subpopulations. Without `names` every slice keeps the original name.
    fn split_sub_pop(
        &mut self,
        index: usize,
        sizes: &[usize],
        names: Option<&[String]>,
    ) -> Result<Vec<usize>, DemographyError>;

    /// Merge subpopulations into one placed at the position of the first
    /// listed index; an empty list merges all of them. Returns the index of
    /// the merged subpopulation after compaction.
    fn merge_sub_pops(&mut self, indices: &[usize], name: Option<&str>)
        -> Result<usize, DemographyError>;

    /// Rename one subpopulation.
    fn set_sub_pop_name(&mut self, name: &str, index: usize) -> Result<(), DemographyError>;

    /// Remove subpopulations together with their individuals.
    fn remove_sub_pops(&mut self, indices: &[usize]) -> Result<(), DemographyError>;

    /// Append the subpopulations of `other` after the existing ones.
    fn add_individuals_from(&mut self, other: &Self) -> Result<(), DemographyError>;

    /// Current generation number.
    fn generation(&self) -> usize;

    /// Move on to the next generation.
    fn increment_generation(&mut self);
}

/// An individual, identified by the lineage it was created with.
///
/// Propagated individuals share the identifier of the individual they were
/// copied from. Blank individuals have identifier 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Individual {
    id: u64,
}

impl Individual {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_blank(&self) -> bool {
        self.id == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SubPopulation {
    name: String,
    individuals: Vec<Individual>,
}

/// An in-memory population of identifier-only individuals.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    sub_pops: Vec<SubPopulation>,
    /// Generation counter
    generation: usize,
    next_id: u64,
}

impl Population {
    /// Create a population with one unnamed subpopulation per size.
    ///
    /// An empty slice creates a single empty subpopulation.
    pub fn new(sizes: &[usize]) -> Self {
        let mut pop = Self {
            sub_pops: Vec::new(),
            generation: 0,
            next_id: 1,
        };
        let sizes = if sizes.is_empty() { &[0][..] } else { sizes };
        for &size in sizes {
            let individuals = pop.fresh_individuals(size);
            pop.sub_pops.push(SubPopulation {
                name: String::new(),
                individuals,
            });
        }
        pop
    }

    /// Create a population with named subpopulations.
    pub fn with_names(sizes: &[usize], names: &[&str]) -> Result<Self, DemographyError> {
        if sizes.len() != names.len() {
            return Err(DemographyError::Population(format!(
                "{} names given for {} subpopulations",
                names.len(),
                sizes.len()
            )));
        }
        let mut pop = Self::new(sizes);
        for (sp, name) in pop.sub_pops.iter_mut().zip(names) {
            sp.name = (*name).to_string();
        }
        Ok(pop)
    }

    /// Set the generation counter.
    pub fn set_generation(&mut self, generation: usize) {
        self.generation = generation;
    }

    /// Individuals of one subpopulation.
    pub fn individuals(&self, sub_pop: usize) -> Result<&[Individual], DemographyError> {
        self.sub_pops
            .get(sub_pop)
            .map(|sp| sp.individuals.as_slice())
            .ok_or(self.index_error(sub_pop))
    }

    /// Get a specific individual of a subpopulation.
    pub fn get(&self, index: usize, sub_pop: usize) -> Option<&Individual> {
        self.sub_pops.get(sub_pop)?.individuals.get(index)
    }

    /// Check if the population holds no individuals.
    pub fn is_empty(&self) -> bool {
        self.sub_pops.iter().all(|sp| sp.individuals.is_empty())
    }

    fn fresh_individuals(&mut self, n: usize) -> Vec<Individual> {
        let start = self.next_id;
        self.next_id += n as u64;
        (start..self.next_id).map(|id| Individual { id }).collect()
    }

    fn index_error(&self, index: usize) -> DemographyError {
        DemographyError::SubPopIndex {
            index,
            num_sub_pops: self.sub_pops.len(),
        }
    }

    fn check_index(&self, index: usize) -> Result<(), DemographyError> {
        if index < self.sub_pops.len() {
            Ok(())
        } else {
            Err(self.index_error(index))
        }
    }
}

impl PopulationHandle for Population {
    fn sub_pop_sizes(&self) -> Vec<usize> {
        self.sub_pops.iter().map(|sp| sp.individuals.len()).collect()
    }

    fn sub_pop_names(&self) -> Vec<String> {
        self.sub_pops.iter().map(|sp| sp.name.clone()).collect()
    }

    fn num_sub_pops(&self) -> usize {
        self.sub_pops.len()
    }

    fn resize(&mut self, sizes: &[usize], propagate: bool) -> Result<(), DemographyError> {
        if sizes.len() != self.sub_pops.len() {
            return Err(DemographyError::Population(format!(
                "cannot resize {} subpopulations to {sizes:?}",
                self.sub_pops.len()
            )));
        }
        for (sp, &size) in self.sub_pops.iter_mut().zip(sizes) {
            let old = sp.individuals.len();
            if size <= old {
                sp.individuals.truncate(size);
            } else if propagate && old > 0 {
                for i in old..size {
                    let copy = sp.individuals[i % old];
                    sp.individuals.push(copy);
                }
            } else {
                sp.individuals.resize(size, Individual::default());
            }
        }
        Ok(())
    }

    fn split_sub_pop(
        &mut self,
        index: usize,
        sizes: &[usize],
        names: Option<&[String]>,
    ) -> Result<Vec<usize>, DemographyError> {
        self.check_index(index)?;
        let current = self.sub_pops[index].individuals.len();
        let total: usize = sizes.iter().sum();
        if sizes.is_empty() || total != current {
            return Err(DemographyError::Population(format!(
                "cannot split subpopulation {index} of size {current} into {sizes:?}"
            )));
        }
        if let Some(names) = names {
            if names.len() != sizes.len() {
                return Err(DemographyError::Population(format!(
                    "{} names given for a split into {} subpopulations",
                    names.len(),
                    sizes.len()
                )));
            }
        }

        let original = self.sub_pops.remove(index);
        let mut rest = original.individuals.as_slice();
        let mut parts = Vec::with_capacity(sizes.len());
        for (i, &size) in sizes.iter().enumerate() {
            let (head, tail) = rest.split_at(size);
            rest = tail;
            let name = names.map_or_else(|| original.name.clone(), |n| n[i].clone());
            parts.push(SubPopulation {
                name,
                individuals: head.to_vec(),
            });
        }
        self.sub_pops.splice(index..index, parts);
        Ok((index..index + sizes.len()).collect())
    }

    fn merge_sub_pops(
        &mut self,
        indices: &[usize],
        name: Option<&str>,
    ) -> Result<usize, DemographyError> {
        let indices: Vec<usize> = if indices.is_empty() {
            (0..self.sub_pops.len()).collect()
        } else {
            let mut seen = BTreeSet::new();
            indices.iter().copied().filter(|i| seen.insert(*i)).collect()
        };
        for &index in &indices {
            self.check_index(index)?;
        }
        let Some(&target) = indices.first() else {
            return Err(DemographyError::Population(
                "no subpopulation to merge".into(),
            ));
        };

        let mut merged = Vec::new();
        for &index in &indices {
            merged.extend_from_slice(&self.sub_pops[index].individuals);
        }
        let sp = &mut self.sub_pops[target];
        sp.individuals = merged;
        if let Some(name) = name {
            sp.name = name.to_string();
        }

        let removed: BTreeSet<usize> = indices[1..].iter().copied().collect();
        let new_index = target - removed.iter().filter(|&&i| i < target).count();
        let mut position = 0;
        self.sub_pops.retain(|_| {
            let keep = !removed.contains(&position);
            position += 1;
            keep
        });
        Ok(new_index)
    }

    fn set_sub_pop_name(&mut self, name: &str, index: usize) -> Result<(), DemographyError> {
        self.check_index(index)?;
        self.sub_pops[index].name = name.to_string();
        Ok(())
    }

    fn remove_sub_pops(&mut self, indices: &[usize]) -> Result<(), DemographyError> {
        for &index in indices {
            self.check_index(index)?;
        }
        let removed: BTreeSet<usize> = indices.iter().copied().collect();
        let mut position = 0;
        self.sub_pops.retain(|_| {
            let keep = !removed.contains(&position);
            position += 1;
            keep
        });
        Ok(())
    }

    fn add_individuals_from(&mut self, other: &Self) -> Result<(), DemographyError> {
        self.sub_pops.extend(other.sub_pops.iter().cloned());
        self.next_id = self.next_id.max(other.next_id);
        Ok(())
    }

    fn generation(&self) -> usize {
        self.generation
    }

    fn increment_generation(&mut self) {
        self.generation += 1;
    }
}
