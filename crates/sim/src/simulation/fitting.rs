//! Fitting a population to a size specification.
//!
//! The fitter compares the current subpopulation structure with a
//! normalized size list and applies the merge, resize and split operations
//! needed to reach it. Proportional and unspecified magnitudes are always
//! resolved against sizes observed before any resize in the same pass.

use crate::base::{describe, normalize, NamedSize, RawSize, SizeSpec};
use crate::errors::DemographyError;
use crate::simulation::PopulationHandle;
use tracing::debug;

/// Fit `pop` to a raw size description.
pub fn fit_raw<P: PopulationHandle>(pop: &mut P, size: &RawSize) -> Result<(), DemographyError> {
    fit(pop, &normalize(size)?)
}

/// Fit `pop` to a normalized size list.
///
/// - an empty list leaves the population untouched;
/// - a single entry applied to several subpopulations merges them first;
/// - a single subpopulation with several entries is split in order;
/// - otherwise entries map positionally onto subpopulations, and group
///   entries split their subpopulation after it is resized to the group
///   total.
///
/// Names are applied whenever given, even if sizes do not change.
///
/// # Errors
/// [`DemographyError::SubPopMismatch`] when a multi-entry list does not
/// match the number of subpopulations, and
/// [`DemographyError::IncompatibleFit`] when a split is requested of
/// entries that are themselves groups.
pub fn fit<P: PopulationHandle>(pop: &mut P, specs: &[SizeSpec]) -> Result<(), DemographyError> {
    if specs.is_empty() {
        return Ok(());
    }
    let current = pop.sub_pop_sizes();
    debug!(from = ?current, to = %describe(specs), "fitting population");

    match current.len() {
        0 => Err(incompatible(&current, specs)),
        1 => fit_single(pop, current[0], specs),
        _ if specs.len() == 1 => {
            pop.merge_sub_pops(&[], None)?;
            let total = pop.pop_size();
            fit_single(pop, total, specs)
        }
        n if n != specs.len() => Err(DemographyError::SubPopMismatch {
            found: n,
            expected: specs.len(),
        }),
        _ => fit_positional(pop, &current, specs),
    }
}

/// Fit a population that has exactly one subpopulation of size `total`.
fn fit_single<P: PopulationHandle>(
    pop: &mut P,
    total: usize,
    specs: &[SizeSpec],
) -> Result<(), DemographyError> {
    if let [spec] = specs {
        return match spec {
            SizeSpec::Single(size) => {
                pop.resize(&[size.magnitude.resolve(total)], true)?;
                if let Some(name) = &size.name {
                    pop.set_sub_pop_name(name, 0)?;
                }
                Ok(())
            }
            SizeSpec::Group(members) => {
                let sizes = resolve_members(members, total);
                pop.resize(&[sizes.iter().sum()], true)?;
                split_members(pop, 0, &sizes, members)
            }
        };
    }

    let members: Vec<NamedSize> = specs
        .iter()
        .map(|spec| match spec {
            SizeSpec::Single(size) => Ok(size.clone()),
            SizeSpec::Group(_) => Err(incompatible(&[total], specs)),
        })
        .collect::<Result<_, _>>()?;
    let sizes = resolve_members(&members, total);
    pop.resize(&[sizes.iter().sum()], true)?;
    split_members(pop, 0, &sizes, &members)
}

fn fit_positional<P: PopulationHandle>(
    pop: &mut P,
    current: &[usize],
    specs: &[SizeSpec],
) -> Result<(), DemographyError> {
    let mut new_sizes = Vec::with_capacity(specs.len());
    let mut splits = Vec::new();
    for (index, (spec, &size)) in specs.iter().zip(current).enumerate() {
        match spec {
            SizeSpec::Single(named) => new_sizes.push(named.magnitude.resolve(size)),
            SizeSpec::Group(members) => {
                let sizes = resolve_members(members, size);
                new_sizes.push(sizes.iter().sum());
                splits.push((index, sizes, members));
            }
        }
    }

    pop.resize(&new_sizes, true)?;
    for (index, spec) in specs.iter().enumerate() {
        if let SizeSpec::Single(NamedSize {
            name: Some(name), ..
        }) = spec
        {
            pop.set_sub_pop_name(name, index)?;
        }
    }
    // last group first so that earlier indices stay valid
    for (index, sizes, members) in splits.into_iter().rev() {
        split_members(pop, index, &sizes, members)?;
    }
    Ok(())
}

fn resolve_members(members: &[NamedSize], reference: usize) -> Vec<usize> {
    members
        .iter()
        .map(|m| m.magnitude.resolve(reference))
        .collect()
}

fn split_members<P: PopulationHandle>(
    pop: &mut P,
    index: usize,
    sizes: &[usize],
    members: &[NamedSize],
) -> Result<(), DemographyError> {
    if members.iter().all(|m| m.name.is_none()) {
        pop.split_sub_pop(index, sizes, None)?;
        return Ok(());
    }
    let inherited = pop
        .sub_pop_names()
        .get(index)
        .cloned()
        .unwrap_or_default();
    let names: Vec<String> = members
        .iter()
        .map(|m| m.name.clone().unwrap_or_else(|| inherited.clone()))
        .collect();
    pop.split_sub_pop(index, sizes, Some(&names))?;
    Ok(())
}

fn incompatible(current: &[usize], specs: &[SizeSpec]) -> DemographyError {
    DemographyError::IncompatibleFit {
        current: current.to_vec(),
        target: describe(specs),
    }
}
