//! Size descriptions and their normalization.
//!
//! Users describe subpopulation sizes with a loose vocabulary: a bare count,
//! a proportion of the current size, "keep whatever is there", a named size,
//! or a list of those where a nested list splits one current subpopulation
//! into several. [`RawSize`] captures that vocabulary and [`normalize`]
//! turns it into the canonical [`SizeSpec`] list that the fitter consumes.

use crate::errors::DemographyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A size description as written by a user or read from a configuration.
///
/// Deserialization is untagged: an integer is a fixed count, a float a
/// proportion, `null` keeps the current size, `[size, "name"]` names a size
/// and any other array is a list (a nested array being a split group).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSize {
    /// Absolute number of individuals.
    Count(usize),
    /// Proportion of the reference size (may exceed 1).
    Proportion(f64),
    /// A size together with a subpopulation name.
    Named(Box<RawSize>, String),
    /// One entry per current subpopulation, or a split group when nested.
    List(Vec<RawSize>),
    /// Keep the current size.
    Keep,
}

impl RawSize {
    pub fn count(n: usize) -> Self {
        Self::Count(n)
    }

    pub fn proportion(factor: f64) -> Self {
        Self::Proportion(factor)
    }

    pub fn keep() -> Self {
        Self::Keep
    }

    pub fn named(size: impl Into<RawSize>, name: impl Into<String>) -> Self {
        Self::Named(Box::new(size.into()), name.into())
    }

    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RawSize>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// `true` for the empty description, which leaves a population untouched.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::List(items) if items.is_empty())
    }

    /// Absolute sizes if every magnitude in the description is a fixed count.
    ///
    /// Returns `Ok(None)` when any entry is proportional or unspecified, i.e.
    /// when the sizes can only be known once a population is at hand.
    pub fn absolute(&self) -> Result<Option<Vec<usize>>, DemographyError> {
        Ok(absolute_sizes(&extract_sizes(self)?))
    }
}

impl Default for RawSize {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl From<usize> for RawSize {
    fn from(n: usize) -> Self {
        Self::Count(n)
    }
}

impl From<f64> for RawSize {
    fn from(factor: f64) -> Self {
        Self::Proportion(factor)
    }
}

impl From<Option<usize>> for RawSize {
    fn from(size: Option<usize>) -> Self {
        size.map_or(Self::Keep, Self::Count)
    }
}

impl<T: Into<RawSize>> From<(T, &str)> for RawSize {
    fn from((size, name): (T, &str)) -> Self {
        Self::named(size, name)
    }
}

impl<T: Into<RawSize>> From<Vec<T>> for RawSize {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

impl fmt::Display for RawSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Proportion(x) => write!(f, "{x:?}"),
            Self::Keep => write!(f, "None"),
            Self::Named(size, name) => write!(f, "({size}, '{name}')"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Magnitude of one subpopulation size, stripped of names and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Magnitude {
    Fixed(usize),
    Proportional(f64),
    Unspecified,
}

impl Magnitude {
    /// Resolve against a reference size (the current size of the
    /// subpopulation or population the magnitude refers to).
    pub fn resolve(&self, reference: usize) -> usize {
        match *self {
            Self::Fixed(n) => n,
            Self::Proportional(factor) => (factor * reference as f64).round() as usize,
            Self::Unspecified => reference,
        }
    }

    pub fn fixed(&self) -> Option<usize> {
        match *self {
            Self::Fixed(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Proportional(x) => write!(f, "{x:?}"),
            Self::Unspecified => write!(f, "None"),
        }
    }
}

/// A magnitude with an optional subpopulation name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSize {
    pub magnitude: Magnitude,
    pub name: Option<String>,
}

impl NamedSize {
    pub fn new(magnitude: Magnitude, name: Option<String>) -> Self {
        Self { magnitude, name }
    }
}

impl fmt::Display for NamedSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "({}, '{name}')", self.magnitude),
            None => write!(f, "{}", self.magnitude),
        }
    }
}

/// Canonical size of one current subpopulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SizeSpec {
    /// The subpopulation keeps its identity and is resized.
    Single(NamedSize),
    /// The subpopulation is split into the listed members, in order.
    Group(Vec<NamedSize>),
}

impl SizeSpec {
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(size) => write!(f, "{size}"),
            Self::Group(members) => {
                write!(f, "[")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{member}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Render a normalized size list the way it would be written by a user.
pub fn describe(specs: &[SizeSpec]) -> String {
    let parts: Vec<String> = specs.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

/// Normalize a raw size description into one [`SizeSpec`] per current
/// subpopulation.
///
/// A bare size yields a single entry. An empty list yields no entries,
/// which the fitter treats as "leave the population alone".
///
/// # Errors
/// Returns [`DemographyError::InvalidSize`] for negative or non-finite
/// proportions, names attached to lists, empty split groups, and groups
/// nested inside groups.
pub fn normalize(raw: &RawSize) -> Result<Vec<SizeSpec>, DemographyError> {
    match raw {
        RawSize::List(items) => items
            .iter()
            .map(|item| match item {
                RawSize::List(members) => {
                    if members.is_empty() {
                        return Err(DemographyError::InvalidSize(format!(
                            "{raw} (empty split group)"
                        )));
                    }
                    members
                        .iter()
                        .map(|member| leaf(member, raw))
                        .collect::<Result<Vec<_>, _>>()
                        .map(SizeSpec::Group)
                }
                other => leaf(other, raw).map(SizeSpec::Single),
            })
            .collect(),
        other => Ok(vec![SizeSpec::Single(leaf(other, raw)?)]),
    }
}

/// Magnitudes of a raw size description in positional order, with names
/// dropped and split groups flattened.
pub fn extract_sizes(raw: &RawSize) -> Result<Vec<Magnitude>, DemographyError> {
    Ok(normalize(raw)?
        .into_iter()
        .flat_map(|spec| match spec {
            SizeSpec::Single(size) => vec![size.magnitude],
            SizeSpec::Group(members) => members.into_iter().map(|m| m.magnitude).collect(),
        })
        .collect())
}

/// Absolute sizes if all magnitudes are fixed counts.
pub fn absolute_sizes(magnitudes: &[Magnitude]) -> Option<Vec<usize>> {
    magnitudes.iter().map(Magnitude::fixed).collect()
}

fn leaf(raw: &RawSize, whole: &RawSize) -> Result<NamedSize, DemographyError> {
    match raw {
        RawSize::Named(size, name) => {
            let magnitude = magnitude(size, whole)?;
            let name = (!name.is_empty()).then(|| name.clone());
            Ok(NamedSize::new(magnitude, name))
        }
        other => Ok(NamedSize::new(magnitude(other, whole)?, None)),
    }
}

fn magnitude(raw: &RawSize, whole: &RawSize) -> Result<Magnitude, DemographyError> {
    match raw {
        RawSize::Count(n) => Ok(Magnitude::Fixed(*n)),
        RawSize::Proportion(x) if x.is_finite() && *x >= 0.0 => Ok(Magnitude::Proportional(*x)),
        RawSize::Keep => Ok(Magnitude::Unspecified),
        _ => Err(DemographyError::InvalidSize(whole.to_string())),
    }
}
