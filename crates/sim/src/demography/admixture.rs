//! Admixture between two subpopulations.

use crate::base::RawSize;
use crate::demography::{BoxedOperator, DemographicModel, ModelBase, ModelState, Outcome};
use crate::errors::DemographyError;
use crate::simulation::{Population, PopulationHandle};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// How two subpopulations are mixed.
///
/// See Long (1991), "The genetic structure of admixed populations".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AdmixtureKind {
    /// At the first generation, append a new subpopulation drawn with
    /// proportion `mu` from `parent1` and `1 - mu` from `parent2`. The
    /// parents are left intact.
    HybridIsolation {
        parent1: usize,
        parent2: usize,
        mu: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// At every generation, replace a `1 - alpha` fraction of `recipient`
    /// with individuals of `donor`.
    ContinuousGeneFlow {
        recipient: usize,
        donor: usize,
        alpha: f64,
    },
}

impl AdmixtureKind {
    fn validate(&self) -> Result<(), DemographyError> {
        let (first, second, fraction) = match self {
            Self::HybridIsolation {
                parent1, parent2, mu, ..
            } => (*parent1, *parent2, *mu),
            Self::ContinuousGeneFlow {
                recipient,
                donor,
                alpha,
            } => (*recipient, *donor, *alpha),
        };
        if first == second {
            return Err(DemographyError::InvalidAdmixture(format!(
                "cannot admix subpopulation {first} with itself"
            )));
        }
        if !(0.0..=1.0).contains(&fraction) {
            return Err(DemographyError::InvalidAdmixture(format!(
                "admixture proportion {fraction} is not in [0, 1]"
            )));
        }
        Ok(())
    }
}

/// Largest cohort `(a, b)` with `a <= n1`, `b <= n2` and `a : b` close to
/// `mu : 1 - mu`.
pub fn hi_size(n1: usize, n2: usize, mu: f64) -> (usize, usize) {
    if mu <= 0.0 {
        return (0, n2);
    }
    if mu >= 1.0 {
        return (n1, 0);
    }
    let total = (n1 as f64 / mu).min(n2 as f64 / (1.0 - mu));
    let a = (total * mu + 0.5) as usize;
    let b = (total * (1.0 - mu) + 0.5) as usize;
    (a.min(n1), b.min(n2))
}

/// Hybrid-isolation or continuous-gene-flow admixture.
pub struct AdmixtureModel<P = Population> {
    kind: AdmixtureKind,
    base: ModelBase<P>,
}

impl<P: PopulationHandle> AdmixtureModel<P> {
    /// # Errors
    /// [`DemographyError::InvalidAdmixture`] when both subpopulations are the
    /// same or the proportion lies outside `[0, 1]`.
    pub fn new(
        num_gens: Option<usize>,
        init_size: impl Into<RawSize>,
        kind: AdmixtureKind,
    ) -> Result<Self, DemographyError> {
        kind.validate()?;
        Ok(Self {
            kind,
            base: ModelBase::new(num_gens, &init_size.into())?,
        })
    }

    pub fn with_ops(mut self, ops: Vec<BoxedOperator<P>>) -> Self {
        self.base = self.base.with_ops(ops);
        self
    }

    pub fn with_info_fields(mut self, fields: Vec<String>) -> Self {
        self.base = self.base.with_info_fields(fields);
        self
    }

    pub fn admixture(&self) -> &AdmixtureKind {
        &self.kind
    }
}

fn hybrid_isolation<P: PopulationHandle>(
    pop: &mut P,
    parent1: usize,
    parent2: usize,
    mu: f64,
    name: Option<&str>,
) -> Result<(), DemographyError> {
    let n1 = pop.sub_pop_size(parent1)?;
    let n2 = pop.sub_pop_size(parent2)?;
    let (a, b) = hi_size(n1, n2, mu);
    debug!(parent1, parent2, from_parent1 = a, from_parent2 = b, "hybrid isolation");

    let mut admixed = pop.clone();
    let mut sizes = vec![0; admixed.num_sub_pops()];
    sizes[parent1] = a;
    sizes[parent2] = b;
    admixed.resize(&sizes, true)?;
    admixed.merge_sub_pops(&[], name)?;
    pop.add_individuals_from(&admixed)
}

fn gene_flow<P: PopulationHandle>(
    pop: &mut P,
    recipient: usize,
    donor: usize,
    alpha: f64,
) -> Result<(), DemographyError> {
    let n_recipient = pop.sub_pop_size(recipient)?;
    let n_donor = pop.sub_pop_size(donor)?;
    let requested = ((n_recipient as f64 * (1.0 - alpha) + 0.5) as usize).min(n_donor);
    if requested == 0 {
        return Ok(());
    }

    let mut sizes = pop.sub_pop_sizes();
    sizes[recipient] -= requested;
    sizes[donor] += requested;
    pop.resize(&sizes, true)?;
    pop.split_sub_pop(donor, &[requested, n_donor], None)?;
    let recipient = if recipient > donor {
        recipient + 1
    } else {
        recipient
    };
    pop.merge_sub_pops(&[recipient, donor], None)?;
    Ok(())
}

impl<P: PopulationHandle> DemographicModel<P> for AdmixtureModel<P> {
    fn kind(&self) -> &'static str {
        "AdmixtureModel"
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
        match &self.kind {
            AdmixtureKind::HybridIsolation {
                parent1,
                parent2,
                mu,
                name,
            } => {
                if at == 0 {
                    hybrid_isolation(pop, *parent1, *parent2, *mu, name.as_deref())?;
                }
            }
            AdmixtureKind::ContinuousGeneFlow {
                recipient,
                donor,
                alpha,
            } => gene_flow(pop, *recipient, *donor, *alpha)?,
        }
        Ok(Outcome::Continue(pop.sub_pop_sizes()))
    }

    fn reset(&mut self) {
        self.base.reset();
    }
}

impl<P> fmt::Debug for AdmixtureModel<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdmixtureModel")
            .field("kind", &self.kind)
            .field("base", &self.base)
            .finish()
    }
}
