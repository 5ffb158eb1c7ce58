//! Exponential and linear growth models.
//!
//! Both models take any two of the duration `T`, the ending sizes `NT` and
//! the growth rate `r`, and infer the missing one once the starting sizes
//! `N0` are known, i.e. when the model first runs against a population.
//!
//! Without a rate, sizes are interpolated between `N0` and `NT` so that
//! generation `T-1` yields exactly `NT`. With a rate, sizes follow the
//! growth curve and are clamped at `NT`, which then acts as a carrying
//! capacity.

use crate::base::RawSize;
use crate::demography::{BoxedOperator, DemographicModel, ModelBase, ModelState, Operator, Outcome};
use crate::errors::DemographyError;
use crate::simulation::{Population, PopulationHandle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Growth rate, either shared by all subpopulations or one per
/// subpopulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GrowthRate {
    Uniform(f64),
    PerSubPop(Vec<f64>),
}

impl GrowthRate {
    fn per_sub_pop(&self, n: usize) -> Result<Vec<f64>, DemographyError> {
        match self {
            Self::Uniform(r) => Ok(vec![*r; n]),
            Self::PerSubPop(rates) if rates.len() == n => Ok(rates.clone()),
            Self::PerSubPop(rates) => Err(DemographyError::InvalidGrowth(format!(
                "{} growth rates given for {n} subpopulations",
                rates.len()
            ))),
        }
    }

    fn is_valid(&self) -> bool {
        match self {
            Self::Uniform(r) => r.is_finite(),
            Self::PerSubPop(rates) => !rates.is_empty() && rates.iter().all(|r| r.is_finite()),
        }
    }
}

impl From<f64> for GrowthRate {
    fn from(r: f64) -> Self {
        Self::Uniform(r)
    }
}

impl From<Vec<f64>> for GrowthRate {
    fn from(rates: Vec<f64>) -> Self {
        Self::PerSubPop(rates)
    }
}

/// Shape of a growth model.
pub trait GrowthCurve: fmt::Debug + Clone + Copy + Default {
    /// Model name, used in error messages and logs.
    const NAME: &'static str;

    /// Size reached from `n0` after `steps` generations at `rate`.
    fn grow(n0: usize, rate: f64, steps: usize) -> f64;

    /// Size at generation `at` (`at < total - 1`) of a curve going from `n0`
    /// to `nt` in `total` generations.
    fn interpolate(n0: usize, nt: usize, total: usize, at: usize) -> usize;

    /// Number of generations `n0` needs to reach `nt` at `rate`.
    fn duration(n0: usize, nt: usize, rate: f64) -> Result<usize, DemographyError>;
}

/// `N(t) = N0 · e^{r(t+1)}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Exponential;

/// `N(t) = N0 + N0 · r · (t+1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Linear;

impl GrowthCurve for Exponential {
    const NAME: &'static str = "ExponentialGrowthModel";

    fn grow(n0: usize, rate: f64, steps: usize) -> f64 {
        n0 as f64 * (rate * steps as f64).exp()
    }

    fn interpolate(n0: usize, nt: usize, total: usize, at: usize) -> usize {
        let f = (at + 1) as f64 / total as f64;
        ((n0 as f64).powf(1.0 - f) * (nt as f64).powf(f)) as usize
    }

    fn duration(n0: usize, nt: usize, rate: f64) -> Result<usize, DemographyError> {
        if n0 == nt {
            return Ok(0);
        }
        if n0 == 0 || nt == 0 || rate == 0.0 {
            return Err(unreachable_size(Self::NAME, n0, nt, rate));
        }
        let steps = (nt as f64 / n0 as f64).ln() / rate;
        if steps < 0.0 {
            return Err(unreachable_size(Self::NAME, n0, nt, rate));
        }
        Ok((steps - STEP_TOLERANCE).ceil() as usize)
    }
}

impl GrowthCurve for Linear {
    const NAME: &'static str = "LinearGrowthModel";

    fn grow(n0: usize, rate: f64, steps: usize) -> f64 {
        n0 as f64 * (1.0 + rate * steps as f64)
    }

    fn interpolate(n0: usize, nt: usize, total: usize, at: usize) -> usize {
        ((at + 1) * nt + (total - at - 1) * n0) / total
    }

    fn duration(n0: usize, nt: usize, rate: f64) -> Result<usize, DemographyError> {
        if n0 == nt {
            return Ok(0);
        }
        if n0 == 0 || rate == 0.0 {
            return Err(unreachable_size(Self::NAME, n0, nt, rate));
        }
        let steps = (nt as f64 - n0 as f64) / (n0 as f64 * rate);
        if steps < 0.0 {
            return Err(unreachable_size(Self::NAME, n0, nt, rate));
        }
        Ok((steps - STEP_TOLERANCE).ceil() as usize)
    }
}

/// Slack when rounding a solved duration up, so that a target hit exactly
/// at a whole generation does not gain an extra one through float error.
const STEP_TOLERANCE: f64 = 1e-9;

fn unreachable_size(model: &str, n0: usize, nt: usize, rate: f64) -> DemographyError {
    DemographyError::InvalidGrowth(format!(
        "{model} cannot reach size {nt} from {n0} with growth rate {rate}"
    ))
}

/// User-facing parameters of a growth model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthParams {
    /// Duration `T` in generations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_gens: Option<usize>,
    /// Starting sizes `N0`; the population is fitted to them first.
    #[serde(default)]
    pub init_size: RawSize,
    /// Ending sizes `NT`, which must be absolute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_size: Option<RawSize>,
    /// Growth rate `r`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<GrowthRate>,
}

impl GrowthParams {
    fn validate(&self, model: &str) -> Result<(), DemographyError> {
        let given = [
            self.num_gens.is_some(),
            self.final_size.as_ref().is_some_and(|nt| !nt.is_empty()),
            self.rate.is_some(),
        ];
        if given.iter().filter(|&&g| g).count() < 2 {
            return Err(DemographyError::InvalidGrowth(format!(
                "please specify at least two parameters of T, NT and r for {model}"
            )));
        }
        if let Some(rate) = &self.rate {
            if !rate.is_valid() {
                return Err(DemographyError::InvalidGrowth(format!(
                    "unacceptable growth rate {rate:?} for {model}"
                )));
            }
        }
        Ok(())
    }

    fn final_sizes(&self, model: &str, n: usize) -> Result<Option<Vec<usize>>, DemographyError> {
        let Some(raw) = self.final_size.as_ref().filter(|nt| !nt.is_empty()) else {
            return Ok(None);
        };
        let sizes = raw.absolute()?.ok_or_else(|| {
            DemographyError::InvalidGrowth(format!(
                "relative ending population size {raw} is not allowed for {model}"
            ))
        })?;
        match sizes.len() {
            1 if n > 1 => Ok(Some(vec![sizes[0]; n])),
            len if len == n => Ok(Some(sizes)),
            len => Err(DemographyError::InvalidGrowth(format!(
                "starting and ending population should have the same number of \
                 subpopulations ({n} vs {len}) in {model}"
            ))),
        }
    }
}

/// Parameters resolved once the starting sizes are known.
#[derive(Debug, Clone, PartialEq)]
struct GrowthPlan {
    num_gens: usize,
    init_size: Vec<usize>,
    final_size: Vec<usize>,
    rates: Option<Vec<f64>>,
}

impl GrowthPlan {
    fn resolve<C: GrowthCurve>(
        params: &GrowthParams,
        init_size: &[usize],
    ) -> Result<Self, DemographyError> {
        let n = init_size.len();
        let final_size = params.final_sizes(C::NAME, n)?;
        let rates = params
            .rate
            .as_ref()
            .map(|rate| rate.per_sub_pop(n))
            .transpose()?;

        let plan = match (params.num_gens, final_size, rates) {
            (Some(num_gens), Some(final_size), rates) => Self {
                num_gens,
                init_size: init_size.to_vec(),
                final_size,
                rates,
            },
            (None, Some(final_size), Some(rates)) => {
                let mut num_gens = 1;
                for ((&n0, &nt), &r) in init_size.iter().zip(&final_size).zip(&rates) {
                    num_gens = num_gens.max(C::duration(n0, nt, r)?);
                }
                Self {
                    num_gens,
                    init_size: init_size.to_vec(),
                    final_size,
                    rates: Some(rates),
                }
            }
            (Some(num_gens), None, Some(rates)) => Self {
                num_gens,
                init_size: init_size.to_vec(),
                final_size: init_size
                    .iter()
                    .zip(&rates)
                    .map(|(&n0, &r)| C::grow(n0, r, num_gens).max(0.0) as usize)
                    .collect(),
                rates: Some(rates),
            },
            _ => {
                return Err(DemographyError::InvalidGrowth(format!(
                    "please specify at least two parameters of T, NT and r for {}",
                    C::NAME
                )))
            }
        };
        debug!(
            model = C::NAME,
            num_gens = plan.num_gens,
            init_size = ?plan.init_size,
            final_size = ?plan.final_size,
            rates = ?plan.rates,
            "resolved growth parameters"
        );
        Ok(plan)
    }

    fn sizes_at<C: GrowthCurve>(&self, at: usize) -> Vec<usize> {
        // the last generation lands on the target whichever parameter was solved
        if at + 1 == self.num_gens {
            return self.final_size.clone();
        }
        let pairs = self.init_size.iter().zip(&self.final_size);
        match &self.rates {
            None => pairs
                .map(|(&n0, &nt)| C::interpolate(n0, nt, self.num_gens, at))
                .collect(),
            Some(rates) => pairs
                .zip(rates)
                .map(|((&n0, &nt), &r)| {
                    let grown = C::grow(n0, r, at + 1).max(0.0) as usize;
                    if r >= 0.0 {
                        grown.min(nt)
                    } else {
                        grown.max(nt)
                    }
                })
                .collect(),
        }
    }
}

/// A growth model following curve `C`.
pub struct GrowthModel<C: GrowthCurve, P = Population> {
    params: GrowthParams,
    base: ModelBase<P>,
    plan: Option<GrowthPlan>,
    _curve: PhantomData<C>,
}

/// Exponential growth with carrying capacity.
pub type ExponentialGrowthModel<P = Population> = GrowthModel<Exponential, P>;

/// Linear growth with carrying capacity.
pub type LinearGrowthModel<P = Population> = GrowthModel<Linear, P>;

impl<C: GrowthCurve, P: PopulationHandle> GrowthModel<C, P> {
    /// Create a growth model from its parameters.
    ///
    /// # Errors
    /// Returns [`DemographyError::InvalidGrowth`] if fewer than two of
    /// `num_gens`, `final_size` and `rate` are given, and
    /// [`DemographyError::InvalidSize`] for malformed sizes.
    pub fn new(params: GrowthParams) -> Result<Self, DemographyError> {
        params.validate(C::NAME)?;
        let base = ModelBase::new(params.num_gens, &params.init_size)?;
        Ok(Self {
            params,
            base,
            plan: None,
            _curve: PhantomData,
        })
    }

    /// Start a builder.
    pub fn builder() -> GrowthModelBuilder<C, P> {
        GrowthModelBuilder::new()
    }

    pub fn params(&self) -> &GrowthParams {
        &self.params
    }

    pub fn with_ops(mut self, ops: Vec<BoxedOperator<P>>) -> Self {
        self.base = self.base.with_ops(ops);
        self
    }

    pub fn with_info_fields(mut self, fields: Vec<String>) -> Self {
        self.base = self.base.with_info_fields(fields);
        self
    }

    /// Ending sizes, once resolved by the first call.
    pub fn final_size(&self) -> Option<&[usize]> {
        self.plan.as_ref().map(|plan| plan.final_size.as_slice())
    }
}

impl<C: GrowthCurve, P: PopulationHandle> DemographicModel<P> for GrowthModel<C, P> {
    fn kind(&self) -> &'static str {
        C::NAME
    }

    fn num_gens(&self) -> Option<usize> {
        self.plan
            .as_ref()
            .map(|plan| plan.num_gens)
            .or(self.base.num_gens())
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
        let params = &self.params;
        let plan = &mut self.plan;
        let relative = self.base.begin(pop, |state: &ModelState| {
            *plan = Some(GrowthPlan::resolve::<C>(params, state.init_size())?);
            Ok(())
        })?;
        let Some(at) = relative else {
            self.plan = None;
            return Ok(Outcome::Stop);
        };
        let Some(plan) = self.plan.as_ref() else {
            return Ok(Outcome::Stop);
        };
        if at >= plan.num_gens {
            return Ok(Outcome::Stop);
        }
        Ok(Outcome::Continue(plan.sizes_at::<C>(at)))
    }

    fn reset(&mut self) {
        self.base.reset();
        self.plan = None;
    }
}

impl<C: GrowthCurve, P> fmt::Debug for GrowthModel<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(C::NAME)
            .field("params", &self.params)
            .field("base", &self.base)
            .field("plan", &self.plan)
            .finish()
    }
}

/// Fluent builder for growth models.
///
/// # Examples
///
/// ```
/// use demevo_sim::demography::{DemographicModel, ExponentialGrowthModel};
///
/// let model: ExponentialGrowthModel = ExponentialGrowthModel::builder()
///     .generations(10)
///     .initial_size(100usize)
///     .final_size(1000usize)
///     .build()
///     .unwrap();
/// assert_eq!(model.num_gens(), Some(10));
/// ```
pub struct GrowthModelBuilder<C: GrowthCurve, P = Population> {
    params: GrowthParams,
    ops: Vec<BoxedOperator<P>>,
    info_fields: Vec<String>,
    _curve: PhantomData<C>,
}

impl<C: GrowthCurve, P: PopulationHandle> Default for GrowthModelBuilder<C, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: GrowthCurve, P: PopulationHandle> GrowthModelBuilder<C, P> {
    pub fn new() -> Self {
        Self {
            params: GrowthParams {
                num_gens: None,
                init_size: RawSize::default(),
                final_size: None,
                rate: None,
            },
            ops: Vec::new(),
            info_fields: Vec::new(),
            _curve: PhantomData,
        }
    }

    /// Set the duration `T`.
    pub fn generations(mut self, num_gens: usize) -> Self {
        self.params.num_gens = Some(num_gens);
        self
    }

    /// Set the starting sizes `N0` (default: keep the population as is).
    pub fn initial_size(mut self, size: impl Into<RawSize>) -> Self {
        self.params.init_size = size.into();
        self
    }

    /// Set the ending sizes `NT`.
    pub fn final_size(mut self, size: impl Into<RawSize>) -> Self {
        self.params.final_size = Some(size.into());
        self
    }

    /// Set the growth rate `r` for all subpopulations, or one per
    /// subpopulation.
    pub fn rate(mut self, rate: impl Into<GrowthRate>) -> Self {
        self.params.rate = Some(rate.into());
        self
    }

    /// Add an auxiliary operator.
    pub fn op(mut self, op: impl Operator<P> + 'static) -> Self {
        self.ops.push(Box::new(op));
        self
    }

    /// Declare an information field required by the operators.
    pub fn info_field(mut self, field: impl Into<String>) -> Self {
        self.info_fields.push(field.into());
        self
    }

    /// Validate the parameters and build the model.
    pub fn build(self) -> Result<GrowthModel<C, P>, DemographyError> {
        Ok(GrowthModel::new(self.params)?
            .with_ops(self.ops)
            .with_info_fields(self.info_fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<C: GrowthCurve>(model: &mut GrowthModel<C>, pop: &mut Population) -> Vec<Vec<usize>> {
        let mut sizes = Vec::new();
        loop {
            match model.apply(pop).unwrap() {
                Outcome::Continue(next) => {
                    pop.resize(&next, true).unwrap();
                    sizes.push(next);
                    pop.increment_generation();
                }
                Outcome::Stop => return sizes,
            }
        }
    }

    fn exponential(
        num_gens: Option<usize>,
        init: RawSize,
        nt: Option<RawSize>,
        rate: Option<GrowthRate>,
    ) -> Result<ExponentialGrowthModel, DemographyError> {
        GrowthModel::new(GrowthParams {
            num_gens,
            init_size: init,
            final_size: nt,
            rate,
        })
    }

    #[test]
    fn test_requires_two_parameters() {
        let err = exponential(Some(10), RawSize::count(100), None, None).unwrap_err();
        assert!(matches!(err, DemographyError::InvalidGrowth(_)));
        let err = LinearGrowthModel::<Population>::builder()
            .initial_size(100usize)
            .rate(0.1)
            .build()
            .unwrap_err();
        assert!(matches!(err, DemographyError::InvalidGrowth(_)));
    }

    #[test]
    fn test_exponential_interpolation() {
        let mut model = exponential(
            Some(10),
            RawSize::count(100),
            Some(RawSize::count(1000)),
            None,
        )
        .unwrap();
        let mut pop = Population::new(&[100]);
        let sizes = run(&mut model, &mut pop);
        assert_eq!(sizes.len(), 10);
        assert_eq!(sizes[9], vec![1000]);
        assert!(sizes[0][0] > 100 && sizes[0][0] < 1000);
        assert_eq!(sizes[0], vec![125]);
        for pair in sizes.windows(2) {
            assert!(pair[0][0] <= pair[1][0]);
        }
    }

    #[test]
    fn test_linear_interpolation() {
        let mut model: LinearGrowthModel = LinearGrowthModel::builder()
            .generations(10)
            .initial_size(100usize)
            .final_size(1000usize)
            .build()
            .unwrap();
        let mut pop = Population::new(&[50]);
        let sizes = run(&mut model, &mut pop);
        assert_eq!(sizes.len(), 10);
        assert_eq!(sizes[0], vec![190]);
        assert_eq!(sizes[9], vec![1000]);
        for pair in sizes.windows(2) {
            assert!(pair[0][0] <= pair[1][0]);
        }
    }

    #[test]
    fn test_exponential_final_size_from_rate() {
        let mut model: ExponentialGrowthModel = ExponentialGrowthModel::builder()
            .generations(10)
            .initial_size(vec![100usize, 200])
            .rate(0.01)
            .build()
            .unwrap();
        let mut pop = Population::new(&[1]);
        let sizes = run(&mut model, &mut pop);
        let expected: Vec<usize> = [100.0f64, 200.0]
            .iter()
            .map(|n0| (n0 * (0.1f64).exp()) as usize)
            .collect();
        assert_eq!(model.final_size(), Some(expected.as_slice()));
        assert_eq!(sizes.last().unwrap(), &expected);
        assert_eq!(sizes[0], vec![101, 202]);
    }

    #[test]
    fn test_duration_solved_from_rate() {
        let mut model: ExponentialGrowthModel = ExponentialGrowthModel::builder()
            .initial_size(vec![100usize, 100])
            .final_size(vec![200usize, 400])
            .rate(0.1)
            .build()
            .unwrap();
        assert_eq!(model.num_gens(), None);
        let mut pop = Population::new(&[200]);
        let sizes = run(&mut model, &mut pop);
        // ln(4) / 0.1 = 13.86
        assert_eq!(sizes.len(), 14);
        assert_eq!(sizes.last().unwrap(), &vec![200, 400]);
        // the first subpopulation reaches its target early and stays there
        assert_eq!(sizes[7][0], 200);
        assert_eq!(sizes[10][0], 200);
    }

    #[test]
    fn test_linear_duration_and_capacity() {
        let mut model: LinearGrowthModel = LinearGrowthModel::builder()
            .initial_size(100usize)
            .final_size(160usize)
            .rate(0.25)
            .build()
            .unwrap();
        let mut pop = Population::new(&[100]);
        let sizes = run(&mut model, &mut pop);
        assert_eq!(sizes, vec![vec![125], vec![150], vec![160]]);
    }

    #[test]
    fn test_linear_solved_duration_ends_on_target() {
        // 25 * (1 + 0.04 * 4) falls just short of 29 in floating point
        let mut model: LinearGrowthModel = LinearGrowthModel::builder()
            .initial_size(25usize)
            .final_size(29usize)
            .rate(0.04)
            .build()
            .unwrap();
        let mut pop = Population::new(&[25]);
        let sizes = run(&mut model, &mut pop);
        assert_eq!(sizes.len(), 4);
        assert_eq!(sizes.last(), Some(&vec![29]));

        for (rate, num_gens) in [(0.03, 45), (0.09, 15)] {
            let mut model: LinearGrowthModel = LinearGrowthModel::builder()
                .initial_size(20usize)
                .final_size(47usize)
                .rate(rate)
                .build()
                .unwrap();
            let mut pop = Population::new(&[20]);
            let sizes = run(&mut model, &mut pop);
            assert_eq!(sizes.len(), num_gens, "rate {rate}");
            assert_eq!(sizes.last(), Some(&vec![47]), "rate {rate}");
        }
    }

    #[test]
    fn test_exponential_solved_duration_ends_on_target() {
        for (n0, nt, generations) in [(5usize, 13usize, 3usize), (5, 13, 10), (5, 18, 9), (6, 16, 7), (3, 8, 7)] {
            let rate = (nt as f64 / n0 as f64).ln() / generations as f64;
            let mut model: ExponentialGrowthModel = ExponentialGrowthModel::builder()
                .initial_size(vec![n0, n0])
                .final_size(vec![nt, n0 + 1])
                .rate(rate)
                .build()
                .unwrap();
            let mut pop = Population::new(&[n0, n0]);
            let sizes = run(&mut model, &mut pop);
            assert_eq!(sizes.len(), generations, "{n0} -> {nt}");
            assert_eq!(sizes.last(), Some(&vec![nt, n0 + 1]), "{n0} -> {nt}");
            for pair in sizes.windows(2) {
                assert!(pair[0][0] <= pair[1][0] && pair[1][0] <= nt);
            }
        }
    }

    #[test]
    fn test_carrying_capacity() {
        let mut model = exponential(
            Some(5),
            RawSize::count(100),
            Some(RawSize::count(120)),
            Some(GrowthRate::Uniform(0.1)),
        )
        .unwrap();
        let mut pop = Population::new(&[100]);
        let sizes = run(&mut model, &mut pop);
        assert_eq!(sizes, vec![vec![110], vec![120], vec![120], vec![120], vec![120]]);
    }

    #[test]
    fn test_decline_clamps_from_above() {
        let mut model = exponential(
            Some(4),
            RawSize::count(1000),
            Some(RawSize::count(800)),
            Some(GrowthRate::Uniform(-0.1)),
        )
        .unwrap();
        let mut pop = Population::new(&[1000]);
        let sizes = run(&mut model, &mut pop);
        assert_eq!(sizes, vec![vec![904], vec![818], vec![800], vec![800]]);
    }

    #[test]
    fn test_relative_final_size_rejected() {
        let mut model = exponential(
            Some(10),
            RawSize::count(100),
            Some(RawSize::proportion(2.0)),
            None,
        )
        .unwrap();
        let mut pop = Population::new(&[100]);
        assert!(matches!(
            model.apply(&mut pop),
            Err(DemographyError::InvalidGrowth(_))
        ));
        assert!(!model.is_initialized());
    }

    #[test]
    fn test_rate_count_mismatch() {
        let mut model = exponential(
            Some(10),
            RawSize::from(vec![100usize, 200]),
            None,
            Some(GrowthRate::PerSubPop(vec![0.1])),
        )
        .unwrap();
        let mut pop = Population::new(&[300]);
        assert!(model.apply(&mut pop).is_err());
    }

    #[test]
    fn test_unreachable_duration() {
        assert!(Exponential::duration(100, 50, 0.1).is_err());
        assert!(Exponential::duration(100, 200, 0.0).is_err());
        assert_eq!(Exponential::duration(100, 100, 0.0).unwrap(), 0);
        assert_eq!(Linear::duration(100, 200, 0.1).unwrap(), 10);
    }

    #[test]
    fn test_dynamic_initial_size() {
        let mut model: LinearGrowthModel = LinearGrowthModel::builder()
            .generations(3)
            .final_size(vec![70usize, 700])
            .build()
            .unwrap();
        assert!(model.init_size().is_empty());
        let mut pop = Population::new(&[10, 100]);
        let sizes = run(&mut model, &mut pop);
        assert_eq!(sizes, vec![vec![30, 300], vec![50, 500], vec![70, 700]]);
        assert_eq!(model.state().init_size(), &[10, 100]);
    }
}
