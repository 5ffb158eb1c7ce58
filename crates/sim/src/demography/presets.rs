//! Published human demographic models.
//!
//! Each preset counts time **backward**: `t0` is the total number of
//! generations to evolve and every event is placed by how many generations
//! before the present it happened. A `scale` factor divides population
//! sizes and durations and multiplies rates, for faster simulations of the
//! same history.
//!
//! Migration is not performed by this crate. Stages that migrate ask the
//! optional `migrator` for an operator implementing a [`MigrationSpec`] and
//! declare the `migrate_to` information field.

use crate::base::RawSize;
use crate::demography::{
    AdmixtureKind, AdmixtureModel, BoxedModel, BoxedOperator, ExponentialGrowthModel,
    GrowthParams, GrowthRate, InstantChangeModel, MigrationSpec, MultiStageModel,
};
use crate::errors::DemographyError;
use crate::simulation::PopulationHandle;
use serde::{Deserialize, Serialize};

/// Factory turning a rate matrix into a migration operator.
pub type Migrator<'a, P> = &'a dyn Fn(MigrationSpec) -> BoxedOperator<P>;

const MIGRATE_TO: &str = "migrate_to";

fn scaled(value: f64, scale: f64) -> usize {
    (value / scale) as usize
}

fn check_scale(scale: f64) -> Result<(), DemographyError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(DemographyError::InvalidPreset(format!(
            "scaling factor {scale} should be a positive number"
        )))
    }
}

fn check_length(t0: usize, t_af: usize) -> Result<(), DemographyError> {
    if t0 < t_af {
        return Err(DemographyError::InvalidPreset(format!(
            "length of evolution T0={t0} should be more than T_AF={t_af}"
        )));
    }
    Ok(())
}

fn check_order(times: &[(&str, usize)]) -> Result<(), DemographyError> {
    for pair in times.windows(2) {
        let ((earlier, t1), (later, t2)) = (pair[0], pair[1]);
        if t1 < t2 {
            return Err(DemographyError::InvalidPreset(format!(
                "{earlier}={t1} should not be more recent than {later}={t2}"
            )));
        }
    }
    Ok(())
}

fn migration_ops<P>(migrator: Option<Migrator<'_, P>>, spec: MigrationSpec) -> Vec<BoxedOperator<P>> {
    migrator.map(|make| make(spec)).into_iter().collect()
}

fn exponential<P: PopulationHandle + 'static>(
    num_gens: usize,
    init_size: RawSize,
    final_size: Option<RawSize>,
    rate: Option<Vec<f64>>,
    ops: Vec<BoxedOperator<P>>,
) -> Result<BoxedModel<P>, DemographyError> {
    let model = ExponentialGrowthModel::new(GrowthParams {
        num_gens: Some(num_gens),
        init_size,
        final_size,
        rate: rate.map(GrowthRate::PerSubPop),
    })?
    .with_ops(ops)
    .with_info_fields(vec![MIGRATE_TO.to_string()]);
    Ok(Box::new(model))
}

/// The out-of-Africa model of Gutenkunst et al. (2009), Figure 2 and
/// Table 1: an ancestral population expands into `AF`, `B` splits from
/// `AF`, and `B` splits into exponentially growing `EU` and `AS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutOfAfricaParams {
    pub n_a: usize,
    pub n_af: usize,
    pub n_b: usize,
    pub n_eu0: usize,
    pub r_eu: f64,
    pub n_as0: usize,
    pub r_as: f64,
    pub m_af_eu: f64,
    pub m_af_as: f64,
    pub m_eu_as: f64,
    pub t_af: usize,
    pub t_b: usize,
    pub t_eu_as: usize,
    pub scale: f64,
}

impl Default for OutOfAfricaParams {
    fn default() -> Self {
        Self {
            n_a: 7300,
            n_af: 12300,
            n_b: 2100,
            n_eu0: 1000,
            r_eu: 0.004,
            n_as0: 510,
            r_as: 0.0055,
            m_af_eu: 0.00003,
            m_af_as: 0.000019,
            m_eu_as: 0.000096,
            t_af: 220000 / 25,
            t_b: 140000 / 25,
            t_eu_as: 21200 / 25,
            scale: 1.0,
        }
    }
}

impl OutOfAfricaParams {
    /// Build the model for an evolution of `t0` generations.
    pub fn build<P: PopulationHandle + 'static>(
        &self,
        t0: usize,
        migrator: Option<Migrator<'_, P>>,
        ops: Vec<BoxedOperator<P>>,
    ) -> Result<MultiStageModel<P>, DemographyError> {
        check_scale(self.scale)?;
        check_length(t0, self.t_af)?;
        check_order(&[("T_AF", self.t_af), ("T_B", self.t_b), ("T_EU_AS", self.t_eu_as)])?;
        let s = self.scale;
        let t = |generations: usize| scaled(generations as f64, s);
        let n = |size: usize| scaled(size as f64, s);

        let split: BoxedModel<P> = Box::new(InstantChangeModel::new(
            Some(t(t0 - self.t_eu_as)),
            RawSize::named(n(self.n_a), "Ancestral"),
            vec![
                (t(t0 - self.t_af), RawSize::named(n(self.n_af), "AF")),
                (
                    t(t0 - self.t_b),
                    RawSize::list([RawSize::keep(), RawSize::named(n(self.n_b), "B")]),
                ),
            ],
        )?);
        let migration = MigrationSpec::new(vec![
            vec![0.0, self.m_af_eu * s, self.m_af_as * s],
            vec![self.m_eu_as * s, 0.0, self.m_af_eu * s],
            vec![self.m_af_as * s, self.m_af_eu * s, 0.0],
        ]);
        let growth = exponential(
            t(self.t_eu_as),
            RawSize::list([
                RawSize::keep(),
                RawSize::list([
                    RawSize::named(n(self.n_eu0), "EU"),
                    RawSize::named(n(self.n_as0), "AS"),
                ]),
            ]),
            None,
            Some(vec![0.0, self.r_eu * s, self.r_as * s]),
            migration_ops(migrator, migration),
        )?;
        Ok(MultiStageModel::new(vec![split, growth])?.with_ops(ops))
    }
}

/// The settlement-of-New-World model of Gutenkunst et al. (2009), Figure 3
/// and Table 2: the out-of-Africa history followed by the split of `MX`
/// from `AS` and the admixture of `EU` and `MX` into `MXL`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementOfNewWorldParams {
    pub n_a: usize,
    pub n_af: usize,
    pub n_b: usize,
    pub n_eu0: usize,
    pub r_eu: f64,
    pub n_as0: usize,
    pub r_as: f64,
    pub n_mx0: usize,
    pub r_mx: f64,
    pub m_af_eu: f64,
    pub m_af_as: f64,
    pub m_eu_as: f64,
    pub t_af: usize,
    pub t_b: usize,
    pub t_eu_as: usize,
    pub t_mx: usize,
    /// Proportion of `MX` ancestry in `MXL`.
    pub f_mx: f64,
    /// Subpopulations kept at the end, among `AF`, `EU`, `AS`, `MX` and
    /// `MXL`.
    pub outcome: Vec<String>,
    pub scale: f64,
}

impl Default for SettlementOfNewWorldParams {
    fn default() -> Self {
        Self {
            n_a: 7300,
            n_af: 12300,
            n_b: 2100,
            n_eu0: 1500,
            r_eu: 0.0023,
            n_as0: 590,
            r_as: 0.0037,
            n_mx0: 800,
            r_mx: 0.005,
            m_af_eu: 0.00003,
            m_af_as: 0.000019,
            m_eu_as: 0.0000135,
            t_af: 220000 / 25,
            t_b: 140000 / 25,
            t_eu_as: 26400 / 25,
            t_mx: 21600 / 25,
            f_mx: 0.48,
            outcome: vec!["MXL".to_string()],
            scale: 1.0,
        }
    }
}

impl SettlementOfNewWorldParams {
    const SUB_POPS: [&'static str; 5] = ["AF", "EU", "AS", "MX", "MXL"];

    /// Build the model for an evolution of `t0` generations.
    pub fn build<P: PopulationHandle + 'static>(
        &self,
        t0: usize,
        migrator: Option<Migrator<'_, P>>,
        ops: Vec<BoxedOperator<P>>,
    ) -> Result<MultiStageModel<P>, DemographyError> {
        check_scale(self.scale)?;
        check_length(t0, self.t_af)?;
        check_order(&[
            ("T_AF", self.t_af),
            ("T_B", self.t_b),
            ("T_EU_AS", self.t_eu_as),
            ("T_MX", self.t_mx),
        ])?;
        if let Some(unknown) = self
            .outcome
            .iter()
            .find(|name| !Self::SUB_POPS.contains(&name.as_str()))
        {
            return Err(DemographyError::InvalidPreset(format!(
                "unknown outcome subpopulation {unknown}"
            )));
        }
        let s = self.scale;
        let t = |generations: usize| scaled(generations as f64, s);
        let n = |size: usize| scaled(size as f64, s);
        let migration = || {
            MigrationSpec::new(vec![
                vec![0.0, self.m_af_eu * s, self.m_af_as * s],
                vec![self.m_eu_as * s, 0.0, self.m_af_eu * s],
                vec![self.m_af_as * s, self.m_af_eu * s, 0.0],
            ])
        };

        // one generation is left for the admixture
        let split: BoxedModel<P> = Box::new(InstantChangeModel::new(
            Some(t((t0 - self.t_eu_as).saturating_sub(1))),
            RawSize::named(n(self.n_a), "Ancestral"),
            vec![
                (t(t0 - self.t_af), RawSize::named(n(self.n_af), "AF")),
                (
                    t(t0 - self.t_b),
                    RawSize::list([RawSize::keep(), RawSize::named(n(self.n_b), "B")]),
                ),
            ],
        )?);
        let eu_as = exponential(
            t(self.t_eu_as - self.t_mx),
            RawSize::list([
                RawSize::keep(),
                RawSize::list([
                    RawSize::named(n(self.n_eu0), "EU"),
                    RawSize::named(n(self.n_as0), "AS"),
                ]),
            ]),
            None,
            Some(vec![0.0, self.r_eu * s, self.r_as * s]),
            migration_ops(migrator, migration()),
        )?;
        let mx = exponential(
            t(self.t_mx),
            RawSize::list([
                RawSize::keep(),
                RawSize::keep(),
                RawSize::list([
                    RawSize::named(RawSize::keep(), "AS"),
                    RawSize::named(n(self.n_mx0), "MX"),
                ]),
            ]),
            None,
            Some(vec![0.0, self.r_eu * s, self.r_as * s, self.r_mx * s]),
            migration_ops(migrator, migration().with_sub_pops(vec![0, 1, 2])),
        )?;
        let admixture: BoxedModel<P> = Box::new(AdmixtureModel::new(
            Some(1),
            RawSize::list(vec![RawSize::keep(); 4]),
            AdmixtureKind::HybridIsolation {
                parent1: 1,
                parent2: 3,
                mu: 1.0 - self.f_mx,
                name: Some("MXL".to_string()),
            },
        )?);
        let kept = Self::SUB_POPS.iter().map(|name| {
            if self.outcome.iter().any(|kept| kept == name) {
                RawSize::keep()
            } else {
                RawSize::count(0)
            }
        });
        let outcome: BoxedModel<P> = Box::new(
            InstantChangeModel::new(Some(1), RawSize::list(kept), vec![])?.remove_empty_sub_pops(true),
        );

        Ok(MultiStageModel::new(vec![split, eu_as, mx, admixture, outcome])?.with_ops(ops))
    }
}

/// The model of Schaffner et al. (2005) used by the coalescent simulator
/// cosi: Africa, an out-of-Africa population splitting into Asia and
/// Europe, bottlenecks after each split and three final expansions.
///
/// Bottlenecks start 200 generations after a split and last 200
/// generations, at size `100 / F`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CosiParams {
    pub n_a: usize,
    pub n_af: usize,
    pub n_ooa: usize,
    pub n_af1: usize,
    pub n_as1: usize,
    pub n_eu1: usize,
    pub t_af: usize,
    pub t_ooa: usize,
    pub t_eu_as: usize,
    pub t_as_exp: usize,
    pub t_eu_exp: usize,
    pub t_af_exp: usize,
    pub f_ooa: f64,
    pub f_as: f64,
    pub f_eu: f64,
    pub f_af: f64,
    pub m_af_eu: f64,
    pub m_af_as: f64,
    pub scale: f64,
}

impl Default for CosiParams {
    fn default() -> Self {
        Self {
            n_a: 12500,
            n_af: 24000,
            n_ooa: 7700,
            n_af1: 100000,
            n_as1: 100000,
            n_eu1: 100000,
            t_af: 17000,
            t_ooa: 3500,
            t_eu_as: 2000,
            t_as_exp: 400,
            t_eu_exp: 350,
            t_af_exp: 200,
            f_ooa: 0.085,
            f_as: 0.067,
            f_eu: 0.020,
            f_af: 0.020,
            m_af_eu: 0.000032,
            m_af_as: 0.000008,
            scale: 1.0,
        }
    }
}

impl CosiParams {
    const BOTTLENECK_START: usize = 200;
    const BOTTLENECK_END: usize = 400;

    /// Build the model for an evolution of `t0` generations.
    pub fn build<P: PopulationHandle + 'static>(
        &self,
        t0: usize,
        migrator: Option<Migrator<'_, P>>,
        ops: Vec<BoxedOperator<P>>,
    ) -> Result<MultiStageModel<P>, DemographyError> {
        check_scale(self.scale)?;
        check_length(t0, self.t_af)?;
        check_order(&[
            ("T_AF", self.t_af),
            ("T_OoA", self.t_ooa),
            ("T_EU_AS", self.t_eu_as),
            ("T_AS_exp", self.t_as_exp),
            ("T_EU_exp", self.t_eu_exp),
            ("T_AF_exp", self.t_af_exp),
        ])?;
        let bottlenecks_end = self.t_ooa.saturating_sub(Self::BOTTLENECK_END);
        if bottlenecks_end < self.t_eu_as || self.t_eu_as < self.t_as_exp + Self::BOTTLENECK_END {
            return Err(DemographyError::InvalidPreset(
                "bottlenecks overlap with the following split".into(),
            ));
        }
        for (label, f) in [("F_OoA", self.f_ooa), ("F_AS", self.f_as), ("F_EU", self.f_eu), ("F_AF", self.f_af)] {
            if !(f.is_finite() && f > 0.0) {
                return Err(DemographyError::InvalidPreset(format!(
                    "bottleneck intensity {label}={f} should be positive"
                )));
            }
        }

        let s = self.scale;
        let t = |generations: usize| scaled(generations as f64, s);
        let n = |size: usize| scaled(size as f64, s);
        let bottleneck = |f: f64| scaled(100.0 / f, s);
        let r_as = (self.n_as1 as f64 / self.n_ooa as f64).ln() / self.t_as_exp as f64;
        let r_eu = (self.n_eu1 as f64 / self.n_ooa as f64).ln() / self.t_eu_exp as f64;
        let migration = || {
            MigrationSpec::new(vec![
                vec![0.0, self.m_af_as * s, self.m_af_eu * s],
                vec![self.m_af_as * s, 0.0, 0.0],
                vec![self.m_af_eu * s, 0.0, 0.0],
            ])
        };

        let out_of_africa: BoxedModel<P> = Box::new(InstantChangeModel::new(
            Some(t(t0 - self.t_eu_as)),
            RawSize::named(n(self.n_a), "Ancestral"),
            vec![
                (t(t0 - self.t_af), RawSize::named(n(self.n_af), "Africa")),
                (
                    t(t0 - self.t_ooa),
                    RawSize::list([
                        RawSize::named(n(self.n_af), "Africa"),
                        RawSize::named(n(self.n_ooa), "Out Of Africa"),
                    ]),
                ),
                (
                    t(t0 - self.t_ooa + Self::BOTTLENECK_START),
                    RawSize::list([bottleneck(self.f_af), bottleneck(self.f_ooa)]),
                ),
                (
                    t(t0 - self.t_ooa + Self::BOTTLENECK_END),
                    RawSize::list([n(self.n_af), n(self.n_ooa)]),
                ),
            ],
        )?);
        let asia_europe: BoxedModel<P> = Box::new(
            InstantChangeModel::new(
                Some(t(self.t_eu_as - self.t_as_exp)),
                RawSize::list([
                    RawSize::count(n(self.n_af)),
                    RawSize::list([
                        RawSize::named(n(self.n_ooa), "Asian"),
                        RawSize::named(n(self.n_ooa), "Europe"),
                    ]),
                ]),
                vec![
                    (
                        t(Self::BOTTLENECK_START),
                        RawSize::list([n(self.n_af), bottleneck(self.f_as), bottleneck(self.f_eu)]),
                    ),
                    (
                        t(Self::BOTTLENECK_END),
                        RawSize::list([n(self.n_af), n(self.n_ooa), n(self.n_ooa)]),
                    ),
                ],
            )?
            .with_ops(migration_ops(migrator, migration())),
        );
        let asia_expansion = exponential(
            t(self.t_as_exp - self.t_eu_exp),
            RawSize::list([
                RawSize::keep(),
                RawSize::named(RawSize::keep(), "Modern Asian"),
                RawSize::keep(),
            ]),
            None,
            Some(vec![0.0, r_as * s, 0.0]),
            migration_ops(migrator, migration()),
        )?;
        let europe_expansion = exponential(
            t(self.t_eu_exp - self.t_af_exp),
            RawSize::list([
                RawSize::keep(),
                RawSize::keep(),
                RawSize::named(RawSize::keep(), "Modern Europe"),
            ]),
            None,
            Some(vec![0.0, r_as * s, r_eu * s]),
            migration_ops(migrator, migration()),
        )?;
        let africa_expansion = exponential(
            t(self.t_af_exp),
            RawSize::list([
                RawSize::named(RawSize::keep(), "Modern Africa"),
                RawSize::keep(),
                RawSize::keep(),
            ]),
            Some(RawSize::list([n(self.n_af1), n(self.n_as1), n(self.n_eu1)])),
            None,
            migration_ops(migrator, migration()),
        )?;

        Ok(MultiStageModel::new(vec![
            out_of_africa,
            asia_europe,
            asia_expansion,
            europe_expansion,
            africa_expansion,
        ])?
        .with_ops(ops))
    }
}
