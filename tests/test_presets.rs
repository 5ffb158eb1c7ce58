//! Integration tests for the published demographic histories.

use demevo::{
    demography::{
        island_rates, BoxedOperator, CosiParams, DemographicModel, MigrationSpec,
        OutOfAfricaParams, SettlementOfNewWorldParams,
    },
    errors::{DemographyError, ErrorKind},
    simulation::{Evolution, Population, PopulationHandle},
};
use std::cell::RefCell;
use std::rc::Rc;

/// A migrator whose operators log the generation and matrix size at every
/// call instead of moving individuals.
fn logging_migrator(
    log: &Rc<RefCell<Vec<(usize, usize)>>>,
) -> impl Fn(MigrationSpec) -> BoxedOperator<Population> {
    let log = Rc::clone(log);
    move |spec: MigrationSpec| {
        let log = Rc::clone(&log);
        Box::new(move |pop: &mut Population| {
            for row in &spec.rates {
                assert!(row.iter().all(|rate| (0.0..1.0).contains(rate)));
            }
            log.borrow_mut().push((pop.generation(), spec.num_sub_pops()));
            true
        }) as BoxedOperator<Population>
    }
}

#[test]
fn test_out_of_africa_trajectory() {
    let params = OutOfAfricaParams {
        scale: 100.0,
        ..Default::default()
    };
    let log = Rc::new(RefCell::new(Vec::new()));
    let migrator = logging_migrator(&log);
    let mut model = params
        .build::<Population>(8800, Some(&migrator), vec![])
        .unwrap();

    let mut pop = Population::for_model(&model, None).unwrap();
    assert_eq!(pop.sub_pop_sizes(), vec![73]);
    let trajectory = Evolution::new(&mut model).run(&mut pop).unwrap();

    assert_eq!(trajectory.num_generations(), 87);
    trajectory
        .assert_sizes([
            (0, vec![123]),
            (31, vec![123]),
            (32, vec![123, 21]),
            (86, vec![123, 245, 407]),
        ])
        .unwrap();
    assert_eq!(pop.sub_pop_names(), vec!["AF", "EU", "AS"]);

    // migration only while AF, EU and AS coexist
    let log = log.borrow();
    assert_eq!(log.len(), 8);
    assert!(log.iter().all(|&(generation, n)| generation >= 79 && n == 3));
}

#[test]
fn test_settlement_of_new_world_trajectory() {
    let params = SettlementOfNewWorldParams {
        scale: 100.0,
        outcome: vec!["AF".into(), "MXL".into()],
        ..Default::default()
    };
    let mut model = params.build::<Population>(8800, None, vec![]).unwrap();
    let mut pop = Population::new(&[73]);
    let trajectory = Evolution::new(&mut model).run(&mut pop).unwrap();

    assert_eq!(trajectory.num_generations(), 88);
    trajectory
        .assert_sizes([
            (85, vec![123, 113, 135, 436]),
            (86, vec![123, 113, 135, 436, 217]),
            (87, vec![123, 217]),
        ])
        .unwrap();
    assert_eq!(pop.sub_pop_names(), vec!["AF", "MXL"]);
    let last = trajectory.changes().last().unwrap();
    assert_eq!(last.to_string(), "87: 123 (AF), 217 (MXL)");
}

#[test]
fn test_cosi_trajectory() {
    let params = CosiParams {
        scale: 100.0,
        ..Default::default()
    };
    let mut model = params.build::<Population>(17000, None, vec![]).unwrap();
    let mut pop = Population::new(&[125]);
    let trajectory = Evolution::new(&mut model).run(&mut pop).unwrap();

    assert_eq!(trajectory.num_generations(), 169);
    trajectory
        .assert_sizes([
            (0, vec![240]),
            (135, vec![240, 77]),
            (137, vec![50, 11]),
            (139, vec![240, 77]),
            (150, vec![240, 77, 77]),
            (152, vec![240, 14, 50]),
            (168, vec![1000, 1000, 1000]),
        ])
        .unwrap();
    assert_eq!(
        pop.sub_pop_names(),
        vec!["Modern Africa", "Modern Asian", "Modern Europe"]
    );
}

#[test]
fn test_presets_run_twice() {
    let params = OutOfAfricaParams {
        scale: 200.0,
        ..Default::default()
    };
    let mut model = params.build::<Population>(8800, None, vec![]).unwrap();
    let mut pop = Population::new(&[36]);
    let first = Evolution::new(&mut model).run(&mut pop).unwrap();
    let mut pop = Population::new(&[36]);
    let second = Evolution::new(&mut model).run(&mut pop).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_preset_parameter_errors() {
    let short = SettlementOfNewWorldParams::default().build::<Population>(1000, None, vec![]);
    assert!(matches!(short, Err(DemographyError::InvalidPreset(_))));

    let bad_scale = CosiParams {
        scale: 0.0,
        ..Default::default()
    }
    .build::<Population>(20000, None, vec![]);
    let err = bad_scale.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_island_migrator_for_custom_history() {
    let rates = island_rates(0.01, 3);
    let spec = MigrationSpec::new(rates.clone()).with_sub_pops(vec![0, 1, 2]);
    assert_eq!(spec.num_sub_pops(), 3);
    let json = serde_json::to_string(&spec).unwrap();
    let back: MigrationSpec = serde_json::from_str(&json).unwrap();
    assert_eq!(back.rates, rates);
    assert_eq!(back.sub_pops, Some(vec![0, 1, 2]));
}
