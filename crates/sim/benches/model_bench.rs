use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use demevo_sim::base::{normalize, RawSize};
use demevo_sim::demography::{DemographicModel, ExponentialGrowthModel, InstantChangeModel};
use demevo_sim::simulation::{fit, Evolution, Population, PopulationHandle};

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let raw = RawSize::list([
        RawSize::named(1000usize, "A"),
        RawSize::list([RawSize::proportion(0.3), RawSize::named(RawSize::keep(), "C")]),
        RawSize::count(250),
    ]);

    group.bench_function("nested_list", |b| {
        b.iter(|| black_box(normalize(black_box(&raw)).unwrap()))
    });

    group.finish();
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");

    for &n in &[2usize, 8, 32] {
        let specs = normalize(&RawSize::list((0..n).map(|i| {
            RawSize::list([RawSize::proportion(0.5), RawSize::named(RawSize::keep(), format!("sp{i}"))])
        })))
        .unwrap();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("split_every_sub_pop", n), &n, |b, &n| {
            b.iter_batched(
                || Population::new(&vec![100; n]),
                |mut pop| {
                    fit(&mut pop, &specs).unwrap();
                    black_box(pop)
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_growth_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("growth_apply");
    let generations = 100;

    group.throughput(Throughput::Elements(generations as u64));
    group.bench_function("exponential_per_generation", |b| {
        b.iter_batched(
            || {
                let model: ExponentialGrowthModel = ExponentialGrowthModel::builder()
                    .generations(generations)
                    .initial_size(vec![100usize, 200, 300])
                    .rate(0.01)
                    .build()
                    .unwrap();
                (model, Population::new(&[100, 200, 300]))
            },
            |(mut model, mut pop)| {
                for _ in 0..generations {
                    black_box(model.apply(&mut pop).unwrap());
                    pop.increment_generation();
                }
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_evolution_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolution_run");

    for &generations in &[10usize, 100, 1000] {
        group.throughput(Throughput::Elements(generations as u64));
        group.bench_with_input(
            BenchmarkId::new("instant_change", generations),
            &generations,
            |b, &gens| {
                let mut model: InstantChangeModel = InstantChangeModel::new(
                    Some(gens),
                    1000usize,
                    vec![(gens / 2, RawSize::list([RawSize::count(500), RawSize::count(500)]))],
                )
                .unwrap();
                b.iter(|| {
                    let mut pop = Population::new(&[1000]);
                    black_box(Evolution::new(&mut model).run(&mut pop).unwrap())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_normalize,
    bench_fit,
    bench_growth_apply,
    bench_evolution_run
);
criterion_main!(benches);
