use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use draft_prep::preprocessing::FeatureBuilder;
use draft_prep::synthetic::{Sampler, SMOTE};
use draft_prep::table::{Column, Table};
use ndarray::{Array1, Array2};
use rand::prelude::*;

const TEAMS: [&str; 4] = ["Duke", "Kansas", "Gonzaga", "Baylor"];

fn create_player_table(n_rows: usize, with_target: bool) -> Table {
    let mut rng = StdRng::seed_from_u64(42);

    let mut columns = vec![
        Column::text(
            "team",
            (0..n_rows).map(|_| Some(TEAMS[rng.gen_range(0..TEAMS.len())])).collect(),
        ),
        Column::numeric("pick", (0..n_rows).map(|_| None).collect()),
        Column::numeric("Rec_Rank", (0..n_rows).map(|_| Some(rng.gen::<f64>() * 100.0)).collect()),
        Column::numeric(
            "rimmade",
            (0..n_rows)
                .map(|_| if rng.gen_bool(0.2) { None } else { Some(rng.gen_range(0.0..40.0)) })
                .collect(),
        ),
    ];
    for i in 0..8 {
        columns.push(Column::numeric(
            format!("stat_{}", i),
            (0..n_rows)
                .map(|_| if rng.gen_bool(0.05) { None } else { Some(rng.gen::<f64>() * 30.0) })
                .collect(),
        ));
    }
    if with_target {
        columns.push(Column::numeric(
            "drafted",
            (0..n_rows).map(|_| Some(if rng.gen_bool(0.05) { 1.0 } else { 0.0 })).collect(),
        ));
    }

    Table::new(columns).unwrap()
}

fn create_imbalanced_data(n_rows: usize, n_features: usize) -> (Array2<f64>, Array1<i64>) {
    let mut rng = StdRng::seed_from_u64(7);
    let x = Array2::from_shape_fn((n_rows, n_features), |_| rng.gen::<f64>());
    let y = Array1::from_shape_fn(n_rows, |i| if i % 20 == 0 { 1 } else { 0 });
    (x, y)
}

fn bench_feature_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("feature_build");
    group.sample_size(10);

    for n_rows in [1000, 10000].iter() {
        let train = create_player_table(*n_rows, true);
        let test = create_player_table(*n_rows / 4, false);

        group.bench_with_input(BenchmarkId::new("build", n_rows), &(train, test), |b, (train, test)| {
            b.iter(|| FeatureBuilder::new().build(black_box(train), black_box(test)).unwrap())
        });
    }

    group.finish();
}

fn bench_smote(c: &mut Criterion) {
    let mut group = c.benchmark_group("smote");
    group.sample_size(10);

    for n_rows in [1000, 5000].iter() {
        let (x, y) = create_imbalanced_data(*n_rows, 10);

        group.bench_with_input(BenchmarkId::new("fit_resample", n_rows), &(x, y), |b, (x, y)| {
            b.iter(|| {
                let mut smote = SMOTE::new();
                smote.fit_resample(black_box(x), black_box(y)).unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_feature_build, bench_smote);
criterion_main!(benches);
