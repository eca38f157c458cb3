use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use reprange::{threshold, GridGeometry, IndividualId, UdSet, UdSurface};

/// A normalized random surface on an `n_cols x n_rows` unit grid.
fn random_surface(rng: &mut StdRng, n_cols: usize, n_rows: usize) -> UdSurface {
    let geometry = GridGeometry {
        x_min: 0.0,
        y_min: 0.0,
        cell_size: 1.0,
        n_cols,
        n_rows,
    };
    let raw: Vec<f64> = (0..geometry.n_cells())
        .map(|_| rng.random_range(0.0..1.0))
        .collect();
    let total: f64 = raw.iter().sum();
    let density = raw.iter().map(|d| d / total).collect();
    UdSurface::new(geometry, density).unwrap()
}

fn bench_threshold(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    c.bench_function("threshold/500_cells", |b| {
        b.iter_batched(
            || random_surface(&mut rng, 25, 20),
            |surface| black_box(threshold(&surface, 0.5)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_single_trial(c: &mut Criterion) {
    use reprange::resampling::trial::run_trial;
    use reprange::{PlanarFixBatch, TrackExt, TrackSet};

    let mut rng = StdRng::seed_from_u64(0xBEEF);

    // Ten individuals with random surfaces and a handful of fixes each.
    let ids: Vec<IndividualId> = (1u32..=10).map(IndividualId::from).collect();
    let mut surfaces = UdSet::default();
    for id in &ids {
        surfaces.insert(id.clone(), random_surface(&mut rng, 25, 20));
    }

    let mut batch_ids = Vec::new();
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut times = Vec::new();
    for id in &ids {
        for t in 0..20 {
            batch_ids.push(id.clone());
            xs.push(rng.random_range(0.0..25.0));
            ys.push(rng.random_range(0.0..20.0));
            times.push(t as f64);
        }
    }
    let tracks = TrackSet::new_from_planar(&PlanarFixBatch {
        ids: &batch_ids,
        x: &xs,
        y: &ys,
        time: &times,
    })
    .unwrap();

    let id_refs: Vec<&IndividualId> = ids.iter().collect();

    c.bench_function("run_trial/n=5_of_10", |b| {
        b.iter_batched(
            || StdRng::seed_from_u64(rng.random::<u64>()),
            |mut trial_rng| {
                black_box(run_trial(
                    &id_refs,
                    5,
                    &surfaces,
                    &tracks,
                    0.5,
                    &mut trial_rng,
                ))
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_threshold, bench_single_trial);
criterion_main!(benches);
