#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use reprange::{IndividualId, PlanarFixBatch, TrackExt, TrackSet};

/// Build a synthetic colony of central-place foragers: each individual
/// gets a home center drawn around the origin and a mean-reverting random
/// walk of fixes around it, so individual ranges overlap the way real
/// colony data does.
pub fn synthetic_colony(individuals: u32, fixes_per_individual: usize, seed: u64) -> TrackSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let home_spread = Normal::new(0.0, 400.0).unwrap();
    let step = Normal::new(0.0, 150.0).unwrap();

    let mut ids = Vec::new();
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut times = Vec::new();

    for individual in 1..=individuals {
        let cx: f64 = home_spread.sample(&mut rng);
        let cy: f64 = home_spread.sample(&mut rng);
        let mut x = cx;
        let mut y = cy;
        for t in 0..fixes_per_individual {
            x = 0.7 * x + 0.3 * cx + step.sample(&mut rng);
            y = 0.7 * y + 0.3 * cy + step.sample(&mut rng);
            ids.push(IndividualId::from(individual));
            xs.push(x);
            ys.push(y);
            times.push(t as f64 * 3600.0);
        }
    }

    let batch = PlanarFixBatch {
        ids: &ids,
        x: &xs,
        y: &ys,
        time: &times,
    };
    TrackSet::new_from_planar(&batch).unwrap()
}
