//! End-to-end assessment on a synthetic colony: generate overlapping
//! tracks, estimate kernel UDs, run the bootstrap grid, and print the
//! representativeness estimate.
//!
//! ```text
//! cargo run --example assess_tracks
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use reprange::{
    IndividualId, KernelDensity, PlanarFixBatch, RepParams, RepRangeError, RepresentativenessFit,
    TrackExt, TrackSet, UdProvider,
};

fn synthetic_colony(individuals: u32, fixes_per_individual: usize, seed: u64) -> TrackSet {
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
        let (mut x, mut y) = (cx, cy);
        for t in 0..fixes_per_individual {
            x = 0.7 * x + 0.3 * cx + step.sample(&mut rng);
            y = 0.7 * y + 0.3 * cy + step.sample(&mut rng);
            ids.push(IndividualId::from(individual));
            xs.push(x);
            ys.push(y);
            times.push(t as f64 * 3600.0);
        }
    }

    TrackSet::new_from_planar(&PlanarFixBatch {
        ids: &ids,
        x: &xs,
        y: &ys,
        time: &times,
    })
    .expect("synthetic fixes are finite")
}

fn main() -> Result<(), RepRangeError> {
    let tracks = synthetic_colony(12, 60, 42);
    println!(
        "Colony: {} individuals, {} fixes",
        tracks.number_of_individuals(),
        tracks.total_relocations()
    );
    if let Some(stats) = tracks.fix_count_stats() {
        println!("{stats:#}\n");
    }

    let provider = KernelDensity::new(250.0)?;
    let surfaces = provider.estimate_surfaces(&tracks)?;

    let params = RepParams::builder()
        .iterations(50)
        .seed(42)
        .build()?;
    println!("{params:#}\n");

    let result = tracks.assess_representativeness(&surfaces, &params)?;
    println!("{result:#}");
    Ok(())
}
