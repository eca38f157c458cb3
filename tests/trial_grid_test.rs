mod common;

use std::collections::HashSet;

use reprange::{
    GridGeometry, IndividualId, KernelDensity, RepParams, RepRangeError, RepresentativenessFit,
    TrackExt, UdProvider, UdSet, UdSurface,
};

use common::synthetic_colony;

#[test]
fn trial_grid_is_complete_and_bounded() {
    let tracks = synthetic_colony(10, 30, 0xB10);
    let provider = KernelDensity::new(200.0).unwrap();
    let surfaces = provider.estimate_surfaces(&tracks).unwrap();

    let params = RepParams::builder()
        .iterations(5)
        .worker_count(2)
        .seed(17)
        .build()
        .unwrap();
    let table = tracks.run_resampling(&surfaces, &params).unwrap();

    // 9 sample sizes x 5 iterations.
    assert_eq!(table.len(), 45);

    let mut pairs = HashSet::new();
    for trial in table.iter() {
        assert!(trial.sample_size >= 1 && trial.sample_size <= 9);
        assert!(trial.iteration >= 1 && trial.iteration <= 5);
        assert!(
            (0.0..=1.0).contains(&trial.inclusion),
            "inclusion {} out of range",
            trial.inclusion
        );
        assert!(
            pairs.insert((trial.sample_size, trial.iteration)),
            "duplicate trial ({}, {})",
            trial.sample_size,
            trial.iteration
        );
    }
    assert_eq!(pairs.len(), 45);
}

#[test]
fn seeded_runs_are_reproducible_across_worker_counts() {
    let tracks = synthetic_colony(8, 25, 0xB11);
    let provider = KernelDensity::new(200.0).unwrap();
    let surfaces = provider.estimate_surfaces(&tracks).unwrap();

    let run = |workers: usize| {
        let params = RepParams::builder()
            .iterations(4)
            .worker_count(workers)
            .seed(99)
            .build()
            .unwrap();
        let table = tracks.run_resampling(&surfaces, &params).unwrap();
        let mut rows: Vec<_> = table
            .iter()
            .map(|t| (t.sample_size, t.iteration, t.inclusion))
            .collect();
        rows.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        rows
    };

    assert_eq!(run(1), run(4));
}

#[test]
fn single_individual_cannot_be_resampled() {
    let tracks = synthetic_colony(1, 10, 0xB12);
    let provider = KernelDensity::new(200.0).unwrap();
    let surfaces = provider.estimate_surfaces(&tracks).unwrap();
    let params = RepParams::builder().iterations(2).build().unwrap();

    let err = tracks.run_resampling(&surfaces, &params).unwrap_err();
    assert_eq!(err, RepRangeError::NotEnoughIndividuals(1));
}

#[test]
fn mismatched_surface_geometry_is_fatal() {
    let tracks = synthetic_colony(3, 10, 0xB13);
    let provider = KernelDensity::new(200.0).unwrap();
    let mut surfaces = provider.estimate_surfaces(&tracks).unwrap();

    // Replace one surface with a foreign grid.
    let foreign = GridGeometry {
        x_min: 0.0,
        y_min: 0.0,
        cell_size: 10.0,
        n_cols: 3,
        n_rows: 3,
    };
    let id = IndividualId::from(1u32);
    surfaces.insert(id, UdSurface::new(foreign, vec![1.0 / 9.0; 9]).unwrap());

    let params = RepParams::builder().iterations(2).build().unwrap();
    let err = tracks.run_resampling(&surfaces, &params).unwrap_err();
    assert!(matches!(err, RepRangeError::GridShapeMismatch { .. }));
}

#[test]
fn missing_surface_is_fatal() {
    let tracks = synthetic_colony(3, 10, 0xB14);
    let provider = KernelDensity::new(200.0).unwrap();
    let mut surfaces: UdSet = provider.estimate_surfaces(&tracks).unwrap();
    surfaces.remove(&IndividualId::from(2u32));

    let params = RepParams::builder().iterations(2).build().unwrap();
    let err = tracks.run_resampling(&surfaces, &params).unwrap_err();
    assert_eq!(err, RepRangeError::MissingSurface("2".into()));
}

#[test]
fn identical_concentrated_surfaces_give_full_inclusion() {
    // All individuals share one surface whose core is a single cell, and
    // every fix sits in that cell: every trial scores exactly 1.
    let tracks = {
        use reprange::{PlanarFixBatch, TrackSet};
        let ids: Vec<IndividualId> = [1u32, 1, 2, 2, 3, 3, 4, 4]
            .iter()
            .map(|&n| IndividualId::from(n))
            .collect();
        let batch = PlanarFixBatch {
            ids: &ids,
            x: &[5.0, 5.2, 5.1, 5.3, 5.4, 5.2, 5.1, 5.0],
            y: &[5.0, 5.2, 5.1, 5.3, 5.4, 5.2, 5.1, 5.0],
            time: &[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0],
        };
        TrackSet::new_from_planar(&batch).unwrap()
    };

    let geometry = GridGeometry {
        x_min: 0.0,
        y_min: 0.0,
        cell_size: 10.0,
        n_cols: 2,
        n_rows: 2,
    };
    // Cell 0 carries 40% of the mass, the rest 20% each: the 50% core is
    // cell 0 alone, which contains all fixes.
    let density: Vec<f64> = vec![0.004, 0.002, 0.002, 0.002];
    let mut surfaces = UdSet::default();
    for id in tracks.keys() {
        surfaces.insert(
            id.clone(),
            UdSurface::new(geometry.clone(), density.clone()).unwrap(),
        );
    }

    let params = RepParams::builder().iterations(3).seed(5).build().unwrap();
    let table = tracks.run_resampling(&surfaces, &params).unwrap();
    assert_eq!(table.len(), 9);
    for trial in table.iter() {
        assert_eq!(trial.inclusion, 1.0);
    }
}
