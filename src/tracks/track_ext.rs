//! # Building and inspecting track sets
//!
//! Columnar batches of fixes (one entry per fix, parallel columns) are the
//! construction interface of a [`TrackSet`]: either already-projected
//! planar coordinates, or geodetic lon/lat that gets normalized through the
//! equal-area projection of [`projection`](crate::tracks::projection)
//! during ingestion. The [`TrackExt`] trait also provides set-level metrics
//! used for logging and reporting.

use std::fmt;

use crate::constants::{Degree, IndividualId, Meter, Relocations, Timestamp};
use crate::reprange_errors::RepRangeError;
use crate::tracks::projection::{centroid, project, unwrap_longitudes, ProjectionCenter};
use crate::tracks::{Relocation, TrackSet};

/// A borrowed batch of already-projected fixes.
///
/// Columns are parallel: entry `i` of every slice belongs to the same fix.
#[derive(Debug, Clone, Copy)]
pub struct PlanarFixBatch<'a> {
    pub ids: &'a [IndividualId],
    pub x: &'a [Meter],
    pub y: &'a [Meter],
    pub time: &'a [Timestamp],
}

/// A borrowed batch of geodetic fixes (degrees, WGS-style lon/lat).
#[derive(Debug, Clone, Copy)]
pub struct GeoFixBatch<'a> {
    pub ids: &'a [IndividualId],
    pub lon: &'a [Degree],
    pub lat: &'a [Degree],
    pub time: &'a [Timestamp],
}

fn check_columns(len: usize, a: usize, b: usize, c: usize) -> Result<(), RepRangeError> {
    if a != len || b != len || c != len {
        return Err(RepRangeError::InvalidParameter(format!(
            "fix batch columns have mismatched lengths ({len}, {a}, {b}, {c})"
        )));
    }
    Ok(())
}

/// Summary statistics for per-individual fix counts.
///
/// Percentiles use the *nearest-rank* method (`round(q × (N-1))`, clamped),
/// which stays stable for the small individual counts typical of tracking
/// studies.
///
/// Display
/// -----------------
/// * `format!("{}", stats)` – compact single-line summary.
/// * `format!("{:#}", stats)` – multi-line table.
#[derive(Debug, Clone, Copy)]
pub struct FixCountStats {
    pub min: usize,
    pub p25: usize,
    pub median: usize,
    pub p95: usize,
    pub max: usize,
}

impl fmt::Display for FixCountStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Fix count per individual — summary")?;
            writeln!(f, "----------------------------------")?;
            writeln!(f, "min    : {}", self.min)?;
            writeln!(f, "p25    : {}", self.p25)?;
            writeln!(f, "median : {}", self.median)?;
            writeln!(f, "p95    : {}", self.p95)?;
            write!(f, "max    : {}", self.max)
        } else {
            write!(
                f,
                "min={}, p25={}, median={}, p95={}, max={}",
                self.min, self.p25, self.median, self.p95, self.max
            )
        }
    }
}

pub trait TrackExt: Sized {
    /// Build a new set from a batch of already-projected fixes.
    ///
    /// Every coordinate and timestamp must be finite; each individual's
    /// relocations end up sorted by time.
    fn new_from_planar(batch: &PlanarFixBatch) -> Result<Self, RepRangeError>;

    /// Append a batch of already-projected fixes to an existing set.
    fn add_from_planar(&mut self, batch: &PlanarFixBatch) -> Result<(), RepRangeError>;

    /// Build a new set from geodetic fixes.
    ///
    /// Longitudes are unwrapped across the antimeridian when needed, the
    /// projection is centered on the data centroid, and every fix is
    /// projected to the shared planar frame. The center is returned with
    /// the set so callers can map results back.
    fn new_from_geodetic(batch: &GeoFixBatch) -> Result<(Self, ProjectionCenter), RepRangeError>;

    /// Count all relocations across individuals.
    fn total_relocations(&self) -> usize;

    /// Number of distinct tracked individuals.
    fn number_of_individuals(&self) -> usize;

    /// Distribution statistics of the per-individual fix counts, or `None`
    /// for an empty set.
    fn fix_count_stats(&self) -> Option<FixCountStats>;

    /// Identifiers in a stable sorted order.
    ///
    /// The hash map itself iterates in arbitrary order; resampling draws
    /// subsets against this ordering so a configured seed reproduces the
    /// same subsets run after run.
    fn sorted_ids(&self) -> Vec<&IndividualId>;
}

fn push_fix(
    set: &mut TrackSet,
    id: &IndividualId,
    x: Meter,
    y: Meter,
    time: Timestamp,
    row: usize,
) -> Result<(), RepRangeError> {
    if !(x.is_finite() && y.is_finite()) {
        return Err(RepRangeError::MissingCoordinates {
            id: id.to_string(),
            row,
        });
    }
    if !time.is_finite() {
        return Err(RepRangeError::InvalidParameter(format!(
            "fix record {row} of individual {id} has a non-finite timestamp"
        )));
    }
    set.entry(id.clone())
        .or_insert_with(Relocations::new)
        .push(Relocation::new(x, y, time));
    Ok(())
}

fn sort_by_time(set: &mut TrackSet) {
    for fixes in set.values_mut() {
        fixes.sort_by(|a, b| {
            a.time
                .partial_cmp(&b.time)
                .expect("timestamps validated finite at ingestion")
        });
    }
}

impl TrackExt for TrackSet {
    fn new_from_planar(batch: &PlanarFixBatch) -> Result<Self, RepRangeError> {
        let mut set = TrackSet::default();
        set.add_from_planar(batch)?;
        Ok(set)
    }

    fn add_from_planar(&mut self, batch: &PlanarFixBatch) -> Result<(), RepRangeError> {
        check_columns(
            batch.ids.len(),
            batch.x.len(),
            batch.y.len(),
            batch.time.len(),
        )?;
        for (row, id) in batch.ids.iter().enumerate() {
            push_fix(self, id, batch.x[row], batch.y[row], batch.time[row], row)?;
        }
        sort_by_time(self);
        Ok(())
    }

    fn new_from_geodetic(batch: &GeoFixBatch) -> Result<(Self, ProjectionCenter), RepRangeError> {
        check_columns(
            batch.ids.len(),
            batch.lon.len(),
            batch.lat.len(),
            batch.time.len(),
        )?;
        for (row, id) in batch.ids.iter().enumerate() {
            if !(batch.lon[row].is_finite() && batch.lat[row].is_finite()) {
                return Err(RepRangeError::MissingCoordinates {
                    id: id.to_string(),
                    row,
                });
            }
        }

        let mut lons = batch.lon.to_vec();
        unwrap_longitudes(&mut lons);
        let center = centroid(&lons, batch.lat).ok_or_else(|| {
            RepRangeError::InvalidParameter("cannot project an empty fix batch".into())
        })?;

        let mut set = TrackSet::default();
        for (row, id) in batch.ids.iter().enumerate() {
            let (x, y) = project(center, lons[row], batch.lat[row])?;
            push_fix(&mut set, id, x, y, batch.time[row], row)?;
        }
        sort_by_time(&mut set);
        Ok((set, center))
    }

    #[inline]
    fn total_relocations(&self) -> usize {
        self.values().map(|fixes| fixes.len()).sum()
    }

    #[inline]
    fn number_of_individuals(&self) -> usize {
        self.len()
    }

    fn fix_count_stats(&self) -> Option<FixCountStats> {
        let mut counts: Vec<usize> = self.values().map(|fixes| fixes.len()).collect();
        if counts.is_empty() {
            return None;
        }
        counts.sort_unstable();

        #[inline]
        fn q_index(n: usize, q: f64) -> usize {
            let pos = q * (n as f64 - 1.0);
            let idx = pos.round() as isize;
            idx.clamp(0, (n as isize) - 1) as usize
        }

        let n = counts.len();
        Some(FixCountStats {
            min: counts[0],
            p25: counts[q_index(n, 0.25)],
            median: counts[q_index(n, 0.50)],
            p95: counts[q_index(n, 0.95)],
            max: counts[n - 1],
        })
    }

    fn sorted_ids(&self) -> Vec<&IndividualId> {
        let mut ids: Vec<&IndividualId> = self.keys().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod track_ext_tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<IndividualId> {
        names.iter().map(|&s| IndividualId::from(s)).collect()
    }

    #[test]
    fn test_new_from_planar_sorts_by_time() {
        let id = ids(&["a", "a", "a"]);
        let batch = PlanarFixBatch {
            ids: &id,
            x: &[2.0, 0.0, 1.0],
            y: &[0.0, 0.0, 0.0],
            time: &[30.0, 10.0, 20.0],
        };
        let set = TrackSet::new_from_planar(&batch).unwrap();
        let fixes = set.get(&IndividualId::from("a")).unwrap();
        let times: Vec<f64> = fixes.iter().map(|f| f.time).collect();
        assert_eq!(times, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_non_finite_coordinate_is_fatal() {
        let id = ids(&["a"]);
        let batch = PlanarFixBatch {
            ids: &id,
            x: &[f64::NAN],
            y: &[0.0],
            time: &[0.0],
        };
        let err = TrackSet::new_from_planar(&batch).unwrap_err();
        assert_eq!(
            err,
            RepRangeError::MissingCoordinates {
                id: "a".into(),
                row: 0
            }
        );
    }

    #[test]
    fn test_column_length_mismatch_is_rejected() {
        let id = ids(&["a", "b"]);
        let batch = PlanarFixBatch {
            ids: &id,
            x: &[0.0],
            y: &[0.0, 1.0],
            time: &[0.0, 1.0],
        };
        assert!(TrackSet::new_from_planar(&batch).is_err());
    }

    #[test]
    fn test_geodetic_ingestion_centers_on_centroid() {
        let id = ids(&["a", "b"]);
        let batch = GeoFixBatch {
            ids: &id,
            lon: &[10.0, 10.2],
            lat: &[45.0, 45.0],
            time: &[0.0, 0.0],
        };
        let (set, center) = TrackSet::new_from_geodetic(&batch).unwrap();
        assert_eq!(set.number_of_individuals(), 2);
        assert!((center.lon - 10.1).abs() < 1e-9);
        assert!((center.lat - 45.0).abs() < 1e-9);

        // Symmetric fixes land symmetric around the origin.
        let xa = set.get(&IndividualId::from("a")).unwrap()[0].x;
        let xb = set.get(&IndividualId::from("b")).unwrap()[0].x;
        assert!((xa + xb).abs() < 1.0);
    }

    #[test]
    fn test_fix_count_stats_and_totals() {
        let id = ids(&["a", "a", "a", "b", "c"]);
        let batch = PlanarFixBatch {
            ids: &id,
            x: &[0.0; 5],
            y: &[0.0; 5],
            time: &[1.0, 2.0, 3.0, 1.0, 1.0],
        };
        let set = TrackSet::new_from_planar(&batch).unwrap();
        assert_eq!(set.total_relocations(), 5);
        assert_eq!(set.number_of_individuals(), 3);
        let stats = set.fix_count_stats().unwrap();
        assert_eq!(stats.min, 1);
        assert_eq!(stats.max, 3);
        assert_eq!(stats.median, 1);
    }

    #[test]
    fn test_sorted_ids_are_stable() {
        let id = ids(&["m", "a", "z"]);
        let batch = PlanarFixBatch {
            ids: &id,
            x: &[0.0; 3],
            y: &[0.0; 3],
            time: &[0.0; 3],
        };
        let set = TrackSet::new_from_planar(&batch).unwrap();
        let sorted: Vec<String> = set.sorted_ids().iter().map(|i| i.to_string()).collect();
        assert_eq!(sorted, vec!["a", "m", "z"]);
    }
}
