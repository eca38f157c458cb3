//! # Delimited-file ingestion of relocation fixes
//!
//! Reads one fix per row from a CSV file with headers. Recognized columns:
//!
//! * `id` – individual identifier, required on every row;
//! * `x`, `y` – projected planar coordinates (m);
//! * `lon`, `lat` – geodetic coordinates (degrees);
//! * `time` – timestamp, required on every row.
//!
//! When every row carries `x` and `y` the fixes are taken as already
//! projected. Otherwise `lon`/`lat` must be present on **every** row and
//! the set is normalized through the centroid-centered equal-area
//! projection. A row with neither form of coordinates, or with no
//! identifier, aborts ingestion before any trial can run.

use camino::Utf8Path;
use serde::Deserialize;

use crate::constants::IndividualId;
use crate::reprange_errors::RepRangeError;
use crate::tracks::projection::ProjectionCenter;
use crate::tracks::track_ext::{GeoFixBatch, PlanarFixBatch, TrackExt};
use crate::tracks::TrackSet;

#[derive(Debug, Deserialize)]
struct RawFixRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    time: Option<f64>,
}

/// Read a [`TrackSet`] from a delimited file.
///
/// Arguments
/// -----------------
/// * `path`: UTF-8 path to a headed CSV file.
///
/// Return
/// ----------
/// * The set, plus the projection center when the geodetic path was taken
///   (`None` for already-projected input).
///
/// See also
/// ------------
/// * [`TrackExt::new_from_planar`] / [`TrackExt::new_from_geodetic`] –
///   The columnar constructors this reader delegates to.
pub fn read_track_set(
    path: &Utf8Path,
) -> Result<(TrackSet, Option<ProjectionCenter>), RepRangeError> {
    let mut reader = csv::Reader::from_path(path.as_std_path())?;

    let mut ids: Vec<IndividualId> = Vec::new();
    let mut records: Vec<RawFixRecord> = Vec::new();

    for (row, result) in reader.deserialize::<RawFixRecord>().enumerate() {
        let record = result?;
        let id_str = match record.id.as_deref() {
            Some(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => return Err(RepRangeError::MissingIdentifier(row)),
        };
        if record.time.is_none() {
            return Err(RepRangeError::InvalidParameter(format!(
                "fix record {row} of individual {id_str} has no timestamp"
            )));
        }
        let id = id_str
            .parse::<IndividualId>()
            .unwrap_or(IndividualId::String(id_str));
        ids.push(id);
        records.push(record);
    }

    let times: Vec<f64> = records.iter().map(|r| r.time.unwrap()).collect();
    let planar = records.iter().all(|r| r.x.is_some() && r.y.is_some());

    if planar {
        let x: Vec<f64> = records.iter().map(|r| r.x.unwrap()).collect();
        let y: Vec<f64> = records.iter().map(|r| r.y.unwrap()).collect();
        let batch = PlanarFixBatch {
            ids: &ids,
            x: &x,
            y: &y,
            time: &times,
        };
        Ok((TrackSet::new_from_planar(&batch)?, None))
    } else {
        let mut lon = Vec::with_capacity(records.len());
        let mut lat = Vec::with_capacity(records.len());
        for (row, r) in records.iter().enumerate() {
            match (r.lon, r.lat) {
                (Some(lo), Some(la)) => {
                    lon.push(lo);
                    lat.push(la);
                }
                _ => {
                    return Err(RepRangeError::MissingCoordinates {
                        id: ids[row].to_string(),
                        row,
                    })
                }
            }
        }
        let batch = GeoFixBatch {
            ids: &ids,
            lon: &lon,
            lat: &lat,
            time: &times,
        };
        let (set, center) = TrackSet::new_from_geodetic(&batch)?;
        Ok((set, Some(center)))
    }
}
