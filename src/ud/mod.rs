//! # Utilization-distribution surface providers
//!
//! The resampling core consumes a ready-made [`UdSet`]: one density surface
//! per individual, all on a shared grid. Where the surfaces come from is a
//! seam behind the [`UdProvider`] trait – the crate ships a Gaussian
//! [`KernelDensity`](crate::ud::kernel_density::KernelDensity) provider,
//! and externally estimated surfaces can be supplied directly as long as
//! they pass [`validate_shared_geometry`].

pub mod kernel_density;

use ahash::RandomState;
use std::collections::HashMap;

use crate::constants::IndividualId;
use crate::grid::{GridGeometry, UdSurface};
use crate::reprange_errors::RepRangeError;
use crate::tracks::TrackSet;

/// One UD surface per individual, keyed like the [`TrackSet`].
pub type UdSet = HashMap<IndividualId, UdSurface, RandomState>;

/// Source of per-individual utilization distributions on a shared grid.
pub trait UdProvider {
    /// Estimate one surface per individual of `tracks`, all with identical
    /// grid geometry.
    fn estimate_surfaces(&self, tracks: &TrackSet) -> Result<UdSet, RepRangeError>;
}

/// Check that every surface of the set shares one grid geometry and that
/// every tracked individual has a surface.
///
/// Return
/// ----------
/// * The shared geometry on success.
/// * [`RepRangeError::GridShapeMismatch`] when two surfaces disagree,
///   [`RepRangeError::MissingSurface`] when an individual of `tracks` has
///   no surface, [`RepRangeError::NotEnoughIndividuals`] on an empty set.
pub fn validate_shared_geometry<'a>(
    surfaces: &'a UdSet,
    tracks: &TrackSet,
) -> Result<&'a GridGeometry, RepRangeError> {
    let mut reference: Option<&GridGeometry> = None;
    for surface in surfaces.values() {
        match reference {
            None => reference = Some(&surface.geometry),
            Some(geom) => {
                if *geom != surface.geometry {
                    return Err(RepRangeError::GridShapeMismatch {
                        expected_rows: geom.n_rows,
                        expected_cols: geom.n_cols,
                        rows: surface.geometry.n_rows,
                        cols: surface.geometry.n_cols,
                    });
                }
            }
        }
    }
    for id in tracks.keys() {
        if !surfaces.contains_key(id) {
            return Err(RepRangeError::MissingSurface(id.to_string()));
        }
    }
    reference.ok_or(RepRangeError::NotEnoughIndividuals(0))
}
