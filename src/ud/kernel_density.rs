//! # Gaussian kernel density estimation of utilization distributions
//!
//! The default [`UdProvider`]: a fixed-bandwidth bivariate Gaussian kernel
//! evaluated at the cell centers of one shared grid. The grid covers the
//! extent of **all** fixes plus a margin of three bandwidths, so the tails
//! of every individual's kernel fit on the raster, and is sized to a
//! configurable target cell count.
//!
//! Each surface is renormalized so `Σ density · cell_size² = 1`,
//! compensating the small mass loss from evaluating a continuous kernel on
//! a finite raster. An individual without fixes yields an all-zero surface;
//! downstream, trials pooling only such surfaces are degenerate and score
//! zero rather than failing the batch.

use crate::constants::{Meter, DEFAULT_GRID_CELLS};
use crate::grid::{GridGeometry, UdSurface};
use crate::reprange_errors::RepRangeError;
use crate::tracks::TrackSet;
use crate::ud::{UdProvider, UdSet};

/// Fixed-bandwidth Gaussian kernel density provider.
#[derive(Debug, Clone)]
pub struct KernelDensity {
    /// Kernel bandwidth (smoothing parameter), in meters.
    smoothing: Meter,
    /// Approximate total cell count of the shared grid.
    grid_cells: usize,
}

impl KernelDensity {
    /// Create a provider with the given bandwidth and the default
    /// ~500-cell grid.
    ///
    /// Return
    /// ----------
    /// * [`RepRangeError::InvalidParameter`] when the bandwidth is not
    ///   strictly positive.
    pub fn new(smoothing: Meter) -> Result<Self, RepRangeError> {
        if !(smoothing.is_finite() && smoothing > 0.0) {
            return Err(RepRangeError::InvalidParameter(
                "kernel smoothing parameter must be > 0".into(),
            ));
        }
        Ok(KernelDensity {
            smoothing,
            grid_cells: DEFAULT_GRID_CELLS,
        })
    }

    /// Override the target cell count of the shared grid.
    pub fn with_grid_cells(mut self, grid_cells: usize) -> Self {
        self.grid_cells = grid_cells;
        self
    }

    /// The grid shared by all surfaces this provider estimates for
    /// `tracks`: the fix extent padded by three bandwidths.
    pub fn shared_grid(&self, tracks: &TrackSet) -> Result<GridGeometry, RepRangeError> {
        let mut x_lo = f64::INFINITY;
        let mut x_hi = f64::NEG_INFINITY;
        let mut y_lo = f64::INFINITY;
        let mut y_hi = f64::NEG_INFINITY;
        for fixes in tracks.values() {
            for fix in fixes {
                x_lo = x_lo.min(fix.x);
                x_hi = x_hi.max(fix.x);
                y_lo = y_lo.min(fix.y);
                y_hi = y_hi.max(fix.y);
            }
        }
        if !x_lo.is_finite() {
            return Err(RepRangeError::InvalidParameter(
                "cannot build a grid over a set with no fixes".into(),
            ));
        }
        GridGeometry::covering(
            (x_lo, x_hi),
            (y_lo, y_hi),
            3.0 * self.smoothing,
            self.grid_cells,
        )
    }

    fn surface_for(&self, geometry: &GridGeometry, fixes: &[(Meter, Meter)]) -> UdSurface {
        let n_cells = geometry.n_cells();
        let mut density = vec![0.0; n_cells];
        if fixes.is_empty() {
            return UdSurface {
                geometry: geometry.clone(),
                density,
            };
        }

        let h2 = self.smoothing * self.smoothing;
        let norm = 1.0 / (2.0 * std::f64::consts::PI * h2 * fixes.len() as f64);
        for (idx, d) in density.iter_mut().enumerate() {
            let (cx, cy) = geometry.cell_center(idx);
            let mut acc = 0.0;
            for &(fx, fy) in fixes {
                let dx = cx - fx;
                let dy = cy - fy;
                acc += (-(dx * dx + dy * dy) / (2.0 * h2)).exp();
            }
            *d = acc * norm;
        }

        // Renormalize the rasterized kernel sum to unit mass.
        let total: f64 = density.iter().sum::<f64>() * geometry.cell_area();
        if total > 0.0 {
            for d in &mut density {
                *d /= total;
            }
        }

        UdSurface {
            geometry: geometry.clone(),
            density,
        }
    }
}

impl UdProvider for KernelDensity {
    fn estimate_surfaces(&self, tracks: &TrackSet) -> Result<UdSet, RepRangeError> {
        let geometry = self.shared_grid(tracks)?;
        let mut surfaces = UdSet::default();
        for (id, fixes) in tracks {
            let points: Vec<(Meter, Meter)> = fixes.iter().map(|f| (f.x, f.y)).collect();
            surfaces.insert(id.clone(), self.surface_for(&geometry, &points));
        }
        Ok(surfaces)
    }
}

#[cfg(test)]
mod kernel_density_tests {
    use super::*;
    use crate::constants::IndividualId;
    use crate::tracks::track_ext::{PlanarFixBatch, TrackExt};
    use approx::assert_relative_eq;

    fn two_individual_set() -> TrackSet {
        let ids: Vec<IndividualId> = ["a", "a", "b", "b"]
            .iter()
            .map(|&s| IndividualId::from(s))
            .collect();
        let batch = PlanarFixBatch {
            ids: &ids,
            x: &[0.0, 100.0, 500.0, 600.0],
            y: &[0.0, 50.0, 500.0, 550.0],
            time: &[0.0, 1.0, 0.0, 1.0],
        };
        TrackSet::new_from_planar(&batch).unwrap()
    }

    #[test]
    fn test_surfaces_share_geometry_and_unit_mass() {
        let tracks = two_individual_set();
        let provider = KernelDensity::new(50.0).unwrap();
        let surfaces = provider.estimate_surfaces(&tracks).unwrap();
        assert_eq!(surfaces.len(), 2);

        let geoms: Vec<_> = surfaces.values().map(|s| s.geometry.clone()).collect();
        assert_eq!(geoms[0], geoms[1]);

        for surface in surfaces.values() {
            assert_relative_eq!(surface.total_mass(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_density_peaks_near_the_fixes() {
        let tracks = two_individual_set();
        let provider = KernelDensity::new(50.0).unwrap();
        let surfaces = provider.estimate_surfaces(&tracks).unwrap();
        let a = surfaces.get(&IndividualId::from("a")).unwrap();

        let near = a.geometry.cell_index(50.0, 25.0).unwrap();
        let far = a.geometry.cell_index(550.0, 525.0).unwrap();
        assert!(a.density[near] > a.density[far]);
    }

    #[test]
    fn test_invalid_bandwidth_is_rejected() {
        assert!(KernelDensity::new(0.0).is_err());
        assert!(KernelDensity::new(-1.0).is_err());
        assert!(KernelDensity::new(f64::NAN).is_err());
    }
}
