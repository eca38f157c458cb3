//! # Core-area thresholding of a utilization distribution
//!
//! Converts a density surface into a binary "inside/outside the top-mass
//! contour" mask with a cumulative-mass rule.
//!
//! ## Algorithm
//! -----------------
//! 1. Per-cell probability mass = density × cell_size² (the
//!    area-normalization convention of kernel home-range estimators, where
//!    density is per unit area and the cell is square).
//! 2. Cells are ordered by descending mass; ties are broken by ascending
//!    original cell index so the boundary is deterministic.
//! 3. Mass is accumulated in that order. A cell is *inside* iff the
//!    cumulative mass **including the cell itself** is strictly below the
//!    target fraction. The first cell that pushes the running total to or
//!    past the target is excluded, as is everything after it.
//!
//! Consequently the inside set always carries strictly less than the target
//! mass, and adding the next-ranked cell would reach or exceed it.
//!
//! Non-finite or negative densities contribute zero mass and land at the
//! end of the ordering; they can never be inside a contour with a positive
//! target.

use crate::grid::{GridGeometry, UdSurface};

/// Binary core-area mask on the same grid as the thresholded surface.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreAreaMask {
    pub geometry: GridGeometry,
    /// `true` for cells inside the contour, row-major like the surface.
    pub inside: Vec<bool>,
}

impl CoreAreaMask {
    /// Whether the point `(x, y)` falls in an inside cell. Points outside
    /// the grid extent are never inside.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        match self.geometry.cell_index(x, y) {
            Some(idx) => self.inside[idx],
            None => false,
        }
    }

    /// Number of cells inside the contour.
    pub fn inside_count(&self) -> usize {
        self.inside.iter().filter(|&&b| b).count()
    }
}

/// Threshold a surface at the smallest set of highest-density cells whose
/// cumulative mass stays strictly below `target_mass`.
///
/// Arguments
/// -----------------
/// * `surface`: density surface; need not be normalized (a pooled mean of
///   proper UDs still works – the rule is on the mass ranking, and the
///   caller chooses `target_mass` in the units of the surface's total).
/// * `target_mass`: cumulative mass of the contour, e.g. 0.5 for the 50%
///   core area.
///
/// Return
/// ----------
/// * A [`CoreAreaMask`] with the same geometry as the input.
pub fn threshold(surface: &UdSurface, target_mass: f64) -> CoreAreaMask {
    let area = surface.geometry.cell_area();
    let n = surface.density.len();

    // Sanitize once: non-finite and negative densities carry no mass.
    let mass: Vec<f64> = surface
        .density
        .iter()
        .map(|&d| if d.is_finite() && d > 0.0 { d * area } else { 0.0 })
        .collect();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_unstable_by(|&i, &j| {
        mass[j]
            .partial_cmp(&mass[i])
            .expect("sanitized masses are always comparable")
            .then(i.cmp(&j))
    });

    let mut inside = vec![false; n];
    let mut cumulative = 0.0;
    for &idx in &order {
        cumulative += mass[idx];
        if cumulative < target_mass {
            inside[idx] = true;
        } else {
            break;
        }
    }

    CoreAreaMask {
        geometry: surface.geometry.clone(),
        inside,
    }
}
