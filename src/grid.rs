//! # Shared raster grid and utilization-distribution surfaces
//!
//! All per-individual density surfaces live on one [`GridGeometry`] so they
//! can be pooled cell-wise. The geometry is a plain value type compared with
//! `PartialEq`; any operation combining two surfaces first checks that their
//! geometries match and fails with
//! [`GridShapeMismatch`](crate::reprange_errors::RepRangeError::GridShapeMismatch)
//! otherwise.
//!
//! Cells are stored row-major: cell `(row, col)` has flat index
//! `row * n_cols + col`. Cell `(0, 0)` covers the lower-left corner of the
//! extent, `x` grows with columns and `y` with rows.

use crate::constants::Meter;
use crate::reprange_errors::RepRangeError;

/// Geometry of a regular planar grid: origin, square cell size, and shape.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    /// x coordinate of the lower-left corner of the extent (m).
    pub x_min: Meter,
    /// y coordinate of the lower-left corner of the extent (m).
    pub y_min: Meter,
    /// Side length of a (square) cell (m).
    pub cell_size: Meter,
    /// Number of columns (x direction).
    pub n_cols: usize,
    /// Number of rows (y direction).
    pub n_rows: usize,
}

impl GridGeometry {
    /// Build a grid covering the axis-aligned extent `[x_min - margin,
    /// x_max + margin] × [y_min - margin, y_max + margin]` with roughly
    /// `target_cells` cells.
    ///
    /// Arguments
    /// -----------------
    /// * `x_range`: minimum and maximum x over all fixes (m).
    /// * `y_range`: minimum and maximum y over all fixes (m).
    /// * `margin`: padding added on every side (m), typically a small
    ///   multiple of the kernel smoothing parameter so density tails are
    ///   not clipped. Must be strictly positive.
    /// * `target_cells`: approximate total cell count of the grid.
    ///
    /// Return
    /// ----------
    /// * A [`GridGeometry`], or [`RepRangeError::InvalidParameter`] when the
    ///   extent is non-finite or the margin is not positive.
    pub fn covering(
        x_range: (Meter, Meter),
        y_range: (Meter, Meter),
        margin: Meter,
        target_cells: usize,
    ) -> Result<Self, RepRangeError> {
        let (x_lo, x_hi) = x_range;
        let (y_lo, y_hi) = y_range;
        if !(x_lo.is_finite() && x_hi.is_finite() && y_lo.is_finite() && y_hi.is_finite()) {
            return Err(RepRangeError::InvalidParameter(
                "grid extent must be finite".into(),
            ));
        }
        if !(margin.is_finite() && margin > 0.0) {
            return Err(RepRangeError::InvalidParameter(
                "grid margin must be > 0".into(),
            ));
        }
        if target_cells < 4 {
            return Err(RepRangeError::InvalidParameter(
                "target cell count must be >= 4".into(),
            ));
        }

        let x_min = x_lo.min(x_hi) - margin;
        let x_max = x_lo.max(x_hi) + margin;
        let y_min = y_lo.min(y_hi) - margin;
        let y_max = y_lo.max(y_hi) + margin;

        let width = x_max - x_min;
        let height = y_max - y_min;
        let cell_size = (width * height / target_cells as f64).sqrt();
        let n_cols = (width / cell_size).ceil() as usize;
        let n_rows = (height / cell_size).ceil() as usize;

        Ok(GridGeometry {
            x_min,
            y_min,
            cell_size,
            n_cols: n_cols.max(1),
            n_rows: n_rows.max(1),
        })
    }

    /// Total number of cells.
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.n_cols * self.n_rows
    }

    /// Area of one cell (m²).
    #[inline]
    pub fn cell_area(&self) -> f64 {
        self.cell_size * self.cell_size
    }

    /// Flat index of the cell containing `(x, y)`, or `None` when the point
    /// falls outside the grid extent.
    pub fn cell_index(&self, x: Meter, y: Meter) -> Option<usize> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        let fx = (x - self.x_min) / self.cell_size;
        let fy = (y - self.y_min) / self.cell_size;
        if fx < 0.0 || fy < 0.0 {
            return None;
        }
        let col = fx as usize;
        let row = fy as usize;
        if col >= self.n_cols || row >= self.n_rows {
            return None;
        }
        Some(row * self.n_cols + col)
    }

    /// Center coordinates of the cell with flat index `idx`.
    #[inline]
    pub fn cell_center(&self, idx: usize) -> (Meter, Meter) {
        let row = idx / self.n_cols;
        let col = idx % self.n_cols;
        (
            self.x_min + (col as f64 + 0.5) * self.cell_size,
            self.y_min + (row as f64 + 0.5) * self.cell_size,
        )
    }
}

/// A utilization-distribution surface for one individual: density values on
/// a shared [`GridGeometry`].
///
/// Densities are per unit area; a proper UD satisfies
/// `Σ density · cell_size² ≈ 1`, but the type does not enforce this (pooled
/// and degenerate surfaces legitimately break it).
#[derive(Debug, Clone, PartialEq)]
pub struct UdSurface {
    pub geometry: GridGeometry,
    pub density: Vec<f64>,
}

impl UdSurface {
    /// Create a surface after checking that the value vector matches the
    /// geometry's cell count.
    pub fn new(geometry: GridGeometry, density: Vec<f64>) -> Result<Self, RepRangeError> {
        if density.len() != geometry.n_cells() {
            return Err(RepRangeError::InvalidParameter(format!(
                "density vector has {} values for a {}-cell grid",
                density.len(),
                geometry.n_cells()
            )));
        }
        Ok(UdSurface { geometry, density })
    }

    /// Total probability mass carried by the surface
    /// (`Σ density · cell_size²`, skipping non-finite cells).
    pub fn total_mass(&self) -> f64 {
        let area = self.geometry.cell_area();
        self.density
            .iter()
            .filter(|d| d.is_finite())
            .map(|d| d * area)
            .sum()
    }
}

/// Pool a subset of surfaces by cell-wise arithmetic mean.
///
/// All surfaces must share one grid geometry; the first surface is the
/// reference and any mismatch fails with
/// [`RepRangeError::GridShapeMismatch`]. The result is an ephemeral surface
/// used for one trial and discarded after scoring.
///
/// Arguments
/// -----------------
/// * `surfaces`: the subset to pool; must be non-empty.
///
/// Return
/// ----------
/// * The pooled [`UdSurface`], or an error on empty input or mismatched
///   geometry.
pub fn pool_mean(surfaces: &[&UdSurface]) -> Result<UdSurface, RepRangeError> {
    let first = surfaces.first().ok_or_else(|| {
        RepRangeError::InvalidParameter("cannot pool an empty set of surfaces".into())
    })?;
    let geometry = first.geometry.clone();

    for s in surfaces.iter().skip(1) {
        if s.geometry != geometry {
            return Err(RepRangeError::GridShapeMismatch {
                expected_rows: geometry.n_rows,
                expected_cols: geometry.n_cols,
                rows: s.geometry.n_rows,
                cols: s.geometry.n_cols,
            });
        }
    }

    let n = surfaces.len() as f64;
    let mut pooled = vec![0.0; geometry.n_cells()];
    for s in surfaces {
        for (acc, d) in pooled.iter_mut().zip(&s.density) {
            *acc += d;
        }
    }
    for v in &mut pooled {
        *v /= n;
    }

    UdSurface::new(geometry, pooled)
}
