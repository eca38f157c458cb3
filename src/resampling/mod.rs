//! # Resampling run configuration
//!
//! This module defines the [`RepParams`] configuration struct and its
//! builder, which control how the bootstrap trial grid is generated and
//! executed: repeat count per sample size, core-contour mass, kernel
//! smoothing, grid sizing, worker count, optional raw-trial persistence,
//! and optional deterministic seeding.
//!
//! ## Example
//!
//! ```rust,no_run
//! use reprange::resampling::RepParams;
//!
//! let params = RepParams::builder()
//!     .iterations(100)
//!     .smoothing(250.0)
//!     .worker_count(4)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! ```

use std::cmp::Ordering::{Greater, Less};
use std::fmt;

use camino::Utf8PathBuf;

use crate::constants::{CORE_MASS_FRACTION, DEFAULT_GRID_CELLS, DEFAULT_ITERATIONS};
use crate::reprange_errors::RepRangeError;

pub mod orchestrator;
pub mod table;
pub mod trial;

/// Configuration of a representativeness assessment run.
///
/// Fields
/// -----------------
/// * `iterations` – bootstrap repeats per sample size (≥ 1).
/// * `core_mass` – cumulative mass of the core-use contour, in (0, 1).
/// * `smoothing` – kernel bandwidth in meters; required only when surfaces
///   are estimated rather than supplied.
/// * `grid_cells` – target cell count of the shared estimation grid.
/// * `worker_count` – trial workers; `None` uses half the available
///   parallelism.
/// * `persist_raw_trials` – when set, the raw trial table is written to
///   this CSV path after collection; a pure side channel that never
///   changes the numeric outcome.
/// * `seed` – when set, derives one independent RNG per trial so subsets
///   are reproducible; production runs leave it unset and draw from OS
///   entropy.
#[derive(Debug, Clone)]
pub struct RepParams {
    pub iterations: usize,
    pub core_mass: f64,
    pub smoothing: Option<f64>,
    pub grid_cells: usize,
    pub worker_count: Option<usize>,
    pub persist_raw_trials: Option<Utf8PathBuf>,
    pub seed: Option<u64>,
}

impl RepParams {
    /// Construct parameters with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a [`RepParamsBuilder`] for step-by-step configuration.
    pub fn builder() -> RepParamsBuilder {
        RepParamsBuilder::new()
    }
}

impl Default for RepParams {
    fn default() -> Self {
        RepParams {
            iterations: DEFAULT_ITERATIONS,
            core_mass: CORE_MASS_FRACTION,
            smoothing: None,
            grid_cells: DEFAULT_GRID_CELLS,
            worker_count: None,
            persist_raw_trials: None,
            seed: None,
        }
    }
}

/// Builder for [`RepParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct RepParamsBuilder {
    params: RepParams,
}

impl RepParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: RepParams::default(),
        }
    }

    pub fn iterations(mut self, v: usize) -> Self {
        self.params.iterations = v;
        self
    }
    pub fn core_mass(mut self, v: f64) -> Self {
        self.params.core_mass = v;
        self
    }
    pub fn smoothing(mut self, v: f64) -> Self {
        self.params.smoothing = Some(v);
        self
    }
    pub fn grid_cells(mut self, v: usize) -> Self {
        self.params.grid_cells = v;
        self
    }
    pub fn worker_count(mut self, v: usize) -> Self {
        self.params.worker_count = Some(v);
        self
    }
    pub fn persist_raw_trials(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.params.persist_raw_trials = Some(path.into());
        self
    }
    pub fn seed(mut self, v: u64) -> Self {
        self.params.seed = Some(v);
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Return true iff x < 1.0 and comparable (i.e., not NaN).
    #[inline]
    fn lt1(x: f64) -> bool {
        x.partial_cmp(&1.0) == Some(Less)
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `iterations ≥ 1`
    /// * `0 < core_mass < 1`
    /// * `smoothing > 0` when set
    /// * `grid_cells ≥ 4`
    /// * `worker_count ≥ 1` when set
    ///
    /// Return
    /// ----------
    /// * `Ok(RepParams)` or [`RepRangeError::InvalidParameter`].
    pub fn build(self) -> Result<RepParams, RepRangeError> {
        let p = &self.params;

        if p.iterations == 0 {
            return Err(RepRangeError::InvalidParameter(
                "iterations must be >= 1".into(),
            ));
        }
        if !(Self::gt0(p.core_mass) && Self::lt1(p.core_mass)) {
            return Err(RepRangeError::InvalidParameter(
                "core_mass must lie strictly between 0 and 1".into(),
            ));
        }
        if let Some(h) = p.smoothing {
            if !Self::gt0(h) {
                return Err(RepRangeError::InvalidParameter(
                    "smoothing must be > 0".into(),
                ));
            }
        }
        if p.grid_cells < 4 {
            return Err(RepRangeError::InvalidParameter(
                "grid_cells must be >= 4".into(),
            ));
        }
        if let Some(w) = p.worker_count {
            if w == 0 {
                return Err(RepRangeError::InvalidParameter(
                    "worker_count must be >= 1".into(),
                ));
            }
        }

        Ok(self.params)
    }
}

impl fmt::Display for RepParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Representativeness Run Parameters")?;
            writeln!(f, "---------------------------------")?;
            writeln!(f, "  iterations         = {}", self.iterations)?;
            writeln!(f, "  core_mass          = {:.3}", self.core_mass)?;
            match self.smoothing {
                Some(h) => writeln!(f, "  smoothing          = {h:.1} m")?,
                None => writeln!(f, "  smoothing          = (surfaces supplied)")?,
            }
            writeln!(f, "  grid_cells         = {}", self.grid_cells)?;
            match self.worker_count {
                Some(w) => writeln!(f, "  worker_count       = {w}")?,
                None => writeln!(f, "  worker_count       = (half parallelism)")?,
            }
            match &self.persist_raw_trials {
                Some(p) => writeln!(f, "  persist_raw_trials = {p}")?,
                None => writeln!(f, "  persist_raw_trials = (off)")?,
            }
            match self.seed {
                Some(s) => write!(f, "  seed               = {s}"),
                None => write!(f, "  seed               = (OS entropy)"),
            }
        } else {
            write!(
                f,
                "RepParams(iterations={}, core_mass={:.2}, grid_cells={}, workers={:?}, seed={:?})",
                self.iterations, self.core_mass, self.grid_cells, self.worker_count, self.seed
            )
        }
    }
}

#[cfg(test)]
mod rep_params_tests {
    use super::*;

    #[test]
    fn test_defaults_build() {
        let p = RepParams::builder().build().unwrap();
        assert_eq!(p.iterations, DEFAULT_ITERATIONS);
        assert_eq!(p.grid_cells, DEFAULT_GRID_CELLS);
        assert!((p.core_mass - CORE_MASS_FRACTION).abs() < 1e-12);
        assert!(p.seed.is_none());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(RepParams::builder().iterations(0).build().is_err());
        assert!(RepParams::builder().core_mass(0.0).build().is_err());
        assert!(RepParams::builder().core_mass(1.0).build().is_err());
        assert!(RepParams::builder().core_mass(f64::NAN).build().is_err());
        assert!(RepParams::builder().smoothing(-5.0).build().is_err());
        assert!(RepParams::builder().grid_cells(3).build().is_err());
        assert!(RepParams::builder().worker_count(0).build().is_err());
    }

    #[test]
    fn test_builder_sets_every_field() {
        let p = RepParams::builder()
            .iterations(10)
            .core_mass(0.4)
            .smoothing(100.0)
            .grid_cells(1000)
            .worker_count(2)
            .persist_raw_trials("trials.csv")
            .seed(7)
            .build()
            .unwrap();
        assert_eq!(p.iterations, 10);
        assert_eq!(p.smoothing, Some(100.0));
        assert_eq!(p.worker_count, Some(2));
        assert_eq!(
            p.persist_raw_trials.as_deref(),
            Some(camino::Utf8Path::new("trials.csv"))
        );
        assert_eq!(p.seed, Some(7));
    }
}
