//! # reprange
//!
//! Estimate how representative a sample of tracked individuals is of the
//! space-use of its population. The pipeline: estimate (or accept) one
//! utilization distribution per individual on a shared grid, bootstrap
//! subsets of every size, pool and threshold each subset's surfaces at the
//! 50% core contour, score inclusion of held-out fixes, then fit a
//! saturating curve to inclusion-vs-sample-size and report a single
//! percentage with a disclosed confidence mode.
//!
//! ```rust,no_run
//! use reprange::{KernelDensity, RepParams, RepresentativenessFit, TrackSet, UdProvider};
//! # fn run(tracks: TrackSet) -> Result<(), reprange::RepRangeError> {
//! let provider = KernelDensity::new(250.0)?;
//! let surfaces = provider.estimate_surfaces(&tracks)?;
//! let params = RepParams::builder().iterations(50).build()?;
//! let result = tracks.assess_representativeness(&surfaces, &params)?;
//! println!("{result:#}");
//! # Ok(()) }
//! ```

pub mod asymptote;
pub mod constants;
pub mod core_area;
pub mod grid;
pub mod report;
pub mod reprange_errors;
pub mod resampling;
pub mod tracks;
pub mod ud;

pub use asymptote::saturating_fit::{fit_saturating, FitOutcome};
pub use asymptote::{estimate, EstimationMode, RepresentativenessResult};
pub use constants::{IndividualId, Relocations};
pub use core_area::{threshold, CoreAreaMask};
pub use grid::{pool_mean, GridGeometry, UdSurface};
pub use reprange_errors::RepRangeError;
pub use resampling::orchestrator::RepresentativenessFit;
pub use resampling::table::TrialTable;
pub use resampling::trial::Trial;
pub use resampling::RepParams;
pub use tracks::csv_reader::read_track_set;
pub use tracks::track_ext::{FixCountStats, GeoFixBatch, PlanarFixBatch, TrackExt};
pub use tracks::{Relocation, TrackSet};
pub use ud::kernel_density::KernelDensity;
pub use ud::{validate_shared_geometry, UdProvider, UdSet};
