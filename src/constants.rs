//! # Constants and type definitions for reprange
//!
//! This module centralizes the **tuning constants**, **unit aliases**, and
//! **identifier types** used throughout the `reprange` library.
//!
//! ## Overview
//!
//! - Defaults for the resampling and estimation pipeline
//! - Scalar type aliases used across the crate
//! - Identifiers for tracked individuals
//!
//! These definitions are used by all main modules, including ingestion,
//! utilization-distribution estimation, resampling, and the asymptote
//! estimator.

use smallvec::SmallVec;

use crate::tracks::Relocation;

// -------------------------------------------------------------------------------------------------
// Pipeline tuning constants
// -------------------------------------------------------------------------------------------------

/// Cumulative probability mass enclosed by the core-use contour (50% UD).
pub const CORE_MASS_FRACTION: f64 = 0.5;

/// Fitted asymptotes below this value are treated as unreliable and the
/// reference is forced to [`FORCED_REFERENCE`] instead.
pub const ASYMPTOTE_FLOOR: f64 = 0.45;

/// Reference asymptote applied when the fitted one falls under
/// [`ASYMPTOTE_FLOOR`].
pub const FORCED_REFERENCE: f64 = 0.5;

/// Default number of resampling iterations per sample size.
pub const DEFAULT_ITERATIONS: usize = 50;

/// Default target cell count for the shared estimation grid.
pub const DEFAULT_GRID_CELLS: usize = 500;

/// Authalic Earth radius in meters (IUGG), used by the equal-area
/// projection of geodetic fixes.
pub const EARTH_AUTHALIC_RADIUS: f64 = 6_371_007.2;

/// Numerical epsilon used for floating-point comparisons
pub const EPS: f64 = 1e-12;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in meters (projected planar coordinates)
pub type Meter = f64;
/// Epoch timestamp in seconds; only the ordering of fixes matters
pub type Timestamp = f64;

// -------------------------------------------------------------------------------------------------
// Identifiers and data containers
// -------------------------------------------------------------------------------------------------

/// Identifier of a tracked individual.
///
/// This can be:
/// - A numeric tag or ring number (e.g. `Int(1024)`)
/// - A free-form field identifier (e.g. `"W-04"`, `"petrel_f3"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndividualId {
    /// Integer tag (e.g. 1, 433…)
    Int(u32),
    /// String-based identifier (field code, colour-ring combination, etc.)
    String(String),
}

impl std::fmt::Display for IndividualId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndividualId::Int(n) => write!(f, "{n}"),
            IndividualId::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<u32> for IndividualId {
    fn from(n: u32) -> Self {
        IndividualId::Int(n)
    }
}

impl From<String> for IndividualId {
    fn from(s: String) -> Self {
        IndividualId::String(s)
    }
}

impl From<&str> for IndividualId {
    fn from(s: &str) -> Self {
        IndividualId::String(s.to_string())
    }
}

impl std::str::FromStr for IndividualId {
    type Err = std::num::ParseIntError;

    /// Try to parse an `IndividualId` from a string.
    /// - Pure digits → `Int(u32)`
    /// - Otherwise  → `String(String)`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u32>() {
            Ok(n) => Ok(IndividualId::Int(n)),
            Err(e) => {
                if s.chars().any(|c| !c.is_ascii_digit()) {
                    Ok(IndividualId::String(s.to_string()))
                } else {
                    Err(e)
                }
            }
        }
    }
}

/// A small, inline-optimized container for the relocations of a single
/// individual, kept time-ordered.
pub type Relocations = SmallVec<[Relocation; 8]>;
