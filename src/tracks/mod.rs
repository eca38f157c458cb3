//! # Tracked individuals and their relocations
//!
//! A [`TrackSet`] maps each [`IndividualId`] to its time-ordered planar
//! relocations. Everything downstream of ingestion works on projected
//! coordinates only: geodetic input is normalized by
//! [`projection`](crate::tracks::projection) before it enters the set, so
//! the resampling core never inspects input provenance.

pub mod csv_reader;
pub mod projection;
pub mod track_ext;

use ahash::RandomState;
use std::collections::HashMap;

use crate::constants::{IndividualId, Meter, Relocations, Timestamp};

/// One projected relocation fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relocation {
    /// Easting in the shared planar frame (m).
    pub x: Meter,
    /// Northing in the shared planar frame (m).
    pub y: Meter,
    /// Acquisition time; fixes of one individual are kept sorted by it.
    pub time: Timestamp,
}

impl Relocation {
    pub fn new(x: Meter, y: Meter, time: Timestamp) -> Self {
        Relocation { x, y, time }
    }
}

/// All tracked individuals of one analysis, keyed by identifier.
pub type TrackSet = HashMap<IndividualId, Relocations, RandomState>;
