//! # A single bootstrap trial
//!
//! One trial draws a uniformly random subset of individuals, pools their
//! utilization distributions by cell-wise mean, thresholds the pooled
//! surface at the configured core mass, and scores how many fixes of the
//! held-out individuals fall inside the resulting core area.
//!
//! Degenerate inputs (a pooled surface with no usable mass, or a held-out
//! evaluation set with no fixes) are scored as zero with a warning instead
//! of failing: a single bad trial must never abort the batch.

use rand::Rng;
use serde::Serialize;

use crate::constants::IndividualId;
use crate::core_area::threshold;
use crate::grid::pool_mean;
use crate::tracks::TrackSet;
use crate::ud::UdSet;

/// One scored trial of the resampling grid. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trial {
    /// Number of individuals pooled, in `1..=T-1`.
    pub sample_size: usize,
    /// Iteration index within the sample size, in `1..=K`.
    pub iteration: usize,
    /// Fraction of held-out fixes inside the pooled core area, in `[0, 1]`.
    pub inclusion: f64,
}

/// Run one trial and return its inclusion score.
///
/// Arguments
/// -----------------
/// * `ids`: all individual identifiers in a stable order; the subset is
///   drawn against this ordering so a seeded RNG reproduces it.
/// * `sample_size`: how many individuals to pool (`1..=ids.len()-1`).
/// * `surfaces`: one UD surface per individual, shared geometry.
/// * `tracks`: the relocations of every individual; held-out fixes are the
///   evaluation set.
/// * `core_mass`: cumulative mass of the core contour (0.5 for the 50% UD).
/// * `rng`: randomness source for the subset draw.
///
/// Return
/// ----------
/// * The inclusion score in `[0, 1]`; `0.0` for degenerate trials.
pub fn run_trial(
    ids: &[&IndividualId],
    sample_size: usize,
    surfaces: &UdSet,
    tracks: &TrackSet,
    core_mass: f64,
    rng: &mut impl Rng,
) -> f64 {
    debug_assert!(sample_size >= 1 && sample_size < ids.len());

    let chosen = rand::seq::index::sample(rng, ids.len(), sample_size);
    let mut selected = vec![false; ids.len()];
    for idx in chosen.iter() {
        selected[idx] = true;
    }

    let pooled_inputs: Vec<_> = ids
        .iter()
        .zip(&selected)
        .filter(|(_, &sel)| sel)
        .map(|(id, _)| &surfaces[*id])
        .collect();

    // Geometry was validated before orchestration; an error here would be
    // a logic bug, so treat it as a degenerate trial rather than a panic.
    let pooled = match pool_mean(&pooled_inputs) {
        Ok(surface) => surface,
        Err(e) => {
            log::warn!("trial (n={sample_size}) could not pool surfaces: {e}; scored 0");
            return 0.0;
        }
    };

    if !(pooled.total_mass() > 0.0) {
        log::warn!("trial (n={sample_size}) pooled an empty surface; scored 0");
        return 0.0;
    }

    let mask = threshold(&pooled, core_mass);

    let mut total = 0usize;
    let mut included = 0usize;
    for (id, &sel) in ids.iter().zip(&selected) {
        if sel {
            continue;
        }
        for fix in &tracks[*id] {
            total += 1;
            if mask.contains(fix.x, fix.y) {
                included += 1;
            }
        }
    }

    if total == 0 {
        log::warn!("trial (n={sample_size}) has no held-out fixes to score; scored 0");
        return 0.0;
    }

    included as f64 / total as f64
}
