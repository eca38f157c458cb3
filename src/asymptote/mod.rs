//! # Representativeness estimation from a trial table
//!
//! Converts the noisy inclusion-rate-vs-sample-size relationship of a
//! [`TrialTable`] into a single representativeness percentage with a
//! disclosed confidence mode:
//!
//! * `asymptote` – the saturating fit converged and its asymptote is
//!   plausible; the percentage is relative to the fitted asymptote.
//! * `asymptote_adj` – the fit converged but to an implausibly low
//!   asymptote (< 0.45); the reference is forced to the theoretical 0.5
//!   target of the 50% core contour.
//! * `inclusion` – the fit did not converge; the percentage is the mean
//!   inclusion at the largest sample size examined.
//!
//! Whatever the branch, estimation always produces a value – curve-fit
//! non-convergence is absorbed here and never escapes to the caller.

pub mod saturating_fit;

use std::fmt;

use crate::asymptote::saturating_fit::{fit_saturating, FitOutcome};
use crate::constants::{ASYMPTOTE_FLOOR, FORCED_REFERENCE};
use crate::reprange_errors::RepRangeError;
use crate::resampling::table::TrialTable;

/// How the representativeness percentage was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimationMode {
    /// Fitted asymptote used as the reference.
    Asymptote,
    /// Fitted asymptote below the plausibility floor; reference forced to
    /// the theoretical 0.5 target.
    AsymptoteAdjusted,
    /// Fallback on non-convergence: mean inclusion at the largest sample
    /// size.
    Inclusion,
}

impl fmt::Display for EstimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EstimationMode::Asymptote => "asymptote",
            EstimationMode::AsymptoteAdjusted => "asymptote_adj",
            EstimationMode::Inclusion => "inclusion",
        };
        write!(f, "{label}")
    }
}

/// Final output of a representativeness assessment. Created once per run;
/// immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct RepresentativenessResult {
    /// Sample size the reported percentage belongs to (the best point of
    /// diminishing returns on the success path, the largest size examined
    /// on the fallback path).
    pub sample_size: usize,
    /// Representativeness, in percent.
    pub percent: f64,
    /// How the percentage was derived.
    pub mode: EstimationMode,
    /// Reference asymptote applied (fitted value, forced 0.5, or the mean
    /// inclusion itself on the fallback path).
    pub asymptote: f64,
}

impl fmt::Display for RepresentativenessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Representativeness assessment")?;
            writeln!(f, "-----------------------------")?;
            writeln!(f, "sample size : {}", self.sample_size)?;
            writeln!(f, "percent     : {:.2}", self.percent)?;
            writeln!(f, "mode        : {}", self.mode)?;
            write!(f, "asymptote   : {:.4}", self.asymptote)
        } else {
            write!(
                f,
                "{:.2}% at n={} (mode={}, asymptote={:.4})",
                self.percent, self.sample_size, self.mode, self.asymptote
            )
        }
    }
}

/// Estimate representativeness from a complete trial table.
///
/// Attempts the saturating fit over all trial rows; on convergence derives
/// the percentage against the fitted (or floored) asymptote, on
/// non-convergence falls back to the mean inclusion at the largest sample
/// size. A status line is logged in both branches.
///
/// Arguments
/// -----------------
/// * `table`: the immutable trial results; must be non-empty.
///
/// Return
/// ----------
/// * The [`RepresentativenessResult`], or
///   [`RepRangeError::EmptyTrialTable`] when there is nothing to estimate
///   from.
///
/// See also
/// ------------
/// * [`fit_saturating`] – The underlying nonlinear least squares.
/// * [`RepresentativenessFit::assess_representativeness`](crate::resampling::orchestrator::RepresentativenessFit::assess_representativeness)
///   – Orchestration and estimation in one call.
pub fn estimate(table: &TrialTable) -> Result<RepresentativenessResult, RepRangeError> {
    if table.is_empty() {
        return Err(RepRangeError::EmptyTrialTable);
    }

    let points: Vec<(f64, f64)> = table
        .iter()
        .map(|t| (t.sample_size as f64, t.inclusion))
        .collect();

    let result = match fit_saturating(&points) {
        outcome @ FitOutcome::Converged { .. } => {
            let fitted = outcome.asymptote().expect("converged fit has an asymptote");
            let (reference, mode) = if fitted < ASYMPTOTE_FLOOR {
                (FORCED_REFERENCE, EstimationMode::AsymptoteAdjusted)
            } else {
                (fitted, EstimationMode::Asymptote)
            };

            // Predicted inclusion is identical across the iterations of a
            // sample size, so the per-size maximum is the prediction
            // itself; pick the size with the best percentage.
            let (best_size, best_percent) = table
                .mean_by_size()
                .into_iter()
                .map(|(n, _)| {
                    let predicted = outcome.predict(n as f64).expect("converged fit predicts");
                    (n, predicted / reference * 100.0)
                })
                .fold((0usize, f64::NEG_INFINITY), |best, candidate| {
                    if candidate.1 > best.1 {
                        candidate
                    } else {
                        best
                    }
                });

            log::info!(
                "asymptote estimated: {fitted:.4} (mode {mode}, reference {reference:.4})"
            );

            RepresentativenessResult {
                sample_size: best_size,
                percent: best_percent,
                mode,
                asymptote: reference,
            }
        }
        FitOutcome::NonConvergent => {
            let largest = table
                .max_sample_size()
                .expect("non-empty table has a maximum sample size");
            let mean = table
                .mean_inclusion_for(largest)
                .expect("maximum sample size has trials");

            log::info!(
                "no asymptote; representativeness derived from mean inclusion at sample size {largest}"
            );

            // The asymptote field mirrors the percentage exactly on this
            // path: no true asymptote exists.
            let percent = mean * 100.0;
            RepresentativenessResult {
                sample_size: largest,
                percent,
                mode: EstimationMode::Inclusion,
                asymptote: percent / 100.0,
            }
        }
    };

    Ok(result)
}

#[cfg(test)]
mod estimation_tests {
    use super::*;
    use crate::resampling::trial::Trial;
    use approx::assert_relative_eq;

    fn table_from_curve(a: f64, b: f64, max_size: usize, iterations: usize) -> TrialTable {
        let mut trials = Vec::new();
        for n in 1..=max_size {
            for k in 1..=iterations {
                trials.push(Trial {
                    sample_size: n,
                    iteration: k,
                    inclusion: a * n as f64 / (1.0 + b * n as f64),
                });
            }
        }
        TrialTable::from_trials(trials)
    }

    #[test]
    fn test_plausible_asymptote_mode() {
        // a=1, b=0.1 → asymptote 10, well above the floor.
        let table = table_from_curve(1.0, 0.1, 9, 3);
        let result = estimate(&table).unwrap();
        assert_eq!(result.mode, EstimationMode::Asymptote);
        assert_relative_eq!(result.asymptote, 10.0, epsilon = 1e-5);
        // The curve is monotone, so the best size is the largest one.
        assert_eq!(result.sample_size, 9);
        assert_relative_eq!(result.percent, (9.0 / 1.9) / 10.0 * 100.0, epsilon = 1e-4);
    }

    #[test]
    fn test_low_asymptote_forces_adjustment() {
        // a=0.04, b=0.1 → asymptote 0.4 < 0.45.
        let table = table_from_curve(0.04, 0.1, 9, 3);
        let result = estimate(&table).unwrap();
        assert_eq!(result.mode, EstimationMode::AsymptoteAdjusted);
        assert_relative_eq!(result.asymptote, 0.5);
        let predicted_at_9 = 0.04 * 9.0 / 1.9;
        assert_relative_eq!(result.percent, predicted_at_9 / 0.5 * 100.0, epsilon = 1e-2);
    }

    #[test]
    fn test_fallback_identity_on_non_convergence() {
        // A single sample size cannot support the two-parameter fit.
        let trials = vec![
            Trial { sample_size: 1, iteration: 1, inclusion: 0.2 },
            Trial { sample_size: 1, iteration: 2, inclusion: 0.4 },
        ];
        let table = TrialTable::from_trials(trials);
        let result = estimate(&table).unwrap();
        assert_eq!(result.mode, EstimationMode::Inclusion);
        assert_eq!(result.sample_size, 1);
        assert_relative_eq!(result.percent, 30.0, epsilon = 1e-9);
        // By construction the asymptote field equals percent/100 exactly.
        assert_eq!(result.asymptote, result.percent / 100.0);
    }

    #[test]
    fn test_empty_table_is_an_error() {
        let err = estimate(&TrialTable::default()).unwrap_err();
        assert_eq!(err, RepRangeError::EmptyTrialTable);
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(EstimationMode::Asymptote.to_string(), "asymptote");
        assert_eq!(EstimationMode::AsymptoteAdjusted.to_string(), "asymptote_adj");
        assert_eq!(EstimationMode::Inclusion.to_string(), "inclusion");
    }
}
