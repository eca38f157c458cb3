//! # Post-hoc reporting
//!
//! Everything here consumes the immutable [`TrialTable`] and
//! [`RepresentativenessResult`] *after* the core computation is done, so
//! reporting can be omitted entirely in non-interactive or test contexts
//! without touching the pipeline. Outputs are best-effort side files and
//! never authoritative.

use camino::Utf8Path;

use crate::reprange_errors::RepRangeError;
use crate::resampling::table::TrialTable;

#[cfg(feature = "plotting")]
use crate::asymptote::RepresentativenessResult;

/// Write the raw trial table to a delimited file.
///
/// Same output as the orchestrator's `persist_raw_trials` side channel,
/// for callers that kept the table and want to export it later.
pub fn export_raw_trials(table: &TrialTable, path: &Utf8Path) -> Result<(), RepRangeError> {
    table.write_csv(path)
}

/// Render the inclusion-vs-sample-size diagnostic: per-size mean curve,
/// shaded ±1 standard-deviation band, and the final percentage in the
/// caption.
///
/// Arguments
/// -----------------
/// * `table`: complete trial table of the run.
/// * `result`: the estimate to annotate.
/// * `path`: output image path (PNG).
#[cfg(feature = "plotting")]
pub fn plot_inclusion_curve(
    table: &TrialTable,
    result: &RepresentativenessResult,
    path: &Utf8Path,
) -> Result<(), RepRangeError> {
    use plotters::prelude::*;

    let means = table.mean_by_size();
    let stds = table.std_by_size();
    if means.is_empty() {
        return Err(RepRangeError::EmptyTrialTable);
    }

    let x_max = means.last().expect("non-empty").0 as f64 + 1.0;
    let y_max = means
        .iter()
        .zip(&stds)
        .map(|(&(_, m), &(_, s))| m + s)
        .fold(0.0_f64, f64::max)
        .max(1.0)
        * 1.05;

    let root = BitMapBackend::new(path.as_std_path(), (900, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| RepRangeError::PlotError(e.to_string()))?;

    let caption = format!(
        "Representativeness: {:.1}% (mode {})",
        result.percent, result.mode
    );
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(|e| RepRangeError::PlotError(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Sample size")
        .y_desc("Inclusion rate")
        .draw()
        .map_err(|e| RepRangeError::PlotError(e.to_string()))?;

    // ±1 SD band: upper edge left-to-right, lower edge back.
    let mut band: Vec<(f64, f64)> = means
        .iter()
        .zip(&stds)
        .map(|(&(n, m), &(_, s))| (n as f64, m + s))
        .collect();
    band.extend(
        means
            .iter()
            .zip(&stds)
            .rev()
            .map(|(&(n, m), &(_, s))| (n as f64, (m - s).max(0.0))),
    );
    chart
        .draw_series(std::iter::once(Polygon::new(band, BLUE.mix(0.15))))
        .map_err(|e| RepRangeError::PlotError(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(
            means.iter().map(|&(n, m)| (n as f64, m)),
            &BLUE,
        ))
        .map_err(|e| RepRangeError::PlotError(e.to_string()))?;
    chart
        .draw_series(
            means
                .iter()
                .map(|&(n, m)| Circle::new((n as f64, m), 3, BLUE.filled())),
        )
        .map_err(|e| RepRangeError::PlotError(e.to_string()))?;

    root.present()
        .map_err(|e| RepRangeError::PlotError(e.to_string()))?;
    Ok(())
}
