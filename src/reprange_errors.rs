use thiserror::Error;

/// Error taxonomy for the representativeness pipeline.
///
/// Only ingestion and geometry problems are fatal. Curve-fit
/// non-convergence is **not** an error (see
/// [`FitOutcome`](crate::asymptote::saturating_fit::FitOutcome)), and a
/// degenerate trial is scored as zero rather than aborting the batch.
#[derive(Error, Debug)]
pub enum RepRangeError {
    #[error("Fix record {0} has no individual identifier")]
    MissingIdentifier(usize),

    #[error("Fix record {row} of individual {id} has no usable coordinates (need x/y or lon/lat)")]
    MissingCoordinates { id: String, row: usize },

    #[error("UD surfaces do not share grid geometry: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    GridShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    #[error("No UD surface supplied for tracked individual {0}")]
    MissingSurface(String),

    #[error("Resampling needs at least two tracked individuals, got {0}")]
    NotEnoughIndividuals(usize),

    #[error("Cannot estimate from an empty trial table")]
    EmptyTrialTable,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Worker pool construction failed: {0}")]
    ThreadPoolError(#[from] rayon::ThreadPoolBuildError),

    #[cfg(feature = "plotting")]
    #[error("Plot rendering failed: {0}")]
    PlotError(String),
}

impl PartialEq for RepRangeError {
    fn eq(&self, other: &Self) -> bool {
        use RepRangeError::*;
        match (self, other) {
            (MissingIdentifier(a), MissingIdentifier(b)) => a == b,
            (
                MissingCoordinates { id: a, row: ra },
                MissingCoordinates { id: b, row: rb },
            ) => a == b && ra == rb,
            (
                GridShapeMismatch {
                    expected_rows: a1,
                    expected_cols: a2,
                    rows: a3,
                    cols: a4,
                },
                GridShapeMismatch {
                    expected_rows: b1,
                    expected_cols: b2,
                    rows: b3,
                    cols: b4,
                },
            ) => a1 == b1 && a2 == b2 && a3 == b3 && a4 == b4,
            (MissingSurface(a), MissingSurface(b)) => a == b,
            (NotEnoughIndividuals(a), NotEnoughIndividuals(b)) => a == b,
            (EmptyTrialTable, EmptyTrialTable) => true,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,

            // Wrapped foreign errors are compared by variant only
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (ThreadPoolError(_), ThreadPoolError(_)) => true,
            #[cfg(feature = "plotting")]
            (PlotError(a), PlotError(b)) => a == b,

            _ => false,
        }
    }
}
