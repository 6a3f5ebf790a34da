use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Precondition failures raised at the load and configuration boundaries.
///
/// Loader functions return `anyhow::Result` and wrap these with file context;
/// callers that need the kind can recover it with `downcast_ref::<DataError>()`.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("{path}: required column '{column}' is missing")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}: boundary layer contains no polygon regions")]
    EmptyBoundaries { path: PathBuf },

    #[error("feature {feature}: attribute '{field}' is missing or not text")]
    MissingRegionName { feature: usize, field: String },

    #[error("region name '{0}' appears more than once")]
    DuplicateRegion(String),

    #[error("unsupported coordinate reference system '{0}', expected WGS84 longitude/latitude")]
    UnsupportedCrs(String),

    #[error("coordinate ({x}, {y}) is outside longitude/latitude range, layer looks projected")]
    NotGeographic { x: f64, y: f64 },

    #[error("intensity bounds must satisfy min < max (got min={min}, max={max})")]
    InvalidIntensityBounds { min: f64, max: f64 },

    #[error("date range start {start} is after end {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },
}
