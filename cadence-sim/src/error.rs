//! Errors surfaced before a simulation starts.
use std::path::PathBuf;

use thiserror::Error;

/// Rejected run configuration. Raised before any run state exists.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("cadence at position {index} must be at least one day")]
    ZeroCadence { index: usize },
    #[error("at least one cadence is required")]
    EmptyCadences,
    #[error("failed to read configuration from {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration")]
    Parse(#[from] serde_json::Error),
}
