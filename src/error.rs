//! Error types for the forest visibility simulation.
//!
//! Placement exhaustion is recovered inside the core (partial forest,
//! skipped trial); the remaining conditions surface to the caller.

use thiserror::Error;

/// Rejection sampling ran out of attempts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("Unable to place non-overlapping circle of radius {radius} after {attempts} attempts")]
    Exhausted { attempts: u32, radius: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("Line is undefined: both reference points coincide")]
    DegenerateInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("Cannot summarize an empty result set")]
    EmptyResultSet,
}

/// Rejected run configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Density {value} is out of range [0.0, 1.0]")]
    DensityOutOfRange { value: f64 },

    #[error("Field '{field}' must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("Trial count must be greater than zero")]
    NoTrials,

    #[error("Spatial grid needs at least one column and one row, got {columns}x{rows}")]
    EmptyGrid { columns: u32, rows: u32 },
    #[error("grid {columns}x{rows} has more than {max} cells")]
    GridTooFine { columns: u32, rows: u32, max: u64 },
}

/// Top-level error for the end-to-end entry points.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Stats(#[from] StatsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
