//! Error types
//!
//! Configuration problems are fatal: they are raised before (or instead of)
//! stepping and are never clamped or retried.

use thiserror::Error;

use crate::model::Severity;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("district index {index} out of range (expected 0..{districts})")]
    DistrictOutOfRange { index: i64, districts: usize },

    #[error("no districts configured")]
    NoDistricts,

    #[error("travel matrix must be {districts}x{districts}, row {row} has {len} entries")]
    MatrixShape {
        districts: usize,
        row: usize,
        len: usize,
    },

    #[error("travel matrix has {rows} rows but {districts} districts are configured")]
    MatrixRows { rows: usize, districts: usize },

    #[error("travel time from {from} to {to} is not a finite non-negative value: {minutes}")]
    InvalidTravelTime { from: usize, to: usize, minutes: f64 },

    #[error("population weights must be finite, non-negative and not all zero")]
    InvalidPopulation,

    #[error("critical probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("treatment range for {severity:?} is invalid: {min_secs}..={max_secs} seconds")]
    InvalidTreatmentRange {
        severity: Severity,
        min_secs: u64,
        max_secs: u64,
    },

    #[error("mean interarrival time must be positive, got {0} seconds")]
    InvalidInterarrival(f64),

    #[error("horizon must be a finite non-negative number of hours, got {0}")]
    InvalidHorizon(f64),

    #[error("fleet must contain at least one unit")]
    NoUnits,

    #[error("at least one HQ district is required")]
    NoHqs,

    #[error("unknown dispatch strategy '{0}'")]
    UnknownStrategy(String),
}

/// Top-level error for loading and running a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to parse scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
