//! Metrics record
//!
//! The run summary handed to plotting/export layers.

use serde::{Deserialize, Serialize};

use crate::model::{DistrictId, UnitId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitMetrics {
    pub unit: UnitId,
    pub home: DistrictId,
    pub busy_secs: u64,
    pub hq_secs: u64,
    pub homeward_secs: u64,
    pub utilization: f64,
    pub hq_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub elapsed_secs: u64,
    /// Busy unit-seconds over elapsed unit-seconds.
    pub utilization: f64,
    /// HQ unit-seconds over elapsed unit-seconds.
    pub hq_fraction: f64,
    /// Mean Routine wait (arrival to start of care); 0 without samples.
    pub average_wait_secs: f64,
    pub average_wait_minutes: f64,
    pub routine_waits_secs: Vec<u64>,
    /// Cases generated, per severity.
    pub critical_case_count: u64,
    pub routine_case_count: u64,
    /// Cases whose care started.
    pub critical_served: u64,
    pub routine_served: u64,
    /// Cases whose care finished.
    pub critical_completed: u64,
    pub routine_completed: u64,
    pub redirections: u64,
    /// Cases still queued when the horizon was reached.
    pub pending_at_end: usize,
    pub units: Vec<UnitMetrics>,
}
