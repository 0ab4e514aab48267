//! Simulation time
//!
//! Whole simulated seconds, used both for instants and for durations.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Simulated time in seconds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub fn from_secs(s: u64) -> SimTime {
        SimTime(s)
    }
    pub fn from_mins(m: u64) -> SimTime {
        SimTime(m.saturating_mul(60))
    }
    pub fn from_hours(h: u64) -> SimTime {
        SimTime(h.saturating_mul(3_600))
    }

    /// Fractional hours, rounded to the nearest second. Zero is a valid
    /// horizon; negative or non-finite input is rejected.
    pub fn from_hours_f64(h: f64) -> Result<SimTime, ConfigError> {
        if !h.is_finite() || h < 0.0 {
            return Err(ConfigError::InvalidHorizon(h));
        }
        Ok(SimTime((h * 3_600.0).round() as u64))
    }

    pub fn secs(self) -> u64 {
        self.0
    }

    pub fn as_mins_f64(self) -> f64 {
        self.0 as f64 / 60.0
    }

    pub fn saturating_add(self, other: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(other.0))
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}
