//! Emergencies and severity tiers

use serde::{Deserialize, Serialize};

use super::id::{DistrictId, EmergencyId};
use crate::sim::SimTime;

/// Severity tier. Declaration order is dispatch priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Routine,
}

impl Severity {
    /// All tiers, highest priority first.
    pub const ALL: [Severity; 2] = [Severity::Critical, Severity::Routine];

    /// Position of this tier in [`Severity::ALL`].
    pub fn tier(self) -> usize {
        match self {
            Severity::Critical => 0,
            Severity::Routine => 1,
        }
    }

    /// Larger is more urgent.
    pub fn value(self) -> u8 {
        match self {
            Severity::Critical => 1,
            Severity::Routine => 0,
        }
    }
}

/// A call waiting for, or receiving, service.
///
/// Not `Clone`: an emergency is owned either by a queue tier or by the unit
/// serving it, never both.
#[derive(Debug, PartialEq, Eq)]
pub struct Emergency {
    pub id: EmergencyId,
    pub district: DistrictId,
    pub severity: Severity,
    pub arrived_at: SimTime,
    pub treatment: SimTime,
}

impl Emergency {
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }

    /// Time since arrival, as seen at `now`.
    pub fn waited(&self, now: SimTime) -> SimTime {
        now.saturating_sub(self.arrived_at)
    }
}
