//! Shared builders for unit tests.

use crate::model::{DistrictId, Emergency, EmergencyId, Severity};
use crate::sim::SimTime;

pub fn em(id: u64, district: usize, severity: Severity, arrived_secs: u64) -> Emergency {
    Emergency {
        id: EmergencyId(id),
        district: DistrictId(district),
        severity,
        arrived_at: SimTime(arrived_secs),
        treatment: SimTime::from_mins(10),
    }
}

pub fn critical(id: u64, district: usize, arrived_secs: u64) -> Emergency {
    em(id, district, Severity::Critical, arrived_secs)
}

pub fn routine(id: u64, district: usize, arrived_secs: u64) -> Emergency {
    em(id, district, Severity::Routine, arrived_secs)
}
