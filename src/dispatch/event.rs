//! Dispatch events
//!
//! Everything the dispatcher does is reported as a `DispatchEvent`; the
//! simulation feeds them to the statistics collector and the optional trace.

use serde::{Deserialize, Serialize};

use crate::model::{DistrictId, EmergencyId, Severity, UnitId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchEvent {
    /// A new case entered the queue.
    Arrival {
        emergency: EmergencyId,
        district: DistrictId,
        severity: Severity,
        treatment_secs: u64,
    },
    /// An idle unit left HQ (or was recalled on its way home) for a case.
    Assigned {
        unit: UnitId,
        emergency: EmergencyId,
        from: DistrictId,
        to: DistrictId,
        travel_secs: u64,
        recalled: bool,
    },
    /// A unit heading to a Routine case was rerouted to a Critical one.
    Redirected {
        unit: UnitId,
        bumped: EmergencyId,
        emergency: EmergencyId,
        to: DistrictId,
        ratio_traveled: f64,
        travel_secs: u64,
    },
    TreatmentStarted {
        unit: UnitId,
        emergency: EmergencyId,
        severity: Severity,
        district: DistrictId,
        waited_secs: u64,
    },
    TreatmentFinished {
        unit: UnitId,
        emergency: EmergencyId,
        severity: Severity,
    },
    /// A unit went straight from one finished case to the next.
    Chained {
        unit: UnitId,
        emergency: EmergencyId,
        from: DistrictId,
        to: DistrictId,
        travel_secs: u64,
    },
    HeadingHome {
        unit: UnitId,
        from: DistrictId,
        travel_secs: u64,
    },
    ReturnedToHq {
        unit: UnitId,
        district: DistrictId,
    },
}
