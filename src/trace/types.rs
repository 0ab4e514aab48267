//! Trace records

use serde::{Deserialize, Serialize};

use crate::dispatch::DispatchEvent;
use crate::fleet::PhaseKind;
use crate::model::{DistrictId, EmergencyId, UnitId};

/// Where a unit is and what it is doing at a sample point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub unit: UnitId,
    pub location: DistrictId,
    pub phase: PhaseKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<DistrictId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency: Option<EmergencyId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_secs: Option<u64>,
}

/// State sampled at one event boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSample {
    pub t_secs: u64,
    /// Pending cases per tier, Critical first.
    pub queue_lengths: Vec<usize>,
    pub units: Vec<UnitSnapshot>,
}

/// A dispatch event stamped with simulated time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub t_secs: u64,
    #[serde(flatten)]
    pub event: DispatchEvent,
}

/// In-memory trace; written out by the caller once the run ends.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TraceLogger {
    pub samples: Vec<TraceSample>,
    pub events: Vec<TraceEvent>,
}

impl TraceLogger {
    pub fn push_event(&mut self, t_secs: u64, event: DispatchEvent) {
        self.events.push(TraceEvent { t_secs, event });
    }

    /// Adds a sample unless it repeats the previous one at the same instant.
    pub fn push_sample(&mut self, sample: TraceSample) {
        if self.samples.last() == Some(&sample) {
            return;
        }
        self.samples.push(sample);
    }
}
