//! Response unit state machine
//!
//! ```text
//! AtHq --assign--> Traveling{case} --arrive--> Treating{case}
//!   ^                                              |
//!   +--arrive-- Traveling{home, none} <--finish----+--finish--> Traveling{next case}
//! ```
//!
//! A unit traveling toward a Routine case may be redirected to a Critical one
//! before care starts. Treating units are never interrupted.

use serde::{Deserialize, Serialize};

use crate::model::{DistrictId, Emergency, EmergencyId, Severity, UnitId};
use crate::sim::SimTime;

/// One travel leg.
#[derive(Debug, PartialEq, Eq)]
pub struct Leg {
    pub origin: DistrictId,
    pub destination: DistrictId,
    pub remaining: SimTime,
    pub total: SimTime,
    /// The case this leg serves; `None` on the way home.
    pub emergency: Option<Emergency>,
}

impl Leg {
    /// Elapsed fraction of the leg, `1 - remaining / total`.
    pub fn ratio_traveled(&self) -> f64 {
        if self.total.is_zero() {
            return 1.0;
        }
        1.0 - self.remaining.0 as f64 / self.total.0 as f64
    }

    /// Where a rerouted leg is considered to start: the old destination once
    /// more than half of the old leg is behind, otherwise the old origin.
    pub fn reroute_origin(&self) -> DistrictId {
        if self.ratio_traveled() > 0.5 {
            self.destination
        } else {
            self.origin
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum UnitPhase {
    AtHq,
    Traveling(Leg),
    Treating {
        emergency: Emergency,
        remaining: SimTime,
    },
}

/// Coarse phase label used in traces and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    AtHq,
    Responding,
    Homeward,
    Treating,
}

/// Accumulated time per category. `busy + hq + homeward` equals the time the
/// unit has been simulated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTimes {
    pub busy: SimTime,
    pub hq: SimTime,
    pub homeward: SimTime,
}

impl UnitTimes {
    pub fn total(&self) -> SimTime {
        self.busy.saturating_add(self.hq).saturating_add(self.homeward)
    }
}

/// What happened when a travel leg ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    ReturnedToHq,
    StartedTreatment {
        emergency: EmergencyId,
        severity: Severity,
        waited: SimTime,
    },
}

#[derive(Debug)]
pub struct Unit {
    id: UnitId,
    home: DistrictId,
    location: DistrictId,
    phase: UnitPhase,
    times: UnitTimes,
}

impl Unit {
    pub fn new(id: UnitId, home: DistrictId) -> Self {
        Self {
            id,
            home,
            location: home,
            phase: UnitPhase::AtHq,
            times: UnitTimes::default(),
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn home(&self) -> DistrictId {
        self.home
    }

    /// Last district the unit was at (the leg origin while traveling).
    pub fn location(&self) -> DistrictId {
        self.location
    }

    pub fn phase(&self) -> &UnitPhase {
        &self.phase
    }

    pub fn times(&self) -> UnitTimes {
        self.times
    }

    pub fn is_at_hq(&self) -> bool {
        matches!(self.phase, UnitPhase::AtHq)
    }

    pub fn is_homeward(&self) -> bool {
        matches!(&self.phase, UnitPhase::Traveling(leg) if leg.emergency.is_none())
    }

    /// True while traveling toward a Routine case whose care has not started.
    pub fn is_redirectable(&self) -> bool {
        matches!(
            &self.phase,
            UnitPhase::Traveling(Leg {
                emergency: Some(em),
                ..
            }) if em.severity == Severity::Routine
        )
    }

    pub fn kind(&self) -> PhaseKind {
        match &self.phase {
            UnitPhase::AtHq => PhaseKind::AtHq,
            UnitPhase::Traveling(leg) if leg.emergency.is_some() => PhaseKind::Responding,
            UnitPhase::Traveling(_) => PhaseKind::Homeward,
            UnitPhase::Treating { .. } => PhaseKind::Treating,
        }
    }

    /// The case the unit is committed to, if any.
    pub fn emergency(&self) -> Option<&Emergency> {
        match &self.phase {
            UnitPhase::AtHq => None,
            UnitPhase::Traveling(leg) => leg.emergency.as_ref(),
            UnitPhase::Treating { emergency, .. } => Some(emergency),
        }
    }

    pub fn destination(&self) -> Option<DistrictId> {
        match &self.phase {
            UnitPhase::Traveling(leg) => Some(leg.destination),
            _ => None,
        }
    }

    /// Time left in the current phase; `None` while waiting at HQ.
    pub fn remaining(&self) -> Option<SimTime> {
        match &self.phase {
            UnitPhase::AtHq => None,
            UnitPhase::Traveling(leg) => Some(leg.remaining),
            UnitPhase::Treating { remaining, .. } => Some(*remaining),
        }
    }

    pub fn is_due(&self) -> bool {
        self.remaining().is_some_and(SimTime::is_zero)
    }

    /// Lets `delta` pass: books it to the current category and counts down.
    pub fn advance(&mut self, delta: SimTime) {
        match &mut self.phase {
            UnitPhase::AtHq => self.times.hq = self.times.hq.saturating_add(delta),
            UnitPhase::Traveling(leg) => {
                if leg.emergency.is_some() {
                    self.times.busy = self.times.busy.saturating_add(delta);
                } else {
                    self.times.homeward = self.times.homeward.saturating_add(delta);
                }
                leg.remaining = leg.remaining.saturating_sub(delta);
            }
            UnitPhase::Treating { remaining, .. } => {
                self.times.busy = self.times.busy.saturating_add(delta);
                *remaining = remaining.saturating_sub(delta);
            }
        }
    }

    /// `AtHq --assign--> Traveling{case}`. Returns the case back if the unit
    /// is not at HQ.
    pub fn assign(&mut self, emergency: Emergency, travel: SimTime) -> Result<(), Emergency> {
        if !self.is_at_hq() {
            return Err(emergency);
        }
        self.phase = UnitPhase::Traveling(Leg {
            origin: self.location,
            destination: emergency.district,
            remaining: travel,
            total: travel,
            emergency: Some(emergency),
        });
        Ok(())
    }

    /// Hands a homeward-bound unit a new case mid-leg. `travel` must already
    /// be recombined from the elapsed part of the homeward leg.
    pub fn recall(&mut self, emergency: Emergency, travel: SimTime) -> Result<(), Emergency> {
        let UnitPhase::Traveling(leg) = &self.phase else {
            return Err(emergency);
        };
        if leg.emergency.is_some() {
            return Err(emergency);
        }
        let origin = leg.reroute_origin();
        self.location = origin;
        self.phase = UnitPhase::Traveling(Leg {
            origin,
            destination: emergency.district,
            remaining: travel,
            total: travel,
            emergency: Some(emergency),
        });
        Ok(())
    }

    /// Swaps the Routine case of the current leg for `critical` and returns
    /// the bumped case. Fails (returning `critical`) unless
    /// [`Unit::is_redirectable`].
    pub fn redirect(
        &mut self,
        critical: Emergency,
        travel: SimTime,
    ) -> Result<Emergency, Emergency> {
        if !self.is_redirectable() {
            return Err(critical);
        }
        let UnitPhase::Traveling(leg) = &mut self.phase else {
            return Err(critical);
        };
        let origin = leg.reroute_origin();
        let Some(bumped) = leg.emergency.take() else {
            return Err(critical);
        };
        leg.origin = origin;
        leg.destination = critical.district;
        leg.remaining = travel;
        leg.total = travel;
        leg.emergency = Some(critical);
        self.location = origin;
        Ok(bumped)
    }

    /// Completes a finished travel leg. Returns `None` if the unit is not at
    /// the end of a leg.
    pub fn arrive(&mut self, now: SimTime) -> Option<Arrival> {
        match &self.phase {
            UnitPhase::Traveling(leg) if leg.remaining.is_zero() => {}
            _ => return None,
        }
        let UnitPhase::Traveling(leg) = std::mem::replace(&mut self.phase, UnitPhase::AtHq) else {
            return None;
        };
        self.location = leg.destination;
        match leg.emergency {
            None => {
                self.location = self.home;
                Some(Arrival::ReturnedToHq)
            }
            Some(emergency) => {
                let arrival = Arrival::StartedTreatment {
                    emergency: emergency.id,
                    severity: emergency.severity,
                    waited: emergency.waited(now),
                };
                self.phase = UnitPhase::Treating {
                    remaining: emergency.treatment,
                    emergency,
                };
                Some(arrival)
            }
        }
    }

    /// True when the current phase ends now and leaves the unit free: care is
    /// over, or the trip home is done.
    pub fn frees_up_now(&self) -> bool {
        self.treatment_done() || (self.is_homeward() && self.is_due())
    }

    /// True when care has finished and the unit needs its next leg.
    pub fn treatment_done(&self) -> bool {
        matches!(&self.phase, UnitPhase::Treating { remaining, .. } if remaining.is_zero())
    }

    /// `Treating --finish--> Traveling{next}`. `next` is either the next case
    /// or `None` for the trip home. Returns the finished case, or hands `next`
    /// back if care is still in progress.
    pub fn finish_treatment(
        &mut self,
        next: Option<Emergency>,
        travel: SimTime,
    ) -> Result<Emergency, Option<Emergency>> {
        if !self.treatment_done() {
            return Err(next);
        }
        let destination = next.as_ref().map(|em| em.district).unwrap_or(self.home);
        let leg = Leg {
            origin: self.location,
            destination,
            remaining: travel,
            total: travel,
            emergency: next,
        };
        match std::mem::replace(&mut self.phase, UnitPhase::Traveling(leg)) {
            UnitPhase::Treating { emergency, .. } => Ok(emergency),
            // treatment_done() guarantees the Treating phase
            other => {
                self.phase = other;
                Err(None)
            }
        }
    }
}
