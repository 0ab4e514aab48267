//! Emergency generator
//!
//! Poisson arrivals driven by a countdown, plus optional cases injected at
//! fixed timestamps. Stochastic draws happen in a fixed order on expiry:
//! next interarrival, severity, district, treatment duration.

use std::collections::VecDeque;

use rand::distributions::WeightedIndex;
use rand_distr::Exp;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::emergency::{Emergency, Severity};
use super::id::{DistrictId, EmergencyId};
use crate::error::ConfigError;
use crate::sim::{SimRng, SimTime};

/// Inclusive range of treatment durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentRange {
    pub min: SimTime,
    pub max: SimTime,
}

impl TreatmentRange {
    pub fn from_mins(min: u64, max: u64) -> Self {
        Self {
            min: SimTime::from_mins(min),
            max: SimTime::from_mins(max),
        }
    }

    fn sample(&self, rng: &mut SimRng) -> SimTime {
        SimTime(rng.uniform_inclusive(self.min.0, self.max.0))
    }
}

/// Per-severity treatment ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentRanges {
    pub critical: TreatmentRange,
    pub routine: TreatmentRange,
}

impl TreatmentRanges {
    pub fn get(&self, severity: Severity) -> TreatmentRange {
        match severity {
            Severity::Critical => self.critical,
            Severity::Routine => self.routine,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for sev in Severity::ALL {
            let r = self.get(sev);
            if r.min > r.max {
                return Err(ConfigError::InvalidTreatmentRange {
                    severity: sev,
                    min_secs: r.min.0,
                    max_secs: r.max.0,
                });
            }
        }
        Ok(())
    }
}

impl Default for TreatmentRanges {
    fn default() -> Self {
        Self {
            critical: TreatmentRange::from_mins(30, 90),
            routine: TreatmentRange::from_mins(10, 20),
        }
    }
}

/// A case scheduled to arrive at a fixed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectedCase {
    pub district: DistrictId,
    pub severity: Severity,
    pub arrival: SimTime,
    /// Fixed treatment duration; drawn from the severity range when absent.
    pub treatment: Option<SimTime>,
}

#[derive(Debug, Clone)]
pub struct EmergencyGenerator {
    /// Interarrival distribution (rate `1 / mean`); `None` when disabled.
    interarrival: Option<Exp<f64>>,
    critical_probability: f64,
    districts: usize,
    weights: WeightedIndex<f64>,
    treatment: TreatmentRanges,
    /// Countdown to the next stochastic arrival; `None` when disabled.
    until_next: Option<SimTime>,
    /// Injected cases ordered by arrival time.
    injected: VecDeque<InjectedCase>,
    next_id: u64,
}

impl EmergencyGenerator {
    pub fn new(
        populations: &[f64],
        mean_interarrival_secs: Option<f64>,
        critical_probability: f64,
        treatment: TreatmentRanges,
    ) -> Result<Self, ConfigError> {
        let weights = WeightedIndex::new(populations.iter().copied())
            .map_err(|_| ConfigError::InvalidPopulation)?;
        let interarrival = match mean_interarrival_secs {
            Some(mean) if !mean.is_finite() || mean <= 0.0 => {
                return Err(ConfigError::InvalidInterarrival(mean));
            }
            Some(mean) => {
                Some(Exp::new(1.0 / mean).map_err(|_| ConfigError::InvalidInterarrival(mean))?)
            }
            None => None,
        };
        if !(0.0..=1.0).contains(&critical_probability) {
            return Err(ConfigError::InvalidProbability(critical_probability));
        }
        treatment.validate()?;
        Ok(Self {
            interarrival,
            critical_probability,
            districts: populations.len(),
            weights,
            treatment,
            // First stochastic arrival fires at t = 0.
            until_next: mean_interarrival_secs.map(|_| SimTime::ZERO),
            injected: VecDeque::new(),
            next_id: 0,
        })
    }

    /// Schedules a case at a fixed time. Cases keep arrival order; ties keep
    /// insertion order.
    pub fn inject(&mut self, case: InjectedCase) -> Result<(), ConfigError> {
        if case.district.0 >= self.districts {
            return Err(ConfigError::DistrictOutOfRange {
                index: i64::try_from(case.district.0).unwrap_or(i64::MAX),
                districts: self.districts,
            });
        }
        let pos = self
            .injected
            .iter()
            .position(|c| c.arrival > case.arrival)
            .unwrap_or(self.injected.len());
        self.injected.insert(pos, case);
        Ok(())
    }

    pub fn pending_injected(&self) -> usize {
        self.injected.len()
    }

    /// Time until the next arrival of either kind, if any is pending.
    pub fn time_to_next(&self, now: SimTime) -> Option<SimTime> {
        let injected = self.injected.front().map(|c| c.arrival.saturating_sub(now));
        match (self.until_next, injected) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn advance(&mut self, delta: SimTime) {
        if let Some(left) = self.until_next.as_mut() {
            *left = left.saturating_sub(delta);
        }
    }

    /// Produces every arrival due at `now`: injected cases first, then the
    /// stochastic process for as long as its countdown reads zero.
    pub fn due_arrivals(&mut self, now: SimTime, rng: &mut SimRng) -> Vec<Emergency> {
        let mut out = Vec::new();

        while self.injected.front().is_some_and(|c| c.arrival <= now) {
            let Some(case) = self.injected.pop_front() else {
                break;
            };
            let treatment = match case.treatment {
                Some(t) => t,
                None => self.treatment.get(case.severity).sample(rng),
            };
            trace!(district = %case.district, severity = ?case.severity, "injected arrival");
            // A case injected mid-run for an earlier time keeps its own stamp.
            out.push(self.make(case.district, case.severity, case.arrival.min(now), treatment));
        }

        while let (Some(left), Some(interarrival)) = (self.until_next, self.interarrival) {
            if !left.is_zero() {
                break;
            }
            let gap: f64 = rng.sample(&interarrival);
            let next = SimTime(gap.round() as u64);
            self.until_next = Some(next);

            let severity = if rng.bernoulli(self.critical_probability) {
                Severity::Critical
            } else {
                Severity::Routine
            };
            let district = DistrictId(rng.sample(&self.weights));
            let treatment = self.treatment.get(severity).sample(rng);
            debug!(
                district = %district,
                severity = ?severity,
                treatment_secs = treatment.0,
                next_in_secs = next.0,
                "stochastic arrival"
            );
            out.push(self.make(district, severity, now, treatment));
        }

        out
    }

    fn make(
        &mut self,
        district: DistrictId,
        severity: Severity,
        now: SimTime,
        treatment: SimTime,
    ) -> Emergency {
        let id = EmergencyId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        Emergency {
            id,
            district,
            severity,
            arrived_at: now,
            treatment,
        }
    }
}
