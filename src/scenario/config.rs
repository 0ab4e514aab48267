//! Validated run configuration

use serde::{Deserialize, Serialize};

use crate::dispatch::StrategyKind;
use crate::error::ConfigError;
use crate::model::{DistrictId, DistrictMap, InjectedCase, Severity, TreatmentRanges};
use crate::sim::SimTime;

/// A case placed on the timeline by the scenario rather than drawn.
///
/// `district` is kept raw so that out-of-range (including negative) indices
/// reach validation instead of being lost in parsing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InjectedEmergency {
    pub district: i64,
    pub severity: Severity,
    #[serde(default)]
    pub arrival_secs: u64,
    #[serde(default)]
    pub treatment_secs: Option<u64>,
}

impl InjectedEmergency {
    pub fn new(district: i64, severity: Severity, arrival_secs: u64) -> Self {
        Self {
            district,
            severity,
            arrival_secs,
            treatment_secs: None,
        }
    }

    pub fn with_treatment_secs(mut self, secs: u64) -> Self {
        self.treatment_secs = Some(secs);
        self
    }

    pub fn to_case(&self, districts: usize) -> Result<InjectedCase, ConfigError> {
        Ok(InjectedCase {
            district: DistrictId::checked(self.district, districts)?,
            severity: self.severity,
            arrival: SimTime(self.arrival_secs),
            treatment: self.treatment_secs.map(SimTime),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub districts: DistrictMap,
    /// `None` disables the stochastic arrival process.
    pub mean_interarrival_secs: Option<f64>,
    pub critical_probability: f64,
    pub treatment: TreatmentRanges,
    /// HQ districts; unit `i` is based at `hqs[i % hqs.len()]`.
    pub hqs: Vec<DistrictId>,
    pub units: usize,
    pub strategy: StrategyKind,
    pub seed: u64,
    pub horizon: SimTime,
    pub preemption: bool,
    pub recall_homeward: bool,
    pub trace: bool,
    pub injected: Vec<InjectedEmergency>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            districts: DistrictMap::default(),
            mean_interarrival_secs: Some(50.0 * 60.0),
            critical_probability: 0.25,
            treatment: TreatmentRanges::default(),
            hqs: vec![DistrictId(1)],
            units: 1,
            strategy: StrategyKind::Fifo,
            seed: 123,
            horizon: SimTime::from_hours(24),
            preemption: true,
            recall_homeward: false,
            trace: false,
            injected: Vec::new(),
        }
    }
}

impl SimConfig {
    /// No stochastic arrivals; only injected cases reach the queue.
    pub fn injected_only(mut self) -> Self {
        self.mean_interarrival_secs = None;
        self
    }

    pub fn with_horizon(mut self, horizon: SimTime) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_fleet(mut self, hqs: Vec<DistrictId>, units: usize) -> Self {
        self.hqs = hqs;
        self.units = units;
        self
    }

    pub fn with_trace(mut self, on: bool) -> Self {
        self.trace = on;
        self
    }

    pub fn inject(mut self, em: InjectedEmergency) -> Self {
        self.injected.push(em);
        self
    }

    /// Home HQ of unit `i`.
    pub fn home_of(&self, unit: usize) -> Option<DistrictId> {
        if self.hqs.is_empty() {
            return None;
        }
        self.hqs.get(unit % self.hqs.len()).copied()
    }

    /// Checks everything that can be checked before the run starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.districts.len();
        if n == 0 {
            return Err(ConfigError::NoDistricts);
        }
        if self.units == 0 {
            return Err(ConfigError::NoUnits);
        }
        if self.hqs.is_empty() {
            return Err(ConfigError::NoHqs);
        }
        if let Some(bad) = self.hqs.iter().find(|d| d.0 >= n) {
            return Err(ConfigError::DistrictOutOfRange {
                index: i64::try_from(bad.0).unwrap_or(i64::MAX),
                districts: n,
            });
        }
        if let Some(mean) = self.mean_interarrival_secs {
            if !mean.is_finite() || mean <= 0.0 {
                return Err(ConfigError::InvalidInterarrival(mean));
            }
        }
        if !(0.0..=1.0).contains(&self.critical_probability) {
            return Err(ConfigError::InvalidProbability(self.critical_probability));
        }
        self.treatment.validate()?;
        for em in &self.injected {
            em.to_case(n)?;
        }
        Ok(())
    }
}
