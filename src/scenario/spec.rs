//! Scenario file
//!
//! JSON layout of a scenario and its layering over the default configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::config::{InjectedEmergency, SimConfig};
use crate::dispatch::StrategyKind;
use crate::error::{ConfigError, SimError};
use crate::model::{DistrictId, DistrictMap, TreatmentRange};
use crate::sim::SimTime;

/// Scenario file (JSON). Every field is optional; missing ones take the
/// reference-city defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub meta: Option<ScenarioMeta>,
    #[serde(default)]
    pub city: Option<CitySpec>,
    #[serde(default)]
    pub arrivals: Option<ArrivalSpec>,
    #[serde(default)]
    pub fleet: Option<FleetSpec>,
    #[serde(default)]
    pub strategy: Option<StrategyKind>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub horizon_hours: Option<f64>,
    #[serde(default)]
    pub preemption: Option<bool>,
    #[serde(default)]
    pub recall_homeward: Option<bool>,
    #[serde(default)]
    pub trace: Option<bool>,
    #[serde(default)]
    pub injected: Vec<InjectedEmergency>,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for ScenarioSpec {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            meta: None,
            city: None,
            arrivals: None,
            fleet: None,
            strategy: None,
            seed: None,
            horizon_hours: None,
            preemption: None,
            recall_homeward: None,
            trace: None,
            injected: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitySpec {
    pub populations: Vec<f64>,
    /// Base travel minutes, `travel_minutes[from][to]`.
    pub travel_minutes: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrivalSpec {
    /// `false` leaves only injected cases.
    #[serde(default = "default_true")]
    pub stochastic: bool,
    #[serde(default)]
    pub mean_interarrival_mins: Option<f64>,
    #[serde(default)]
    pub critical_probability: Option<f64>,
    /// Inclusive `[min, max]` treatment minutes.
    #[serde(default)]
    pub critical_treatment_mins: Option<[u64; 2]>,
    #[serde(default)]
    pub routine_treatment_mins: Option<[u64; 2]>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetSpec {
    /// Raw HQ district indices.
    #[serde(default)]
    pub hqs: Option<Vec<i64>>,
    #[serde(default)]
    pub units: Option<usize>,
}

impl ScenarioSpec {
    pub fn from_json_str(raw: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, SimError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Layers the scenario over the defaults and validates the result.
    pub fn into_config(self) -> Result<SimConfig, ConfigError> {
        let mut cfg = SimConfig::default();

        if let Some(city) = self.city {
            cfg.districts = DistrictMap::new(city.populations, city.travel_minutes)?;
        }
        let n = cfg.districts.len();

        if let Some(arr) = self.arrivals {
            if !arr.stochastic {
                cfg.mean_interarrival_secs = None;
            } else if let Some(mins) = arr.mean_interarrival_mins {
                cfg.mean_interarrival_secs = Some(mins * 60.0);
            }
            if let Some(p) = arr.critical_probability {
                cfg.critical_probability = p;
            }
            if let Some([lo, hi]) = arr.critical_treatment_mins {
                cfg.treatment.critical = TreatmentRange::from_mins(lo, hi);
            }
            if let Some([lo, hi]) = arr.routine_treatment_mins {
                cfg.treatment.routine = TreatmentRange::from_mins(lo, hi);
            }
        }

        if let Some(fleet) = self.fleet {
            if let Some(hqs) = fleet.hqs {
                cfg.hqs = hqs
                    .into_iter()
                    .map(|raw| DistrictId::checked(raw, n))
                    .collect::<Result<_, _>>()?;
            }
            if let Some(units) = fleet.units {
                cfg.units = units;
            }
        }

        if let Some(strategy) = self.strategy {
            cfg.strategy = strategy;
        }
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        if let Some(hours) = self.horizon_hours {
            cfg.horizon = SimTime::from_hours_f64(hours)?;
        }
        if let Some(on) = self.preemption {
            cfg.preemption = on;
        }
        if let Some(on) = self.recall_homeward {
            cfg.recall_homeward = on;
        }
        if let Some(on) = self.trace {
            cfg.trace = on;
        }
        cfg.injected = self.injected;

        cfg.validate()?;
        Ok(cfg)
    }
}
