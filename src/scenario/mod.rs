//! Scenario configuration
//!
//! The JSON scenario format and the validated configuration a simulation is
//! built from.

mod config;
mod spec;

pub use config::{InjectedEmergency, SimConfig};
pub use spec::{ArrivalSpec, CitySpec, FleetSpec, ScenarioMeta, ScenarioSpec};
