pub mod dispatch;
pub mod error;
pub mod fleet;
pub mod model;
pub mod scenario;
pub mod sim;
pub mod stats;
pub mod trace;

pub use error::{ConfigError, SimError};
pub use scenario::{InjectedEmergency, ScenarioSpec, SimConfig};
pub use sim::Simulation;
pub use stats::Metrics;

#[cfg(test)]
mod test;
