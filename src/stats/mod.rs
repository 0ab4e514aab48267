//! Statistics
//!
//! Utilization, HQ dwell and Routine wait aggregation.

mod collector;
mod metrics;

pub use collector::StatsCollector;
pub use metrics::{Metrics, UnitMetrics};
