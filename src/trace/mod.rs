//! Run trace for offline visualization
//!
//! Optional. When enabled, the simulation samples queue lengths and unit
//! states at every event boundary and keeps every dispatch event. Output is
//! plain serde data; the consumer chooses the file format.

mod types;

pub use types::{TraceEvent, TraceLogger, TraceSample, UnitSnapshot};
