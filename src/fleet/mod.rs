//! Fleet
//!
//! Response units and their per-unit state machine.

mod unit;

pub use unit::{Arrival, Leg, PhaseKind, Unit, UnitPhase, UnitTimes};
