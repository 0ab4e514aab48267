//! Simulation clock

use super::time::SimTime;

/// Elapsed simulated time. Only moves forward.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimulationClock {
    now: SimTime,
}

impl SimulationClock {
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn advance(&mut self, delta: SimTime) {
        self.now = self.now.saturating_add(delta);
    }

    /// Time left before `horizon`.
    pub fn until(&self, horizon: SimTime) -> SimTime {
        horizon.saturating_sub(self.now)
    }
}
