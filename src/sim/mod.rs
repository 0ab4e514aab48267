//! Simulation core
//!
//! Simulated time, the seeded random stream, the clock and the event loop
//! that drives everything else forward in variable-size jumps.

mod clock;
mod rng;
mod simulation;
mod time;

pub use clock::SimulationClock;
pub use rng::SimRng;
pub use simulation::Simulation;
pub use time::SimTime;
