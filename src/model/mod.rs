//! Domain model
//!
//! Districts, emergencies, the travel-time model and the arrival process.

mod district;
mod emergency;
mod generator;
mod id;
mod travel;

pub use district::DistrictMap;
pub use emergency::{Emergency, Severity};
pub use generator::{EmergencyGenerator, InjectedCase, TreatmentRange, TreatmentRanges};
pub use id::{DistrictId, EmergencyId, UnitId};
pub use travel::TravelModel;
