//! Travel-time model
//!
//! Randomized inter-district travel durations drawn around the base matrix,
//! including the recombined leg used when a unit is rerouted mid-transit.

use super::district::DistrictMap;
use super::id::DistrictId;
use crate::error::ConfigError;
use crate::sim::{SimRng, SimTime};

#[derive(Debug, Clone)]
pub struct TravelModel {
    districts: DistrictMap,
}

impl TravelModel {
    pub fn new(districts: DistrictMap) -> Self {
        Self { districts }
    }

    pub fn district_count(&self) -> usize {
        self.districts.len()
    }

    pub fn check(&self, d: DistrictId) -> Result<DistrictId, ConfigError> {
        if d.0 < self.districts.len() {
            Ok(d)
        } else {
            Err(ConfigError::DistrictOutOfRange {
                index: i64::try_from(d.0).unwrap_or(i64::MAX),
                districts: self.districts.len(),
            })
        }
    }

    /// Base (deterministic) travel time in seconds: `matrix[from][to] * 60`.
    pub fn base_secs(&self, from: DistrictId, to: DistrictId) -> Result<f64, ConfigError> {
        self.check(from)?;
        self.check(to)?;
        Ok(self.districts.base_minutes()[from.0][to.0] * 60.0)
    }

    /// Travel time drawn uniformly from `[0.5, 1.5] * base`, whole seconds.
    pub fn travel_time(
        &self,
        from: DistrictId,
        to: DistrictId,
        rng: &mut SimRng,
    ) -> Result<SimTime, ConfigError> {
        let base = self.base_secs(from, to)?;
        Ok(Self::jitter(base, rng))
    }

    /// Travel time for a unit rerouted while on the leg `from -> to`.
    ///
    /// `ratio_traveled` is the elapsed fraction of that leg. The elapsed part
    /// of the old leg and the leg `to -> new_to` are blended before jitter:
    /// `base(from, to) * r + base(to, new_to) * (1 - r)`.
    pub fn travel_time_redirect(
        &self,
        from: DistrictId,
        to: DistrictId,
        new_to: DistrictId,
        ratio_traveled: f64,
        rng: &mut SimRng,
    ) -> Result<SimTime, ConfigError> {
        let r = ratio_traveled.clamp(0.0, 1.0);
        let base = self.base_secs(from, to)? * r + self.base_secs(to, new_to)? * (1.0 - r);
        Ok(Self::jitter(base, rng))
    }

    fn jitter(base_secs: f64, rng: &mut SimRng) -> SimTime {
        let base = base_secs.round();
        let lo = (base * 0.5).round() as u64;
        let hi = (base * 1.5).round() as u64;
        SimTime(rng.uniform_inclusive(lo, hi))
    }
}
